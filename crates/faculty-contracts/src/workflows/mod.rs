pub mod contract;
pub mod roster;
