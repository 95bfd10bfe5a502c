mod cli;
mod commands;

use faculty_contracts::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
