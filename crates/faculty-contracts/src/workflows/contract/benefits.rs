use super::domain::{Campus, FacultyProfile, MaritalStatus, Rank};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

const BUILTIN_TABLE: &str = include_str!("../../../resources/benefits.json");

/// One benefits package. Produced fresh per lookup, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenefitsRecord {
    pub housing_allowance: u32,
    pub furniture_allowance: u32,
    pub school_allowance: u32,
    pub tuition_waiver: String,
    pub relocation_allowance: u32,
    pub repatriation_allowance: u32,
    pub health_insurance: String,
    pub annual_leave_days: u16,
    pub joining_ticket: String,
    pub annual_ticket: String,
}

impl BenefitsRecord {
    /// Flattens the record into the placeholder names the letter
    /// templates use.
    pub fn token_values(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Housing_Allowance", self.housing_allowance.to_string()),
            ("Furniture_Allowance", self.furniture_allowance.to_string()),
            ("School_Allowance", self.school_allowance.to_string()),
            ("Tuition_Waiver", self.tuition_waiver.clone()),
            ("Relocation_Allowance", self.relocation_allowance.to_string()),
            (
                "Repatriation_Allowance",
                self.repatriation_allowance.to_string(),
            ),
            ("Health_Insurance", self.health_insurance.clone()),
            ("Annual_Leave_Days", self.annual_leave_days.to_string()),
            ("Joining_Ticket", self.joining_ticket.clone()),
            ("Annual_Ticket", self.annual_ticket.clone()),
        ]
    }
}

#[derive(Debug, Deserialize)]
struct BenefitsEntry {
    rank: Rank,
    campus: Campus,
    marital_status: MaritalStatus,
    benefits: BenefitsRecord,
}

/// Read-only lookup table keyed by (rank, campus, marital status).
/// Loaded once, passed explicitly into the generator.
#[derive(Debug, Clone)]
pub struct BenefitsTable {
    entries: HashMap<(Rank, Campus, MaritalStatus), BenefitsRecord>,
}

impl BenefitsTable {
    /// The table that ships with the crate, for installs that have not
    /// configured an external one.
    pub fn builtin() -> Self {
        let entries: Vec<BenefitsEntry> =
            serde_json::from_str(BUILTIN_TABLE).expect("embedded benefits table is valid JSON");
        Self::from_entries(entries)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, BenefitsError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, BenefitsError> {
        let entries: Vec<BenefitsEntry> = serde_json::from_reader(reader)?;
        Ok(Self::from_entries(entries))
    }

    fn from_entries(entries: Vec<BenefitsEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|entry| {
                (
                    (entry.rank, entry.campus, entry.marital_status),
                    entry.benefits,
                )
            })
            .collect();
        Self { entries }
    }

    /// Pure lookup. A missing composite key is an error, never a
    /// fabricated default record.
    pub fn resolve(
        &self,
        rank: Rank,
        campus: Campus,
        marital_status: MaritalStatus,
    ) -> Result<&BenefitsRecord, BenefitsError> {
        self.entries
            .get(&(rank, campus, marital_status))
            .ok_or(BenefitsError::NotFound {
                rank,
                campus,
                marital_status,
            })
    }

    pub fn resolve_profile(&self, profile: &FacultyProfile) -> Result<&BenefitsRecord, BenefitsError> {
        self.resolve(profile.rank, profile.campus, profile.marital_status)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug)]
pub enum BenefitsError {
    Io(std::io::Error),
    Json(serde_json::Error),
    NotFound {
        rank: Rank,
        campus: Campus,
        marital_status: MaritalStatus,
    },
}

impl fmt::Display for BenefitsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BenefitsError::Io(err) => write!(f, "failed to read benefits table: {}", err),
            BenefitsError::Json(err) => write!(f, "invalid benefits table data: {}", err),
            BenefitsError::NotFound {
                rank,
                campus,
                marital_status,
            } => write!(
                f,
                "no benefits entry for ({}, {}, {})",
                rank.label(),
                campus.label(),
                marital_status.label()
            ),
        }
    }
}

impl std::error::Error for BenefitsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BenefitsError::Io(err) => Some(err),
            BenefitsError::Json(err) => Some(err),
            BenefitsError::NotFound { .. } => None,
        }
    }
}

impl From<std::io::Error> for BenefitsError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for BenefitsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_parses_and_is_nonempty() {
        let table = BenefitsTable::builtin();
        assert!(!table.is_empty());
    }

    #[test]
    fn resolves_the_al_ain_professor_fixture() {
        let table = BenefitsTable::builtin();
        let record = table
            .resolve(Rank::Professor, Campus::AlAin, MaritalStatus::Married)
            .expect("fixture row present");
        assert_eq!(record.housing_allowance, 45000);
        assert_eq!(record.furniture_allowance, 30000);
        assert_eq!(record.annual_leave_days, 56);
    }

    #[test]
    fn resolution_is_deterministic_across_calls() {
        let table = BenefitsTable::builtin();
        let first = table
            .resolve(Rank::Instructor, Campus::AbuDhabiDubai, MaritalStatus::Single)
            .expect("row present")
            .clone();
        let second = table
            .resolve(Rank::Instructor, Campus::AbuDhabiDubai, MaritalStatus::Single)
            .expect("row present")
            .clone();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_key_reports_the_full_composite_key() {
        let table = BenefitsTable::builtin();
        let err = table
            .resolve(Rank::SeniorInstructor, Campus::AlAin, MaritalStatus::Single)
            .expect_err("no senior instructor row for Al Ain");
        let message = err.to_string();
        assert!(message.contains("Senior Instructor"));
        assert!(message.contains("Al Ain"));
        assert!(message.contains("Single"));
    }

    #[test]
    fn loads_an_external_table_from_json() {
        let json = r#"[
            {
                "rank": "instructor",
                "campus": "dubai",
                "marital_status": "single",
                "benefits": {
                    "housing_allowance": 1,
                    "furniture_allowance": 2,
                    "school_allowance": 0,
                    "tuition_waiver": "none",
                    "relocation_allowance": 3,
                    "repatriation_allowance": 4,
                    "health_insurance": "employee only",
                    "annual_leave_days": 5,
                    "joining_ticket": "none",
                    "annual_ticket": "none"
                }
            }
        ]"#;
        let table = BenefitsTable::from_reader(json.as_bytes()).expect("table parses");
        assert_eq!(table.len(), 1);
        let record = table
            .resolve(Rank::Instructor, Campus::Dubai, MaritalStatus::Single)
            .expect("row present");
        assert_eq!(record.annual_leave_days, 5);
        assert!(table
            .resolve(Rank::Professor, Campus::Dubai, MaritalStatus::Single)
            .is_err());
    }

    #[test]
    fn token_values_cover_every_benefit_field() {
        let table = BenefitsTable::builtin();
        let record = table
            .resolve(Rank::Professor, Campus::AlAin, MaritalStatus::Married)
            .expect("fixture row present");
        let tokens = record.token_values();
        assert_eq!(tokens.len(), 10);
        assert!(tokens
            .iter()
            .any(|(name, value)| *name == "Housing_Allowance" && value == "45000"));
        assert!(tokens
            .iter()
            .any(|(name, value)| *name == "Annual_Leave_Days" && value == "56"));
    }
}
