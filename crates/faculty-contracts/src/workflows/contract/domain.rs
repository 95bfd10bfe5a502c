use serde::{Deserialize, Serialize};
use std::fmt;

/// Academic rank recognized by the benefits table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
    Professor,
    AssociateProfessor,
    AssistantProfessor,
    SeniorLecturer,
    SeniorInstructor,
    Instructor,
}

impl Rank {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Professor,
            Self::AssociateProfessor,
            Self::AssistantProfessor,
            Self::SeniorLecturer,
            Self::SeniorInstructor,
            Self::Instructor,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Professor => "Professor",
            Self::AssociateProfessor => "Associate Professor",
            Self::AssistantProfessor => "Assistant Professor",
            Self::SeniorLecturer => "Senior Lecturer",
            Self::SeniorInstructor => "Senior Instructor",
            Self::Instructor => "Instructor",
        }
    }

    pub fn parse(value: &str) -> Result<Self, DomainParseError> {
        match normalize(value).as_str() {
            "professor" | "full professor" => Ok(Self::Professor),
            "associate professor" => Ok(Self::AssociateProfessor),
            "assistant professor" => Ok(Self::AssistantProfessor),
            "senior lecturer" => Ok(Self::SeniorLecturer),
            "senior instructor" => Ok(Self::SeniorInstructor),
            "instructor" => Ok(Self::Instructor),
            _ => Err(DomainParseError::new("Rank", value)),
        }
    }
}

/// Campus bucket used as part of the benefits key. The combined
/// "Abu Dhabi/Dubai" bucket exists because some rank tiers share one
/// benefits row across both campuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Campus {
    AbuDhabi,
    AlAin,
    Dubai,
    AbuDhabiDubai,
}

impl Campus {
    pub const fn ordered() -> [Self; 4] {
        [Self::AbuDhabi, Self::AlAin, Self::Dubai, Self::AbuDhabiDubai]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::AbuDhabi => "Abu Dhabi",
            Self::AlAin => "Al Ain",
            Self::Dubai => "Dubai",
            Self::AbuDhabiDubai => "Abu Dhabi/Dubai",
        }
    }

    pub fn parse(value: &str) -> Result<Self, DomainParseError> {
        match normalize(value).as_str() {
            "abu dhabi" => Ok(Self::AbuDhabi),
            "al ain" => Ok(Self::AlAin),
            "dubai" => Ok(Self::Dubai),
            "abu dhabi/dubai" | "abu dhabi / dubai" => Ok(Self::AbuDhabiDubai),
            _ => Err(DomainParseError::new("Campus", value)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaritalStatus {
    Married,
    Single,
}

impl MaritalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Married => "Married",
            Self::Single => "Single",
        }
    }

    pub fn parse(value: &str) -> Result<Self, DomainParseError> {
        match normalize(value).as_str() {
            "married" => Ok(Self::Married),
            "single" => Ok(Self::Single),
            _ => Err(DomainParseError::new("Marital Status", value)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HireType {
    Local,
    International,
}

impl HireType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Local => "Local",
            Self::International => "International",
        }
    }

    pub fn parse(value: &str) -> Result<Self, DomainParseError> {
        match normalize(value).as_str() {
            "local" => Ok(Self::Local),
            "international" => Ok(Self::International),
            _ => Err(DomainParseError::new("Hire Type", value)),
        }
    }
}

/// Only consulted for salutation fallback, so anything that is not
/// clearly male or female lands in the Unknown bucket instead of
/// failing the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

impl Gender {
    pub fn from_text(value: &str) -> Self {
        match normalize(value).as_str() {
            "male" | "m" => Self::Male,
            "female" | "f" => Self::Female,
            _ => Self::Unknown,
        }
    }
}

/// The composite benefits key plus the hire-type attribute collected on
/// the same form. Built once per generation request, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacultyProfile {
    pub rank: Rank,
    pub campus: Campus,
    pub marital_status: MaritalStatus,
    pub hire_type: Option<HireType>,
}

impl FacultyProfile {
    /// Builds a profile from the raw roster cells, validating each
    /// against its closed enumeration.
    pub fn from_text(
        rank: &str,
        campus: &str,
        marital_status: &str,
        hire_type: Option<&str>,
    ) -> Result<Self, DomainParseError> {
        Ok(Self {
            rank: Rank::parse(rank)?,
            campus: Campus::parse(campus)?,
            marital_status: MaritalStatus::parse(marital_status)?,
            hire_type: hire_type.map(HireType::parse).transpose()?,
        })
    }
}

/// Salutation used in the letter body and the output filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Title {
    Dr,
    Ms,
    Mr,
}

impl Title {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Dr => "Dr.",
            Self::Ms => "Ms.",
            Self::Mr => "Mr.",
        }
    }

    /// The degree check always wins over the gender check.
    pub fn derive(degree: &str, gender: Gender) -> Self {
        let degree = degree.to_lowercase();
        if ["phd", "dphil", "doctorate"]
            .iter()
            .any(|marker| degree.contains(marker))
        {
            return Self::Dr;
        }
        match gender {
            Gender::Female => Self::Ms,
            Gender::Male | Gender::Unknown => Self::Mr,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainParseError {
    pub field: &'static str,
    pub value: String,
}

impl DomainParseError {
    fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.trim().to_string(),
        }
    }
}

impl fmt::Display for DomainParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized {} '{}'", self.field, self.value)
    }
}

impl std::error::Error for DomainParseError {}

fn normalize(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doctoral_degree_wins_over_gender() {
        assert_eq!(Title::derive("PhD", Gender::Female), Title::Dr);
        assert_eq!(Title::derive("Doctorate in Physics", Gender::Male), Title::Dr);
        assert_eq!(Title::derive("DPhil (Oxon)", Gender::Unknown), Title::Dr);
        assert_eq!(Title::derive("phd candidate", Gender::Female), Title::Dr);
    }

    #[test]
    fn non_doctoral_degree_falls_back_to_gender() {
        assert_eq!(Title::derive("MSc", Gender::Female), Title::Ms);
        assert_eq!(Title::derive("MSc", Gender::Male), Title::Mr);
        assert_eq!(Title::derive("MBA", Gender::Unknown), Title::Mr);
        assert_eq!(Title::derive("", Gender::Female), Title::Ms);
    }

    #[test]
    fn gender_parsing_is_lenient_and_total() {
        assert_eq!(Gender::from_text("  Female "), Gender::Female);
        assert_eq!(Gender::from_text("MALE"), Gender::Male);
        assert_eq!(Gender::from_text("prefer not to say"), Gender::Unknown);
        assert_eq!(Gender::from_text(""), Gender::Unknown);
    }

    #[test]
    fn rank_parses_human_input() {
        assert_eq!(Rank::parse("Professor").expect("parses"), Rank::Professor);
        assert_eq!(
            Rank::parse("  associate   professor ").expect("parses"),
            Rank::AssociateProfessor
        );
        let err = Rank::parse("Adjunct Wizard").expect_err("rejects unknown rank");
        assert_eq!(err.field, "Rank");
        assert_eq!(err.value, "Adjunct Wizard");
    }

    #[test]
    fn campus_parses_combined_bucket() {
        assert_eq!(Campus::parse("Abu Dhabi").expect("parses"), Campus::AbuDhabi);
        assert_eq!(
            Campus::parse("abu dhabi/dubai").expect("parses"),
            Campus::AbuDhabiDubai
        );
        assert_eq!(
            Campus::parse("Abu Dhabi / Dubai").expect("parses"),
            Campus::AbuDhabiDubai
        );
        assert!(Campus::parse("Sharjah").is_err());
    }

    #[test]
    fn profile_builds_from_roster_cells() {
        let profile =
            FacultyProfile::from_text("Professor", "Al Ain", "Married", Some("International"))
                .expect("parses");
        assert_eq!(profile.rank, Rank::Professor);
        assert_eq!(profile.campus, Campus::AlAin);
        assert_eq!(profile.marital_status, MaritalStatus::Married);
        assert_eq!(profile.hire_type, Some(HireType::International));
        assert!(FacultyProfile::from_text("Professor", "Al Ain", "Widowed", None).is_err());
    }

    #[test]
    fn labels_round_out_the_closed_sets() {
        assert_eq!(Rank::ordered().len(), 6);
        assert_eq!(Campus::ordered().len(), 4);
        assert_eq!(MaritalStatus::Married.label(), "Married");
        assert_eq!(HireType::parse("international").expect("parses").label(), "International");
    }
}
