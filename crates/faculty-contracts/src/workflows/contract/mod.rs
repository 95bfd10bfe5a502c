pub mod archive;
pub mod benefits;
pub mod domain;
mod naming;
pub mod template;

use crate::workflows::roster::{RosterImport, RosterRecord, RowError, RowErrorKind};
use benefits::{BenefitsError, BenefitsRecord, BenefitsTable};
use chrono::{Local, NaiveDateTime};
use domain::{DomainParseError, FacultyProfile, Gender, HireType, Title};
use std::collections::HashSet;
use std::fmt;
use template::{DocxTemplate, TemplateError, TokenMap};
use tracing::{info, warn};

/// One finished document, ready to write to disk or bundle.
#[derive(Debug, Clone)]
pub struct GeneratedContract {
    pub row: usize,
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Outcome of a batch run. Row failures never abort the batch; they are
/// collected here with enough context to fix the input.
#[derive(Debug)]
pub struct BatchReport {
    pub generated_at: NaiveDateTime,
    pub contracts: Vec<GeneratedContract>,
    pub failures: Vec<RowFailure>,
}

#[derive(Debug)]
pub struct RowFailure {
    pub row: usize,
    pub cause: GenerationError,
}

impl fmt::Display for RowFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: {}", self.row, self.cause)
    }
}

impl From<RowError> for RowFailure {
    fn from(err: RowError) -> Self {
        let cause = match err.kind {
            RowErrorKind::MissingField(field) => GenerationError::MissingField(field),
            RowErrorKind::Unreadable(reason) => GenerationError::Unreadable(reason),
        };
        Self {
            row: err.row,
            cause,
        }
    }
}

#[derive(Debug)]
pub enum GenerationError {
    MissingField(&'static str),
    Unreadable(String),
    InvalidValue(DomainParseError),
    Benefits(BenefitsError),
    Template(TemplateError),
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::MissingField(field) => {
                write!(f, "missing required field '{}'", field)
            }
            GenerationError::Unreadable(reason) => write!(f, "unreadable row: {}", reason),
            GenerationError::InvalidValue(err) => write!(f, "{}", err),
            GenerationError::Benefits(err) => write!(f, "{}", err),
            GenerationError::Template(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for GenerationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GenerationError::MissingField(_) | GenerationError::Unreadable(_) => None,
            GenerationError::InvalidValue(err) => Some(err),
            GenerationError::Benefits(err) => Some(err),
            GenerationError::Template(err) => Some(err),
        }
    }
}

impl From<DomainParseError> for GenerationError {
    fn from(err: DomainParseError) -> Self {
        Self::InvalidValue(err)
    }
}

impl From<BenefitsError> for GenerationError {
    fn from(err: BenefitsError) -> Self {
        Self::Benefits(err)
    }
}

impl From<TemplateError> for GenerationError {
    fn from(err: TemplateError) -> Self {
        Self::Template(err)
    }
}

/// Turns validated roster records into filled offer letters. Holds the
/// template and the benefits table for the lifetime of one batch; both
/// are read-only, so records are independent of each other.
pub struct ContractGenerator {
    template: DocxTemplate,
    benefits: BenefitsTable,
}

impl ContractGenerator {
    pub fn new(template: DocxTemplate, benefits: BenefitsTable) -> Self {
        Self { template, benefits }
    }

    /// Generates the document for one record: derive the salutation,
    /// resolve benefits when the profile columns are present, merge the
    /// token map, fill, and name the output.
    pub fn generate(&self, record: &RosterRecord) -> Result<GeneratedContract, GenerationError> {
        let title = Title::derive(&record.degree, Gender::from_text(&record.gender));
        let benefits = self.resolve_benefits(record)?;
        let tokens = build_token_map(record, title, benefits.as_ref())?;
        let bytes = self.template.fill(&tokens)?;
        let filename = naming::output_filename(
            title,
            &record.name,
            &record.academic_year,
            &record.semester,
        );
        Ok(GeneratedContract {
            row: record.row,
            filename,
            bytes,
        })
    }

    pub fn run_batch(&self, import: RosterImport) -> BatchReport {
        let RosterImport { records, failures } = import;
        let mut report = BatchReport {
            generated_at: Local::now().naive_local(),
            contracts: Vec::new(),
            failures: failures.into_iter().map(RowFailure::from).collect(),
        };

        for record in &records {
            match self.generate(record) {
                Ok(contract) => {
                    info!(row = contract.row, filename = %contract.filename, "generated contract");
                    report.contracts.push(contract);
                }
                Err(cause) => {
                    warn!(row = record.row, error = %cause, "skipping row");
                    report.failures.push(RowFailure {
                        row: record.row,
                        cause,
                    });
                }
            }
        }

        dedupe_filenames(&mut report.contracts);
        report.failures.sort_by_key(|failure| failure.row);
        report
    }

    /// Benefits resolution is keyed on the optional profile columns.
    /// When all three key columns are present the lookup must succeed;
    /// a missing table entry fails the record rather than fabricating
    /// an empty package.
    fn resolve_benefits(
        &self,
        record: &RosterRecord,
    ) -> Result<Option<BenefitsRecord>, GenerationError> {
        let (rank, campus, marital_status) = match (
            record.rank.as_deref(),
            record.campus.as_deref(),
            record.marital_status.as_deref(),
        ) {
            (Some(rank), Some(campus), Some(marital_status)) => (rank, campus, marital_status),
            _ => return Ok(None),
        };
        let profile =
            FacultyProfile::from_text(rank, campus, marital_status, record.hire_type.as_deref())?;
        let record = self.benefits.resolve_profile(&profile)?;
        Ok(Some(record.clone()))
    }
}

fn build_token_map(
    record: &RosterRecord,
    title: Title,
    benefits: Option<&BenefitsRecord>,
) -> Result<TokenMap, GenerationError> {
    let mut tokens = TokenMap::new();
    tokens.insert("Title", title.label());
    tokens.insert(
        "Candidate_Name",
        format!("{} {}", title.label(), record.name.trim()),
    );
    tokens.insert("Faculty_Type", record.faculty_type.as_str());
    tokens.insert("College_Department", record.college_department.as_str());
    tokens.insert("Academic_Year", record.academic_year.as_str());
    tokens.insert("Semester", record.semester.as_str());
    tokens.insert("Total_Compensation", record.compensation_aed.as_str());
    tokens.insert("Workload_Hours", record.workload_hours.as_str());
    tokens.insert("Course_Level", record.course_level.as_str());
    tokens.insert("Payment_Details", record.payment_details.as_str());
    tokens.insert("Dean_Name", record.dean_name.as_str());
    tokens.insert("Faculty_Name", record.faculty_name.as_str());
    tokens.insert("HR_Representative", record.hr_representative.as_str());

    if let Some(campus) = record.campus.as_deref() {
        tokens.insert("Campus_Location", campus.trim());
    }
    if let Some(hire_type) = record.hire_type.as_deref() {
        tokens.insert("Hire_Type", HireType::parse(hire_type)?.label());
    }
    if let Some(benefits) = benefits {
        for (name, value) in benefits.token_values() {
            tokens.insert(name, value);
        }
    }
    Ok(tokens)
}

/// Output names are deterministic per row; two rows for the same person
/// and term get a `_rowN` suffix instead of clobbering each other.
fn dedupe_filenames(contracts: &mut [GeneratedContract]) {
    let mut seen: HashSet<String> = HashSet::new();
    for contract in contracts.iter_mut() {
        if !seen.insert(contract.filename.clone()) {
            let stem = contract
                .filename
                .strip_suffix(".docx")
                .unwrap_or(&contract.filename)
                .to_string();
            contract.filename = format!("{}_row{}.docx", stem, contract.row);
            seen.insert(contract.filename.clone());
        }
    }
}
