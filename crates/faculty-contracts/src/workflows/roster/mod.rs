mod parser;
mod spreadsheet;

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One validated roster row. `row` is the 1-based data row (header
/// excluded), kept so failures later in the pipeline can still point at
/// the input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterRecord {
    pub row: usize,
    pub name: String,
    pub degree: String,
    pub gender: String,
    pub faculty_type: String,
    pub college_department: String,
    pub academic_year: String,
    pub semester: String,
    pub compensation_aed: String,
    pub workload_hours: String,
    pub course_level: String,
    pub payment_details: String,
    pub dean_name: String,
    pub faculty_name: String,
    pub hr_representative: String,
    pub rank: Option<String>,
    pub campus: Option<String>,
    pub marital_status: Option<String>,
    pub hire_type: Option<String>,
}

/// Import result with batch-level partial-failure semantics: bad rows
/// land in `failures`, the rest keep going.
#[derive(Debug, Default)]
pub struct RosterImport {
    pub records: Vec<RosterRecord>,
    pub failures: Vec<RowError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub row: usize,
    pub kind: RowErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowErrorKind {
    MissingField(&'static str),
    Unreadable(String),
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            RowErrorKind::MissingField(field) => {
                write!(f, "row {}: missing required field '{}'", self.row, field)
            }
            RowErrorKind::Unreadable(reason) => {
                write!(f, "row {}: unreadable row: {}", self.row, reason)
            }
        }
    }
}

impl std::error::Error for RowError {}

pub struct RosterImporter;

impl RosterImporter {
    /// Reads a roster file, dispatching on extension: .csv goes through
    /// the CSV parser, .xlsx/.xls through the spreadsheet reader.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<RosterImport, RosterImportError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "csv" => {
                let file = File::open(path)?;
                Ok(parser::parse_records(file))
            }
            "xlsx" | "xlsm" | "xls" => spreadsheet::parse_workbook(path),
            other => Err(RosterImportError::UnsupportedFormat {
                extension: other.to_string(),
            }),
        }
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> RosterImport {
        parser::parse_records(reader)
    }
}

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Excel(calamine::Error),
    UnsupportedFormat { extension: String },
    EmptyWorkbook,
}

impl fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read roster file: {}", err),
            RosterImportError::Excel(err) => write!(f, "invalid spreadsheet data: {}", err),
            RosterImportError::UnsupportedFormat { extension } => {
                if extension.is_empty() {
                    write!(f, "roster file has no extension; expected .csv or .xlsx")
                } else {
                    write!(
                        f,
                        "unsupported roster format '.{}'; expected .csv or .xlsx",
                        extension
                    )
                }
            }
            RosterImportError::EmptyWorkbook => {
                write!(f, "spreadsheet contains no worksheet data")
            }
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Excel(err) => Some(err),
            RosterImportError::UnsupportedFormat { .. } | RosterImportError::EmptyWorkbook => None,
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<calamine::Error> for RosterImportError {
    fn from(err: calamine::Error) -> Self {
        Self::Excel(err)
    }
}
