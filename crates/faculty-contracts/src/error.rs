use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::contract::archive::ArchiveError;
use crate::workflows::contract::benefits::BenefitsError;
use crate::workflows::contract::template::TemplateError;
use crate::workflows::roster::RosterImportError;
use std::fmt;

/// Fatal, batch-level failures. Per-row problems never reach this type;
/// they stay inside the batch report.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Roster(RosterImportError),
    Template(TemplateError),
    Benefits(BenefitsError),
    Archive(ArchiveError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Roster(err) => write!(f, "roster import error: {}", err),
            AppError::Template(err) => write!(f, "template error: {}", err),
            AppError::Benefits(err) => write!(f, "benefits table error: {}", err),
            AppError::Archive(err) => write!(f, "archive error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Roster(err) => Some(err),
            AppError::Template(err) => Some(err),
            AppError::Benefits(err) => Some(err),
            AppError::Archive(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<RosterImportError> for AppError {
    fn from(value: RosterImportError) -> Self {
        Self::Roster(value)
    }
}

impl From<TemplateError> for AppError {
    fn from(value: TemplateError) -> Self {
        Self::Template(value)
    }
}

impl From<BenefitsError> for AppError {
    fn from(value: BenefitsError) -> Self {
        Self::Benefits(value)
    }
}

impl From<ArchiveError> for AppError {
    fn from(value: ArchiveError) -> Self {
        Self::Archive(value)
    }
}
