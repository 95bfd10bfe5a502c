use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// Checked before the configured level, so a single batch run can be
/// traced (`CONTRACTS_LOG=faculty_contracts=trace`) without editing the
/// environment file.
const LOG_FILTER_ENV: &str = "CONTRACTS_LOG";

#[derive(Debug)]
pub enum TelemetryError {
    Filter { value: String, source: ParseError },
    Init(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::Filter { value, .. } => {
                write!(f, "invalid log filter '{}'", value)
            }
            TelemetryError::Init(err) => write!(f, "failed to initialize logging: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::Filter { source, .. } => Some(source),
            TelemetryError::Init(err) => Some(&**err),
        }
    }
}

/// Installs the global subscriber for a batch run: plain compact lines
/// without color or targets, sized for terminal output and log capture.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    tracing_subscriber::fmt()
        .with_env_filter(filter(config)?)
        .with_target(false)
        .with_ansi(false)
        .compact()
        .try_init()
        .map_err(TelemetryError::Init)
}

fn filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    match EnvFilter::try_from_env(LOG_FILTER_ENV) {
        Ok(filter) => Ok(filter),
        Err(_) => {
            EnvFilter::try_new(&config.log_level).map_err(|source| TelemetryError::Filter {
                value: config.log_level.clone(),
                source,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn config(log_level: &str) -> TelemetryConfig {
        TelemetryConfig {
            log_level: log_level.to_string(),
        }
    }

    #[test]
    fn falls_back_to_the_configured_level() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        env::remove_var(LOG_FILTER_ENV);
        assert!(filter(&config("debug")).is_ok());
    }

    #[test]
    fn env_override_wins_over_the_configured_level() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        env::set_var(LOG_FILTER_ENV, "warn,faculty_contracts=trace");
        let result = filter(&config("not a real level"));
        env::remove_var(LOG_FILTER_ENV);
        assert!(result.is_ok());
    }

    #[test]
    fn unparseable_configured_level_reports_the_value() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        env::remove_var(LOG_FILTER_ENV);
        let err = filter(&config("not a real level")).expect_err("filter rejects the value");
        assert!(err.to_string().contains("not a real level"));
    }
}
