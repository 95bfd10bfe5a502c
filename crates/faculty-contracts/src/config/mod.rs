use std::env;
use std::fmt;
use std::path::PathBuf;

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub generator: GeneratorConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let template_path = env::var("CONTRACTS_TEMPLATE").ok().map(PathBuf::from);
        let benefits_path = env::var("CONTRACTS_BENEFITS").ok().map(PathBuf::from);
        let output_dir = env::var("CONTRACTS_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("contracts"));

        let log_level = env::var("CONTRACTS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            generator: GeneratorConfig {
                template_path,
                benefits_path,
                output_dir,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Paths feeding the contract generation pipeline. The template path is
/// required before a batch can run but may arrive from the CLI instead of
/// the environment, so it stays optional here.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub template_path: Option<PathBuf>,
    pub benefits_path: Option<PathBuf>,
    pub output_dir: PathBuf,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingTemplate,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingTemplate => {
                write!(
                    f,
                    "no contract template configured: set CONTRACTS_TEMPLATE or pass --template"
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("CONTRACTS_TEMPLATE");
        env::remove_var("CONTRACTS_BENEFITS");
        env::remove_var("CONTRACTS_OUTPUT_DIR");
        env::remove_var("CONTRACTS_LOG_LEVEL");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.generator.template_path, None);
        assert_eq!(config.generator.benefits_path, None);
        assert_eq!(config.generator.output_dir, PathBuf::from("contracts"));
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn load_picks_up_configured_paths() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("CONTRACTS_TEMPLATE", "templates/offer_letter.docx");
        env::set_var("CONTRACTS_BENEFITS", "tables/benefits.json");
        env::set_var("CONTRACTS_OUTPUT_DIR", "out");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(
            config.generator.template_path,
            Some(PathBuf::from("templates/offer_letter.docx"))
        );
        assert_eq!(
            config.generator.benefits_path,
            Some(PathBuf::from("tables/benefits.json"))
        );
        assert_eq!(config.generator.output_dir, PathBuf::from("out"));
        reset_env();
    }
}
