use crate::commands::{run_generate, run_inspect, GenerateArgs, InspectArgs};
use clap::{Parser, Subcommand};
use faculty_contracts::config::AppConfig;
use faculty_contracts::error::AppError;
use faculty_contracts::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "Faculty Contract Generator",
    about = "Generate faculty contracts and offer letters from a roster and a .docx template",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate one document per roster row, optionally bundled into a zip
    Generate(GenerateArgs),
    /// List the placeholder tokens a template expects
    Inspect(InspectArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match cli.command {
        Command::Generate(args) => run_generate(args, config),
        Command::Inspect(args) => run_inspect(args),
    }
}
