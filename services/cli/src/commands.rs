use clap::Args;
use faculty_contracts::config::{AppConfig, ConfigError};
use faculty_contracts::error::AppError;
use faculty_contracts::workflows::contract::benefits::BenefitsTable;
use faculty_contracts::workflows::contract::template::DocxTemplate;
use faculty_contracts::workflows::contract::{archive, ContractGenerator};
use faculty_contracts::workflows::roster::RosterImporter;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct GenerateArgs {
    /// Roster file with one row per contract (.csv or .xlsx)
    #[arg(long)]
    roster: PathBuf,
    /// Override the configured .docx template path
    #[arg(long)]
    template: Option<PathBuf>,
    /// Override the configured benefits table (JSON); the builtin table
    /// is used when neither is set
    #[arg(long)]
    benefits: Option<PathBuf>,
    /// Override the configured output directory
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Also bundle the generated documents into a zip archive
    #[arg(long, num_args = 0..=1, default_missing_value = "contracts.zip")]
    zip: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct InspectArgs {
    /// Path to the .docx template to inspect
    #[arg(long)]
    template: PathBuf,
}

pub(crate) fn run_generate(args: GenerateArgs, config: AppConfig) -> Result<(), AppError> {
    let template_path = args
        .template
        .or(config.generator.template_path)
        .ok_or(ConfigError::MissingTemplate)?;

    // The template is loaded and validated before any row is touched;
    // without it no document can be produced.
    let template = DocxTemplate::from_path(&template_path)?;
    let benefits = match args.benefits.or(config.generator.benefits_path) {
        Some(path) => BenefitsTable::from_path(path)?,
        None => BenefitsTable::builtin(),
    };

    let import = RosterImporter::from_path(&args.roster)?;
    info!(
        records = import.records.len(),
        rejected = import.failures.len(),
        "roster imported"
    );

    let generator = ContractGenerator::new(template, benefits);
    let report = generator.run_batch(import);

    let output_dir = args.output_dir.unwrap_or(config.generator.output_dir);
    fs::create_dir_all(&output_dir)?;
    for contract in &report.contracts {
        fs::write(output_dir.join(&contract.filename), &contract.bytes)?;
    }

    println!(
        "Generated {} contract(s) in {}",
        report.contracts.len(),
        output_dir.display()
    );
    if let Some(zip_name) = args.zip {
        let bytes = archive::bundle(&report.contracts)?;
        fs::write(output_dir.join(&zip_name), bytes)?;
        println!("Bundled archive: {}", output_dir.join(&zip_name).display());
    }
    if !report.failures.is_empty() {
        println!("{} row(s) failed:", report.failures.len());
        for failure in &report.failures {
            println!("  {failure}");
        }
    }

    Ok(())
}

pub(crate) fn run_inspect(args: InspectArgs) -> Result<(), AppError> {
    let template = DocxTemplate::from_path(&args.template)?;
    let placeholders = template.placeholders()?;
    if placeholders.is_empty() {
        println!("no placeholder tokens found");
        return Ok(());
    }
    for name in placeholders {
        println!("{{{{{name}}}}}");
    }
    Ok(())
}
