//! Formfold CLI - export form submissions as aligned rows
//!
//! # Commands
//!
//! ```bash
//! formfold export --form form.json --entries entries.json   # Combined rows as JSON
//! formfold export --form form.json --entries entries.json --headers
//! formfold columns --form form.json                         # Column layout
//! formfold settings                                         # Default settings
//! ```
//!
//! Set `RUST_LOG=debug` for per-entry logging.

use clap::{Parser, Subcommand};
use formfold::{build_catalogue, export_entries, load_entries, load_form, ExportSettings};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "formfold")]
#[command(about = "Flatten form submissions into one aligned row each", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Combine submissions into rows and print them as JSON
    Export {
        /// Form definition (JSON)
        #[arg(short, long)]
        form: PathBuf,

        /// Submissions (JSON array of entry objects)
        #[arg(short, long)]
        entries: PathBuf,

        /// Export settings (JSON)
        #[arg(short, long, env = "FORMFOLD_SETTINGS")]
        settings: Option<PathBuf>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Include column labels in the output
        #[arg(long)]
        headers: bool,
    },

    /// Show every output column with its absolute offset
    Columns {
        /// Form definition (JSON)
        #[arg(short, long)]
        form: PathBuf,

        /// Export settings (JSON)
        #[arg(short, long, env = "FORMFOLD_SETTINGS")]
        settings: Option<PathBuf>,
    },

    /// Print the default settings
    Settings,
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Export {
            form,
            entries,
            settings,
            output,
            headers,
        } => cmd_export(
            &form,
            &entries,
            settings.as_deref(),
            output.as_deref(),
            headers,
        ),

        Commands::Columns { form, settings } => cmd_columns(&form, settings.as_deref()),

        Commands::Settings => cmd_settings(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_settings(path: Option<&Path>) -> Result<ExportSettings, Box<dyn std::error::Error>> {
    match path {
        Some(p) => Ok(ExportSettings::from_file(p)?),
        None => Ok(ExportSettings::default()),
    }
}

fn cmd_export(
    form_path: &Path,
    entries_path: &Path,
    settings_path: Option<&Path>,
    output: Option<&Path>,
    headers: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let form = load_form(form_path)?;
    let entries = load_entries(entries_path)?;
    let settings = load_settings(settings_path)?;

    let result = export_entries(&form, &entries, &settings)?;
    write_output(&result.to_json(headers)?, output)?;

    Ok(())
}

fn cmd_columns(
    form_path: &Path,
    settings_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let form = load_form(form_path)?;
    let settings = load_settings(settings_path)?;
    settings.validate(&form)?;

    let catalogue = build_catalogue(&form, &settings)?;
    for (offset, _, transformer) in catalogue.entries() {
        let separated = if transformer.as_multi_row().is_some() {
            " (separated)"
        } else {
            ""
        };
        for (i, label) in transformer.columns().iter().enumerate() {
            println!(
                "{:>4}  {:<6} {:<12} {}{}",
                offset + i,
                transformer.field().id,
                transformer.field().category,
                label,
                separated
            );
        }
    }
    println!("{} columns", catalogue.width());

    Ok(())
}

fn cmd_settings() -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(&ExportSettings::default())?;
    println!("{}", json);
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            log::info!("Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
