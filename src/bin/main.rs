//! quantgen CLI - generate relational and runtime artifacts from a
//! quantity-database description.
//!
//! Usage:
//!   quantgen generate <quantities.json> [--out <dir>] [--migrate]
//!   quantgen validate <quantities.json>
//!   quantgen schema
//!
//! Examples:
//!   quantgen generate quantities.json --out generated
//!   quantgen generate quantities.json --migrate
//!   quantgen validate quantities.json

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use quantgen::config::Settings;
use quantgen::generate::generate_from_path;
use quantgen::migrate::MigrationExecutor;
use quantgen::model::loader::load_db;
use quantgen::model::schema::input_schema;
use quantgen::output::OutputWriter;

#[derive(Parser)]
#[command(name = "quantgen")]
#[command(about = "A schema-driven code generator for time-series quantity databases")]
#[command(version)]
struct Cli {
    /// Path to a quantgen.toml config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate all artifacts from an input document
    Generate {
        /// Path to the quantities.json file
        file: PathBuf,

        /// Output directory (overrides the config file)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Apply the relational artifact with the migration tool
        #[arg(long)]
        migrate: bool,
    },

    /// Validate an input document without generating anything
    Validate {
        /// Path to the quantities.json file
        file: PathBuf,
    },

    /// Print the JSON Schema of the input document
    Schema,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Generate { file, out, migrate } => cmd_generate(settings, file, out, migrate),
        Commands::Validate { file } => cmd_validate(file),
        Commands::Schema => cmd_schema(),
    }
}

fn cmd_generate(
    settings: Settings,
    file: PathBuf,
    out: Option<PathBuf>,
    migrate: bool,
) -> ExitCode {
    let artifacts = match generate_from_path(&file) {
        Ok(artifacts) => artifacts,
        Err(e) => {
            eprintln!("Error generating from '{}': {e}", file.display());
            return ExitCode::FAILURE;
        }
    };

    let dir = out.unwrap_or_else(|| settings.output.dir.clone());
    let writer = OutputWriter::new(&dir);
    let published = match writer.publish(&artifacts) {
        Ok(published) => published,
        Err(e) => {
            eprintln!("Error writing artifacts to '{}': {e}", dir.display());
            return ExitCode::FAILURE;
        }
    };

    for path in &published {
        println!("{}", path.display());
    }

    if migrate {
        let executor = MigrationExecutor::new(settings.migration, &dir);
        if let Err(e) = executor.apply() {
            eprintln!("Error applying migrations: {e}");
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}

fn cmd_validate(file: PathBuf) -> ExitCode {
    match load_db(&file) {
        Ok(db) => {
            println!(
                "OK: {} entities, {} tables",
                db.entities.len(),
                db.tables.len()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Invalid: {e}");
            ExitCode::FAILURE
        }
    }
}

fn cmd_schema() -> ExitCode {
    let schema = input_schema();
    match serde_json::to_string_pretty(&schema) {
        Ok(rendered) => {
            println!("{rendered}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error rendering schema: {e}");
            ExitCode::FAILURE
        }
    }
}
