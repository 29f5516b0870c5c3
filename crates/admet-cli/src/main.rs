//! admet — operator CLI for the ADMET prediction service.
//!
//! ## Commands
//!
//! - `properties`: list the property catalog
//! - `predict`: one-shot predictions via the stub backend, for a single
//!   SMILES string or a file of SMILES (one per line)

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::Level;

use admet_core::{init_tracing, PredictionService, ServiceConfig, StubModel, CATALOG};

#[derive(Parser)]
#[command(name = "admet")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "ADMET property-prediction toolkit", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every property in the catalog
    Properties {
        /// Print as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Predict properties for a SMILES string or a file of SMILES
    Predict {
        /// SMILES string to predict
        #[arg(short, long)]
        smiles: Option<String>,

        /// File with one SMILES per line (blank lines skipped)
        #[arg(short, long, conflicts_with = "smiles")]
        file: Option<PathBuf>,

        /// Property alias to predict (repeatable; omit for the full catalog)
        #[arg(short, long = "property")]
        properties: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    init_tracing(false, level);

    match cli.command {
        Commands::Properties { json } => list_properties(json),
        Commands::Predict {
            smiles,
            file,
            properties,
        } => predict(smiles, file, properties).await,
    }
}

fn list_properties(as_json: bool) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(CATALOG)?);
        return Ok(());
    }
    for prop in CATALOG {
        println!("{:<32} {:<40} {:?}", prop.id, prop.label, prop.task);
    }
    Ok(())
}

async fn predict(
    smiles: Option<String>,
    file: Option<PathBuf>,
    properties: Vec<String>,
) -> Result<()> {
    let aliases = if properties.is_empty() {
        None
    } else {
        Some(properties)
    };
    let service =
        PredictionService::with_models(&ServiceConfig::default(), || Box::new(StubModel::new()))?;

    if let Some(smiles) = smiles {
        let report = service.predict_one(&smiles, aliases.as_deref()).await?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let Some(path) = file else {
        bail!("either --smiles or --file is required");
    };
    let inputs = read_smiles_file(&path)?;
    if inputs.is_empty() {
        bail!("{} contains no SMILES", path.display());
    }
    let reports = service.predict_batch(&inputs, aliases.as_deref()).await?;
    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}

/// One SMILES per line; blank lines are skipped.
fn read_smiles_file(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
