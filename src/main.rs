use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

use payee_contract::{
    compute_stats, decode_activity, decode_batch, decode_batch_with_records, decode_categories,
    decode_classification, decode_snapshot, decode_stats, write_classifications_csv,
    ContractConfig, ContractError, ContractValidator,
};

#[derive(Debug, Parser)]
#[command(version, about = "Validate and export payee classification contract files")]
struct Command {
    #[command(subcommand)]
    action: Action,
}

#[derive(Debug, Subcommand)]
enum Action {
    /// Check a JSON file against the contract
    Validate {
        #[arg(value_enum)]
        kind: Kind,
        file: PathBuf,
    },
    /// Write the classifications of a snapshot file as CSV
    Export {
        snapshot: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Kind {
    Batch,
    Classification,
    BatchWithRecords,
    Snapshot,
    Activity,
    Categories,
    Stats,
}

fn main() -> Result<()> {
    let command = Command::parse();
    let config = ContractConfig::from_env().context("Invalid contract configuration")?;
    let validator = ContractValidator::with_config(config);

    match command.action {
        Action::Validate { kind, file } => run_validate(&validator, kind, &file),
        Action::Export { snapshot, output } => run_export(&validator, &snapshot, &output),
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn run_validate(validator: &ContractValidator, kind: Kind, file: &Path) -> Result<()> {
    let json = read(file)?;

    let result = match kind {
        Kind::Batch => decode_batch(validator, &json).map(|_| ()),
        Kind::Classification => decode_classification(validator, &json).map(|_| ()),
        Kind::BatchWithRecords => decode_batch_with_records(validator, &json).map(|_| ()),
        Kind::Snapshot => decode_snapshot(validator, &json).map(|_| ()),
        Kind::Activity => decode_activity(validator, &json).map(|_| ()),
        Kind::Categories => decode_categories(validator, &json).map(|_| ()),
        Kind::Stats => decode_stats(validator, &json).map(|_| ()),
    };

    match result {
        Ok(()) => {
            println!("✓ {} is valid", file.display());
            Ok(())
        }
        Err(ContractError::Invalid { entity, errors }) => {
            eprintln!("❌ {} violates the {} contract:", file.display(), entity);
            for error in &errors {
                eprintln!("   {}", error);
            }
            std::process::exit(1);
        }
        Err(e) => Err(e).with_context(|| format!("Failed to decode {}", file.display())),
    }
}

fn run_export(validator: &ContractValidator, snapshot: &Path, output: &Path) -> Result<()> {
    let json = read(snapshot)?;
    let snapshot = decode_snapshot(validator, &json).context("Snapshot rejected")?;

    let file = File::create(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    let written = write_classifications_csv(&snapshot.classifications, file)?;

    let stats = compute_stats(&snapshot.batches, &snapshot.classifications);
    println!("✓ Exported {} classifications to {}", written, output.display());
    println!(
        "  {} pending review, accuracy {:.1}%",
        stats.pending_review,
        stats.accuracy_percent()
    );

    Ok(())
}
