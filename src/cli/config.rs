//! CLI entry-point for rendering the trainer configuration.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{config::Settings, training::TrainingConfig};

/// Args for the `config` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Destination file; printed to stdout when omitted.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let config = TrainingConfig::from_settings(&settings);
    config.validate().context("invalid training configuration")?;
    let rendered = serde_json::to_string_pretty(&config.to_json())?;

    match args.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, rendered)
                .with_context(|| format!("write {}", path.display()))?;
            info!(path = %path.display(), "wrote trainer config");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
