//! CLI entry-point for launching the external trainer.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{
    config::Settings,
    training::{TrainerInvocation, TrainingConfig},
};

/// Args for the `train` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Directory for the model archive; a timestamped folder under the
    /// outputs dir when omitted.
    #[arg(long)]
    pub serialization_dir: Option<PathBuf>,
    /// Only write the configuration, do not launch the trainer.
    #[arg(long)]
    pub dry_run: bool,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let serialization_dir = args.serialization_dir.unwrap_or_else(|| {
        settings.join_output(format!("coref-{}", Utc::now().format("%Y%m%dT%H%M%S")))
    });
    let invocation = TrainerInvocation {
        bin: settings.trainer_bin.clone(),
        package: settings.trainer_package.clone(),
        serialization_dir,
    };
    let config = TrainingConfig::from_settings(&settings);

    if args.dry_run {
        let path = invocation
            .write_config(&config)
            .context("write trainer config")?;
        info!(path = %path.display(), args = ?invocation.train_args(), "dry run; trainer not launched");
        return Ok(());
    }

    invocation
        .run(&config)
        .await
        .context("external trainer run")?;
    info!(archive = %invocation.model_archive().display(), "model ready");
    Ok(())
}
