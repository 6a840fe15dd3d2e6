//! Spawns the external trainer on a rendered configuration.

use std::path::PathBuf;

use tokio::process::Command;
use tracing::{info, instrument};

use crate::error::{CorefError, Result};

use super::config::TrainingConfig;

/// Where and how the external trainer is launched.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainerInvocation {
    pub bin: String,
    pub package: String,
    pub serialization_dir: PathBuf,
}

impl TrainerInvocation {
    pub fn config_path(&self) -> PathBuf {
        self.serialization_dir.join("config.json")
    }

    /// The trainer archives the best model here.
    pub fn model_archive(&self) -> PathBuf {
        self.serialization_dir.join("model.tar.gz")
    }

    pub fn train_args(&self) -> Vec<String> {
        vec![
            "train".to_string(),
            self.config_path().display().to_string(),
            "-s".to_string(),
            self.serialization_dir.display().to_string(),
            "--include-package".to_string(),
            self.package.clone(),
        ]
    }

    /// Validate and write `config.json` into the serialization directory.
    pub fn write_config(&self, config: &TrainingConfig) -> Result<PathBuf> {
        config.validate()?;
        std::fs::create_dir_all(&self.serialization_dir)?;
        let path = self.config_path();
        let rendered = serde_json::to_string_pretty(&config.to_json())?;
        std::fs::write(&path, rendered)?;
        info!(path = %path.display(), "wrote trainer config");
        Ok(path)
    }

    /// Train once; the rendered config carries `evaluate_on_test`, so the
    /// trainer scores the test split itself when one is configured.
    #[instrument(skip(self, config), fields(dir = %self.serialization_dir.display()))]
    pub async fn run(&self, config: &TrainingConfig) -> Result<()> {
        self.write_config(config)?;
        self.spawn("train", self.train_args()).await?;
        info!(
            archive = %self.model_archive().display(),
            test = ?config.test_data_path,
            "training finished"
        );
        Ok(())
    }

    async fn spawn(&self, stage: &'static str, args: Vec<String>) -> Result<()> {
        info!(bin = %self.bin, ?args, stage, "launching trainer");
        let status = Command::new(&self.bin).args(&args).status().await?;
        if !status.success() {
            return Err(CorefError::Trainer {
                stage,
                status: status.to_string(),
            });
        }
        Ok(())
    }
}
