//! Runtime configuration utilities for coin-coref.

use std::{
    env,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::Context;
use serde::Deserialize;
use tracing::warn;

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Root folder holding the TSV and JSONL splits.
    pub data_dir: PathBuf,
    /// Root folder for trained model artefacts.
    pub outputs_dir: PathBuf,
    /// Pretrained encoder handed to the trainer.
    pub transformer_model: String,
    pub train_data_path: PathBuf,
    pub dev_data_path: PathBuf,
    pub test_data_path: PathBuf,
    /// GPU index for the trainer, `-1` for CPU.
    pub cuda_device: i32,
    /// Executable of the external training framework.
    pub trainer_bin: String,
    /// Python package registering the `coref-id` dataset reader.
    pub trainer_package: String,
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));
        let outputs_dir = env::var("OUTPUTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./outputs"));
        let transformer_model = env::var("TRANSFORMER_MODEL")
            .unwrap_or_else(|_| "indolem/indobert-base-uncased".to_string());
        let split = |key: &str, file: &str| {
            env::var(key)
                .map(PathBuf::from)
                .unwrap_or_else(|_| data_dir.join(file))
        };
        let train_data_path = split("TRAIN_DATA_PATH", "train.jsonl");
        let dev_data_path = split("DEV_DATA_PATH", "dev.jsonl");
        let test_data_path = split("TEST_DATA_PATH", "test.jsonl");
        let cuda_device = env_or("CUDA_DEVICE", -1);
        let trainer_bin = env::var("TRAINER_BIN").unwrap_or_else(|_| "allennlp".to_string());
        let trainer_package =
            env::var("TRAINER_PACKAGE").unwrap_or_else(|_| "id.coref.training".to_string());

        std::fs::create_dir_all(&data_dir).context("creating data dir")?;
        std::fs::create_dir_all(&outputs_dir).context("creating outputs dir")?;

        Ok(Self {
            data_dir,
            outputs_dir,
            transformer_model,
            train_data_path,
            dev_data_path,
            test_data_path,
            cuda_device,
            trainer_bin,
            trainer_package,
        })
    }

    /// Convenience helper for derived output path segments.
    pub fn join_output<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.outputs_dir.join(path)
    }
}

/// Parse `key` from the environment, falling back when unset or unparsable.
pub fn env_or<T: FromStr>(key: &str, default: T) -> T {
    let Ok(raw) = env::var(key) else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!(key, value = %raw, "unparsable environment override; using default");
            default
        }
    }
}

/// Boolean switch from the environment: `true`/`1`/`yes`/`on` and
/// `false`/`0`/`no`/`off`, case-insensitive.
pub fn env_flag(key: &str, default: bool) -> bool {
    let Ok(raw) = env::var(key) else {
        return default;
    };
    match parse_flag(&raw) {
        Some(value) => value,
        None => {
            warn!(key, value = %raw, "unrecognised boolean override; using default");
            default
        }
    }
}

pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_accept_common_spellings() {
        for raw in ["1", "yes", "ON", " true "] {
            assert_eq!(parse_flag(raw), Some(true), "{raw}");
        }
        for raw in ["0", "No", "off", "FALSE"] {
            assert_eq!(parse_flag(raw), Some(false), "{raw}");
        }
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn unset_flag_keeps_default() {
        assert!(env_flag("COIN_COREF_UNSET_FLAG_FOR_TEST", true));
        assert!(!env_flag("COIN_COREF_UNSET_FLAG_FOR_TEST", false));
    }
}
