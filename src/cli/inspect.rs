//! CLI entry-point for reporting on a preprocessed JSONL split.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{
    config::Settings,
    coref::reader::{read_instances, summarise, ReaderOptions},
};

/// Args for the `inspect` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// JSONL split to load.
    #[arg(long)]
    pub path: PathBuf,
    /// Gold spans wider than this many tokens are dropped.
    #[arg(long, default_value_t = 30)]
    pub max_span_width: usize,
    /// Keep clusters holding a single span.
    #[arg(long)]
    pub keep_singleton_clusters: bool,
}

#[instrument(skip(_settings))]
pub async fn run(args: Args, _settings: Settings) -> Result<()> {
    let options = ReaderOptions {
        max_span_width: args.max_span_width,
        remove_singleton_clusters: !args.keep_singleton_clusters,
    };
    let instances = read_instances(&args.path, &options)
        .with_context(|| format!("read {}", args.path.display()))?;
    let summary = summarise(&instances);
    info!(?summary, "dataset summary");
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
