//! CLI entry-point for converting one annotated TSV file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{
    cli::RelationFlags,
    config::Settings,
    coref::{PreprocessOptions, Preprocessor},
};

/// Args for the `preprocess` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Annotated TSV input.
    #[arg(long = "input-path", alias = "input_path")]
    pub input_path: PathBuf,
    /// JSONL destination.
    #[arg(long = "output-path", alias = "output_path")]
    pub output_path: PathBuf,
    #[command(flatten)]
    pub flags: RelationFlags,
    /// Also write the statistics as CSV.
    #[arg(long)]
    pub stats_path: Option<PathBuf>,
    /// Show a progress bar while resolving paragraphs.
    #[arg(long)]
    pub progress: bool,
}

#[instrument(skip(_settings))]
pub async fn run(args: Args, _settings: Settings) -> Result<()> {
    let options = PreprocessOptions::from(args.flags);
    info!(?options, "preprocessing annotations");

    let mut preprocessor = Preprocessor::new(options);
    let stats = preprocessor
        .convert_tsv_to_jsonl(&args.input_path, &args.output_path, args.progress)
        .with_context(|| format!("convert {}", args.input_path.display()))?;

    stats.log();
    if let Some(path) = &args.stats_path {
        stats
            .write_csv(path)
            .with_context(|| format!("write statistics to {}", path.display()))?;
    }
    println!("{}", stats.summary());
    Ok(())
}
