//! CLI entry-point for converting every TSV split under a directory.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Args as ClapArgs;
use futures::stream::{self, StreamExt};
use tracing::{info, instrument, warn};
use walkdir::WalkDir;

use crate::{
    cli::RelationFlags,
    config::Settings,
    coref::{PreprocessOptions, Preprocessor, Statistics},
};

/// Args for the `preprocess-dir` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Directory searched recursively for `*.tsv` files. Defaults to the data dir.
    #[arg(long = "input-dir", alias = "input_dir")]
    pub input_dir: Option<PathBuf>,
    /// Directory receiving one `<stem>.jsonl` per input, mirroring the input
    /// tree. Defaults to the data dir.
    #[arg(long = "output-dir", alias = "output_dir")]
    pub output_dir: Option<PathBuf>,
    #[command(flatten)]
    pub flags: RelationFlags,
    /// Files converted at once.
    #[arg(long, default_value_t = 2)]
    pub concurrency: usize,
}

/// All `*.tsv` files below `root`, sorted for stable output.
pub fn discover_splits(root: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(%err, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("tsv"))
        .collect();
    paths.sort();
    paths
}

/// Output path for `input`: its location relative to `input_dir`, mirrored
/// under `output_dir`, with the whole file stem kept (`coin.train.tsv` becomes
/// `coin.train.jsonl`).
pub fn output_path(input_dir: &Path, output_dir: &Path, input: &Path) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .ok_or_else(|| anyhow!("no file name in {}", input.display()))?;
    let mut name = stem.to_owned();
    name.push(".jsonl");
    let nested = input.strip_prefix(input_dir).ok().and_then(Path::parent);
    Ok(match nested {
        Some(parent) => output_dir.join(parent).join(name),
        None => output_dir.join(name),
    })
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let input_dir = args.input_dir.unwrap_or_else(|| settings.data_dir.clone());
    let output_dir = args.output_dir.unwrap_or_else(|| settings.data_dir.clone());
    let options = PreprocessOptions::from(args.flags);

    let splits = discover_splits(&input_dir);
    if splits.is_empty() {
        warn!(dir = %input_dir.display(), "no tsv files found; nothing to convert");
        return Ok(());
    }
    info!(files = splits.len(), ?options, "converting splits");

    let results = stream::iter(splits)
        .map(|input| {
            let output = output_path(&input_dir, &output_dir, &input);
            async move {
                let output = output?;
                let task_input = input.clone();
                let stats = tokio::task::spawn_blocking(move || {
                    Preprocessor::new(options).convert_tsv_to_jsonl(&task_input, &output, false)
                })
                .await
                .context("conversion task panicked")?
                .with_context(|| format!("convert {}", input.display()))?;
                info!(path = %input.display(), paragraphs = stats.paragraph_count, "converted split");
                Ok::<_, anyhow::Error>(stats)
            }
        })
        .buffer_unordered(args.concurrency.max(1))
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    let mut total = Statistics {
        singletons_removed: options.remove_singletons,
        ..Statistics::default()
    };
    for stats in &results {
        total.merge(stats);
    }
    total.log();
    println!("{}", total.summary());
    Ok(())
}
