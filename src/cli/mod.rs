//! Command-line interface wiring for coin-coref.

use anyhow::Result;
use clap::{Args as ClapArgs, Parser, Subcommand};

use crate::{config::Settings, coref::PreprocessOptions};

pub mod config;
pub mod inspect;
pub mod preprocess;
pub mod preprocess_dir;
pub mod train;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "COIN coreference preprocessing and training", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Preprocess(args) => preprocess::run(args, settings).await,
            Commands::PreprocessDir(args) => preprocess_dir::run(args, settings).await,
            Commands::Inspect(args) => inspect::run(args, settings).await,
            Commands::Config(args) => config::run(args, settings).await,
            Commands::Train(args) => train::run(args, settings).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Convert an annotated TSV file into clustered JSONL.
    Preprocess(preprocess::Args),
    /// Convert every TSV split under a directory.
    PreprocessDir(preprocess_dir::Args),
    /// Load a JSONL split the way the trainer does and report its clusters.
    Inspect(inspect::Args),
    /// Render the trainer configuration.
    Config(config::Args),
    /// Run the external trainer and evaluate the resulting model.
    Train(train::Args),
}

/// Relation handling flags shared by the preprocessing commands.
#[derive(Debug, Clone, Copy, Default, ClapArgs)]
pub struct RelationFlags {
    /// Concatenate appositive phrases onto their head mention.
    #[arg(long = "use-appos", alias = "use_appos")]
    pub use_appos: bool,
    /// Keep EXAPPOS-linked mentions in their antecedent's cluster.
    #[arg(long = "use-exappos", alias = "use_exappos")]
    pub use_exappos: bool,
    /// Keep ALIAS-linked mentions in their antecedent's cluster.
    #[arg(long = "use-aliases", alias = "use_aliases")]
    pub use_aliases: bool,
    /// Drop mentions that are not coreferent with any other mention.
    #[arg(long = "remove-singletons", alias = "remove_singletons")]
    pub remove_singletons: bool,
    /// Fail on links that reference unknown mentions.
    #[arg(long)]
    pub strict: bool,
}

impl From<RelationFlags> for PreprocessOptions {
    fn from(flags: RelationFlags) -> Self {
        Self {
            use_appos: flags.use_appos,
            use_exappos: flags.use_exappos,
            use_aliases: flags.use_aliases,
            remove_singletons: flags.remove_singletons,
            strict: flags.strict,
        }
    }
}
