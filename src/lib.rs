//! Tooling for the COIN Indonesian coreference benchmark: TSV annotation
//! preprocessing, JSONL dataset reading and trainer configuration.

pub mod cli;
pub mod config;
pub mod coref;
pub mod error;
pub mod logging;
pub mod training;

pub use error::{CorefError, Result};
