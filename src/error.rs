//! Error types for coin-coref.

use thiserror::Error;

/// Result type for coin-coref operations.
pub type Result<T> = std::result::Result<T, CorefError>;

/// Error type for coin-coref operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CorefError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Statistics CSV could not be written.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A TSV line could not be parsed.
    #[error("Malformed line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },

    /// A label column entry could not be parsed.
    #[error("Invalid label `{0}`")]
    InvalidLabel(String),

    /// A link references a mention id absent from its paragraph.
    #[error("Paragraph {paragraph}: link {label} references unknown mention {mention}")]
    UnknownMention {
        paragraph: usize,
        label: String,
        mention: u32,
    },

    /// A JSONL record could not be decoded.
    #[error("Dataset line {line}: {reason}")]
    Dataset { line: usize, reason: String },

    /// A training configuration value is out of range.
    #[error("Invalid config `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// The external trainer exited unsuccessfully.
    #[error("Trainer {stage} failed with {status}")]
    Trainer { stage: &'static str, status: String },
}

impl CorefError {
    /// Create a malformed line error.
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        CorefError::MalformedLine {
            line,
            reason: reason.into(),
        }
    }

    /// Create an invalid config error.
    pub fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        CorefError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}
