//! Annotation parsing, relation resolution and dataset reading for COIN.

pub mod annotation;
pub mod clusters;
pub mod label;
pub mod preprocess;
pub mod reader;
pub mod stats;

pub use annotation::{parse_paragraph, parse_paragraphs, Paragraph, Token};
pub use label::{Label, MentionType, Relation};
pub use preprocess::{CorefDocument, CorefMention, PreprocessOptions, Preprocessor};
pub use stats::Statistics;
