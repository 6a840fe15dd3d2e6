//! Loads preprocessed JSONL back into gold clusters, mirroring the trainer's
//! `coref-id` dataset reader.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{CorefError, Result};

use super::preprocess::CorefDocument;

/// Inclusive `(start, end)` token indices.
pub type SpanIndices = (usize, usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Spans covering more tokens than this are dropped.
    pub max_span_width: usize,
    pub remove_singleton_clusters: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            max_span_width: 30,
            remove_singleton_clusters: true,
        }
    }
}

/// A document as handed to the model: lowercased tokens and gold clusters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorefInstance {
    pub tokens: Vec<String>,
    pub clusters: Vec<Vec<SpanIndices>>,
    /// Gold spans dropped for exceeding `max_span_width`.
    pub overlong_spans: usize,
}

impl CorefInstance {
    pub fn from_document(document: &CorefDocument, options: &ReaderOptions) -> Self {
        let tokens = document.tokens.iter().map(|t| t.to_lowercase()).collect();

        let mut grouped: IndexMap<usize, Vec<SpanIndices>> = IndexMap::new();
        let mut overlong_spans = 0;
        for mention in &document.corefs {
            let Some(cluster) = mention.cluster else {
                continue;
            };
            if (mention.end + 1).saturating_sub(mention.start) > options.max_span_width {
                overlong_spans += 1;
                continue;
            }
            grouped
                .entry(cluster)
                .or_default()
                .push((mention.start, mention.end));
        }

        let clusters = grouped
            .into_values()
            .filter(|spans| !options.remove_singleton_clusters || spans.len() > 1)
            .collect();

        Self {
            tokens,
            clusters,
            overlong_spans,
        }
    }
}

/// Parse JSONL documents. Blank lines are ignored.
pub fn read_documents(path: &Path) -> Result<Vec<CorefDocument>> {
    let reader = BufReader::new(File::open(path)?);
    let mut documents = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let document: CorefDocument =
            serde_json::from_str(&line).map_err(|err| CorefError::Dataset {
                line: idx + 1,
                reason: err.to_string(),
            })?;
        documents.push(document);
    }
    debug!(path = %path.display(), documents = documents.len(), "read jsonl");
    Ok(documents)
}

/// Read a JSONL file into model-ready instances.
pub fn read_instances(path: &Path, options: &ReaderOptions) -> Result<Vec<CorefInstance>> {
    let instances: Vec<CorefInstance> = read_documents(path)?
        .iter()
        .map(|document| CorefInstance::from_document(document, options))
        .collect();
    info!(path = %path.display(), instances = instances.len(), "loaded instances");
    Ok(instances)
}

/// Aggregate counts over a set of instances.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub documents: usize,
    pub tokens: usize,
    pub clusters: usize,
    pub spans: usize,
    pub overlong_spans: usize,
    pub max_cluster_size: usize,
}

pub fn summarise(instances: &[CorefInstance]) -> DatasetSummary {
    let mut summary = DatasetSummary {
        documents: instances.len(),
        ..DatasetSummary::default()
    };
    for instance in instances {
        summary.tokens += instance.tokens.len();
        summary.clusters += instance.clusters.len();
        summary.overlong_spans += instance.overlong_spans;
        for cluster in &instance.clusters {
            summary.spans += cluster.len();
            summary.max_cluster_size = summary.max_cluster_size.max(cluster.len());
        }
    }
    summary
}
