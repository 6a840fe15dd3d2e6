//! Corpus statistics gathered while converting paragraphs.

use std::path::Path;

use chrono::Utc;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::info;

use crate::error::Result;

use super::label::{MentionType, Relation};

/// Running counts for one conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Statistics {
    pub paragraph_count: usize,
    pub token_count: usize,
    pub mention_count: usize,
    pub cluster_count: usize,
    pub singleton_count: usize,
    /// Whether singletons were removed from the output.
    pub singletons_removed: bool,
    pub link_types: IndexMap<Relation, usize>,
    pub mention_types: IndexMap<MentionType, usize>,
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

impl Statistics {
    pub fn record_link(&mut self, relation: Relation) {
        *self.link_types.entry(relation).or_insert(0) += 1;
    }

    pub fn record_mention(&mut self, kind: MentionType) {
        *self.mention_types.entry(kind).or_insert(0) += 1;
    }

    pub fn avg_paragraph_length(&self) -> f64 {
        ratio(self.token_count, self.paragraph_count)
    }

    pub fn avg_mentions_per_paragraph(&self) -> f64 {
        ratio(self.mention_count, self.paragraph_count)
    }

    pub fn avg_clusters_per_paragraph(&self) -> f64 {
        ratio(self.cluster_count, self.paragraph_count)
    }

    pub fn avg_cluster_size(&self) -> f64 {
        ratio(self.mention_count, self.cluster_count)
    }

    /// Fold another run's counts into this one.
    pub fn merge(&mut self, other: &Statistics) {
        self.paragraph_count += other.paragraph_count;
        self.token_count += other.token_count;
        self.mention_count += other.mention_count;
        self.cluster_count += other.cluster_count;
        self.singleton_count += other.singleton_count;
        self.singletons_removed |= other.singletons_removed;
        for (relation, count) in &other.link_types {
            *self.link_types.entry(*relation).or_insert(0) += count;
        }
        for (kind, count) in &other.mention_types {
            *self.mention_types.entry(*kind).or_insert(0) += count;
        }
    }

    /// Emit the counts as structured log events.
    pub fn log(&self) {
        info!(
            paragraphs = self.paragraph_count,
            tokens = self.token_count,
            mentions = self.mention_count,
            clusters = self.cluster_count,
            singletons = self.singleton_count,
            singletons_removed = self.singletons_removed,
            "dataset statistics"
        );
        for (relation, count) in &self.link_types {
            info!(%relation, count, "link type");
        }
        for (kind, count) in &self.mention_types {
            info!(%kind, count, "mention type");
        }
    }

    /// Human-readable report.
    pub fn summary(&self) -> String {
        let mut out = String::from("Statistics:\n--------------------------\n");
        out.push_str(&format!("Number of paragraphs: {}\n", self.paragraph_count));
        out.push_str(&format!("Number of tokens: {}\n", self.token_count));
        out.push_str(&format!("Number of mentions: {}\n", self.mention_count));
        out.push_str(&format!("Number of clusters: {}\n\n", self.cluster_count));
        out.push_str(&format!(
            "Average paragraph length: {:.1}\n",
            self.avg_paragraph_length()
        ));
        out.push_str(&format!(
            "Average number of mentions per paragraph: {:.1}\n",
            self.avg_mentions_per_paragraph()
        ));
        out.push_str(&format!(
            "Average number of clusters per paragraph: {:.1}\n",
            self.avg_clusters_per_paragraph()
        ));
        out.push_str(&format!(
            "Average cluster size: {:.1}\n\n",
            self.avg_cluster_size()
        ));
        if self.singletons_removed {
            out.push_str(&format!(
                "Singleton mentions removed: {}\n\n",
                self.singleton_count
            ));
        }
        for (relation, count) in &self.link_types {
            out.push_str(&format!("{relation}: {count} links\n"));
        }
        out.push('\n');
        for (kind, count) in &self.mention_types {
            out.push_str(&format!("{kind}: {count} mentions\n"));
        }
        out
    }

    /// Write `metric,value` rows to a CSV file.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(["metric", "value"])?;
        writer.write_record(["generated_at", Utc::now().to_rfc3339().as_str()])?;

        let counts = [
            ("paragraph_count", self.paragraph_count),
            ("token_count", self.token_count),
            ("mention_count", self.mention_count),
            ("cluster_count", self.cluster_count),
            ("singleton_count", self.singleton_count),
        ];
        for (name, value) in counts {
            writer.write_record([name, value.to_string().as_str()])?;
        }
        let averages = [
            ("avg_paragraph_length", self.avg_paragraph_length()),
            ("avg_mentions_per_paragraph", self.avg_mentions_per_paragraph()),
            ("avg_clusters_per_paragraph", self.avg_clusters_per_paragraph()),
            ("avg_cluster_size", self.avg_cluster_size()),
        ];
        for (name, value) in averages {
            writer.write_record([name, format!("{value:.3}").as_str()])?;
        }
        for (relation, count) in &self.link_types {
            writer.write_record([format!("links_{relation}"), count.to_string()])?;
        }
        for (kind, count) in &self.mention_types {
            writer.write_record([format!("mentions_{kind}"), count.to_string()])?;
        }
        writer.flush()?;
        info!(path = %path.display(), "wrote statistics csv");
        Ok(())
    }
}
