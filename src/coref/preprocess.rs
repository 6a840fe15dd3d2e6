//! Resolution of token annotations into clustered mention records.

use std::{
    collections::{HashMap, HashSet},
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indexmap::IndexMap;
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{CorefError, Result};

use super::{
    annotation::{parse_paragraphs, Paragraph},
    clusters::MentionSets,
    label::{Label, MentionType, Relation},
    stats::Statistics,
};

/// Relation handling switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreprocessOptions {
    /// Extend appositive heads over their appositive phrase.
    pub use_appos: bool,
    /// Keep EXAPPOS anaphors and cluster them with their antecedent.
    pub use_exappos: bool,
    /// Keep ALIAS anaphors and cluster them with their antecedent.
    pub use_aliases: bool,
    /// Drop mentions that end up outside any multi-mention cluster.
    pub remove_singletons: bool,
    /// Fail instead of warning when a link names an unknown mention.
    pub strict: bool,
}

/// One mention of the JSONL output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorefMention {
    /// First token index, inclusive.
    pub start: usize,
    /// Last token index, inclusive.
    pub end: usize,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: MentionType,
    /// Shared by coreferent mentions; absent on singletons.
    #[serde(default, alias = "label", skip_serializing_if = "Option::is_none")]
    pub cluster: Option<usize>,
}

/// One JSONL line: a paragraph with its resolved mentions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorefDocument {
    pub text: String,
    pub tokens: Vec<String>,
    pub corefs: Vec<CorefMention>,
}

impl CorefDocument {
    /// Mentions grouped by cluster id, in cluster id order.
    pub fn clusters(&self) -> Vec<Vec<&CorefMention>> {
        let mut grouped: IndexMap<usize, Vec<&CorefMention>> = IndexMap::new();
        for mention in &self.corefs {
            if let Some(cluster) = mention.cluster {
                grouped.entry(cluster).or_default().push(mention);
            }
        }
        grouped.sort_keys();
        grouped.into_values().collect()
    }
}

#[derive(Debug, Clone)]
struct MentionSpan {
    kind: MentionType,
    start: usize,
    end: usize,
}

#[derive(Debug, Clone, Copy)]
struct Link {
    relation: Relation,
    antecedent: u32,
    anaphor: u32,
}

/// Converts paragraphs into [`CorefDocument`]s while accumulating statistics.
#[derive(Debug, Default)]
pub struct Preprocessor {
    options: PreprocessOptions,
    stats: Statistics,
}

impl Preprocessor {
    pub fn new(options: PreprocessOptions) -> Self {
        Self {
            options,
            stats: Statistics {
                singletons_removed: options.remove_singletons,
                ..Statistics::default()
            },
        }
    }

    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    pub fn into_statistics(self) -> Statistics {
        self.stats
    }

    /// Resolve every paragraph of a TSV string.
    pub fn convert(&mut self, input: &str) -> Result<Vec<CorefDocument>> {
        parse_paragraphs(input)?
            .iter()
            .map(|paragraph| self.resolve(paragraph))
            .collect()
    }

    /// Read `tsv_path`, resolve it and write one JSON object per line to
    /// `jsonl_path`.
    pub fn convert_tsv_to_jsonl(
        &mut self,
        tsv_path: &Path,
        jsonl_path: &Path,
        progress: bool,
    ) -> Result<Statistics> {
        let data = std::fs::read_to_string(tsv_path)?;
        let paragraphs = parse_paragraphs(&data)?;
        info!(path = %tsv_path.display(), paragraphs = paragraphs.len(), "parsed annotation file");

        let bar = if progress {
            let bar = ProgressBar::new(paragraphs.len() as u64);
            let style = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .map_err(|err| std::io::Error::other(err.to_string()))?;
            bar.set_style(style.progress_chars("#>-"));
            bar.set_message("Parsing paragraphs");
            Some(bar)
        } else {
            None
        };

        let mut documents = Vec::with_capacity(paragraphs.len());
        for paragraph in &paragraphs {
            documents.push(self.resolve(paragraph)?);
            if let Some(bar) = &bar {
                bar.inc(1);
            }
        }
        if let Some(bar) = bar {
            bar.finish_and_clear();
        }

        write_jsonl(jsonl_path, &documents)?;
        info!(path = %jsonl_path.display(), documents = documents.len(), "saved jsonl");
        Ok(self.stats.clone())
    }

    /// Resolve a single paragraph into clustered mentions.
    pub fn resolve(&mut self, paragraph: &Paragraph) -> Result<CorefDocument> {
        let mut mentions = extract_mentions(paragraph);
        let links = self.extract_links(paragraph, &mentions)?;

        let (appos, others): (Vec<Link>, Vec<Link>) = links
            .into_iter()
            .partition(|link| link.relation == Relation::Appos);

        let linked: HashSet<u32> = others
            .iter()
            .flat_map(|link| [link.antecedent, link.anaphor])
            .collect();
        for appositive in self.merge_appositives(paragraph, &appos, &mut mentions) {
            if !linked.contains(&appositive) {
                mentions.shift_remove(&appositive);
            }
        }

        let mut dropped: HashSet<u32> = HashSet::new();
        let mut active = Vec::new();
        for link in &others {
            let keep = match link.relation {
                Relation::Ident => true,
                Relation::Alias => self.options.use_aliases,
                Relation::Exappos => self.options.use_exappos,
                Relation::Appos => false,
            };
            if keep {
                active.push((link.antecedent, link.anaphor));
            } else {
                dropped.insert(link.anaphor);
            }
        }
        for id in &dropped {
            mentions.shift_remove(id);
        }

        let document = self.assign_clusters(paragraph, &mentions, MentionSets::from_pairs(active));
        self.stats.paragraph_count += 1;
        self.stats.token_count += paragraph.tokens.len();
        Ok(document)
    }

    fn extract_links(
        &mut self,
        paragraph: &Paragraph,
        mentions: &IndexMap<u32, MentionSpan>,
    ) -> Result<Vec<Link>> {
        let mut links = Vec::new();
        for label in paragraph.tokens.iter().flat_map(|t| t.labels.iter()) {
            match label {
                Label::Link {
                    relation,
                    antecedent,
                    anaphor,
                } => {
                    self.stats.record_link(*relation);
                    if let Some(missing) = [*antecedent, *anaphor]
                        .into_iter()
                        .find(|id| !mentions.contains_key(id))
                    {
                        if self.options.strict {
                            return Err(CorefError::UnknownMention {
                                paragraph: paragraph.ordinal,
                                label: label.to_string(),
                                mention: missing,
                            });
                        }
                        warn!(
                            paragraph = paragraph.ordinal,
                            %label,
                            mention = missing,
                            "link references unknown mention; skipping"
                        );
                        continue;
                    }
                    links.push(Link {
                        relation: *relation,
                        antecedent: *antecedent,
                        anaphor: *anaphor,
                    });
                }
                Label::MalformedLink { raw, .. } => {
                    warn!(paragraph = paragraph.ordinal, label = %raw, "link does not name a pair of mentions; skipping");
                }
                Label::Mention { .. } | Label::Empty => {}
            }
        }
        Ok(links)
    }

    /// Fuse appositive groups into their head and return the appositive ids.
    fn merge_appositives(
        &self,
        paragraph: &Paragraph,
        pairs: &[Link],
        mentions: &mut IndexMap<u32, MentionSpan>,
    ) -> Vec<u32> {
        let mut groups = MentionSets::from_pairs(pairs.iter().map(|l| (l.antecedent, l.anaphor)));
        let mut appositives = Vec::new();

        for mut group in groups.groups() {
            group.sort_unstable();
            let (head, rest) = match group.split_first() {
                Some(split) => split,
                None => continue,
            };
            appositives.extend_from_slice(rest);
            if !self.options.use_appos {
                continue;
            }

            let furthest = group
                .iter()
                .filter_map(|id| mentions.get(id).map(|m| m.end))
                .max();
            let Some(head_span) = mentions.get_mut(head) else {
                continue;
            };
            if let Some(end) = furthest {
                head_span.end = head_span.end.max(end);
            }
            close_parenthesis(paragraph, head_span);
            debug!(head, end = head_span.end, "merged appositive group");
        }
        appositives
    }

    fn assign_clusters(
        &mut self,
        paragraph: &Paragraph,
        mentions: &IndexMap<u32, MentionSpan>,
        mut sets: MentionSets,
    ) -> CorefDocument {
        let mut ordered: Vec<(u32, &MentionSpan)> = mentions.iter().map(|(id, m)| (*id, m)).collect();
        ordered.sort_by_key(|(id, m)| (m.start, m.end, *id));

        let roots: Vec<Option<usize>> = ordered.iter().map(|(id, _)| sets.find(*id)).collect();
        let mut sizes: HashMap<usize, usize> = HashMap::new();
        for root in roots.iter().flatten() {
            *sizes.entry(*root).or_insert(0) += 1;
        }

        let mut cluster_ids: HashMap<usize, usize> = HashMap::new();
        let mut corefs = Vec::with_capacity(ordered.len());
        for ((_, span), root) in ordered.iter().zip(roots) {
            let cluster = root
                .filter(|r| sizes.get(r).copied().unwrap_or(0) >= 2)
                .map(|r| {
                    let next = cluster_ids.len();
                    *cluster_ids.entry(r).or_insert(next)
                });
            if cluster.is_none() {
                self.stats.singleton_count += 1;
                if self.options.remove_singletons {
                    continue;
                }
            }
            self.stats.record_mention(span.kind);
            corefs.push(CorefMention {
                start: span.start,
                end: span.end,
                text: paragraph.span_text(span.start, span.end),
                kind: span.kind,
                cluster,
            });
        }

        self.stats.mention_count += corefs.len();
        self.stats.cluster_count += cluster_ids.len();
        CorefDocument {
            text: paragraph.text.clone(),
            tokens: paragraph.token_texts(),
            corefs,
        }
    }
}

/// Mentions keyed by id, in order of first appearance. A mention runs from
/// the first token carrying its label to the end of the last contiguous run.
fn extract_mentions(paragraph: &Paragraph) -> IndexMap<u32, MentionSpan> {
    let tokens = &paragraph.tokens;
    let mut mentions: IndexMap<u32, MentionSpan> = IndexMap::new();

    for (i, token) in tokens.iter().enumerate() {
        for label in token.labels.iter().filter(|l| l.is_mention()) {
            let Label::Mention { kind, id } = label else {
                continue;
            };
            let span = mentions.entry(*id).or_insert(MentionSpan {
                kind: *kind,
                start: i,
                end: i,
            });
            let continues = tokens
                .get(i + 1)
                .map(|next| next.labels.contains(label))
                .unwrap_or(false);
            if !continues {
                span.end = i;
                span.kind = *kind;
            }
        }
    }
    mentions
}

/// Absorb a trailing `)` when the span opens one more parenthesis than it
/// closes.
fn close_parenthesis(paragraph: &Paragraph, span: &mut MentionSpan) {
    let covered = &paragraph.tokens[span.start..=span.end];
    let opens = covered.iter().filter(|t| t.text == "(").count();
    let closes = covered.iter().filter(|t| t.text == ")").count();
    if opens == closes + 1
        && paragraph
            .tokens
            .get(span.end + 1)
            .is_some_and(|t| t.text == ")")
    {
        span.end += 1;
    }
}

fn write_jsonl(path: &Path, documents: &[CorefDocument]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    for document in documents {
        serde_json::to_writer(&mut writer, document)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}
