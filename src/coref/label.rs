//! Grammar of the label column: mention tags and coreference links.

use std::{fmt, str::FromStr};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{CorefError, Result};

static LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Z]+)\[([0-9_]*)\]$").expect("label pattern compiles")
});

/// Mention categories annotated in COIN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MentionType {
    Proper,
    Pronoun,
    Noun,
    Verb,
    List,
}

impl MentionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Proper => "PROPER",
            Self::Pronoun => "PRONOUN",
            Self::Noun => "NOUN",
            Self::Verb => "VERB",
            Self::List => "LIST",
        }
    }
}

impl FromStr for MentionType {
    type Err = CorefError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "PROPER" => Ok(Self::Proper),
            "PRONOUN" => Ok(Self::Pronoun),
            "NOUN" => Ok(Self::Noun),
            "VERB" => Ok(Self::Verb),
            "LIST" => Ok(Self::List),
            other => Err(CorefError::InvalidLabel(other.to_string())),
        }
    }
}

impl fmt::Display for MentionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relation carried by a coreference link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Relation {
    /// Identity coreference.
    Ident,
    /// Appositive phrase attached to its head mention.
    Appos,
    /// Appositive-like link that is excluded unless requested.
    Exappos,
    /// Alternative name of the same entity.
    Alias,
}

impl Relation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ident => "IDENT",
            Self::Appos => "APPOS",
            Self::Exappos => "EXAPPOS",
            Self::Alias => "ALIAS",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "IDENT" => Some(Self::Ident),
            "APPOS" => Some(Self::Appos),
            "EXAPPOS" => Some(Self::Exappos),
            "ALIAS" => Some(Self::Alias),
            _ => None,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a token's pipe-separated label column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    /// `_` or an empty entry.
    Empty,
    /// `TYPE[id]`
    Mention { kind: MentionType, id: u32 },
    /// `REL[antecedent_anaphor]`
    Link {
        relation: Relation,
        antecedent: u32,
        anaphor: u32,
    },
    /// A link tag whose brackets do not hold exactly two ids. Kept so the
    /// caller can report and skip it.
    MalformedLink { relation: Relation, raw: String },
}

impl Label {
    /// Parse a single label entry.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() || raw == "_" {
            return Ok(Self::Empty);
        }
        let caps = LABEL_RE
            .captures(raw)
            .ok_or_else(|| CorefError::InvalidLabel(raw.to_string()))?;
        let tag = &caps[1];
        let inner = &caps[2];

        if let Some(relation) = Relation::from_tag(tag) {
            let ids: Vec<&str> = inner.split('_').collect();
            let parsed = match ids.as_slice() {
                [a, b] => a.parse::<u32>().ok().zip(b.parse::<u32>().ok()),
                _ => None,
            };
            return Ok(match parsed {
                Some((antecedent, anaphor)) => Self::Link {
                    relation,
                    antecedent,
                    anaphor,
                },
                None => Self::MalformedLink {
                    relation,
                    raw: raw.to_string(),
                },
            });
        }

        let kind = tag
            .parse::<MentionType>()
            .map_err(|_| CorefError::InvalidLabel(raw.to_string()))?;
        let id = inner
            .parse::<u32>()
            .map_err(|_| CorefError::InvalidLabel(raw.to_string()))?;
        Ok(Self::Mention { kind, id })
    }

    /// Parse a whole `|`-delimited label column.
    pub fn parse_column(column: &str) -> Result<Vec<Self>> {
        column
            .split('|')
            .map(Self::parse)
            .filter(|label| !matches!(label, Ok(Self::Empty)))
            .collect()
    }

    pub fn is_mention(&self) -> bool {
        matches!(self, Self::Mention { .. })
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("_"),
            Self::Mention { kind, id } => write!(f, "{kind}[{id}]"),
            Self::Link {
                relation,
                antecedent,
                anaphor,
            } => write!(f, "{relation}[{antecedent}_{anaphor}]"),
            Self::MalformedLink { raw, .. } => f.write_str(raw),
        }
    }
}
