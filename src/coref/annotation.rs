//! WebAnno-style TSV reader producing paragraphs of labelled tokens.

use crate::error::{CorefError, Result};

use super::label::Label;

const TEXT_PREFIX: &str = "#Text=";

/// A single token line of the TSV.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Paragraph id from the position column.
    pub paragraph: u32,
    /// 1-based token index from the position column.
    pub index: u32,
    /// Character offset where the token starts.
    pub char_start: usize,
    /// Character offset one past the token end.
    pub char_end: usize,
    pub text: String,
    pub labels: Vec<Label>,
}

/// A blank-line delimited block: its `#Text=` line plus its tokens.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    /// 1-based position of the paragraph within the file.
    pub ordinal: usize,
    pub text: String,
    pub tokens: Vec<Token>,
}

impl Paragraph {
    pub fn token_texts(&self) -> Vec<String> {
        self.tokens.iter().map(|t| t.text.clone()).collect()
    }

    /// Surface text covering tokens `start..=end`.
    ///
    /// Character offsets are relative to the first token of the paragraph,
    /// which is where `#Text=` begins. Falls back to space-joined token
    /// surfaces when the offsets do not land inside the paragraph text.
    pub fn span_text(&self, start: usize, end: usize) -> String {
        if let Some(text) = self.slice_by_offsets(start, end) {
            return text;
        }
        self.tokens[start..=end]
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn slice_by_offsets(&self, start: usize, end: usize) -> Option<String> {
        let base = self.tokens.first()?.char_start;
        let first = self.tokens.get(start)?;
        let last = self.tokens.get(end)?;
        let from = first.char_start.checked_sub(base)?;
        let to = last.char_end.checked_sub(base)?;
        if from >= to || to > self.text.chars().count() {
            return None;
        }
        Some(self.text.chars().skip(from).take(to - from).collect())
    }
}

/// Parse a whole TSV file into paragraphs, skipping header-only blocks.
pub fn parse_paragraphs(input: &str) -> Result<Vec<Paragraph>> {
    let mut paragraphs = Vec::new();
    let mut block: Vec<(usize, &str)> = Vec::new();

    for (idx, raw) in input.lines().enumerate() {
        let line = raw.trim_end_matches('\r');
        if line.trim().is_empty() {
            flush_block(&mut block, &mut paragraphs)?;
        } else {
            block.push((idx + 1, line));
        }
    }
    flush_block(&mut block, &mut paragraphs)?;
    Ok(paragraphs)
}

/// Parse a single paragraph block, numbering its lines from 1.
pub fn parse_paragraph(block: &str) -> Result<Option<Paragraph>> {
    let lines: Vec<(usize, &str)> = block
        .lines()
        .map(|l| l.trim_end_matches('\r'))
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(i, l)| (i + 1, l))
        .collect();
    parse_block(&lines, 1)
}

fn flush_block<'a>(block: &mut Vec<(usize, &'a str)>, out: &mut Vec<Paragraph>) -> Result<()> {
    if block.is_empty() {
        return Ok(());
    }
    if let Some(paragraph) = parse_block(block, out.len() + 1)? {
        out.push(paragraph);
    }
    block.clear();
    Ok(())
}

fn parse_block(lines: &[(usize, &str)], ordinal: usize) -> Result<Option<Paragraph>> {
    let mut texts: Vec<&str> = Vec::new();
    let mut tokens = Vec::new();

    for &(line_no, line) in lines {
        if let Some(text) = line.strip_prefix(TEXT_PREFIX) {
            texts.push(text);
            continue;
        }
        if line.starts_with('#') {
            continue;
        }
        let columns: Vec<&str> = line.split('\t').collect();
        if columns.len() == 1 {
            continue;
        }
        tokens.push(parse_token(line_no, &columns)?);
    }

    if texts.is_empty() && tokens.is_empty() {
        return Ok(None);
    }
    Ok(Some(Paragraph {
        ordinal,
        text: texts.join("\n"),
        tokens,
    }))
}

fn parse_token(line_no: usize, columns: &[&str]) -> Result<Token> {
    if columns.len() < 4 {
        return Err(CorefError::malformed(
            line_no,
            format!("expected 4 columns, found {}", columns.len()),
        ));
    }
    let (paragraph, index) = parse_pair::<u32>(columns[0])
        .ok_or_else(|| CorefError::malformed(line_no, format!("bad position `{}`", columns[0])))?;
    let (char_start, char_end) = parse_pair::<usize>(columns[1])
        .ok_or_else(|| CorefError::malformed(line_no, format!("bad span `{}`", columns[1])))?;
    if char_end < char_start {
        return Err(CorefError::malformed(
            line_no,
            format!("span `{}` ends before it starts", columns[1]),
        ));
    }
    let labels = Label::parse_column(columns[3])
        .map_err(|err| CorefError::malformed(line_no, err.to_string()))?;

    Ok(Token {
        paragraph,
        index,
        char_start,
        char_end,
        text: columns[2].to_string(),
        labels,
    })
}

fn parse_pair<T: std::str::FromStr>(raw: &str) -> Option<(T, T)> {
    let (a, b) = raw.trim().split_once('-')?;
    Some((a.parse().ok()?, b.parse().ok()?))
}
