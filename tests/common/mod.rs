#![allow(dead_code)]

/// Build a one-paragraph TSV from `(token, labels)` pairs, spacing tokens by
/// a single blank so offsets line up with the `#Text=` line.
pub fn paragraph(paragraph_id: u32, base: usize, tokens: &[(&str, &str)]) -> String {
    let text = tokens.iter().map(|(t, _)| *t).collect::<Vec<_>>().join(" ");
    let mut out = format!("#Text={text}\n");
    let mut offset = base;
    for (idx, (token, labels)) in tokens.iter().enumerate() {
        let end = offset + token.chars().count();
        out.push_str(&format!(
            "{paragraph_id}-{}\t{offset}-{end}\t{token}\t{labels}\n",
            idx + 1
        ));
        offset = end + 1;
    }
    out
}

pub fn tsv(tokens: &[(&str, &str)]) -> String {
    paragraph(1, 0, tokens)
}
