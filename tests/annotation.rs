mod common;

use coin_coref::{
    coref::{parse_paragraph, parse_paragraphs},
    CorefError,
};

#[test]
fn paragraphs_split_on_blank_lines_and_skip_headers() {
    let input = format!(
        "#FORMAT=WebAnno TSV 3.2\n#T_SP=custom.Coref|type\n\n{}\n{}\n",
        common::paragraph(1, 0, &[("Budi", "PROPER[1]"), ("tidur", "_")]),
        common::paragraph(2, 11, &[("Ia", "PRONOUN[1]"), ("lelah", "_")]),
    );
    let paragraphs = parse_paragraphs(&input).unwrap();
    assert_eq!(paragraphs.len(), 2);
    assert_eq!(paragraphs[0].text, "Budi tidur");
    assert_eq!(paragraphs[1].ordinal, 2);
    assert_eq!(paragraphs[1].tokens[0].paragraph, 2);
    assert_eq!(paragraphs[1].tokens[1].index, 2);
}

#[test]
fn span_text_uses_offsets_relative_to_paragraph_start() {
    let block = common::paragraph(3, 40, &[("Kota", "_"), ("Jakarta", "_"), ("ramai", "_")]);
    let paragraph = parse_paragraph(&block).unwrap().unwrap();
    assert_eq!(paragraph.tokens[1].char_start, 45);
    assert_eq!(paragraph.span_text(0, 1), "Kota Jakarta");
    assert_eq!(paragraph.span_text(2, 2), "ramai");
}

#[test]
fn text_lines_of_one_block_join_with_newline() {
    let block = "#Text=Ia pergi\n#Text=ke pasar\n\
                 1-1\t0-2\tIa\t_\n1-2\t3-8\tpergi\t_\n\
                 1-3\t9-11\tke\t_\n1-4\t12-17\tpasar\t_\n";
    let paragraph = parse_paragraph(block).unwrap().unwrap();
    assert_eq!(paragraph.text, "Ia pergi\nke pasar");
    assert_eq!(paragraph.span_text(1, 2), "pergi\nke");
    assert_eq!(paragraph.span_text(3, 3), "pasar");
}

#[test]
fn span_text_falls_back_to_token_join() {
    let block = "#Text=ab\n1-1\t0-5\tab\t_\n1-2\t6-8\tcd\t_\n";
    let paragraph = parse_paragraph(block).unwrap().unwrap();
    assert_eq!(paragraph.span_text(0, 1), "ab cd");
}

#[test]
fn single_column_lines_are_ignored() {
    let block = "#Text=Ia\nstray\n1-1\t0-2\tIa\tPRONOUN[1]\n";
    let paragraph = parse_paragraph(block).unwrap().unwrap();
    assert_eq!(paragraph.tokens.len(), 1);
}

#[test]
fn short_token_line_reports_line_number() {
    let block = "#Text=Ia pergi\n1-1\t0-2\tIa\tPRONOUN[1]\n1-2\t3-8\tpergi\n";
    match parse_paragraph(block) {
        Err(CorefError::MalformedLine { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected malformed line, got {other:?}"),
    }
}

#[test]
fn bad_label_is_reported_with_line() {
    let block = "#Text=Ia\n1-1\t0-2\tIa\tSOMETHING[1]\n";
    assert!(matches!(
        parse_paragraph(block),
        Err(CorefError::MalformedLine { line: 2, .. })
    ));
}
