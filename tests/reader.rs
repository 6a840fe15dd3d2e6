use std::fs;

use coin_coref::{
    coref::reader::{read_documents, read_instances, summarise, ReaderOptions},
    CorefError,
};

const SPLIT: &str = r#"{"text":"Budi Santoso pulang . Dia lelah","tokens":["Budi","Santoso","pulang",".","Dia","lelah"],"corefs":[{"start":0,"end":1,"text":"Budi Santoso","type":"PROPER","cluster":0},{"start":4,"end":4,"text":"Dia","type":"PRONOUN","cluster":0},{"start":5,"end":5,"text":"lelah","type":"VERB"}]}

{"text":"Kota itu ramai","tokens":["Kota","itu","ramai"],"corefs":[{"start":0,"end":1,"text":"Kota itu","type":"NOUN","label":3}]}
"#;

fn write_split() -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("train.jsonl");
    fs::write(&path, SPLIT).unwrap();
    (dir, path)
}

#[test]
fn clusters_group_spans_and_lowercase_tokens() {
    let (_dir, path) = write_split();
    let instances = read_instances(&path, &ReaderOptions::default()).unwrap();
    assert_eq!(instances.len(), 2);
    assert_eq!(instances[0].tokens[0], "budi");
    assert_eq!(instances[0].clusters, vec![vec![(0, 1), (4, 4)]]);
    assert!(instances[1].clusters.is_empty());
}

#[test]
fn legacy_label_key_is_accepted_and_singletons_can_be_kept() {
    let (_dir, path) = write_split();
    let options = ReaderOptions {
        remove_singleton_clusters: false,
        ..ReaderOptions::default()
    };
    let instances = read_instances(&path, &options).unwrap();
    assert_eq!(instances[1].clusters, vec![vec![(0, 1)]]);
}

#[test]
fn overlong_spans_are_dropped_and_counted() {
    let (_dir, path) = write_split();
    let options = ReaderOptions {
        max_span_width: 1,
        remove_singleton_clusters: false,
    };
    let instances = read_instances(&path, &options).unwrap();
    assert_eq!(instances[0].clusters, vec![vec![(4, 4)]]);
    let summary = summarise(&instances);
    assert_eq!(summary.documents, 2);
    assert_eq!(summary.tokens, 9);
    assert_eq!(summary.overlong_spans, 2);
    assert_eq!(summary.max_cluster_size, 1);
}

#[test]
fn bad_line_reports_its_number() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.jsonl");
    fs::write(&path, format!("{}\n{{\"text\": 1}}\n", SPLIT.lines().next().unwrap())).unwrap();
    match read_documents(&path) {
        Err(CorefError::Dataset { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected dataset error, got {other:?}"),
    }
}
