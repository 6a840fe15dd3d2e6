use coin_coref::coref::{Label, MentionType, Relation};

#[test]
fn mention_label_parses_type_and_id() {
    assert_eq!(
        Label::parse("PRONOUN[12]").unwrap(),
        Label::Mention {
            kind: MentionType::Pronoun,
            id: 12
        }
    );
}

#[test]
fn link_label_orders_antecedent_then_anaphor() {
    assert_eq!(
        Label::parse("EXAPPOS[3_7]").unwrap(),
        Label::Link {
            relation: Relation::Exappos,
            antecedent: 3,
            anaphor: 7
        }
    );
}

#[test]
fn column_splits_on_pipes_and_skips_placeholders() {
    let labels = Label::parse_column("IDENT[1_2]|PRONOUN[2]").unwrap();
    assert_eq!(labels.len(), 2);
    assert!(labels[1].is_mention());
    assert!(Label::parse_column("_").unwrap().is_empty());
}

#[test]
fn link_without_pair_is_kept_as_malformed() {
    let label = Label::parse("IDENT[4]").unwrap();
    assert!(matches!(label, Label::MalformedLink { relation: Relation::Ident, .. }));
}

#[test]
fn unknown_tags_are_rejected() {
    assert!(Label::parse("PLACE[1]").is_err());
    assert!(Label::parse("PROPER").is_err());
    assert!(Label::parse("PROPER[x]").is_err());
}

#[test]
fn labels_display_in_source_form() {
    let label = Label::parse("ALIAS[5_9]").unwrap();
    assert_eq!(label.to_string(), "ALIAS[5_9]");
}
