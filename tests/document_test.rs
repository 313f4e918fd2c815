//! Serialization gate: export rounding and import validation

mod common;

use proptest::prelude::*;
use rstest::rstest;
use serde_json::json;

use common::arb_tree;
use probtree::application::Session;
use probtree::domain::{Document, DomainError, Mode, Node};

#[test]
fn given_exported_json_when_parsing_then_envelope_has_camel_case_keys() {
    let root = Node::root("q").with_children(vec![Node::leaf("a", "A")
        .with_probability(33.33333)
        .with_locked(true)]);

    let json = Document::export(&root, Mode::Absolute).to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["isAbsolute"], json!(true));
    assert_eq!(value["data"]["id"], json!("root"));
    assert_eq!(value["data"]["children"][0]["probability"], json!(33.333));
    assert_eq!(value["data"]["children"][0]["locked"], json!(true));
    assert!(value["data"]["children"][0].get("children").is_none());
}

#[test]
fn given_minimal_node_fields_when_importing_then_defaults_fill_in() {
    let json = r#"{"isAbsolute": false, "data": {"id": "root", "name": "q", "probability": 100,
        "children": [{"id": "a", "name": "A", "probability": 60}]}}"#;

    let imported = Document::import(json).unwrap();

    let a = &imported.root.children()[0];
    assert!(!a.locked);
    assert!(a.is_leaf());
    assert_eq!(imported.mode, Some(Mode::Relative));
}

#[test]
fn given_empty_children_list_when_importing_then_node_is_leaf() {
    let json = r#"{"isAbsolute": true, "data": {"id": "root", "name": "q", "probability": 100,
        "children": [{"id": "a", "name": "A", "probability": 60, "children": []}]}}"#;

    let imported = Document::import(json).unwrap();

    assert_eq!(imported.root.children()[0].children, None);
}

#[rstest]
#[case::not_json("not json")]
#[case::no_data(r#"{"isAbsolute": true}"#)]
#[case::null_data(r#"{"isAbsolute": true, "data": null}"#)]
#[case::wrong_root(r#"{"isAbsolute": true, "data": {"id": "x", "name": "q", "probability": 100}}"#)]
#[case::bad_node(r#"{"data": {"id": "root", "name": "q", "probability": "high"}}"#)]
fn given_invalid_document_when_importing_then_session_untouched(#[case] json: &str) {
    let mut session = Session::new(Mode::Absolute);
    session.apply(probtree::application::Intent::AddChild {
        parent_id: "root".into(),
    });
    let before = session.clone();

    let result = session.import_json(json);

    assert!(result.is_err());
    assert_eq!(session, before);
}

#[test]
fn given_wrong_root_id_when_importing_then_invalid_document_error() {
    let json = r#"{"isAbsolute": true, "data": {"id": "x", "name": "q", "probability": 100}}"#;
    assert!(matches!(
        Document::import(json),
        Err(DomainError::InvalidDocument { .. })
    ));
}

#[test]
fn given_missing_is_absolute_when_importing_then_session_keeps_mode() {
    let mut session = Session::new(Mode::Absolute);

    session
        .import_json(r#"{"data": {"id": "root", "name": "q", "probability": 100}}"#)
        .unwrap();

    assert_eq!(session.mode(), Mode::Absolute);
}

proptest! {
    #[test]
    fn export_then_import_reproduces_rounded_tree(tree in arb_tree(), absolute in any::<bool>()) {
        let mode = Mode::from_is_absolute(absolute);
        let exported = Document::export(&tree, mode);

        let imported = Document::import(&exported.to_json().unwrap()).unwrap();

        prop_assert_eq!(imported.mode, Some(mode));
        prop_assert_eq!(imported.root.node_count(), tree.node_count());
        for (orig, back) in tree.iter().zip(imported.root.iter()) {
            prop_assert_eq!(&orig.id, &back.id);
            prop_assert_eq!(&orig.name, &back.name);
            prop_assert_eq!(orig.locked, back.locked);
            prop_assert_eq!(orig.expanded, back.expanded);
            prop_assert!((orig.probability - back.probability).abs() <= 0.0005 + 1e-12);
        }
    }
}
