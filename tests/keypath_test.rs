//! Integration tests for keypath resolution over decoded sessions.

mod common;

use common::NoteBuilder;
use plist::{Dictionary, Uid, Value};
use unnote::graph::{access, dump, schema, GraphStore, LeafValue, NodeTag, ResolveError};
use unnote::keypath;

fn uid(index: u64) -> Value {
    Value::Uid(Uid::new(index))
}

fn dict(entries: &[(&str, Value)]) -> Value {
    let mut dict = Dictionary::new();
    for (key, value) in entries {
        dict.insert(key.to_string(), value.clone());
    }
    Value::Dictionary(dict)
}

fn load(objects: Vec<Value>) -> GraphStore {
    let root = dict(&[
        ("$archiver", Value::String("NSKeyedArchiver".into())),
        ("$version", Value::Integer(100_000u64.into())),
        ("$objects", Value::Array(objects)),
    ]);
    let mut data = Vec::new();
    root.to_writer_binary(&mut data).unwrap();
    GraphStore::load(&data).unwrap()
}

fn chained() -> GraphStore {
    load(vec![
        Value::String("$null".into()),
        // 1: root
        dict(&[
            ("direct", uid(2)),
            ("chained", uid(3)),
            ("tooLong", uid(4)),
            ("list", Value::Array(vec![uid(2), Value::Real(7.5)])),
        ]),
        // 2
        dict(&[("width", Value::Real(612.0))]),
        // 3: one extra hop
        uid(2),
        // 4: two extra hops
        uid(3),
    ])
}

#[test]
fn test_load_decodes_header() {
    let store = chained();
    assert_eq!(store.len(), 5);
    assert_eq!(store.archiver(), Some("NSKeyedArchiver"));
    assert_eq!(store.version(), Some(100_000));
}

#[test]
fn test_direct_reference() {
    let store = chained();
    let width = access(&store, 1, &keypath!["direct", "width"])
        .unwrap()
        .into_real()
        .unwrap();
    assert_eq!(width, 612.0);
}

#[test]
fn test_chained_reference_within_hop_limit() {
    let store = chained();
    let leaf = access(&store, 1, &keypath!["chained", "width"]).unwrap();
    assert_eq!(leaf, LeafValue::Real(612.0));
}

#[test]
fn test_chained_reference_beyond_hop_limit() {
    let store = chained();
    let err = access(&store, 1, &keypath!["tooLong", "width"]).unwrap_err();
    assert!(matches!(err, ResolveError::ReferenceChain { max: 2, .. }));
}

#[test]
fn test_array_steps() {
    let store = chained();
    assert_eq!(
        access(&store, 1, &keypath!["list", 1]).unwrap(),
        LeafValue::Real(7.5)
    );
    assert_eq!(
        access(&store, 1, &keypath!["list", 0, "width"]).unwrap(),
        LeafValue::Real(612.0)
    );

    let err = access(&store, 1, &keypath!["list", 2]).unwrap_err();
    assert!(matches!(
        err,
        ResolveError::IndexOutOfBounds {
            position: 1,
            len: 2,
            ..
        }
    ));
    assert!(err.is_missing());
}

#[test]
fn test_index_literal_types() {
    let store = chained();
    let index: u32 = 1;
    assert_eq!(
        access(&store, 1, &keypath!["list", index]).unwrap(),
        LeafValue::Real(7.5)
    );

    let err = access(&store, 1, &keypath!["list", -1]).unwrap_err();
    assert!(matches!(err, ResolveError::IndexOutOfBounds { position: 1, .. }));
}

#[test]
fn test_error_positions() {
    let store = chained();

    let err = access(&store, 1, &keypath!["direct", "height"]).unwrap_err();
    assert!(matches!(err, ResolveError::MissingKey { position: 1, .. }));

    let err = access(&store, 1, &keypath!["direct", "width", "more"]).unwrap_err();
    assert!(matches!(
        err,
        ResolveError::PrematureLeaf {
            position: 2,
            actual: NodeTag::Real,
            remaining: 1,
            ..
        }
    ));

    let err = access(&store, 1, &keypath!["list", "width"]).unwrap_err();
    assert!(matches!(
        err,
        ResolveError::TypeMismatch {
            position: 1,
            expected: NodeTag::Dict,
            actual: NodeTag::Array,
            ..
        }
    ));
    assert!(!err.is_missing());
}

#[test]
fn test_dangling_start_index() {
    let store = chained();
    let err = access(&store, 99, &[]).unwrap_err();
    assert!(matches!(err, ResolveError::DanglingReference { index: 99, len: 5 }));
}

#[test]
fn test_session_schema_and_dump() {
    let data = NoteBuilder::new().session_bytes();
    let store = GraphStore::load(&data).unwrap();
    let indices = schema::detect(&store).unwrap();
    assert_eq!(indices.general_info, 1);
    assert_eq!(indices.layout_info, 2);

    let reflow = access(&store, indices.layout_info, &keypath!["reflowState"])
        .unwrap()
        .into_node()
        .unwrap();
    assert_eq!(
        schema::class_name(&store, reflow).unwrap(),
        common::LOCKED_REFLOW
    );

    let text = dump(&store, indices.layout_info, 3);
    assert!(text.contains("reflowState"));
}
