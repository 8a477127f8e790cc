//! Comprehensive tests for the writer state machine
//!
//! Covers the structural protocol end to end: legal sequences and their
//! exact output, the full illegal-call matrix, delegated strategy writes,
//! and parity between the pretty and compact writers.

use jotson_rs::FrameState;
use jotson_rs::prelude::*;
use serde_json::json;

fn pretty_text(build: impl FnOnce(&mut dyn JsonWriter) -> Result<()>) -> String {
    let ctx = JsonContext::standard();
    let mut w = ctx.pretty_writer(Vec::new());
    build(&mut w).unwrap();
    String::from_utf8(w.finish().unwrap()).unwrap()
}

fn compact_text(build: impl FnOnce(&mut dyn JsonWriter) -> Result<()>) -> String {
    let ctx = JsonContext::standard();
    let mut w = ctx.compact_writer(Vec::new());
    build(&mut w).unwrap();
    String::from_utf8(w.finish().unwrap()).unwrap()
}

// ============================================================================
// Exact output
// ============================================================================

#[test]
fn test_object_with_two_properties() {
    let out = pretty_text(|w| {
        w.begin_object()?;
        w.property("a", &1i32)?;
        w.property("b", &"x")?;
        w.end_object()
    });
    assert_eq!(out, "{\n  \"a\": 1,\n  \"b\": \"x\"\n}");
}

#[test]
fn test_array_of_two_values() {
    let out = pretty_text(|w| {
        w.begin_array()?;
        w.value(&1i32)?;
        w.value(&2i32)?;
        w.end_array()
    });
    assert_eq!(out, "[\n  1,\n  2\n]");
}

#[test]
fn test_complex_property_state_restoration() {
    let out = pretty_text(|w| {
        w.begin_object()?;
        w.write_complex_property("items")?;
        w.begin_array()?;
        w.end_array()?;
        // Back in Object state: further properties are legal.
        w.property("next", &true)?;
        w.end_object()
    });
    assert_eq!(out, "{\n  \"items\": [\n  ],\n  \"next\": true\n}");
}

#[test]
fn test_top_level_null_is_bare() {
    assert_eq!(pretty_text(|w| w.null_value()), "null");
    assert_eq!(compact_text(|w| w.null_value()), "null");
}

#[test]
fn test_top_level_scalar_is_bare() {
    assert_eq!(pretty_text(|w| w.value(&7i64)), "7");
    assert_eq!(pretty_text(|w| w.value(&"s")), "\"s\"");
}

#[test]
fn test_reference_serializes_as_id_and_title() {
    let reference = NumericReference::titled(815, "Order #815").unwrap();
    let out = compact_text(|w| w.value(&reference));
    assert_eq!(out, "{\"id\":815,\"title\":\"Order #815\"}");
}

#[test]
fn test_objects_nested_in_arrays() {
    let out = pretty_text(|w| {
        w.begin_array()?;
        w.begin_object()?;
        w.property("n", &1i32)?;
        w.end_object()?;
        w.begin_object()?;
        w.property("n", &2i32)?;
        w.end_object()?;
        w.end_array()
    });
    assert_eq!(
        out,
        "[ {\n    \"n\": 1\n  }, {\n    \"n\": 2\n  }\n]"
    );
}

#[test]
fn test_deeply_nested_indentation() {
    let out = pretty_text(|w| {
        w.begin_object()?;
        w.write_complex_property("a")?;
        w.begin_object()?;
        w.write_complex_property("b")?;
        w.begin_array()?;
        w.value(&0i32)?;
        w.end_array()?;
        w.end_object()?;
        w.end_object()
    });
    assert_eq!(
        out,
        "{\n  \"a\": {\n    \"b\": [\n      0\n    ]\n  }\n}"
    );
}

#[test]
fn test_property_names_are_escaped() {
    let out = compact_text(|w| {
        w.begin_object()?;
        w.property("line\nbreak", &1i32)?;
        w.end_object()
    });
    assert_eq!(out, "{\"line\\nbreak\":1}");
}

// ============================================================================
// Delegated strategy writes
// ============================================================================

#[test]
fn test_top_level_value_tree() {
    let value = json!({"a": [1, true], "b": "x"});
    let out = pretty_text(|w| w.value(&value));
    assert_eq!(
        out,
        "{\n  \"a\": [\n    1,\n    true\n  ],\n  \"b\": \"x\"\n}"
    );
}

#[test]
fn test_value_tree_as_array_element_counts_once() {
    let element = json!({"k": 1});
    let out = compact_text(|w| {
        w.begin_array()?;
        w.value(&element)?;
        w.value(&element)?;
        w.end_array()
    });
    assert_eq!(out, "[{\"k\":1},{\"k\":1}]");
}

#[test]
fn test_reference_under_complex_property() {
    let reference = NumericReference::new(3);
    let out = compact_text(|w| {
        w.begin_object()?;
        w.write_complex_property("owner")?;
        w.value(&reference)?;
        w.end_object()
    });
    assert_eq!(out, "{\"owner\":{\"id\":3,\"title\":\"3\"}}");
}

// ============================================================================
// Protocol enforcement
// ============================================================================

fn assert_protocol(build: impl Fn(&mut dyn JsonWriter) -> Result<()>, operation: &str) {
    let ctx = JsonContext::standard();
    let mut w = ctx.pretty_writer(Vec::new());
    match build(&mut w) {
        Err(Error::Protocol { operation: op, .. }) => assert_eq!(op, operation),
        other => panic!("expected protocol violation for {operation}, got {other:?}"),
    }

    let mut w = ctx.compact_writer(Vec::new());
    match build(&mut w) {
        Err(Error::Protocol { operation: op, .. }) => assert_eq!(op, operation),
        other => panic!("expected protocol violation for {operation}, got {other:?}"),
    }
}

#[test]
fn test_close_on_fresh_session() {
    assert_protocol(|w| w.end_array(), "end_array");
    assert_protocol(|w| w.end_object(), "end_object");
}

#[test]
fn test_mismatched_closes() {
    assert_protocol(
        |w| {
            w.begin_array()?;
            w.end_object()
        },
        "end_object",
    );
    assert_protocol(
        |w| {
            w.begin_object()?;
            w.end_array()
        },
        "end_array",
    );
}

#[test]
fn test_property_in_array() {
    assert_protocol(
        |w| {
            w.begin_array()?;
            w.property("a", &1i32)
        },
        "write_property",
    );
}

#[test]
fn test_value_directly_in_object() {
    assert_protocol(
        |w| {
            w.begin_object()?;
            w.value(&1i32)
        },
        "write_value",
    );
}

#[test]
fn test_container_directly_in_object() {
    assert_protocol(
        |w| {
            w.begin_object()?;
            w.begin_object()
        },
        "begin_object",
    );
    assert_protocol(
        |w| {
            w.begin_object()?;
            w.begin_array()
        },
        "begin_array",
    );
}

#[test]
fn test_second_top_level_value() {
    assert_protocol(
        |w| {
            w.value(&1i32)?;
            w.value(&2i32)
        },
        "write_value",
    );
    assert_protocol(
        |w| {
            w.begin_object()?;
            w.end_object()?;
            w.begin_object()
        },
        "begin_object",
    );
}

#[test]
fn test_pending_property_rejects_everything_but_one_value() {
    assert_protocol(
        |w| {
            w.begin_object()?;
            w.write_complex_property("a")?;
            w.write_complex_property("b")
        },
        "write_complex_property",
    );
    assert_protocol(
        |w| {
            w.begin_object()?;
            w.write_complex_property("a")?;
            w.property("b", &1i32)
        },
        "write_property",
    );
    assert_protocol(
        |w| {
            w.begin_object()?;
            w.write_complex_property("a")?;
            w.end_object()
        },
        "end_object",
    );
}

#[test]
fn test_violation_reports_offending_state() {
    let ctx = JsonContext::standard();
    let mut w = ctx.pretty_writer(Vec::new());
    w.begin_object().unwrap();
    let err = w.end_array().unwrap_err();
    assert!(matches!(
        err,
        Error::Protocol {
            operation: "end_array",
            state: FrameState::Object,
        }
    ));
}

// ============================================================================
// Writer parity
// ============================================================================

#[test]
fn test_pretty_and_compact_parse_to_the_same_document() {
    let build = |w: &mut dyn JsonWriter| -> Result<()> {
        w.begin_object()?;
        w.property("id", &10i64)?;
        w.write_complex_property("tags")?;
        w.begin_array()?;
        w.value(&"a")?;
        w.value(&"b")?;
        w.end_array()?;
        w.null_property("parent")?;
        w.write_complex_property("meta")?;
        w.begin_object()?;
        w.property("ok", &true)?;
        w.end_object()?;
        w.end_object()
    };

    let pretty: serde_json::Value = serde_json::from_str(&pretty_text(build)).unwrap();
    let compact: serde_json::Value = serde_json::from_str(&compact_text(build)).unwrap();
    assert_eq!(pretty, compact);
    assert_eq!(pretty["tags"], json!(["a", "b"]));
    assert_eq!(pretty["parent"], json!(null));
}
