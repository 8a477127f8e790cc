//! Property-based tests for the emission engine

use jotson_rs::prelude::*;
use jotson_rs::IndentCache;
use proptest::prelude::*;
use serde_json::Value;

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        any::<String>().prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::hash_map(any::<String>(), inner, 0..6)
                .prop_map(|members| Value::Object(members.into_iter().collect())),
        ]
    })
}

fn emit_pretty(value: &Value) -> String {
    let mut w = JsonContext::global().pretty_writer(Vec::new());
    w.value(value).unwrap();
    String::from_utf8(w.finish().unwrap()).unwrap()
}

fn emit_compact(value: &Value) -> String {
    let mut w = JsonContext::global().compact_writer(Vec::new());
    w.value(value).unwrap();
    String::from_utf8(w.finish().unwrap()).unwrap()
}

proptest! {
    /// Every accepted emission is syntactically valid JSON that parses
    /// back to the document that was written.
    #[test]
    fn prop_pretty_output_roundtrips(value in arb_json()) {
        let parsed: Value = serde_json::from_str(&emit_pretty(&value)).unwrap();
        prop_assert_eq!(parsed, value);
    }

    #[test]
    fn prop_compact_output_roundtrips(value in arb_json()) {
        let parsed: Value = serde_json::from_str(&emit_compact(&value)).unwrap();
        prop_assert_eq!(parsed, value);
    }

    /// Pretty printing only changes whitespace, never the document.
    #[test]
    fn prop_pretty_and_compact_agree(value in arb_json()) {
        let pretty: Value = serde_json::from_str(&emit_pretty(&value)).unwrap();
        let compact: Value = serde_json::from_str(&emit_compact(&value)).unwrap();
        prop_assert_eq!(pretty, compact);
    }

    /// Arbitrary strings survive escaping, as values and as names.
    #[test]
    fn prop_strings_roundtrip(s in any::<String>()) {
        let mut w = JsonContext::global().compact_writer(Vec::new());
        w.begin_object().unwrap();
        w.property(&s, &s.clone()).unwrap();
        w.end_object().unwrap();
        let out = String::from_utf8(w.finish().unwrap()).unwrap();

        let parsed: Value = serde_json::from_str(&out).unwrap();
        let got = parsed[s.as_str()].clone();
        prop_assert_eq!(got, Value::String(s));
    }

    /// The indentation cache is observably `" ".repeat(depth * factor)`
    /// in any access order.
    #[test]
    fn prop_indent_cache_equivalence(
        factor in 0usize..6,
        depths in prop::collection::vec(0usize..24, 1..16),
    ) {
        let mut cache = IndentCache::new(factor);
        for depth in depths {
            prop_assert_eq!(cache.indent(depth), " ".repeat(depth * factor));
        }
    }

    /// Illegal continuations after a completed top-level value always
    /// fail with a protocol violation.
    #[test]
    fn prop_completed_session_rejects_more(value in arb_json()) {
        let mut w = JsonContext::global().pretty_writer(Vec::new());
        w.value(&value).unwrap();
        let err = w.value(&value).unwrap_err();
        prop_assert!(matches!(err, Error::Protocol { .. }), "expected protocol error");
    }
}
