// sprig-reader - Property-based print/read round trips
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Property-based tests for the reader.
//!
//! Tests the following properties:
//! - Printing a readable value and reading it back yields an equal value
//! - Integers read as themselves in any radix-10 spelling with a sign
//! - Comments and discards never change the forms of a stream

mod common;

use common::{Value, read_all, read_one, reprint};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn arb_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9*!?<>=-]{0,8}"
        .prop_filter("reserved words read as literals", |s| {
            !matches!(s.as_str(), "nil" | "true" | "false")
        })
}

fn arb_qualified_name() -> impl Strategy<Value = String> {
    prop_oneof![
        arb_name(),
        ("[a-z][a-z.]{0,5}[a-z]", arb_name()).prop_map(|(ns, name)| format!("{}/{}", ns, name)),
    ]
}

fn arb_atom() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Nil),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        any::<char>().prop_map(Value::Char),
        any::<String>().prop_map(|s| Value::string(&s)),
        arb_qualified_name().prop_map(|s| Value::symbol(&s)),
        arb_qualified_name().prop_map(|s| Value::keyword(&s)),
    ]
}

fn arb_form() -> impl Strategy<Value = Value> {
    arb_atom().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::list),
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::vector),
            prop::collection::vec((inner.clone(), inner), 0..4).prop_map(Value::map),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn atom_round_trips(value in arb_atom()) {
        prop_assert_eq!(reprint(&value), value);
    }

    #[test]
    fn form_round_trips(value in arb_form()) {
        prop_assert_eq!(reprint(&value), value);
    }

    #[test]
    fn int_reads_with_explicit_sign(n in 0i64..=i64::MAX) {
        prop_assert_eq!(read_one(&format!("+{}", n)), Value::Int(n));
        prop_assert_eq!(read_one(&format!("-{}", n)), Value::Int(-n));
    }

    #[test]
    fn comments_and_discards_are_transparent(
        forms in prop::collection::vec(arb_form(), 1..5),
        noise in prop::collection::vec(arb_form(), 1..5),
    ) {
        let mut src = String::new();
        for (i, form) in forms.iter().enumerate() {
            src.push_str("; comment\n");
            if let Some(skipped) = noise.get(i) {
                src.push_str(&format!("#_ {} ", skipped));
            }
            src.push_str(&format!("{}\n", form));
        }
        prop_assert_eq!(read_all(&src).unwrap(), forms);
    }
}
