//! Property-based tests for the save-file parser.
//!
//! Uses `proptest` to generate random inputs and check the parse laws:
//!
//! - scalar type inference for `key=value` entries
//! - bare-array order preservation (original order, never reversed)
//! - the duplicate-key merge law `[nth, ..., 3rd, 1st, 2nd]` for n >= 3
//! - idempotence: two fresh parsers over the same input agree structurally

use proptest::prelude::*;
use savtree_core::{parse, Value};

/// Generate a plausible save-file key.
fn arb_key() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z_][a-zA-Z0-9_.]{0,15}").unwrap()
}

/// Generate quoted-string content: anything except `"` (which would close
/// the string early). Line breaks and control characters are legal inside.
fn arb_string_content() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9 _.,{}\\[\\]=\t\n-]{0,24}").unwrap()
}

/// Generate a float literal the lexer classifies as Float.
fn arb_float_literal() -> impl Strategy<Value = String> {
    prop::string::string_regex("-?[0-9]{1,3}\\.[0-9]{1,4}").unwrap()
}

proptest! {
    #[test]
    fn integer_values_infer_as_i64(key in arb_key(), n in any::<i64>()) {
        let input = format!("{key}={n}");
        let doc = parse(input.as_bytes()).unwrap();
        let root = doc.root.as_object().unwrap();
        prop_assert_eq!(root.len(), 1);
        prop_assert_eq!(root.get(&key), Some(&Value::Integer(n)));
    }

    #[test]
    fn float_values_are_widened_f32(key in arb_key(), lit in arb_float_literal()) {
        let input = format!("{key}={lit}");
        let doc = parse(input.as_bytes()).unwrap();
        let expected = f64::from(lit.parse::<f32>().unwrap());
        let root = doc.root.as_object().unwrap();
        prop_assert_eq!(root.get(&key), Some(&Value::Float(expected)));
    }

    #[test]
    fn quoted_strings_come_back_verbatim(key in arb_key(), content in arb_string_content()) {
        let input = format!("{key}=\"{content}\"");
        let doc = parse(input.as_bytes()).unwrap();
        let root = doc.root.as_object().unwrap();
        prop_assert_eq!(root.get(&key), Some(&Value::String(content)));
    }

    #[test]
    fn bare_integer_arrays_preserve_order(key in arb_key(), values in prop::collection::vec(any::<i64>(), 1..20)) {
        let joined = values.iter().map(i64::to_string).collect::<Vec<_>>().join(" ");
        let input = format!("{key}={{ {joined} }}");
        let doc = parse(input.as_bytes()).unwrap();
        let expected: Vec<Value> = values.into_iter().map(Value::Integer).collect();
        let root = doc.root.as_object().unwrap();
        prop_assert_eq!(root.get(&key), Some(&Value::Array(expected)));
    }

    #[test]
    fn duplicate_key_law(key in arb_key(), values in prop::collection::vec(any::<i64>(), 3..10)) {
        let input = values
            .iter()
            .map(|v| format!("{key}={v}"))
            .collect::<Vec<_>>()
            .join("\n");
        let doc = parse(input.as_bytes()).unwrap();

        // [nth, (n-1)th, ..., 3rd, 1st, 2nd]
        let mut expected: Vec<Value> = values[2..].iter().rev().map(|&v| Value::Integer(v)).collect();
        expected.push(Value::Integer(values[0]));
        expected.push(Value::Integer(values[1]));

        let root = doc.root.as_object().unwrap();
        prop_assert_eq!(root.get(&key), Some(&Value::Array(expected)));
    }

    #[test]
    fn two_duplicates_keep_arrival_order(key in arb_key(), a in any::<i64>(), b in any::<i64>()) {
        let input = format!("{key}={a}\n{key}={b}");
        let doc = parse(input.as_bytes()).unwrap();
        let root = doc.root.as_object().unwrap();
        prop_assert_eq!(
            root.get(&key),
            Some(&Value::Array(vec![Value::Integer(a), Value::Integer(b)]))
        );
    }

    #[test]
    fn reparsing_is_idempotent(entries in prop::collection::vec(arb_entry(), 0..12)) {
        let input = entries.join("\n");
        let first = parse(input.as_bytes()).unwrap();
        let second = parse(input.as_bytes()).unwrap();
        prop_assert_eq!(first.root, second.root);
        prop_assert_eq!(first.lines, second.lines);
        prop_assert_eq!(first.undefined_keys, second.undefined_keys);
    }
}

/// Generate one top-level entry in any of the forms the format allows:
/// scalar values, quoted strings, bare-element blocks, keyed blocks, and
/// anonymous root blocks.
fn arb_entry() -> impl Strategy<Value = String> {
    let key = arb_key();
    prop_oneof![
        (arb_key(), any::<i64>()).prop_map(|(k, n)| format!("{k}={n}")),
        (arb_key(), arb_float_literal()).prop_map(|(k, f)| format!("{k}={f}")),
        (arb_key(), "[a-zA-Z0-9 ]{0,12}").prop_map(|(k, s)| format!("{k}=\"{s}\"")),
        (key, prop::collection::vec(any::<i32>(), 1..5))
            .prop_map(|(k, vs)| {
                let joined = vs.iter().map(i32::to_string).collect::<Vec<_>>().join(" ");
                format!("{k}={{ {joined} }}")
            }),
        (arb_key(), arb_key(), any::<i64>())
            .prop_map(|(k, inner, n)| format!("{k}={{ {inner}={n} }}")),
        (arb_key(), any::<i64>()).prop_map(|(k, n)| format!("{{ {k}={n} }}")),
    ]
}
