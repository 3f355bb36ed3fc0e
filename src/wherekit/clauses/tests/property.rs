use crate::clauses::Where;
use crate::engine;
use crate::record::FieldMap;
use crate::value::Value;
use proptest::prelude::*;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

// A keyword and a non-ASCII name keep rendering honest.
const FIELDS: [&str; 3] = ["a", "in", "größe"];

fn arb_field() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(FIELDS[0].to_string()),
        Just(FIELDS[1].to_string()),
        Just(FIELDS[2].to_string()),
    ]
}

/// Values whose engine equality coincides with `Value` equality.
fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        (-1000i64..1000).prop_map(Value::Int),
        // Never integral, so engine widening cannot equate them with an int.
        (-1000i64..1000).prop_map(|n| Value::Float(n as f64 + 0.5)),
        any::<bool>().prop_map(Value::Bool),
        "[a-zA-Z0-9 ]{0,6}".prop_map(Value::Text),
        Just(Value::Null),
    ]
}

fn arb_row() -> impl Strategy<Value = FieldMap> {
    prop::collection::vec(prop_oneof![Just(None), arb_value().prop_map(Some)], FIELDS.len())
        .prop_map(|values| {
            let mut row = FieldMap::new();
            for (name, value) in FIELDS.iter().zip(values) {
                if let Some(value) = value {
                    row.insert((*name).to_string(), value);
                }
            }
            row
        })
}

fn arb_where() -> impl Strategy<Value = Where> {
    let leaf = prop_oneof![
        any::<bool>().prop_map(Where::constant),
        (arb_field(), arb_value()).prop_map(|(field, value)| Where::eq(field, value)),
        (arb_field(), prop::collection::vec(arb_value(), 0..4))
            .prop_map(|(field, candidates)| Where::is_in(field, candidates)),
        (arb_field(), arb_value())
            .prop_map(|(field, value)| Where::format("%K == %@", vec![Value::Text(field), value])),
    ];

    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| a & b),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| a | b),
            inner.clone().prop_map(|a| !a),
            prop::collection::vec(inner.clone(), 0..4).prop_map(Where::all_of),
            prop::collection::vec(inner, 0..4).prop_map(Where::any_of),
        ]
    })
}

fn eval(clause: &Where, row: &FieldMap) -> bool {
    clause.evaluate(row).expect("generated clauses always evaluate")
}

fn field_value(row: &FieldMap, field: &str) -> Value {
    row.get(field).cloned().unwrap_or(Value::Null)
}

fn hash_of(clause: &Where) -> u64 {
    let mut h = DefaultHasher::new();
    clause.hash(&mut h);
    h.finish()
}

proptest! {
    #[test]
    fn literal_evaluates_to_itself(b in any::<bool>(), row in arb_row()) {
        prop_assert_eq!(eval(&Where::from(b), &row), b);
    }

    #[test]
    fn and_or_not_follow_boolean_logic(x in arb_where(), y in arb_where(), row in arb_row()) {
        let (vx, vy) = (eval(&x, &row), eval(&y, &row));
        prop_assert_eq!(eval(&(&x & &y), &row), vx && vy);
        prop_assert_eq!(eval(&(&x | &y), &row), vx || vy);
        prop_assert_eq!(eval(&!&x, &row), !vx);
    }

    #[test]
    fn de_morgan(x in arb_where(), y in arb_where(), row in arb_row()) {
        prop_assert_eq!(eval(&!(&x & &y), &row), eval(&(!&x | !&y), &row));
        prop_assert_eq!(eval(&!(&x | &y), &row), eval(&(!&x & !&y), &row));
    }

    #[test]
    fn equality_matches_field_value(field in arb_field(), value in arb_value(), row in arb_row()) {
        let actual = field_value(&row, &field);
        prop_assert_eq!(eval(&Where::eq(field.as_str(), value.clone()), &row), actual == value);
        prop_assert_eq!(eval(&Where::eq(field.as_str(), None::<i64>), &row), actual.is_nil());
    }

    #[test]
    fn membership_matches_containment(
        field in arb_field(),
        candidates in prop::collection::vec(arb_value(), 0..5),
        row in arb_row()
    ) {
        let actual = field_value(&row, &field);
        let clause = Where::is_in(field.as_str(), candidates.clone());
        prop_assert_eq!(eval(&clause, &row), candidates.contains(&actual));
    }

    #[test]
    fn identical_construction_is_equal_and_hashes_equal(x in arb_where()) {
        let y = x.clone();
        prop_assert_eq!(&x, &y);
        prop_assert_eq!(hash_of(&x), hash_of(&y));
    }

    #[test]
    fn different_equality_values_are_unequal(field in arb_field(), v in arb_value(), w in arb_value()) {
        prop_assume!(v != w);
        prop_assert_ne!(Where::eq(field.as_str(), v), Where::eq(field.as_str(), w));
    }

    #[test]
    fn rendering_preserves_meaning(x in arb_where(), row in arb_row()) {
        let reparsed = engine::parse(&x.to_string(), &[]).expect("rendered clause parses");
        prop_assert_eq!(engine::eval(&reparsed, &row).unwrap(), eval(&x, &row));
    }
}
