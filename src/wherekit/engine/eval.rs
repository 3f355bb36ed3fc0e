use super::error::EvalError;
use super::expr::{CompareOp, Comparison, Expr, Operand};
use crate::record::Record;
use crate::value::Value;
use std::cmp::Ordering;

/// Evaluate a compiled expression against a record.
///
/// `AND` and `OR` short-circuit, so a failing comparison on the right-hand
/// side is never reached once the result is decided.
pub fn eval<R: Record + ?Sized>(expr: &Expr, record: &R) -> Result<bool, EvalError> {
    match expr {
        Expr::Const(b) => Ok(*b),
        Expr::Compare(c) => compare(c, record),
        Expr::And(parts) => {
            for part in parts {
                if !eval(part, record)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        Expr::Or(parts) => {
            for part in parts {
                if eval(part, record)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        Expr::Not(inner) => Ok(!eval(inner, record)?),
    }
}

enum Resolved {
    Scalar(Value),
    List(Vec<Value>),
}

fn resolve<R: Record + ?Sized>(operand: &Operand, record: &R) -> Resolved {
    match operand {
        Operand::KeyPath(kp) => Resolved::Scalar(record.value_for(kp).unwrap_or(Value::Null)),
        Operand::Literal(v) => Resolved::Scalar(v.clone()),
        Operand::List(items) => Resolved::List(
            items
                .iter()
                .map(|item| match resolve(item, record) {
                    Resolved::Scalar(v) => v,
                    // Nested lists are not meaningful operands; they never match.
                    Resolved::List(_) => Value::Null,
                })
                .collect(),
        ),
    }
}

fn compare<R: Record + ?Sized>(c: &Comparison, record: &R) -> Result<bool, EvalError> {
    let lhs = resolve(&c.lhs, record);
    let rhs = resolve(&c.rhs, record);
    let ci = c.case_insensitive;

    match (c.op, lhs, rhs) {
        (CompareOp::Eq, Resolved::Scalar(a), Resolved::Scalar(b)) => {
            Ok(values_equal(&a, &b, ci))
        }
        (CompareOp::Ne, Resolved::Scalar(a), Resolved::Scalar(b)) => {
            Ok(!values_equal(&a, &b, ci))
        }

        (
            op @ (CompareOp::Lt | CompareOp::Le | CompareOp::Gt | CompareOp::Ge),
            Resolved::Scalar(a),
            Resolved::Scalar(b),
        ) => {
            let Some(ord) = order(op, &a, &b, ci)? else {
                return Ok(false);
            };
            Ok(match op {
                CompareOp::Lt => ord == Ordering::Less,
                CompareOp::Le => ord != Ordering::Greater,
                CompareOp::Gt => ord == Ordering::Greater,
                _ => ord != Ordering::Less,
            })
        }

        (CompareOp::In, Resolved::Scalar(a), Resolved::List(candidates)) => {
            Ok(candidates.iter().any(|b| values_equal(&a, b, ci)))
        }
        (
            CompareOp::In,
            Resolved::Scalar(Value::Text(needle)),
            Resolved::Scalar(Value::Text(hay)),
        ) => Ok(text_op(&hay, &needle, ci, |h, n| h.contains(n))),
        (CompareOp::In, Resolved::Scalar(_), Resolved::Scalar(Value::Null))
        | (CompareOp::In, Resolved::Scalar(Value::Null), Resolved::Scalar(Value::Text(_))) => {
            Ok(false)
        }

        (CompareOp::Contains, Resolved::List(items), Resolved::Scalar(b)) => {
            Ok(items.iter().any(|a| values_equal(a, &b, ci)))
        }

        (
            op @ (CompareOp::Contains
            | CompareOp::BeginsWith
            | CompareOp::EndsWith
            | CompareOp::Like),
            Resolved::Scalar(a),
            Resolved::Scalar(b),
        ) => match (&a, &b) {
            (Value::Null, _) | (_, Value::Null) => Ok(false),
            (Value::Text(hay), Value::Text(needle)) => Ok(match op {
                CompareOp::Contains => text_op(hay, needle, ci, |h, n| h.contains(n)),
                CompareOp::BeginsWith => text_op(hay, needle, ci, |h, n| h.starts_with(n)),
                CompareOp::EndsWith => text_op(hay, needle, ci, |h, n| h.ends_with(n)),
                _ => text_op(hay, needle, ci, like),
            }),
            _ => Err(mismatch(op, &a, &b)),
        },

        (CompareOp::Between, Resolved::Scalar(a), Resolved::List(bounds)) => {
            let [low, high] = bounds.as_slice() else {
                return Ok(false);
            };
            let above = order(CompareOp::Ge, &a, low, ci)?
                .is_some_and(|o| o != Ordering::Less);
            let below = order(CompareOp::Le, &a, high, ci)?
                .is_some_and(|o| o != Ordering::Greater);
            Ok(above && below)
        }

        (op, lhs, rhs) => Err(EvalError::TypeMismatch {
            op: op.to_string(),
            left: resolved_type(&lhs),
            right: resolved_type(&rhs),
        }),
    }
}

fn resolved_type(r: &Resolved) -> &'static str {
    match r {
        Resolved::Scalar(v) => v.type_name(),
        Resolved::List(_) => "list",
    }
}

fn mismatch(op: CompareOp, a: &Value, b: &Value) -> EvalError {
    EvalError::TypeMismatch {
        op: op.to_string(),
        left: a.type_name(),
        right: b.type_name(),
    }
}

/// Equality with numeric widening. Values of unrelated types are simply
/// unequal, which keeps `==` total.
fn values_equal(a: &Value, b: &Value, case_insensitive: bool) -> bool {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            a.as_f64() == b.as_f64()
        }
        (Value::Text(x), Value::Text(y)) if case_insensitive => {
            x.to_lowercase() == y.to_lowercase()
        }
        _ => a == b,
    }
}

/// Ordering between two values. `Ok(None)` means the comparison is false
/// regardless of direction (nil operand, NaN).
fn order(
    op: CompareOp,
    a: &Value,
    b: &Value,
    case_insensitive: bool,
) -> Result<Option<Ordering>, EvalError> {
    let ord = match (a, b) {
        (Value::Null, _) | (_, Value::Null) => None,
        (Value::Int(x), Value::Int(y)) => Some(x.cmp(y)),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            a.as_f64().zip(b.as_f64()).and_then(|(x, y)| x.partial_cmp(&y))
        }
        (Value::Text(x), Value::Text(y)) if case_insensitive => {
            Some(x.to_lowercase().cmp(&y.to_lowercase()))
        }
        (Value::Text(x), Value::Text(y)) => Some(x.cmp(y)),
        (Value::Timestamp(x), Value::Timestamp(y)) => Some(x.cmp(y)),
        _ => return Err(mismatch(op, a, b)),
    };
    Ok(ord)
}

fn text_op(hay: &str, needle: &str, case_insensitive: bool, f: fn(&str, &str) -> bool) -> bool {
    if case_insensitive {
        f(&hay.to_lowercase(), &needle.to_lowercase())
    } else {
        f(hay, needle)
    }
}

/// `LIKE` matching: `*` matches any run of characters, `?` exactly one.
fn like(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();
    let (mut t, mut p) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == text[t]) {
            t += 1;
            p += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            star = Some((p, t));
            p += 1;
        } else if let Some((sp, st)) = star {
            p = sp + 1;
            t = st + 1;
            star = Some((sp, st + 1));
        } else {
            return false;
        }
    }
    while p < pattern.len() && pattern[p] == '*' {
        p += 1;
    }
    p == pattern.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::parse;
    use crate::record::FieldMap;
    use chrono::{TimeZone, Utc};

    fn palette() -> FieldMap {
        let mut row = FieldMap::new();
        row.insert("color_name".into(), Value::from("Crimson"));
        row.insert("hue".into(), Value::Int(350));
        row.insert("saturation".into(), Value::Float(0.8));
        row.insert("nickname".into(), Value::Null);
        row.insert(
            "date_added".into(),
            Value::Timestamp(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()),
        );
        row
    }

    fn check(format: &str, args: &[Value]) -> Result<bool, EvalError> {
        let expr = parse(format, args).expect("format should parse");
        eval(&expr, &palette())
    }

    #[test]
    fn equality_with_numeric_widening() {
        assert!(check("hue == 350", &[]).unwrap());
        assert!(check("hue == 350.0", &[]).unwrap());
        assert!(check("saturation != %@", &[Value::Int(1)]).unwrap());
    }

    #[test]
    fn nil_matches_null_and_missing_fields() {
        assert!(check("nickname == nil", &[]).unwrap());
        assert!(check("no_such_field == nil", &[]).unwrap());
        assert!(!check("color_name == nil", &[]).unwrap());
    }

    #[test]
    fn ordering_against_nil_is_false_both_ways() {
        assert!(!check("nickname < 3", &[]).unwrap());
        assert!(!check("nickname >= 3", &[]).unwrap());
    }

    #[test]
    fn ordering_on_text_and_timestamps() {
        assert!(check("color_name > 'Blue'", &[]).unwrap());
        let cutoff = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert!(check("date_added > %@", &[cutoff.into()]).unwrap());
    }

    #[test]
    fn ordering_between_unrelated_types_fails() {
        assert_eq!(
            check("color_name < 3", &[]),
            Err(EvalError::TypeMismatch {
                op: "<".into(),
                left: "text",
                right: "int",
            })
        );
    }

    #[test]
    fn membership() {
        assert!(check("hue IN {10, 350}", &[]).unwrap());
        assert!(!check("hue IN {}", &[]).unwrap());
        assert!(check("color_name IN[c] {'crimson'}", &[]).unwrap());
        assert!(check("'rim' IN color_name", &[]).unwrap());
    }

    #[test]
    fn substring_membership_with_nil_is_false() {
        assert!(!check("nickname IN 'abc'", &[]).unwrap());
        assert!(!check("no_such_field IN 'abc'", &[]).unwrap());
        assert!(!check("'x' IN nickname", &[]).unwrap());
    }

    #[test]
    fn string_operators() {
        assert!(check("color_name BEGINSWITH 'Cri'", &[]).unwrap());
        assert!(check("color_name ENDSWITH[c] 'SON'", &[]).unwrap());
        assert!(check("color_name CONTAINS 'ms'", &[]).unwrap());
        assert!(check("color_name LIKE 'C*s?n'", &[]).unwrap());
        assert!(!check("color_name LIKE 'C?s*'", &[]).unwrap());
        assert!(!check("nickname CONTAINS 'x'", &[]).unwrap());
    }

    #[test]
    fn between_is_inclusive() {
        assert!(check("hue BETWEEN {300, 350}", &[]).unwrap());
        assert!(!check("hue BETWEEN {0, 349}", &[]).unwrap());
    }

    #[test]
    fn short_circuit_skips_failing_operand() {
        assert!(!check("hue < 0 AND color_name < 3", &[]).unwrap());
        assert!(check("hue > 0 OR color_name < 3", &[]).unwrap());
    }

    #[test]
    fn like_patterns() {
        assert!(like("", "*"));
        assert!(like("abc", "a*c"));
        assert!(like("abc", "???"));
        assert!(!like("abc", "??"));
        assert!(like("aXbXc", "*X*c"));
    }
}
