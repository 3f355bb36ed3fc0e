use super::{ApplyOutcome, Clause};
use crate::engine::{self, CompareOp, Comparison, Expr, FormatError, Operand};
use crate::error::Result;
use crate::key_path::KeyPath;
use crate::record::Record;
use crate::request::FetchRequest;
use crate::value::Value;
use std::fmt;
use std::ops::{BitAnd, BitOr, Not};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    And,
    Or,
    Not,
}

/// The tagged union behind a [`Where`] clause.
///
/// Nothing here is evaluated or validated; it records exactly what the
/// caller asked for so that equality and hashing follow construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Predicate {
    Literal(bool),
    Format {
        format: String,
        args: Vec<Value>,
    },
    /// `value == None` means "the field is unset".
    Equality {
        key_path: KeyPath,
        value: Option<Value>,
    },
    Membership {
        key_path: KeyPath,
        candidates: Vec<Value>,
    },
    /// `Not` always has exactly one operand.
    Compound {
        op: LogicalOp,
        operands: Vec<Where>,
    },
}

/// A filter clause for fetch, query and delete requests.
///
/// ```
/// use wherekit::{Value, Where};
///
/// let warm = Where::format("hue < %d OR hue >= %d", vec![Value::Int(60), Value::Int(300)]);
/// let named = Where::eq("color_name", Some("Crimson"));
/// let clause = warm & !named;
/// assert_eq!(
///     clause.to_string(),
///     r#"(hue < 60 OR hue >= 300) AND (NOT (color_name == "Crimson"))"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Where {
    predicate: Predicate,
}

impl Where {
    /// The always-true clause, the neutral element of `and`.
    pub fn all() -> Self {
        Self::constant(true)
    }

    pub fn constant(value: bool) -> Self {
        Self {
            predicate: Predicate::Literal(value),
        }
    }

    /// A clause in the engine's predicate syntax with typed positional
    /// arguments. Nothing is checked here; see [`crate::engine`] for the
    /// syntax and substitution rules.
    pub fn format(format: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            predicate: Predicate::Format {
                format: format.into(),
                args,
            },
        }
    }

    /// Equality against a key path. A nil value (`None`, `Value::Null`)
    /// produces the "key path is unset" test instead.
    pub fn eq(key_path: impl Into<KeyPath>, value: impl Into<Value>) -> Self {
        let value = value.into();
        Self {
            predicate: Predicate::Equality {
                key_path: key_path.into(),
                value: (!value.is_nil()).then_some(value),
            },
        }
    }

    /// Membership of a key path's value in an ordered set of candidates.
    pub fn is_in<I, V>(key_path: impl Into<KeyPath>, candidates: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            predicate: Predicate::Membership {
                key_path: key_path.into(),
                candidates: candidates.into_iter().map(Into::into).collect(),
            },
        }
    }

    pub fn and(self, other: Where) -> Self {
        Self::compound(LogicalOp::And, vec![self, other])
    }

    pub fn or(self, other: Where) -> Self {
        Self::compound(LogicalOp::Or, vec![self, other])
    }

    /// Conjunction of any number of clauses; true when empty.
    pub fn all_of(clauses: impl IntoIterator<Item = Where>) -> Self {
        Self::compound(LogicalOp::And, clauses.into_iter().collect())
    }

    /// Disjunction of any number of clauses; false when empty.
    pub fn any_of(clauses: impl IntoIterator<Item = Where>) -> Self {
        Self::compound(LogicalOp::Or, clauses.into_iter().collect())
    }

    fn compound(op: LogicalOp, operands: Vec<Where>) -> Self {
        Self {
            predicate: Predicate::Compound { op, operands },
        }
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    /// Hand the clause to the engine. Format strings are parsed and their
    /// arguments substituted here, so this is where they can fail.
    ///
    /// Compounds nested deeper than [`engine::MAX_DEPTH`] are rejected with
    /// [`FormatError::TooDeep`].
    pub fn compile(&self) -> Result<Expr> {
        self.compile_at(0)
    }

    fn compile_at(&self, depth: usize) -> Result<Expr> {
        let expr = match &self.predicate {
            Predicate::Literal(b) => Expr::Const(*b),
            Predicate::Format { format, args } => engine::parse(format, args)?,
            Predicate::Equality { key_path, value } => Expr::Compare(Comparison::new(
                Operand::KeyPath(key_path.clone()),
                CompareOp::Eq,
                Operand::Literal(value.clone().unwrap_or(Value::Null)),
            )),
            Predicate::Membership {
                key_path,
                candidates,
            } => Expr::Compare(Comparison::new(
                Operand::KeyPath(key_path.clone()),
                CompareOp::In,
                Operand::List(candidates.iter().cloned().map(Operand::Literal).collect()),
            )),
            Predicate::Compound { op, operands } => {
                if depth >= engine::MAX_DEPTH {
                    return Err(FormatError::TooDeep {
                        limit: engine::MAX_DEPTH,
                    }
                    .into());
                }
                let compiled = operands
                    .iter()
                    .map(|operand| operand.compile_at(depth + 1))
                    .collect::<Result<Vec<_>>>()?;
                match op {
                    LogicalOp::And => Expr::And(compiled),
                    LogicalOp::Or => Expr::Or(compiled),
                    LogicalOp::Not => Expr::Not(Box::new(
                        compiled.into_iter().next().unwrap_or(Expr::Const(true)),
                    )),
                }
            }
        };
        Ok(expr)
    }

    /// Compile and evaluate against a single record.
    ///
    /// Stores compile once per request instead; this is for one-off checks.
    pub fn evaluate<R: Record + ?Sized>(&self, record: &R) -> Result<bool> {
        let expr = self.compile()?;
        Ok(engine::eval(&expr, record)?)
    }

    fn needs_parens(&self) -> bool {
        matches!(
            self.predicate,
            Predicate::Format { .. } | Predicate::Compound { .. }
        )
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.needs_parens() {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

impl Default for Where {
    fn default() -> Self {
        Self::all()
    }
}

impl From<bool> for Where {
    fn from(value: bool) -> Self {
        Self::constant(value)
    }
}

impl Clause for Where {
    fn apply_to(&self, request: &mut FetchRequest) -> ApplyOutcome {
        match request.predicate().cloned() {
            Some(previous) if previous != *self => {
                tracing::warn!(
                    entity = request.entity(),
                    kind = %request.kind(),
                    previous = %previous,
                    replacement = %self,
                    "Existing predicate overwritten by Where clause"
                );
                request.set_predicate(Some(self.clone()));
                ApplyOutcome::ReplacedPredicate { previous }
            }
            _ => {
                request.set_predicate(Some(self.clone()));
                ApplyOutcome::Applied
            }
        }
    }
}

impl BitAnd for Where {
    type Output = Where;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.and(rhs)
    }
}

impl BitAnd for &Where {
    type Output = Where;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.clone().and(rhs.clone())
    }
}

impl BitOr for Where {
    type Output = Where;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.or(rhs)
    }
}

impl BitOr for &Where {
    type Output = Where;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.clone().or(rhs.clone())
    }
}

impl Not for Where {
    type Output = Where;

    fn not(self) -> Self::Output {
        Where::compound(LogicalOp::Not, vec![self])
    }
}

impl Not for &Where {
    type Output = Where;

    fn not(self) -> Self::Output {
        !self.clone()
    }
}

/// Renders the clause in predicate syntax, which [`engine::parse`] reads back
/// to an equivalent expression. Non-finite floats and key paths that are not
/// identifiers are the exceptions; see [`Value`]'s `Display`.
impl fmt::Display for Where {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.predicate {
            Predicate::Literal(true) => write!(f, "TRUEPREDICATE"),
            Predicate::Literal(false) => write!(f, "FALSEPREDICATE"),
            // Unparseable formats render verbatim; the error surfaces on compile.
            Predicate::Format { format, args } => match engine::parse(format, args) {
                Ok(expr) => write!(f, "{}", expr),
                Err(_) => write!(f, "{}", format),
            },
            Predicate::Equality { key_path, value } => {
                engine::fmt_key_path(f, key_path)?;
                match value {
                    Some(v) => write!(f, " == {}", v),
                    None => write!(f, " == nil"),
                }
            }
            Predicate::Membership {
                key_path,
                candidates,
            } => {
                engine::fmt_key_path(f, key_path)?;
                write!(f, " IN {{")?;
                for (i, c) in candidates.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", c)?;
                }
                write!(f, "}}")
            }
            Predicate::Compound { op, operands } => match (op, operands.as_slice()) {
                (LogicalOp::Not, [inner]) => write!(f, "NOT ({})", inner),
                (LogicalOp::And, []) | (LogicalOp::Not, _) => write!(f, "TRUEPREDICATE"),
                (LogicalOp::Or, []) => write!(f, "FALSEPREDICATE"),
                (LogicalOp::And | LogicalOp::Or, [single]) => write!(f, "{}", single),
                (_, parts) => {
                    let word = if *op == LogicalOp::And { "AND" } else { "OR" };
                    for (i, part) in parts.iter().enumerate() {
                        if i > 0 {
                            write!(f, " {} ", word)?;
                        }
                        part.fmt_operand(f)?;
                    }
                    Ok(())
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WherekitError;
    use crate::record::FieldMap;
    use crate::request::RequestKind;
    use crate::test_utils::count_warnings;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of(w: &Where) -> u64 {
        let mut h = DefaultHasher::new();
        w.hash(&mut h);
        h.finish()
    }

    fn row(pairs: &[(&str, Value)]) -> FieldMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn literals_evaluate_to_themselves() {
        let empty = FieldMap::new();
        assert!(Where::all().evaluate(&empty).unwrap());
        assert!(Where::constant(true).evaluate(&empty).unwrap());
        assert!(!Where::constant(false).evaluate(&empty).unwrap());
        assert_eq!(Where::default(), Where::from(true));
    }

    #[test]
    fn equality_with_value_requires_exact_match() {
        let clause = Where::eq("color_name", "Teal");
        assert!(clause
            .evaluate(&row(&[("color_name", "Teal".into())]))
            .unwrap());
        assert!(!clause
            .evaluate(&row(&[("color_name", "teal".into())]))
            .unwrap());
        assert!(!clause.evaluate(&FieldMap::new()).unwrap());
    }

    #[test]
    fn equality_without_value_requires_unset_field() {
        let clause = Where::eq("nickname", None::<String>);
        assert_eq!(
            clause.predicate(),
            &Predicate::Equality {
                key_path: "nickname".into(),
                value: None
            }
        );
        assert_eq!(clause.to_string(), "nickname == nil");
        assert!(clause.evaluate(&FieldMap::new()).unwrap());
        assert!(clause
            .evaluate(&row(&[("nickname", Value::Null)]))
            .unwrap());
        assert!(!clause
            .evaluate(&row(&[("nickname", "Rusty".into())]))
            .unwrap());
    }

    #[test]
    fn explicit_null_is_the_same_as_absent() {
        assert_eq!(
            Where::eq("nickname", Value::Null),
            Where::eq("nickname", None::<i64>)
        );
    }

    #[test]
    fn membership_tests_candidates() {
        let clause = Where::is_in("hue", [0, 120, 240]);
        assert!(clause.evaluate(&row(&[("hue", Value::Int(120))])).unwrap());
        assert!(!clause.evaluate(&row(&[("hue", Value::Int(121))])).unwrap());
        assert_eq!(clause.to_string(), "hue IN {0, 120, 240}");
    }

    #[test]
    fn membership_in_empty_collection_is_false() {
        let clause = Where::is_in("hue", Vec::<i64>::new());
        assert!(!clause.evaluate(&row(&[("hue", Value::Int(1))])).unwrap());
        assert!(!clause.evaluate(&FieldMap::new()).unwrap());
    }

    #[test]
    fn membership_accepts_any_ordered_collection() {
        let from_vec = Where::is_in("name", vec!["a", "b"]);
        let from_iter = Where::is_in("name", ["a", "b"].iter().copied());
        assert_eq!(from_vec, from_iter);
    }

    #[test]
    fn format_is_not_validated_at_construction() {
        let clause = Where::format("hue >>> %d", vec![]);
        assert_eq!(clause.to_string(), "hue >>> %d");
        assert!(matches!(
            clause.evaluate(&FieldMap::new()),
            Err(WherekitError::Format(_))
        ));
    }

    #[test]
    fn format_substitutes_arguments() {
        let clause = Where::format(
            "%K BETWEEN {%d, %d}",
            vec!["hue".into(), Value::Int(100), Value::Int(200)],
        );
        assert_eq!(clause.to_string(), "hue BETWEEN {100, 200}");
        assert!(clause.evaluate(&row(&[("hue", Value::Int(150))])).unwrap());
    }

    #[test]
    fn combinators_build_compound_predicates() {
        let a = Where::eq("a", 1);
        let b = Where::eq("b", 2);
        assert_eq!(
            (a.clone() & b.clone()).predicate(),
            &Predicate::Compound {
                op: LogicalOp::And,
                operands: vec![a.clone(), b.clone()]
            }
        );
        assert_eq!(super::super::and(a.clone(), b.clone()), &a & &b);
        assert_eq!(super::super::or(a.clone(), b.clone()), a.clone() | b.clone());
        assert_eq!(super::super::not(a.clone()), !&a);
    }

    #[test]
    fn combinators_evaluate_logically() {
        let r = row(&[("a", Value::Int(1)), ("b", Value::Int(3))]);
        let a = Where::eq("a", 1);
        let b = Where::eq("b", 2);
        assert!(!(a.clone() & b.clone()).evaluate(&r).unwrap());
        assert!((a.clone() | b.clone()).evaluate(&r).unwrap());
        assert!((!b).evaluate(&r).unwrap());
        assert!(!(!a).evaluate(&r).unwrap());
    }

    #[test]
    fn all_of_and_any_of_identities() {
        let empty = FieldMap::new();
        assert!(Where::all_of([]).evaluate(&empty).unwrap());
        assert!(!Where::any_of([]).evaluate(&empty).unwrap());
        assert_eq!(Where::all_of([]).to_string(), "TRUEPREDICATE");
        assert_eq!(Where::any_of([]).to_string(), "FALSEPREDICATE");
    }

    #[test]
    fn display_parenthesizes_nested_operands() {
        let clause = (Where::eq("a", 1) | Where::eq("b", 2)) & Where::eq("c", 3);
        assert_eq!(clause.to_string(), "(a == 1 OR b == 2) AND c == 3");
    }

    #[test]
    fn rendered_clause_reparses_to_same_expression() {
        let clause = (Where::eq("a", "x") | !Where::is_in("b", [1, 2])) & Where::constant(true);
        let reparsed = engine::parse(&clause.to_string(), &[]).unwrap();
        assert_eq!(clause.compile().unwrap(), reparsed);
    }

    #[test]
    fn deeply_nested_compounds_fail_to_compile() {
        let mut clause = Where::eq("a", 1);
        for _ in 0..engine::MAX_DEPTH {
            clause = !clause;
        }
        assert!(clause.compile().is_ok());

        let too_deep = !clause;
        assert!(matches!(
            too_deep.evaluate(&FieldMap::new()),
            Err(WherekitError::Format(FormatError::TooDeep { .. }))
        ));
    }

    #[test]
    fn keyword_key_paths_render_escaped() {
        let clause = Where::eq("in", 1) & Where::is_in("größe", [2.5]);
        assert_eq!(clause.to_string(), "#in == 1 AND größe IN {2.5}");
        let reparsed = engine::parse(&clause.to_string(), &[]).unwrap();
        assert_eq!(clause.compile().unwrap(), reparsed);
    }

    #[test]
    fn identical_arguments_are_equal_and_hash_identically() {
        let a = Where::format("hue > %f", vec![Value::Float(0.5)]);
        let b = Where::format("hue > %f", vec![Value::Float(0.5)]);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));

        let c = Where::is_in("x", [1, 2]) & Where::eq("y", None::<i32>);
        let d = Where::is_in("x", [1, 2]) & Where::eq("y", None::<i32>);
        assert_eq!(c, d);
        assert_eq!(hash_of(&c), hash_of(&d));
    }

    #[test]
    fn different_arguments_are_not_equal() {
        assert_ne!(Where::eq("hue", 1), Where::eq("hue", 2));
        assert_ne!(Where::eq("hue", 1), Where::eq("sat", 1));
        assert_ne!(Where::is_in("x", [1, 2]), Where::is_in("x", [2, 1]));
        assert_ne!(
            Where::eq("a", 1) & Where::eq("b", 1),
            Where::eq("a", 1) | Where::eq("b", 1)
        );
        assert_ne!(Where::constant(true), Where::constant(false));
    }

    #[test]
    fn applying_to_empty_request_emits_nothing() {
        let mut request = FetchRequest::new("Palette", RequestKind::Fetch);
        let warnings = count_warnings(|| {
            assert_eq!(request.apply(&Where::eq("hue", 1)), ApplyOutcome::Applied);
        });
        assert_eq!(warnings, 0);
        assert_eq!(request.predicate(), Some(&Where::eq("hue", 1)));
    }

    #[test]
    fn applying_over_existing_predicate_replaces_and_warns_once() {
        let mut request = FetchRequest::new("Palette", RequestKind::Delete);
        request.set_predicate(Some(Where::eq("hue", 1)));

        let mut outcome = ApplyOutcome::Applied;
        let warnings = count_warnings(|| {
            outcome = request.apply(&Where::eq("hue", 2));
        });

        assert_eq!(warnings, 1);
        assert_eq!(
            outcome,
            ApplyOutcome::ReplacedPredicate {
                previous: Where::eq("hue", 1)
            }
        );
        assert!(outcome.describe().unwrap().contains("hue == 1"));
        assert_eq!(request.predicate(), Some(&Where::eq("hue", 2)));
    }

    #[test]
    fn reapplying_identical_predicate_is_silent() {
        let mut request = FetchRequest::new("Palette", RequestKind::Fetch);
        request.set_predicate(Some(Where::eq("hue", 1)));
        let warnings = count_warnings(|| {
            assert!(!request.apply(&Where::eq("hue", 1)).is_replaced());
        });
        assert_eq!(warnings, 0);
    }
}
