use super::lexer::is_reserved;
use crate::key_path::KeyPath;
use crate::value::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    In,
    Contains,
    BeginsWith,
    EndsWith,
    Like,
    Between,
}

impl CompareOp {
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::In => "IN",
            CompareOp::Contains => "CONTAINS",
            CompareOp::BeginsWith => "BEGINSWITH",
            CompareOp::EndsWith => "ENDSWITH",
            CompareOp::Like => "LIKE",
            CompareOp::Between => "BETWEEN",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operand {
    KeyPath(KeyPath),
    Literal(Value),
    List(Vec<Operand>),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::KeyPath(kp) => fmt_key_path(f, kp),
            Operand::Literal(v) => write!(f, "{}", v),
            Operand::List(items) => {
                write!(f, "{{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// Writes a key path in predicate syntax, with a `#` in front of keywords.
///
/// Paths that are not identifiers at all (`"1st"`, `"hue value"`) have no
/// escape and will not read back.
pub(crate) fn fmt_key_path(f: &mut fmt::Formatter<'_>, key_path: &KeyPath) -> fmt::Result {
    if is_reserved(key_path.as_str()) {
        f.write_str("#")?;
    }
    write!(f, "{}", key_path)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Comparison {
    pub lhs: Operand,
    pub op: CompareOp,
    pub rhs: Operand,
    pub case_insensitive: bool,
}

impl Comparison {
    pub fn new(lhs: Operand, op: CompareOp, rhs: Operand) -> Self {
        Self {
            lhs,
            op,
            rhs,
            case_insensitive: false,
        }
    }
}

/// Executable predicate produced by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Const(bool),
    Compare(Comparison),
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Not(Box<Expr>),
}

impl Expr {
    fn is_compound(&self) -> bool {
        matches!(self, Expr::And(_) | Expr::Or(_) | Expr::Not(_))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Const(true) => write!(f, "TRUEPREDICATE"),
            Expr::Const(false) => write!(f, "FALSEPREDICATE"),
            Expr::Compare(c) => {
                write!(f, "{} {}", c.lhs, c.op)?;
                if c.case_insensitive {
                    write!(f, "[c]")?;
                }
                write!(f, " {}", c.rhs)
            }
            Expr::And(parts) => write_joined(f, parts, "AND"),
            Expr::Or(parts) => write_joined(f, parts, "OR"),
            Expr::Not(inner) => write!(f, "NOT ({})", inner),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, parts: &[Expr], word: &str) -> fmt::Result {
    match parts {
        [] if word == "AND" => write!(f, "TRUEPREDICATE"),
        [] => write!(f, "FALSEPREDICATE"),
        [single] => write!(f, "{}", single),
        _ => {
            for (i, part) in parts.iter().enumerate() {
                if i > 0 {
                    write!(f, " {} ", word)?;
                }
                if part.is_compound() {
                    write!(f, "({})", part)?;
                } else {
                    write!(f, "{}", part)?;
                }
            }
            Ok(())
        }
    }
}
