use super::error::FormatError;
use super::expr::{CompareOp, Comparison, Expr, Operand};
use super::lexer::{tokenize, Keyword, Placeholder, Token, TokenKind};
use crate::key_path::KeyPath;
use crate::value::Value;

/// Deepest nesting of `NOT`, parentheses and lists a predicate may have.
/// Parsing, compiling and evaluating all recurse along that nesting.
pub const MAX_DEPTH: usize = 256;

/// Parse a format string, substituting `args` into its placeholders from left
/// to right.
///
/// Every argument must be consumed: a format with fewer placeholders than
/// arguments is rejected just like one with more.
pub fn parse(format: &str, args: &[Value]) -> Result<Expr, FormatError> {
    let tokens = tokenize(format)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        args,
        next_arg: 0,
        depth: 0,
    };

    let expr = parser.parse_or()?;
    if let Some(tok) = parser.peek() {
        return Err(FormatError::UnexpectedToken {
            pos: tok.pos,
            expected: "end of format",
            found: tok.kind.to_string(),
        });
    }
    if parser.next_arg != args.len() {
        return Err(FormatError::ExtraArguments {
            consumed: parser.next_arg,
            supplied: args.len(),
        });
    }
    Ok(expr)
}

struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    args: &'a [Value],
    next_arg: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn next_or_end(&mut self, expected: &'static str) -> Result<Token, FormatError> {
        self.advance()
            .ok_or(FormatError::UnexpectedEnd { expected })
    }

    fn descend(&mut self) -> Result<(), FormatError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(FormatError::TooDeep { limit: MAX_DEPTH });
        }
        Ok(())
    }

    fn at(&self, pred: impl Fn(&TokenKind) -> bool) -> bool {
        self.peek().is_some_and(|t| pred(&t.kind))
    }

    fn parse_or(&mut self) -> Result<Expr, FormatError> {
        let mut parts = vec![self.parse_and()?];
        while self.at(|k| matches!(k, TokenKind::Keyword(Keyword::Or) | TokenKind::OrSym)) {
            self.advance();
            parts.push(self.parse_and()?);
        }
        Ok(collapse(parts, Expr::Or))
    }

    fn parse_and(&mut self) -> Result<Expr, FormatError> {
        let mut parts = vec![self.parse_not()?];
        while self.at(|k| matches!(k, TokenKind::Keyword(Keyword::And) | TokenKind::AndSym)) {
            self.advance();
            parts.push(self.parse_not()?);
        }
        Ok(collapse(parts, Expr::And))
    }

    fn parse_not(&mut self) -> Result<Expr, FormatError> {
        if self.at(|k| matches!(k, TokenKind::Keyword(Keyword::Not) | TokenKind::Bang)) {
            self.advance();
            self.descend()?;
            let inner = self.parse_not()?;
            self.depth -= 1;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, FormatError> {
        let Some(tok) = self.peek() else {
            return Err(FormatError::UnexpectedEnd {
                expected: "predicate",
            });
        };

        match tok.kind.clone() {
            TokenKind::LParen => {
                self.advance();
                self.descend()?;
                let inner = self.parse_or()?;
                self.expect_close(TokenKind::RParen, "')'")?;
                self.depth -= 1;
                Ok(inner)
            }
            TokenKind::Keyword(Keyword::TruePredicate) => {
                self.advance();
                Ok(Expr::Const(true))
            }
            TokenKind::Keyword(Keyword::FalsePredicate) => {
                self.advance();
                Ok(Expr::Const(false))
            }
            _ => self.parse_comparison(),
        }
    }

    fn parse_comparison(&mut self) -> Result<Expr, FormatError> {
        let lhs = self.parse_operand()?;

        let tok = self.next_or_end("comparison operator")?;
        let op = match tok.kind {
            TokenKind::Compare(op) => op,
            TokenKind::Keyword(Keyword::In) => CompareOp::In,
            TokenKind::Keyword(Keyword::Contains) => CompareOp::Contains,
            TokenKind::Keyword(Keyword::BeginsWith) => CompareOp::BeginsWith,
            TokenKind::Keyword(Keyword::EndsWith) => CompareOp::EndsWith,
            TokenKind::Keyword(Keyword::Like) => CompareOp::Like,
            TokenKind::Keyword(Keyword::Between) => CompareOp::Between,
            other => {
                return Err(FormatError::UnexpectedToken {
                    pos: tok.pos,
                    expected: "comparison operator",
                    found: other.to_string(),
                })
            }
        };

        let mut case_insensitive = false;
        if let Some(Token {
            kind: TokenKind::Options(options),
            pos,
        }) = self.peek().cloned()
        {
            self.advance();
            for option in options.chars() {
                match option {
                    'c' | 'C' => case_insensitive = true,
                    _ => {
                        return Err(FormatError::UnknownOption {
                            pos,
                            option: options.clone(),
                        })
                    }
                }
            }
        }

        let rhs_pos = self.peek().map(|t| t.pos).unwrap_or_default();
        let rhs = self.parse_operand()?;
        if op == CompareOp::Between {
            match &rhs {
                Operand::List(bounds) if bounds.len() == 2 => {}
                Operand::List(bounds) => {
                    return Err(FormatError::BetweenBounds {
                        pos: rhs_pos,
                        count: bounds.len(),
                    })
                }
                _ => {
                    return Err(FormatError::BetweenBounds {
                        pos: rhs_pos,
                        count: 1,
                    })
                }
            }
        }

        Ok(Expr::Compare(Comparison {
            lhs,
            op,
            rhs,
            case_insensitive,
        }))
    }

    fn parse_operand(&mut self) -> Result<Operand, FormatError> {
        let tok = self.next_or_end("operand")?;
        match tok.kind {
            TokenKind::Ident(name) => Ok(Operand::KeyPath(KeyPath::new(name))),
            TokenKind::Int(n) => Ok(Operand::Literal(Value::Int(n))),
            TokenKind::Float(v) => Ok(Operand::Literal(Value::Float(v))),
            TokenKind::Str(s) => Ok(Operand::Literal(Value::Text(s))),
            TokenKind::Keyword(Keyword::True) => Ok(Operand::Literal(Value::Bool(true))),
            TokenKind::Keyword(Keyword::False) => Ok(Operand::Literal(Value::Bool(false))),
            TokenKind::Keyword(Keyword::Nil) => Ok(Operand::Literal(Value::Null)),
            TokenKind::Placeholder(p) => self.substitute(p, tok.pos),
            TokenKind::LBrace => self.parse_list(),
            other => Err(FormatError::UnexpectedToken {
                pos: tok.pos,
                expected: "operand",
                found: other.to_string(),
            }),
        }
    }

    fn parse_list(&mut self) -> Result<Operand, FormatError> {
        self.descend()?;
        let mut items = Vec::new();
        if self.at(|k| *k == TokenKind::RBrace) {
            self.advance();
            self.depth -= 1;
            return Ok(Operand::List(items));
        }
        loop {
            items.push(self.parse_operand()?);
            let tok = self.next_or_end("',' or '}'")?;
            match tok.kind {
                TokenKind::Comma => continue,
                TokenKind::RBrace => {
                    self.depth -= 1;
                    return Ok(Operand::List(items));
                }
                other => {
                    return Err(FormatError::UnexpectedToken {
                        pos: tok.pos,
                        expected: "',' or '}'",
                        found: other.to_string(),
                    })
                }
            }
        }
    }

    fn expect_close(&mut self, kind: TokenKind, expected: &'static str) -> Result<(), FormatError> {
        let tok = self.next_or_end(expected)?;
        if tok.kind == kind {
            Ok(())
        } else {
            Err(FormatError::UnexpectedToken {
                pos: tok.pos,
                expected,
                found: tok.kind.to_string(),
            })
        }
    }

    fn substitute(&mut self, placeholder: Placeholder, pos: usize) -> Result<Operand, FormatError> {
        let args = self.args;
        let index = self.next_arg;
        let arg = args.get(index).ok_or(FormatError::MissingArgument {
            pos,
            supplied: args.len(),
        })?;
        self.next_arg += 1;

        let mismatch = |expected: &'static str| FormatError::ArgumentType {
            index,
            conversion: placeholder.conversion(),
            expected,
            found: arg.type_name(),
        };

        match (placeholder, arg) {
            (Placeholder::Any, v) => Ok(Operand::Literal(v.clone())),
            (Placeholder::Key, Value::Text(path)) => Ok(Operand::KeyPath(KeyPath::new(path.clone()))),
            (Placeholder::Key, _) => Err(mismatch("a text key path")),
            (Placeholder::Int, Value::Int(_)) => Ok(Operand::Literal(arg.clone())),
            (Placeholder::Int, _) => Err(mismatch("an int")),
            (Placeholder::Number, Value::Int(_) | Value::Float(_)) => {
                Ok(Operand::Literal(arg.clone()))
            }
            (Placeholder::Number, _) => Err(mismatch("a number")),
        }
    }
}

fn collapse(mut parts: Vec<Expr>, wrap: fn(Vec<Expr>) -> Expr) -> Expr {
    if parts.len() == 1 {
        parts.remove(0)
    } else {
        wrap(parts)
    }
}
