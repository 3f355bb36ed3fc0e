use super::error::FormatError;
use super::expr::CompareOp;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Keyword {
    And,
    Or,
    Not,
    In,
    Contains,
    BeginsWith,
    EndsWith,
    Like,
    Between,
    TruePredicate,
    FalsePredicate,
    True,
    False,
    Nil,
}

impl Keyword {
    fn lookup(word: &str) -> Option<Self> {
        let kw = match word.to_ascii_uppercase().as_str() {
            "AND" => Keyword::And,
            "OR" => Keyword::Or,
            "NOT" => Keyword::Not,
            "IN" => Keyword::In,
            "CONTAINS" => Keyword::Contains,
            "BEGINSWITH" => Keyword::BeginsWith,
            "ENDSWITH" => Keyword::EndsWith,
            "LIKE" => Keyword::Like,
            "BETWEEN" => Keyword::Between,
            "TRUEPREDICATE" => Keyword::TruePredicate,
            "FALSEPREDICATE" => Keyword::FalsePredicate,
            "TRUE" | "YES" => Keyword::True,
            "FALSE" | "NO" => Keyword::False,
            "NIL" | "NULL" => Keyword::Nil,
            _ => return None,
        };
        Some(kw)
    }
}

/// Typed placeholder found in a format string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Placeholder {
    /// `%@`: any value, substituted as a literal.
    Any,
    /// `%K`: a key path, argument must be text.
    Key,
    /// `%d`, `%i`, `%ld`, `%lld`: an integer.
    Int,
    /// `%f`, `%lf`, `%g`: a number.
    Number,
}

impl Placeholder {
    pub(crate) fn conversion(self) -> &'static str {
        match self {
            Placeholder::Any => "@",
            Placeholder::Key => "K",
            Placeholder::Int => "d",
            Placeholder::Number => "f",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Ident(String),
    Keyword(Keyword),
    Int(i64),
    Float(f64),
    Str(String),
    Placeholder(Placeholder),
    Compare(CompareOp),
    /// `[c]`-style comparison options, letters only.
    Options(String),
    AndSym,
    OrSym,
    Bang,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Ident(s) => write!(f, "'{}'", s),
            TokenKind::Keyword(k) => write!(f, "keyword {:?}", k),
            TokenKind::Int(n) => write!(f, "{}", n),
            TokenKind::Float(v) => write!(f, "{}", v),
            TokenKind::Str(s) => write!(f, "string {:?}", s),
            TokenKind::Placeholder(p) => write!(f, "'%{}'", p.conversion()),
            TokenKind::Compare(op) => write!(f, "'{}'", op),
            TokenKind::Options(o) => write!(f, "'[{}]'", o),
            TokenKind::AndSym => write!(f, "'&&'"),
            TokenKind::OrSym => write!(f, "'||'"),
            TokenKind::Bang => write!(f, "'!'"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::LBrace => write!(f, "'{{'"),
            TokenKind::RBrace => write!(f, "'}}'"),
            TokenKind::Comma => write!(f, "','"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub pos: usize,
}

pub(crate) fn tokenize(src: &str) -> Result<Vec<Token>, FormatError> {
    let bytes = src.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        let start = i;

        if c.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        let kind = match c {
            b'(' => single(&mut i, TokenKind::LParen),
            b')' => single(&mut i, TokenKind::RParen),
            b'{' => single(&mut i, TokenKind::LBrace),
            b'}' => single(&mut i, TokenKind::RBrace),
            b',' => single(&mut i, TokenKind::Comma),
            b'&' if peek(bytes, i + 1) == Some(b'&') => {
                i += 2;
                TokenKind::AndSym
            }
            b'|' if peek(bytes, i + 1) == Some(b'|') => {
                i += 2;
                TokenKind::OrSym
            }
            b'!' if peek(bytes, i + 1) == Some(b'=') => {
                i += 2;
                TokenKind::Compare(CompareOp::Ne)
            }
            b'!' => single(&mut i, TokenKind::Bang),
            b'=' => {
                i += 1;
                match peek(bytes, i) {
                    Some(b'=') => {
                        i += 1;
                        TokenKind::Compare(CompareOp::Eq)
                    }
                    Some(b'<') => {
                        i += 1;
                        TokenKind::Compare(CompareOp::Le)
                    }
                    Some(b'>') => {
                        i += 1;
                        TokenKind::Compare(CompareOp::Ge)
                    }
                    _ => TokenKind::Compare(CompareOp::Eq),
                }
            }
            b'<' => {
                i += 1;
                match peek(bytes, i) {
                    Some(b'=') => {
                        i += 1;
                        TokenKind::Compare(CompareOp::Le)
                    }
                    Some(b'>') => {
                        i += 1;
                        TokenKind::Compare(CompareOp::Ne)
                    }
                    _ => TokenKind::Compare(CompareOp::Lt),
                }
            }
            b'>' => {
                i += 1;
                if peek(bytes, i) == Some(b'=') {
                    i += 1;
                    TokenKind::Compare(CompareOp::Ge)
                } else {
                    TokenKind::Compare(CompareOp::Gt)
                }
            }
            b'[' => lex_options(src, &mut i)?,
            b'%' => lex_placeholder(src, &mut i)?,
            b'\'' | b'"' => lex_string(src, &mut i)?,
            b'-' | b'0'..=b'9' => lex_number(src, &mut i)?,
            b'#' => lex_escaped_word(src, &mut i)?,
            _ if src[i..].chars().next().is_some_and(is_word_start) => lex_word(src, &mut i),
            _ => {
                let found = src[i..].chars().next().unwrap_or('?');
                return Err(FormatError::UnexpectedChar { pos: i, found });
            }
        };

        tokens.push(Token { kind, pos: start });
    }

    Ok(tokens)
}

fn peek(bytes: &[u8], i: usize) -> Option<u8> {
    bytes.get(i).copied()
}

fn single(i: &mut usize, kind: TokenKind) -> TokenKind {
    *i += 1;
    kind
}

/// Whether `word` lexes as a keyword and so needs a `#` to be read as a key path.
pub(crate) fn is_reserved(word: &str) -> bool {
    Keyword::lookup(word).is_some()
}

fn is_word_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn word_end(src: &str, start: usize) -> usize {
    src[start..]
        .char_indices()
        .find(|&(_, c)| !(c.is_alphanumeric() || c == '_' || c == '.'))
        .map_or(src.len(), |(offset, _)| start + offset)
}

fn lex_word(src: &str, i: &mut usize) -> TokenKind {
    let start = *i;
    *i = word_end(src, start);
    let word = &src[start..*i];
    match Keyword::lookup(word) {
        Some(kw) => TokenKind::Keyword(kw),
        None => TokenKind::Ident(word.to_string()),
    }
}

/// `#word` is always a key path, even when `word` is a keyword.
fn lex_escaped_word(src: &str, i: &mut usize) -> Result<TokenKind, FormatError> {
    let start = *i;
    match src[start + 1..].chars().next() {
        Some(c) if is_word_start(c) => {
            *i = word_end(src, start + 1);
            Ok(TokenKind::Ident(src[start + 1..*i].to_string()))
        }
        _ => Err(FormatError::UnexpectedChar {
            pos: start,
            found: '#',
        }),
    }
}

fn lex_number(src: &str, i: &mut usize) -> Result<TokenKind, FormatError> {
    let start = *i;
    let bytes = src.as_bytes();
    if bytes[*i] == b'-' {
        *i += 1;
        if !matches!(peek(bytes, *i), Some(b'0'..=b'9')) {
            return Err(FormatError::UnexpectedChar { pos: start, found: '-' });
        }
    }
    let mut is_float = false;
    while let Some(b) = peek(bytes, *i) {
        match b {
            b'0'..=b'9' => *i += 1,
            b'.' if !is_float => {
                is_float = true;
                *i += 1;
            }
            b'e' | b'E' => {
                is_float = true;
                *i += 1;
                if matches!(peek(bytes, *i), Some(b'+' | b'-')) {
                    *i += 1;
                }
            }
            _ => break,
        }
    }
    let text = &src[start..*i];
    let invalid = || FormatError::InvalidNumber {
        pos: start,
        text: text.to_string(),
    };
    if is_float {
        text.parse().map(TokenKind::Float).map_err(|_| invalid())
    } else {
        text.parse().map(TokenKind::Int).map_err(|_| invalid())
    }
}

fn lex_string(src: &str, i: &mut usize) -> Result<TokenKind, FormatError> {
    let start = *i;
    let quote = src.as_bytes()[start] as char;
    let mut out = String::new();
    let mut chars = src[start + 1..].char_indices();

    while let Some((offset, c)) = chars.next() {
        match c {
            c if c == quote => {
                *i = start + 1 + offset + c.len_utf8();
                return Ok(TokenKind::Str(out));
            }
            '\\' => match chars.next() {
                Some((_, 'n')) => out.push('\n'),
                Some((_, 't')) => out.push('\t'),
                Some((_, other)) => out.push(other),
                None => break,
            },
            c => out.push(c),
        }
    }

    Err(FormatError::UnterminatedString { pos: start })
}

fn lex_placeholder(src: &str, i: &mut usize) -> Result<TokenKind, FormatError> {
    let start = *i;
    let rest = &src[start + 1..];
    let conversions: [(&str, Placeholder); 9] = [
        ("lld", Placeholder::Int),
        ("ld", Placeholder::Int),
        ("lf", Placeholder::Number),
        ("@", Placeholder::Any),
        ("K", Placeholder::Key),
        ("d", Placeholder::Int),
        ("i", Placeholder::Int),
        ("f", Placeholder::Number),
        ("g", Placeholder::Number),
    ];

    for (conversion, placeholder) in conversions {
        if rest.starts_with(conversion) {
            *i = start + 1 + conversion.len();
            return Ok(TokenKind::Placeholder(placeholder));
        }
    }

    let conversion: String = rest.chars().take(1).collect();
    Err(FormatError::UnknownPlaceholder { pos: start, conversion })
}

fn lex_options(src: &str, i: &mut usize) -> Result<TokenKind, FormatError> {
    let start = *i;
    let Some(close) = src[start..].find(']') else {
        return Err(FormatError::UnexpectedChar {
            pos: start,
            found: '[',
        });
    };
    let option = &src[start + 1..start + close];
    if option.is_empty() || !option.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(FormatError::UnknownOption {
            pos: start,
            option: option.to_string(),
        });
    }
    *i = start + close + 1;
    Ok(TokenKind::Options(option.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_comparison_with_placeholder() {
        assert_eq!(
            kinds("hue >= %d"),
            vec![
                TokenKind::Ident("hue".into()),
                TokenKind::Compare(CompareOp::Ge),
                TokenKind::Placeholder(Placeholder::Int),
            ]
        );
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(
            kinds("a == nil and NOT b"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Compare(CompareOp::Eq),
                TokenKind::Keyword(Keyword::Nil),
                TokenKind::Keyword(Keyword::And),
                TokenKind::Keyword(Keyword::Not),
                TokenKind::Ident("b".into()),
            ]
        );
    }

    #[test]
    fn dotted_identifiers_stay_whole() {
        assert_eq!(kinds("owner.name"), vec![TokenKind::Ident("owner.name".into())]);
    }

    #[test]
    fn escaped_keywords_and_unicode_identifiers() {
        assert_eq!(
            kinds("#in == größe"),
            vec![
                TokenKind::Ident("in".into()),
                TokenKind::Compare(CompareOp::Eq),
                TokenKind::Ident("größe".into()),
            ]
        );
        assert_eq!(
            tokenize("a == # b"),
            Err(FormatError::UnexpectedChar { pos: 5, found: '#' })
        );
    }

    #[test]
    fn alternate_operator_spellings() {
        assert_eq!(
            kinds("= =< => <>"),
            vec![
                TokenKind::Compare(CompareOp::Eq),
                TokenKind::Compare(CompareOp::Le),
                TokenKind::Compare(CompareOp::Ge),
                TokenKind::Compare(CompareOp::Ne),
            ]
        );
    }

    #[test]
    fn string_escapes_and_placeholders_inside_strings() {
        assert_eq!(
            kinds(r#"'it\'s %@' "tab\there""#),
            vec![
                TokenKind::Str("it's %@".into()),
                TokenKind::Str("tab\there".into()),
            ]
        );
    }

    #[test]
    fn numbers() {
        assert_eq!(
            kinds("-12 3.5 1e3"),
            vec![
                TokenKind::Int(-12),
                TokenKind::Float(3.5),
                TokenKind::Float(1000.0),
            ]
        );
    }

    #[test]
    fn long_placeholder_forms() {
        assert_eq!(
            kinds("%lld %ld %lf %K %g"),
            vec![
                TokenKind::Placeholder(Placeholder::Int),
                TokenKind::Placeholder(Placeholder::Int),
                TokenKind::Placeholder(Placeholder::Number),
                TokenKind::Placeholder(Placeholder::Key),
                TokenKind::Placeholder(Placeholder::Number),
            ]
        );
    }

    #[test]
    fn unterminated_string_reports_start() {
        assert_eq!(
            tokenize("name == 'abc"),
            Err(FormatError::UnterminatedString { pos: 8 })
        );
    }

    #[test]
    fn unknown_placeholder_is_rejected() {
        assert_eq!(
            tokenize("a == %x"),
            Err(FormatError::UnknownPlaceholder {
                pos: 5,
                conversion: "x".into()
            })
        );
    }

    #[test]
    fn stray_character_is_rejected() {
        assert_eq!(
            tokenize("a # b"),
            Err(FormatError::UnexpectedChar { pos: 2, found: '#' })
        );
    }
}
