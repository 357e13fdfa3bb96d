//! Parser for the textual `calc` form.
//!
//! ```text
//! expr    := term (("+" | "-") term)*
//! term    := unary (("*" | "/") unary)*
//! unary   := "-" unary | primary
//! primary := NUMBER | IDENT | "(" expr ")"
//! ```
//!
//! Both the nesting of the input and the depth of the resulting tree are
//! capped, so evaluating or dropping a parsed expression never recurses
//! deeper than `max_depth`.

use std::fmt;

use thiserror::Error;

use crate::domain::model::{BinaryOp, Expression};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("empty expression")]
    Empty,

    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("unexpected {found} at offset {offset}")]
    UnexpectedToken { found: String, offset: usize },

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("invalid number literal '{0}'")]
    InvalidNumber(String),

    #[error("expression is nested deeper than {max} levels")]
    TooDeep { max: usize },
}

/// `[A-Za-z_][A-Za-z0-9_]*`
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Parse `src` into an expression tree no deeper than `max_depth`.
///
/// # Errors
/// Returns a [`ParseError`] describing the first problem found.
pub fn parse_expression(src: &str, max_depth: usize) -> Result<Expression, ParseError> {
    let tokens = tokenize(src)?;
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        max_depth,
        nesting: 0,
    };
    let node = parser.expr()?;

    match parser.tokens.get(parser.pos) {
        None => Ok(node.expr),
        Some(t) => Err(ParseError::UnexpectedToken {
            found: t.token.to_string(),
            offset: t.offset,
        }),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token<'a> {
    Number(f64),
    Ident(&'a str),
    Op(BinaryOp),
    LParen,
    RParen,
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "number {n}"),
            Self::Ident(name) => write!(f, "identifier '{name}'"),
            Self::Op(op) => write!(f, "operator '{}'", op.symbol()),
            Self::LParen => f.write_str("'('"),
            Self::RParen => f.write_str("')'"),
        }
    }
}

#[derive(Debug)]
struct Spanned<'a> {
    token: Token<'a>,
    offset: usize,
}

fn tokenize(src: &str) -> Result<Vec<Spanned<'_>>, ParseError> {
    let bytes = src.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while let Some(&b) = bytes.get(i) {
        let start = i;
        let token = match b {
            b' ' | b'\t' | b'\r' | b'\n' => {
                i += 1;
                continue;
            }
            b'+' | b'-' | b'*' | b'/' => {
                i += 1;
                let symbol = &src[start..i];
                let op = BinaryOp::from_symbol(symbol).ok_or(ParseError::UnexpectedChar {
                    ch: char::from(b),
                    offset: start,
                })?;
                Token::Op(op)
            }
            b'(' => {
                i += 1;
                Token::LParen
            }
            b')' => {
                i += 1;
                Token::RParen
            }
            b'0'..=b'9' => {
                i = scan_number(bytes, i);
                let text = &src[start..i];
                let value: f64 = text
                    .parse()
                    .map_err(|_| ParseError::InvalidNumber(text.to_owned()))?;
                if !value.is_finite() {
                    return Err(ParseError::InvalidNumber(text.to_owned()));
                }
                Token::Number(value)
            }
            b if b.is_ascii_alphabetic() || b == b'_' => {
                while bytes
                    .get(i)
                    .is_some_and(|c| c.is_ascii_alphanumeric() || *c == b'_')
                {
                    i += 1;
                }
                Token::Ident(&src[start..i])
            }
            _ => {
                let ch = src[start..].chars().next().unwrap_or(char::REPLACEMENT_CHARACTER);
                return Err(ParseError::UnexpectedChar { ch, offset: start });
            }
        };
        tokens.push(Spanned {
            token,
            offset: start,
        });
    }

    Ok(tokens)
}

/// Returns the end offset of the number literal starting at `start`.
///
/// A fraction or exponent is only consumed when digits follow it, so
/// `1.` or `2e` end the literal early and fail later in the parser.
fn scan_number(bytes: &[u8], start: usize) -> usize {
    let digits_from = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };
    let is_digit_at = |i: usize| bytes.get(i).is_some_and(u8::is_ascii_digit);

    let mut end = digits_from(start);

    if bytes.get(end) == Some(&b'.') && is_digit_at(end + 1) {
        end = digits_from(end + 1);
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        if is_digit_at(exp) {
            end = digits_from(exp);
        }
    }

    end
}

struct Node {
    expr: Expression,
    depth: usize,
}

struct Parser<'a> {
    tokens: Vec<Spanned<'a>>,
    pos: usize,
    max_depth: usize,
    nesting: usize,
}

impl Parser<'_> {
    fn expr(&mut self) -> Result<Node, ParseError> {
        let mut lhs = self.term()?;
        while let Some(op) = self.eat_op(&[BinaryOp::Add, BinaryOp::Sub]) {
            let rhs = self.term()?;
            lhs = self.combine(op, lhs, rhs)?;
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Node, ParseError> {
        let mut lhs = self.unary()?;
        while let Some(op) = self.eat_op(&[BinaryOp::Mul, BinaryOp::Div]) {
            let rhs = self.unary()?;
            lhs = self.combine(op, lhs, rhs)?;
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Node, ParseError> {
        if self.eat_op(&[BinaryOp::Sub]).is_none() {
            return self.primary();
        }

        self.enter()?;
        let inner = self.unary()?;
        self.nesting -= 1;

        let depth = self.check_depth(inner.depth + 1)?;
        Ok(Node {
            expr: Expression::Neg(Box::new(inner.expr)),
            depth,
        })
    }

    fn primary(&mut self) -> Result<Node, ParseError> {
        let Some(spanned) = self.tokens.get(self.pos) else {
            return Err(ParseError::UnexpectedEnd);
        };
        let offset = spanned.offset;
        let leaf = match spanned.token.clone() {
            Token::Number(n) => Expression::Number(n),
            Token::Ident(name) => Expression::variable(name),
            Token::LParen => {
                self.pos += 1;
                self.enter()?;
                let inner = self.expr()?;
                self.nesting -= 1;
                return match self.tokens.get(self.pos) {
                    Some(Spanned {
                        token: Token::RParen,
                        ..
                    }) => {
                        self.pos += 1;
                        Ok(inner)
                    }
                    Some(other) => Err(ParseError::UnexpectedToken {
                        found: other.token.to_string(),
                        offset: other.offset,
                    }),
                    None => Err(ParseError::UnexpectedEnd),
                };
            }
            other @ (Token::Op(_) | Token::RParen) => {
                return Err(ParseError::UnexpectedToken {
                    found: other.to_string(),
                    offset,
                });
            }
        };
        self.pos += 1;
        Ok(Node {
            expr: leaf,
            depth: 1,
        })
    }

    fn eat_op(&mut self, allowed: &[BinaryOp]) -> Option<BinaryOp> {
        match self.tokens.get(self.pos) {
            Some(Spanned {
                token: Token::Op(op),
                ..
            }) if allowed.contains(op) => {
                let op = *op;
                self.pos += 1;
                Some(op)
            }
            _ => None,
        }
    }

    fn combine(&self, op: BinaryOp, lhs: Node, rhs: Node) -> Result<Node, ParseError> {
        let depth = self.check_depth(lhs.depth.max(rhs.depth) + 1)?;
        Ok(Node {
            expr: Expression::binary(op, lhs.expr, rhs.expr),
            depth,
        })
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        self.nesting += 1;
        if self.nesting > self.max_depth {
            return Err(ParseError::TooDeep { max: self.max_depth });
        }
        Ok(())
    }

    fn check_depth(&self, depth: usize) -> Result<usize, ParseError> {
        if depth > self.max_depth {
            return Err(ParseError::TooDeep { max: self.max_depth });
        }
        Ok(depth)
    }
}
