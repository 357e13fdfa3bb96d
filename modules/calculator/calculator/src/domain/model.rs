//! Command model: the closed set of commands a plan can hold.

use std::fmt;

/// Arithmetic operator of a binary expression node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    /// Resolve an operator symbol (`+`, `-`, `*`, `/`).
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Self::Add),
            "-" => Some(Self::Sub),
            "*" => Some(Self::Mul),
            "/" => Some(Self::Div),
            _ => None,
        }
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }
}

/// Immutable expression tree, built once when a `calc` command is accepted.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Number(f64),
    Variable(String),
    Neg(Box<Expression>),
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
}

impl Expression {
    #[must_use]
    pub fn binary(op: BinaryOp, left: Expression, right: Expression) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    #[must_use]
    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }
}

// Fully parenthesized so precedence survives rendering.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Variable(name) => f.write_str(name),
            Self::Neg(inner) => write!(f, "-({inner})"),
            Self::Binary { op, left, right } => write!(f, "({left} {} {right})", op.symbol()),
        }
    }
}

/// `target = expression`
#[derive(Debug, Clone, PartialEq)]
pub struct CalcCommand {
    pub target: String,
    pub expression: Expression,
}

impl CalcCommand {
    #[must_use]
    pub fn new(target: impl Into<String>, expression: Expression) -> Self {
        Self {
            target: target.into(),
            expression,
        }
    }
}

/// Emit the current value of `source`.
#[derive(Debug, Clone, PartialEq)]
pub struct PrintCommand {
    pub source: String,
}

impl PrintCommand {
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Calc(CalcCommand),
    Print(PrintCommand),
}

/// A bound name/value pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub value: f64,
}
