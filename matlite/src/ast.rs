//! Syntax tree for pass-through statements
//!
//! Every line the rule cascade does not consume is parsed into a [`Stmt`]. The tree is
//! deliberately small: literals, vectors, names, member access, calls and arithmetic.

use std::fmt;

/// Span representing a location in a single statement
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub col: usize,
}

impl Span {
    pub fn from_pest_span(span: pest::Span) -> Self {
        let (line, col) = span.start_pos().line_col();
        Self {
            start: span.start(),
            end: span.end(),
            line,
            col,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Power => "^",
        };
        f.write_str(symbol)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Plus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal written without a fraction or exponent
    Integer(i64),
    Number(f64),
    Text(String),
    Bool(bool),
    Vector(Vec<Expr>),
    Identifier(String),
    Member { target: Box<Expr>, name: String },
    Call { callee: Box<Expr>, args: Vec<Expr> },
    Unary(UnaryOp, Box<Expr>),
    Binary(Box<Expr>, BinaryOp, Box<Expr>),
}

impl Expr {
    /// Dotted name of a callee such as `controlsys.tf`, if the expression is a plain path
    pub fn path(&self) -> Option<String> {
        match self {
            Expr::Identifier(name) => Some(name.clone()),
            Expr::Member { target, name } => target.path().map(|base| format!("{}.{}", base, name)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Assign { target: String, value: Expr },
    Expr(Expr),
}
