use crate::ast::{Expr, Span, Stmt};
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use std::fmt;

pub mod expressions;

#[derive(Parser)]
#[grammar = "src/parser/statement.pest"]
pub struct StatementParser;

/// Why a line of text is not a valid statement
#[derive(Debug, Clone, PartialEq)]
pub struct ParseFailure {
    pub message: String,
    pub span: Span,
}

impl ParseFailure {
    pub(crate) fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at column {}", self.message, self.span.col)
    }
}

/// Parse one pass-through line into a statement
pub fn parse_statement(text: &str, max_depth: usize) -> Result<Stmt, ParseFailure> {
    check_nesting(text, max_depth)?;
    let statement = parse_rule(Rule::statement, text)?;

    for inner in statement.into_inner() {
        match inner.as_rule() {
            Rule::assignment => return parse_assignment(inner),
            Rule::expression => return expressions::parse_expression(inner).map(Stmt::Expr),
            _ => {}
        }
    }
    Err(ParseFailure::new("empty statement", Span::default()))
}

/// Parse a single expression, e.g. the argument of `disp(...)`
pub fn parse_expression(text: &str, max_depth: usize) -> Result<Expr, ParseFailure> {
    check_nesting(text, max_depth)?;
    let wrapper = parse_rule(Rule::expression_only, text)?;

    wrapper
        .into_inner()
        .find(|p| p.as_rule() == Rule::expression)
        .map(expressions::parse_expression)
        .unwrap_or_else(|| Err(ParseFailure::new("expected expression", Span::default())))
}

/// Parse a comma-separated argument list, e.g. the entries of `legend(...)`
pub fn parse_expression_list(text: &str, max_depth: usize) -> Result<Vec<Expr>, ParseFailure> {
    check_nesting(text, max_depth)?;
    let wrapper = parse_rule(Rule::expression_list, text)?;

    wrapper
        .into_inner()
        .filter(|p| p.as_rule() == Rule::expression)
        .map(expressions::parse_expression)
        .collect()
}

fn parse_rule(rule: Rule, text: &str) -> Result<Pair<'_, Rule>, ParseFailure> {
    match StatementParser::parse(rule, text) {
        Ok(mut pairs) => pairs
            .next()
            .ok_or_else(|| ParseFailure::new("no parse result", Span::default())),
        Err(e) => {
            let (start, end) = match e.location {
                pest::error::InputLocation::Pos(pos) => (pos, pos),
                pest::error::InputLocation::Span((start, end)) => (start, end),
            };
            let (line, col) = match e.line_col {
                pest::error::LineColLocation::Pos((line, col)) => (line, col),
                pest::error::LineColLocation::Span((line, col), _) => (line, col),
            };
            Err(ParseFailure::new(
                e.variant.message().to_string(),
                Span {
                    start,
                    end,
                    line,
                    col,
                },
            ))
        }
    }
}

fn parse_assignment(pair: Pair<Rule>) -> Result<Stmt, ParseFailure> {
    let span = Span::from_pest_span(pair.as_span());
    let mut inner = pair.into_inner();

    let target = inner
        .next()
        .filter(|p| p.as_rule() == Rule::identifier)
        .map(|p| p.as_str().to_string())
        .ok_or_else(|| ParseFailure::new("missing assignment target", span.clone()))?;

    let value = inner
        .next()
        .ok_or_else(|| ParseFailure::new("missing assigned value", span))
        .and_then(expressions::parse_expression)?;

    Ok(Stmt::Assign { target, value })
}

/// Operators allowed per statement for every level of permitted nesting
const OPERATORS_PER_LEVEL: usize = 16;

/// Reject pathological input before handing the text to the recursive grammar.
/// Bracket depth is bounded by `max_depth`; exponents recurse too, so they share that bound.
/// The operator count bounds the depth of the resulting tree.
fn check_nesting(text: &str, max_depth: usize) -> Result<(), ParseFailure> {
    let at = |offset: usize, message: String| {
        ParseFailure::new(
            message,
            Span {
                start: offset,
                end: offset + 1,
                line: 1,
                col: text[..offset].chars().count() + 1,
            },
        )
    };

    let mut depth = 0usize;
    let mut exponents = 0usize;
    let mut operators = 0usize;
    for (offset, ch) in text.char_indices() {
        match ch {
            '(' | '[' => {
                depth += 1;
                if depth > max_depth {
                    return Err(at(
                        offset,
                        format!("expression nesting exceeds {} levels", max_depth),
                    ));
                }
            }
            ')' | ']' => depth = depth.saturating_sub(1),
            '^' => {
                exponents += 1;
                if exponents > max_depth {
                    return Err(at(
                        offset,
                        format!("exponent chain exceeds {} levels", max_depth),
                    ));
                }
            }
            _ => {}
        }
        if matches!(ch, '+' | '-' | '*' | '/' | '^') {
            operators += 1;
            if operators > max_depth * OPERATORS_PER_LEVEL {
                return Err(at(
                    offset,
                    format!(
                        "statement has more than {} operators",
                        max_depth * OPERATORS_PER_LEVEL
                    ),
                ));
            }
        }
    }
    Ok(())
}
