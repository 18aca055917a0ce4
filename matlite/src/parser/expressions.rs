use crate::ast::{BinaryOp, Expr, Span, UnaryOp};
use crate::parser::{ParseFailure, Rule};
use pest::iterators::Pair;

fn missing(what: &str, pair: &Pair<Rule>) -> ParseFailure {
    ParseFailure::new(
        format!("missing {}", what),
        Span::from_pest_span(pair.as_span()),
    )
}

fn unexpected(pair: &Pair<Rule>) -> ParseFailure {
    ParseFailure::new(
        format!("unexpected {:?}", pair.as_rule()),
        Span::from_pest_span(pair.as_span()),
    )
}

pub(crate) fn parse_expression(pair: Pair<Rule>) -> Result<Expr, ParseFailure> {
    // expression = { term ~ (add_op ~ term)* }
    let outer = pair.clone();
    let mut pairs = pair.into_inner();
    let mut left = parse_term(pairs.next().ok_or_else(|| missing("left operand", &outer))?)?;

    while let Some(op_pair) = pairs.next() {
        let op = match op_pair.as_rule() {
            Rule::add_plus => BinaryOp::Add,
            Rule::add_minus => BinaryOp::Subtract,
            _ => return Err(unexpected(&op_pair)),
        };
        let right = parse_term(pairs.next().ok_or_else(|| missing("right operand", &op_pair))?)?;
        left = Expr::Binary(Box::new(left), op, Box::new(right));
    }

    Ok(left)
}

fn parse_term(pair: Pair<Rule>) -> Result<Expr, ParseFailure> {
    let outer = pair.clone();
    let mut pairs = pair.into_inner();
    let mut left = parse_factor(pairs.next().ok_or_else(|| missing("left factor", &outer))?)?;

    while let Some(op_pair) = pairs.next() {
        let op = match op_pair.as_rule() {
            Rule::mul_star => BinaryOp::Multiply,
            Rule::mul_slash => BinaryOp::Divide,
            _ => return Err(unexpected(&op_pair)),
        };
        let right =
            parse_factor(pairs.next().ok_or_else(|| missing("right factor", &op_pair))?)?;
        left = Expr::Binary(Box::new(left), op, Box::new(right));
    }

    Ok(left)
}

fn parse_factor(pair: Pair<Rule>) -> Result<Expr, ParseFailure> {
    // factor = { sign* ~ power }
    let mut signs = Vec::new();
    let mut operand = None;

    for inner in pair.clone().into_inner() {
        match inner.as_rule() {
            Rule::negate => signs.push(UnaryOp::Negate),
            Rule::plus => signs.push(UnaryOp::Plus),
            Rule::power => operand = Some(parse_power(inner)?),
            _ => return Err(unexpected(&inner)),
        }
    }

    let mut expr = operand.ok_or_else(|| missing("operand", &pair))?;
    for op in signs.into_iter().rev() {
        expr = Expr::Unary(op, Box::new(expr));
    }
    Ok(expr)
}

fn parse_power(pair: Pair<Rule>) -> Result<Expr, ParseFailure> {
    // power = { postfix ~ (pow_op ~ factor)? }, right associative through factor
    let outer = pair.clone();
    let mut pairs = pair.into_inner();
    let base = parse_postfix(pairs.next().ok_or_else(|| missing("base", &outer))?)?;

    match pairs.next() {
        Some(exponent) => Ok(Expr::Binary(
            Box::new(base),
            BinaryOp::Power,
            Box::new(parse_factor(exponent)?),
        )),
        None => Ok(base),
    }
}

fn parse_postfix(pair: Pair<Rule>) -> Result<Expr, ParseFailure> {
    let outer = pair.clone();
    let mut pairs = pair.into_inner();
    let mut expr = parse_primary(pairs.next().ok_or_else(|| missing("operand", &outer))?)?;

    for suffix in pairs {
        expr = match suffix.as_rule() {
            Rule::call => {
                let args = suffix
                    .into_inner()
                    .map(parse_expression)
                    .collect::<Result<Vec<_>, _>>()?;
                Expr::Call {
                    callee: Box::new(expr),
                    args,
                }
            }
            Rule::member => {
                let name = suffix
                    .clone()
                    .into_inner()
                    .next()
                    .ok_or_else(|| missing("member name", &suffix))?
                    .as_str()
                    .to_string();
                Expr::Member {
                    target: Box::new(expr),
                    name,
                }
            }
            _ => return Err(unexpected(&suffix)),
        };
    }

    Ok(expr)
}

fn parse_primary(pair: Pair<Rule>) -> Result<Expr, ParseFailure> {
    match pair.as_rule() {
        Rule::number => parse_number(pair),
        Rule::string => parse_string(pair),
        Rule::boolean => Ok(Expr::Bool(matches!(pair.as_str(), "true" | "True"))),
        Rule::identifier => Ok(Expr::Identifier(pair.as_str().to_string())),
        Rule::vector => pair
            .into_inner()
            .map(parse_expression)
            .collect::<Result<Vec<_>, _>>()
            .map(Expr::Vector),
        Rule::expression => parse_expression(pair),
        _ => Err(unexpected(&pair)),
    }
}

fn parse_string(pair: Pair<Rule>) -> Result<Expr, ParseFailure> {
    let inner = pair
        .clone()
        .into_inner()
        .next()
        .ok_or_else(|| missing("string body", &pair))?;

    let text = match inner.as_rule() {
        Rule::single_text => inner.as_str().replace("''", "'"),
        Rule::double_text => inner.as_str().replace("\"\"", "\""),
        _ => return Err(unexpected(&inner)),
    };
    Ok(Expr::Text(text))
}

/// Digits-only literals are integers unless they overflow `i64`
fn parse_number(pair: Pair<Rule>) -> Result<Expr, ParseFailure> {
    let text = pair.as_str();
    if text.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(n) = text.parse::<i64>() {
            return Ok(Expr::Integer(n));
        }
    }
    text.parse::<f64>().map(Expr::Number).map_err(|e| {
        ParseFailure::new(
            format!("invalid number '{}': {}", text, e),
            Span::from_pest_span(pair.as_span()),
        )
    })
}
