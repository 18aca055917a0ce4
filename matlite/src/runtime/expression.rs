//! Expression evaluation
//!
//! Recursively evaluates statement expressions against program variables and the bound
//! libraries.

use crate::ast::{Expr, Stmt};
use crate::error::{ErrorKind, MatliteError};
use crate::runtime::bindings::Bindings;
use crate::runtime::context::ExecutionContext;
use crate::runtime::operations;
use crate::runtime::value::{Callable, Value};
use crate::MatliteResult;
use nalgebra::Complex;

pub fn execute_statement(
    stmt: &Stmt,
    bindings: &Bindings,
    context: &mut ExecutionContext,
) -> MatliteResult<()> {
    match stmt {
        Stmt::Assign { target, value } => {
            let value = evaluate_expression(value, bindings, context)?;
            context.assign(target.clone(), value);
        }
        Stmt::Expr(expr) => {
            evaluate_expression(expr, bindings, context)?;
        }
    }
    Ok(())
}

pub fn evaluate_expression(
    expr: &Expr,
    bindings: &Bindings,
    context: &mut ExecutionContext,
) -> MatliteResult<Value> {
    match expr {
        Expr::Integer(n) => Ok(Value::Integer(*n)),
        Expr::Number(n) => Ok(Value::Number(*n)),
        Expr::Text(text) => Ok(Value::Text(text.clone())),
        Expr::Bool(b) => Ok(Value::Bool(*b)),
        Expr::Vector(items) => {
            let values = items
                .iter()
                .map(|item| evaluate_expression(item, bindings, context))
                .collect::<MatliteResult<Vec<_>>>()?;
            Ok(collect_vector(values))
        }
        Expr::Identifier(name) => resolve(name, bindings, context),
        Expr::Member { target, name } => {
            let target = evaluate_expression(target, bindings, context)?;
            member(target, name, bindings)
        }
        Expr::Call { callee, args } => {
            let callee = evaluate_expression(callee, bindings, context)?;
            let args = args
                .iter()
                .map(|arg| evaluate_expression(arg, bindings, context))
                .collect::<MatliteResult<Vec<_>>>()?;
            call(callee, args, bindings, context)
        }
        Expr::Unary(op, operand) => {
            let operand = evaluate_expression(operand, bindings, context)?;
            operations::unary(*op, operand)
        }
        Expr::Binary(left, op, right) => {
            let left = evaluate_expression(left, bindings, context)?;
            let right = evaluate_expression(right, bindings, context)?;
            operations::binary(left, *op, right)
        }
    }
}

/// Variables shadow bound names
pub fn resolve(name: &str, bindings: &Bindings, context: &ExecutionContext) -> MatliteResult<Value> {
    if let Some(value) = context.variables.get(name) {
        return Ok(value.clone());
    }
    bindings.lookup(name).ok_or_else(|| MatliteError::name(name))
}

/// Float literals become vectors. Lists holding integers or booleans keep their elements so
/// they print exactly; they still take part in vector arithmetic.
fn collect_vector(values: Vec<Value>) -> Value {
    let floats: Option<Vec<f64>> = values
        .iter()
        .map(|v| match v {
            Value::Number(n) => Some(*n),
            _ => None,
        })
        .collect();
    if let Some(numbers) = floats {
        return Value::Vector(numbers);
    }
    if values.iter().all(|v| v.as_number().is_some()) {
        return Value::List(values);
    }
    let complex: Option<Vec<Complex<f64>>> = values
        .iter()
        .map(|v| match v {
            Value::Complex(z) => Some(*z),
            other => other.as_number().map(|n| Complex::new(n, 0.0)),
        })
        .collect();
    match complex {
        Some(complex) => Value::ComplexVector(complex),
        None => Value::List(values),
    }
}

fn member(target: Value, name: &str, bindings: &Bindings) -> MatliteResult<Value> {
    match target {
        Value::Module(module) => bindings.member(module, name),
        // Struct-style field access on records such as step info
        Value::Record(fields) => fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| Value::Number(*value))
            .ok_or_else(|| {
                MatliteError::runtime(ErrorKind::AttributeError, format!("no field '{}'", name))
            }),
        other => Err(MatliteError::runtime(
            ErrorKind::AttributeError,
            format!("'{}' object has no attribute '{}'", other.type_name(), name),
        )),
    }
}

fn call(
    callee: Value,
    args: Vec<Value>,
    bindings: &Bindings,
    context: &mut ExecutionContext,
) -> MatliteResult<Value> {
    match callee {
        Value::Function(Callable::Print) => {
            let line = args
                .iter()
                .map(|arg| arg.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            context.print_line(&line);
            Ok(Value::None)
        }
        Value::Function(Callable::Library { module, function }) => {
            bindings.call(module, function, args, context)
        }
        Value::Vector(values) => index(&values, &args).map(Value::Number),
        Value::ComplexVector(values) => index(&values, &args).map(Value::Complex),
        Value::List(values) | Value::Tuple(values) => index(&values, &args),
        other => Err(MatliteError::type_error(format!(
            "'{}' object is not callable",
            other.type_name()
        ))),
    }
}

/// One-based element access, `v(2)`
fn index<T: Clone>(values: &[T], args: &[Value]) -> MatliteResult<T> {
    let position = match args {
        [single] => single.as_number(),
        _ => None,
    }
    .filter(|n| n.fract() == 0.0)
    .ok_or_else(|| MatliteError::type_error("indices must be a single integer"))?;

    if position < 1.0 || position > values.len() as f64 {
        return Err(MatliteError::runtime(
            ErrorKind::IndexError,
            format!(
                "index {} is out of bounds for length {}",
                position, values.len()
            ),
        ));
    }
    Ok(values[position as usize - 1].clone())
}
