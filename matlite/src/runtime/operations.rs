//! Arithmetic on runtime values
//!
//! Integers stay exact under `+`, `-`, `*` and non-negative powers, falling back to floats on
//! overflow; `/` always produces a float. Other scalars follow float semantics except that
//! scalar division by zero is an error. Vectors
//! combine element-wise with scalars and with vectors of equal length. Transfer functions
//! combine through block-diagram algebra: `*` is series, `+`/`-` parallel, `/` multiplication by
//! the inverse.

use crate::ast::{BinaryOp, UnaryOp};
use crate::control::TransferFunction;
use crate::error::{ErrorKind, MatliteError};
use crate::runtime::Value;
use crate::MatliteResult;
use nalgebra::Complex;

pub fn unary(op: UnaryOp, value: Value) -> MatliteResult<Value> {
    match (op, value) {
        (UnaryOp::Plus, value @ (Value::Integer(_) | Value::Number(_) | Value::Complex(_))) => {
            Ok(value)
        }
        (UnaryOp::Plus, value @ (Value::Vector(_) | Value::ComplexVector(_) | Value::System(_))) => {
            Ok(value)
        }
        (UnaryOp::Plus, Value::Bool(b)) => Ok(Value::Integer(i64::from(b))),
        (UnaryOp::Negate, Value::Integer(n)) => Ok(n
            .checked_neg()
            .map_or(Value::Number(-(n as f64)), Value::Integer)),
        (UnaryOp::Negate, Value::Number(n)) => Ok(Value::Number(-n)),
        (UnaryOp::Negate, Value::Bool(b)) => Ok(Value::Integer(-i64::from(b))),
        (op, Value::List(items)) if items.iter().all(|v| v.as_number().is_some()) => items
            .into_iter()
            .map(|item| unary(op, item))
            .collect::<MatliteResult<Vec<_>>>()
            .map(Value::List),
        (UnaryOp::Negate, Value::Complex(z)) => Ok(Value::Complex(-z)),
        (UnaryOp::Negate, Value::Vector(values)) => {
            Ok(Value::Vector(values.into_iter().map(|v| -v).collect()))
        }
        (UnaryOp::Negate, Value::ComplexVector(values)) => {
            Ok(Value::ComplexVector(values.into_iter().map(|z| -z).collect()))
        }
        (UnaryOp::Negate, Value::System(system)) => Ok(Value::System(system.negate())),
        (op, value) => Err(MatliteError::type_error(format!(
            "bad operand type for unary {}: '{}'",
            match op {
                UnaryOp::Negate => "-",
                UnaryOp::Plus => "+",
            },
            value.type_name()
        ))),
    }
}

pub fn binary(left: Value, op: BinaryOp, right: Value) -> MatliteResult<Value> {
    if let Value::System(system) = &left {
        return system_left(system, op, &right);
    }
    if let Value::System(system) = &right {
        return system_right(&left, op, system);
    }

    match (&left, &right) {
        (Value::Text(a), Value::Text(b)) if op == BinaryOp::Add => {
            return Ok(Value::Text(format!("{}{}", a, b)))
        }
        (Value::List(a), Value::List(b)) if op == BinaryOp::Add && !all_numeric(a, b) => {
            return Ok(Value::List(a.iter().chain(b).cloned().collect()))
        }
        _ => {}
    }

    if let (Some(a), Some(b)) = (left.as_integer(), right.as_integer()) {
        return integer(a, op, b);
    }
    if let (Some(a), Some(b)) = (left.as_number(), right.as_number()) {
        return scalar(a, op, b).map(Value::Number);
    }
    if let (Some(a), Some(b)) = (complex_scalar(&left), complex_scalar(&right)) {
        return complex(a, op, b).map(Value::Complex);
    }

    if op != BinaryOp::Divide {
        if let (Some(a), Some(b)) = (integer_elements(&left), integer_elements(&right)) {
            return broadcast(&a, &b, |x, y| integer(x, op, y))?
                .into_iter()
                .collect::<MatliteResult<Vec<_>>>()
                .map(Value::List);
        }
    }
    if let (Some(a), Some(b)) = (real_elements(&left), real_elements(&right)) {
        return broadcast(&a, &b, |x, y| elementwise(x, op, y)).map(Value::Vector);
    }
    if let (Some(a), Some(b)) = (complex_elements(&left), complex_elements(&right)) {
        let values = broadcast(&a, &b, |x, y| {
            complex(x, op, y).unwrap_or(Complex::new(f64::NAN, f64::NAN))
        })?;
        return Ok(Value::ComplexVector(values));
    }

    Err(unsupported(op, &left, &right))
}

fn all_numeric(a: &[Value], b: &[Value]) -> bool {
    a.iter().chain(b).all(|v| v.as_number().is_some())
}

fn unsupported(op: BinaryOp, left: &Value, right: &Value) -> MatliteError {
    MatliteError::type_error(format!(
        "unsupported operand type(s) for {}: '{}' and '{}'",
        op,
        left.type_name(),
        right.type_name()
    ))
}

/// Exact integer arithmetic; overflow and negative powers produce floats
fn integer(a: i64, op: BinaryOp, b: i64) -> MatliteResult<Value> {
    let exact = match op {
        BinaryOp::Add => a.checked_add(b),
        BinaryOp::Subtract => a.checked_sub(b),
        BinaryOp::Multiply => a.checked_mul(b),
        BinaryOp::Divide if b == 0 => {
            return Err(MatliteError::runtime(
                ErrorKind::ZeroDivisionError,
                "division by zero",
            ))
        }
        BinaryOp::Divide => None,
        BinaryOp::Power => u32::try_from(b).ok().and_then(|e| a.checked_pow(e)),
    };
    match exact {
        Some(n) => Ok(Value::Integer(n)),
        None => scalar(a as f64, op, b as f64).map(Value::Number),
    }
}

fn scalar(a: f64, op: BinaryOp, b: f64) -> MatliteResult<f64> {
    match op {
        BinaryOp::Add => Ok(a + b),
        BinaryOp::Subtract => Ok(a - b),
        BinaryOp::Multiply => Ok(a * b),
        BinaryOp::Divide if b == 0.0 => Err(MatliteError::runtime(
            ErrorKind::ZeroDivisionError,
            "float division by zero",
        )),
        BinaryOp::Divide => Ok(a / b),
        BinaryOp::Power => Ok(a.powf(b)),
    }
}

fn elementwise(a: f64, op: BinaryOp, b: f64) -> f64 {
    match op {
        BinaryOp::Add => a + b,
        BinaryOp::Subtract => a - b,
        BinaryOp::Multiply => a * b,
        BinaryOp::Divide => a / b,
        BinaryOp::Power => a.powf(b),
    }
}

fn complex(a: Complex<f64>, op: BinaryOp, b: Complex<f64>) -> MatliteResult<Complex<f64>> {
    match op {
        BinaryOp::Add => Ok(a + b),
        BinaryOp::Subtract => Ok(a - b),
        BinaryOp::Multiply => Ok(a * b),
        BinaryOp::Divide if b == Complex::new(0.0, 0.0) => Err(MatliteError::runtime(
            ErrorKind::ZeroDivisionError,
            "complex division by zero",
        )),
        BinaryOp::Divide => Ok(a / b),
        BinaryOp::Power => Ok(a.powc(b)),
    }
}

fn complex_scalar(value: &Value) -> Option<Complex<f64>> {
    match value {
        Value::Complex(z) => Some(*z),
        other => other.as_number().map(|n| Complex::new(n, 0.0)),
    }
}

/// Element view of integer lists and integer scalars
fn integer_elements(value: &Value) -> Option<Elements<i64>> {
    match value {
        Value::List(items) => items
            .iter()
            .map(Value::as_integer)
            .collect::<Option<Vec<_>>>()
            .map(Elements::Many),
        other => other.as_integer().map(Elements::One),
    }
}

/// Element view for vector arithmetic. `None` for values that are not numeric.
fn real_elements(value: &Value) -> Option<Elements<f64>> {
    match value {
        Value::Vector(values) => Some(Elements::Many(values.clone())),
        Value::List(_) => value.as_vector().map(Elements::Many),
        other => other.as_number().map(Elements::One),
    }
}

fn complex_elements(value: &Value) -> Option<Elements<Complex<f64>>> {
    match value {
        Value::ComplexVector(values) => Some(Elements::Many(values.clone())),
        Value::Vector(_) | Value::List(_) => value
            .as_vector()
            .map(|v| Elements::Many(v.into_iter().map(|x| Complex::new(x, 0.0)).collect())),
        other => complex_scalar(other).map(Elements::One),
    }
}

enum Elements<T> {
    One(T),
    Many(Vec<T>),
}

fn broadcast<T: Copy, U>(
    a: &Elements<T>,
    b: &Elements<T>,
    f: impl Fn(T, T) -> U,
) -> MatliteResult<Vec<U>> {
    match (a, b) {
        (Elements::One(x), Elements::One(y)) => Ok(vec![f(*x, *y)]),
        (Elements::One(x), Elements::Many(ys)) => Ok(ys.iter().map(|y| f(*x, *y)).collect()),
        (Elements::Many(xs), Elements::One(y)) => Ok(xs.iter().map(|x| f(*x, *y)).collect()),
        (Elements::Many(xs), Elements::Many(ys)) if xs.len() == ys.len() => {
            Ok(xs.iter().zip(ys).map(|(x, y)| f(*x, *y)).collect())
        }
        (Elements::Many(xs), Elements::Many(ys)) => Err(MatliteError::value_error(format!(
            "operands could not be broadcast together with shapes ({},) ({},)",
            xs.len(),
            ys.len()
        ))),
    }
}

fn as_system(value: &Value) -> Option<MatliteResult<TransferFunction>> {
    match value {
        Value::System(system) => Some(Ok(system.clone())),
        other => other.as_number().map(TransferFunction::gain),
    }
}

fn system_left(system: &TransferFunction, op: BinaryOp, right: &Value) -> MatliteResult<Value> {
    if op == BinaryOp::Power {
        let exponent = integer_exponent(right)?;
        return system.power(exponent).map(Value::System);
    }
    let other = match as_system(right) {
        Some(other) => other?,
        None => return Err(unsupported(op, &Value::System(system.clone()), right)),
    };
    combine(system, op, &other).map(Value::System)
}

fn system_right(left: &Value, op: BinaryOp, system: &TransferFunction) -> MatliteResult<Value> {
    let other = match (op, as_system(left)) {
        (BinaryOp::Power, _) | (_, None) => {
            return Err(unsupported(op, left, &Value::System(system.clone())))
        }
        (_, Some(other)) => other?,
    };
    combine(&other, op, system).map(Value::System)
}

fn combine(
    a: &TransferFunction,
    op: BinaryOp,
    b: &TransferFunction,
) -> MatliteResult<TransferFunction> {
    match op {
        BinaryOp::Add => a.parallel(b),
        BinaryOp::Subtract => a.difference(b),
        BinaryOp::Multiply => a.series(b),
        BinaryOp::Divide => a.divide(b),
        BinaryOp::Power => Err(MatliteError::type_error(
            "transfer function exponent must be an integer",
        )),
    }
}

fn integer_exponent(value: &Value) -> MatliteResult<i32> {
    match value.as_number() {
        Some(n) if n.fract() == 0.0 && n.abs() <= 64.0 => Ok(n as i32),
        _ => Err(MatliteError::type_error(format!(
            "transfer function exponent must be an integer between -64 and 64, got {}",
            value
        ))),
    }
}
