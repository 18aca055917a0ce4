use crate::ast::{BinaryOp, UnaryOp};
use crate::control::TransferFunction;
use crate::error::{ErrorKind, MatliteError};
use crate::runtime::operations::{binary, unary};
use crate::runtime::Value;
use nalgebra::Complex;

fn kind(error: MatliteError) -> ErrorKind {
    match error {
        MatliteError::Runtime(details) => details.kind,
        other => panic!("expected runtime error, got {:?}", other),
    }
}

fn system(num: &[f64], den: &[f64]) -> Value {
    Value::System(TransferFunction::new(num, den).unwrap())
}

#[test]
fn test_scalar_arithmetic() {
    let result = binary(Value::Number(7.0), BinaryOp::Divide, Value::Number(2.0)).unwrap();
    assert_eq!(result, Value::Number(3.5));
    let result = binary(Value::Number(2.0), BinaryOp::Power, Value::Number(10.0)).unwrap();
    assert_eq!(result, Value::Number(1024.0));
    let result = binary(Value::Bool(true), BinaryOp::Add, Value::Number(1.0)).unwrap();
    assert_eq!(result, Value::Number(2.0));
}

#[test]
fn test_scalar_division_by_zero() {
    let error = binary(Value::Number(1.0), BinaryOp::Divide, Value::Number(0.0)).unwrap_err();
    assert_eq!(kind(error), ErrorKind::ZeroDivisionError);
}

#[test]
fn test_vector_division_follows_ieee() {
    let result = binary(
        Value::Vector(vec![1.0, -1.0]),
        BinaryOp::Divide,
        Value::Number(0.0),
    )
    .unwrap();
    assert_eq!(
        result,
        Value::Vector(vec![f64::INFINITY, f64::NEG_INFINITY])
    );
}

#[test]
fn test_vector_broadcasting() {
    let result = binary(
        Value::Number(2.0),
        BinaryOp::Multiply,
        Value::Vector(vec![1.0, 2.0, 3.0]),
    )
    .unwrap();
    assert_eq!(result, Value::Vector(vec![2.0, 4.0, 6.0]));

    let result = binary(
        Value::Vector(vec![1.0, 2.0]),
        BinaryOp::Add,
        Value::Vector(vec![10.0, 20.0]),
    )
    .unwrap();
    assert_eq!(result, Value::Vector(vec![11.0, 22.0]));
}

#[test]
fn test_vector_length_mismatch() {
    let error = binary(
        Value::Vector(vec![1.0, 2.0]),
        BinaryOp::Add,
        Value::Vector(vec![1.0, 2.0, 3.0]),
    )
    .unwrap_err();
    assert_eq!(kind(error.clone()), ErrorKind::ValueError);
    assert!(error.to_string().contains("(2,) (3,)"));
}

#[test]
fn test_text_concatenation() {
    let result = binary(
        Value::Text("ab".to_string()),
        BinaryOp::Add,
        Value::Text("cd".to_string()),
    )
    .unwrap();
    assert_eq!(result, Value::Text("abcd".to_string()));
}

#[test]
fn test_text_arithmetic_is_a_type_error() {
    let error = binary(
        Value::Text("a".to_string()),
        BinaryOp::Multiply,
        Value::Number(2.0),
    )
    .unwrap_err();
    assert_eq!(kind(error.clone()), ErrorKind::TypeError);
    assert!(error
        .to_string()
        .contains("unsupported operand type(s) for *: 'str' and 'float'"));
}

#[test]
fn test_complex_arithmetic() {
    let i = Value::Complex(Complex::new(0.0, 1.0));
    let result = binary(i.clone(), BinaryOp::Multiply, i).unwrap();
    assert_eq!(result, Value::Complex(Complex::new(-1.0, 0.0)));
}

#[test]
fn test_unary_operators() {
    assert_eq!(
        unary(UnaryOp::Negate, Value::Vector(vec![1.0, -2.0])).unwrap(),
        Value::Vector(vec![-1.0, 2.0])
    );
    assert_eq!(
        unary(UnaryOp::Negate, Value::Bool(false)).unwrap(),
        Value::Integer(0)
    );
    assert_eq!(
        unary(
            UnaryOp::Negate,
            Value::List(vec![Value::Integer(1), Value::Integer(-2)])
        )
        .unwrap(),
        Value::List(vec![Value::Integer(-1), Value::Integer(2)])
    );
    let error = unary(UnaryOp::Negate, Value::Text("x".to_string())).unwrap_err();
    assert!(error.to_string().contains("bad operand type for unary -: 'str'"));
}

#[test]
fn test_system_series_by_multiplication() {
    let g = system(&[1.0], &[1.0, 1.0]);
    let result = binary(g.clone(), BinaryOp::Multiply, g).unwrap();
    assert_eq!(result, system(&[1.0], &[1.0, 2.0, 1.0]));
}

#[test]
fn test_system_scaled_by_number() {
    let g = system(&[1.0], &[1.0, 1.0]);
    let result = binary(Value::Number(5.0), BinaryOp::Multiply, g).unwrap();
    assert_eq!(result, system(&[5.0], &[1.0, 1.0]));
}

#[test]
fn test_system_sum_is_parallel() {
    let a = system(&[1.0], &[1.0, 1.0]);
    let b = system(&[1.0], &[1.0, 2.0]);
    let result = binary(a, BinaryOp::Add, b).unwrap();
    assert_eq!(result, system(&[2.0, 3.0], &[1.0, 3.0, 2.0]));
}

#[test]
fn test_laplace_variable_algebra() {
    let s = Value::System(TransferFunction::laplace_variable());
    let plus_one = binary(s, BinaryOp::Add, Value::Number(1.0)).unwrap();
    let result = binary(Value::Number(1.0), BinaryOp::Divide, plus_one).unwrap();
    assert_eq!(result, system(&[1.0], &[1.0, 1.0]));
}

#[test]
fn test_system_integer_power() {
    let g = system(&[1.0], &[1.0, 1.0]);
    let result = binary(g.clone(), BinaryOp::Power, Value::Number(2.0)).unwrap();
    assert_eq!(result, system(&[1.0], &[1.0, 2.0, 1.0]));

    let error = binary(g, BinaryOp::Power, Value::Number(0.5)).unwrap_err();
    assert_eq!(kind(error), ErrorKind::TypeError);
}

#[test]
fn test_number_to_system_power_is_rejected() {
    let g = system(&[1.0], &[1.0, 1.0]);
    let error = binary(Value::Number(2.0), BinaryOp::Power, g).unwrap_err();
    assert_eq!(kind(error), ErrorKind::TypeError);
}

#[test]
fn test_integer_arithmetic_stays_exact() {
    let sum = binary(Value::Integer(2), BinaryOp::Add, Value::Integer(3)).unwrap();
    assert_eq!(sum, Value::Integer(5));
    assert_eq!(sum.to_string(), "5");
    assert_eq!(
        binary(Value::Integer(2), BinaryOp::Power, Value::Integer(10)).unwrap(),
        Value::Integer(1024)
    );
    assert_eq!(
        binary(Value::Integer(3), BinaryOp::Multiply, Value::Bool(true)).unwrap(),
        Value::Integer(3)
    );
}

#[test]
fn test_integer_division_and_fallbacks_are_floats() {
    assert_eq!(
        binary(Value::Integer(7), BinaryOp::Divide, Value::Integer(2)).unwrap(),
        Value::Number(3.5)
    );
    assert_eq!(
        binary(Value::Integer(4), BinaryOp::Divide, Value::Integer(2))
            .unwrap()
            .to_string(),
        "2.0"
    );
    assert_eq!(
        binary(Value::Integer(2), BinaryOp::Power, Value::Integer(-1)).unwrap(),
        Value::Number(0.5)
    );
    assert_eq!(
        binary(Value::Integer(i64::MAX), BinaryOp::Add, Value::Integer(1)).unwrap(),
        Value::Number(i64::MAX as f64 + 1.0)
    );
    assert_eq!(
        binary(Value::Integer(1), BinaryOp::Add, Value::Number(0.5)).unwrap(),
        Value::Number(1.5)
    );
    let error = binary(Value::Integer(1), BinaryOp::Divide, Value::Integer(0)).unwrap_err();
    assert_eq!(kind(error.clone()), ErrorKind::ZeroDivisionError);
    assert!(error.to_string().ends_with("division by zero"));
}

#[test]
fn test_integer_lists_combine_elementwise() {
    let list = Value::List(vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]);
    let doubled = binary(list.clone(), BinaryOp::Multiply, Value::Integer(2)).unwrap();
    assert_eq!(doubled.to_string(), "[2, 4, 6]");
    let halved = binary(list, BinaryOp::Divide, Value::Integer(2)).unwrap();
    assert_eq!(halved, Value::Vector(vec![0.5, 1.0, 1.5]));
}
