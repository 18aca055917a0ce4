use crate::control::TransferFunction;
use nalgebra::Complex;
use std::fmt;

/// A callable the program can reach by name
#[derive(Debug, Clone, PartialEq)]
pub enum Callable {
    Print,
    Library {
        module: &'static str,
        function: &'static str,
    },
}

impl fmt::Display for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Print => write!(f, "print"),
            Callable::Library { module, function } => write!(f, "{}.{}", module, function),
        }
    }
}

/// Runtime values
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    /// Exact integer from integer literals and integer arithmetic
    Integer(i64),
    Number(f64),
    Complex(Complex<f64>),
    Bool(bool),
    Text(String),
    Vector(Vec<f64>),
    ComplexVector(Vec<Complex<f64>>),
    List(Vec<Value>),
    System(TransferFunction),
    /// Named numeric fields, in display order
    Record(Vec<(String, f64)>),
    Tuple(Vec<Value>),
    Module(&'static str),
    Function(Callable),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "NoneType",
            Value::Integer(_) => "int",
            Value::Number(_) => "float",
            Value::Complex(_) => "complex",
            Value::Bool(_) => "bool",
            Value::Text(_) => "str",
            Value::Vector(_) => "vector",
            Value::ComplexVector(_) => "complex vector",
            Value::List(_) => "list",
            Value::System(_) => "TransferFunction",
            Value::Record(_) => "dict",
            Value::Tuple(_) => "tuple",
            Value::Module(_) => "module",
            Value::Function(_) => "builtin_function",
        }
    }

    /// Numeric view of scalars; booleans count as 0 and 1
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Number(n) => Some(*n),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Exact view of integers and booleans
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            Value::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    /// Vector view of numeric values: scalars become one-element vectors
    pub fn as_vector(&self) -> Option<Vec<f64>> {
        match self {
            Value::Vector(values) => Some(values.clone()),
            Value::List(items) => items.iter().map(Value::as_number).collect(),
            Value::Tuple(items) => items.iter().map(Value::as_number).collect(),
            other => other.as_number().map(|n| vec![n]),
        }
    }

    /// Text as it appears inside containers
    pub fn repr(&self) -> String {
        match self {
            Value::Text(text) => format!("'{}'", text.replace('\\', "\\\\").replace('\'', "\\'")),
            other => other.to_string(),
        }
    }

    /// Vector of roots, real when no root has an imaginary part
    pub fn from_roots(roots: Vec<Complex<f64>>) -> Value {
        match crate::control::polynomial::real_parts(&roots) {
            Some(real) => Value::Vector(real),
            None => Value::ComplexVector(roots),
        }
    }
}

/// Shortest round-trip form of a float, always with a decimal point or exponent
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let formatted = format!("{:e}", value);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if exponent.starts_with('-') => {
                format!("{}e-{:0>2}", mantissa, &exponent[1..])
            }
            Some((mantissa, exponent)) => format!("{}e+{:0>2}", mantissa, exponent),
            None => formatted,
        };
    }
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

pub fn format_complex(value: Complex<f64>) -> String {
    let real = format_number(value.re);
    let imaginary = format_number(value.im.abs());
    let sign = if value.im < 0.0 || (value.im == 0.0 && value.im.is_sign_negative()) {
        '-'
    } else {
        '+'
    };
    format!("({}{}{}j)", real, sign, imaginary)
}

fn join<T>(items: &[T], render: impl Fn(&T) -> String) -> String {
    items.iter().map(render).collect::<Vec<_>>().join(", ")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::Complex(z) => write!(f, "{}", format_complex(*z)),
            Value::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            Value::Text(text) => write!(f, "{}", text),
            Value::Vector(values) => write!(f, "[{}]", join(values, |v| format_number(*v))),
            Value::ComplexVector(values) => {
                write!(f, "[{}]", join(values, |z| format_complex(*z)))
            }
            Value::List(items) => write!(f, "[{}]", join(items, Value::repr)),
            Value::System(system) => write!(f, "{}", system),
            Value::Record(fields) => write!(
                f,
                "{{{}}}",
                join(fields, |(name, value)| format!(
                    "'{}': {}",
                    name,
                    format_number(*value)
                ))
            ),
            Value::Tuple(items) if items.len() == 1 => write!(f, "({},)", items[0].repr()),
            Value::Tuple(items) => write!(f, "({})", join(items, Value::repr)),
            Value::Module(name) => write!(f, "<module '{}'>", name),
            Value::Function(callable) => write!(f, "<built-in function {}>", callable),
        }
    }
}
