use crate::control::polynomial;
use crate::error::MatliteError;
use crate::runtime::bindings::{Arguments, Library};
use crate::runtime::context::ExecutionContext;
use crate::runtime::Value;
use crate::MatliteResult;

/// Largest vector `linspace` will build
const MAX_LINSPACE_POINTS: usize = 1_000_000;

/// `numeric`: polynomial helpers and vector construction
pub struct NumericLibrary;

impl Library for NumericLibrary {
    fn name(&self) -> &'static str {
        "numeric"
    }

    fn functions(&self) -> &'static [&'static str] {
        &["convolve", "roots", "polyval", "linspace"]
    }

    fn call(
        &self,
        function: &str,
        args: Arguments,
        _context: &mut ExecutionContext,
    ) -> MatliteResult<Value> {
        match function {
            "convolve" => {
                args.expect_count(2, 2)?;
                let a = args.vector(0, "a")?;
                let b = args.vector(1, "b")?;
                if a.is_empty() || b.is_empty() {
                    return Err(MatliteError::value_error("convolve: inputs must not be empty"));
                }
                Ok(Value::Vector(polynomial::multiply(&a, &b)))
            }
            "roots" => {
                args.expect_count(1, 1)?;
                let p = args.vector(0, "p")?;
                Ok(Value::from_roots(polynomial::roots(&p)?))
            }
            "polyval" => {
                args.expect_count(2, 2)?;
                let p = args.vector(0, "p")?;
                match args.value(1, "x")? {
                    Value::Vector(_) | Value::List(_) => Ok(Value::Vector(
                        args.vector(1, "x")?
                            .iter()
                            .map(|x| polynomial::eval(&p, *x))
                            .collect(),
                    )),
                    Value::Complex(z) => Ok(Value::Complex(polynomial::eval_complex(&p, *z))),
                    _ => Ok(Value::Number(polynomial::eval(&p, args.number(1, "x")?))),
                }
            }
            "linspace" => {
                args.expect_count(2, 3)?;
                let start = args.number(0, "start")?;
                let stop = args.number(1, "stop")?;
                let count = args.optional_number(2, "num", 50.0)?;
                if count < 0.0 || count.fract() != 0.0 {
                    return Err(MatliteError::value_error(format!(
                        "linspace: number of samples must be a non-negative integer, got {}",
                        count
                    )));
                }
                let count = count as usize;
                if count > MAX_LINSPACE_POINTS {
                    return Err(MatliteError::ResourceLimitExceeded {
                        limit_name: "linspace points".to_string(),
                        limit_value: MAX_LINSPACE_POINTS.to_string(),
                        actual_value: count.to_string(),
                        suggestion: "Use fewer samples.".to_string(),
                    });
                }
                Ok(Value::Vector(linspace(start, stop, count)))
            }
            other => Err(MatliteError::name(&format!("numeric.{}", other))),
        }
    }
}

pub fn linspace(start: f64, stop: f64, count: usize) -> Vec<f64> {
    match count {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (stop - start) / (count - 1) as f64;
            (0..count)
                .map(|i| if i == count - 1 { stop } else { start + step * i as f64 })
                .collect()
        }
    }
}
