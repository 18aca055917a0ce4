use crate::control::{self, TransferFunction};
use crate::error::MatliteError;
use crate::plot::charts;
use crate::runtime::bindings::{Arguments, Library};
use crate::runtime::context::ExecutionContext;
use crate::runtime::Value;
use crate::MatliteResult;

/// `controlsys`: transfer-function construction, interconnection and analysis
pub struct ControlLibrary;

impl Library for ControlLibrary {
    fn name(&self) -> &'static str {
        "controlsys"
    }

    fn functions(&self) -> &'static [&'static str] {
        &[
            "tf",
            "feedback",
            "poles",
            "zeros",
            "series",
            "parallel",
            "dcgain",
            "step_response",
            "impulse_response",
            "step_info",
            "stability_margins",
            "pzmap",
            "bode_plot",
            "root_locus",
            "nyquist_plot",
        ]
    }

    fn call(
        &self,
        function: &str,
        args: Arguments,
        context: &mut ExecutionContext,
    ) -> MatliteResult<Value> {
        match function {
            "tf" => tf(&args),
            "feedback" => {
                args.expect_count(1, 3)?;
                let plant = args.system(0, "sys1")?;
                let sensor = match args.get(1) {
                    Some(_) => args.system(1, "sys2")?,
                    None => TransferFunction::gain(1.0)?,
                };
                let sign = args.optional_number(2, "sign", -1.0)?;
                Ok(Value::System(plant.feedback(&sensor, sign)?))
            }
            "poles" => {
                args.expect_count(1, 1)?;
                Ok(Value::from_roots(args.system(0, "sys")?.poles()?))
            }
            "zeros" => {
                args.expect_count(1, 1)?;
                Ok(Value::from_roots(args.system(0, "sys")?.zeros()?))
            }
            "series" | "parallel" => {
                if args.is_empty() {
                    return Err(MatliteError::type_error(format!(
                        "{}() requires at least one system",
                        function
                    )));
                }
                let systems = args.systems("sys")?;
                let mut combined = systems[0].clone();
                for system in &systems[1..] {
                    combined = if function == "series" {
                        combined.series(system)?
                    } else {
                        combined.parallel(system)?
                    };
                }
                Ok(Value::System(combined))
            }
            "dcgain" => {
                args.expect_count(1, 1)?;
                Ok(Value::Number(args.system(0, "sys")?.dc_gain()))
            }
            "step_response" | "impulse_response" => {
                args.expect_count(1, 1)?;
                let system = args.system(0, "sys")?;
                let response = if function == "step_response" {
                    control::step_response(&system, context.limits.max_samples, context.timeout())?
                } else {
                    control::impulse_response(&system, context.limits.max_samples, context.timeout())?
                };
                Ok(Value::Tuple(vec![
                    Value::Vector(response.time),
                    Value::Vector(response.output),
                ]))
            }
            "step_info" => {
                args.expect_count(1, 1)?;
                let system = args.system(0, "sys")?;
                let info = control::step_info(&system, context.limits.max_samples, context.timeout())?;
                Ok(Value::Record(info.fields()))
            }
            "stability_margins" => {
                args.expect_count(1, 1)?;
                let system = args.system(0, "sys")?;
                let omega = control::frequency_grid(&system)?;
                let margins =
                    control::stability_margins(&control::frequency_response(&system, &omega));
                Ok(Value::Tuple(vec![
                    Value::Number(margins.gain_margin),
                    Value::Number(margins.phase_margin),
                    Value::Number(margins.phase_crossover),
                    Value::Number(margins.gain_crossover),
                ]))
            }
            "pzmap" => {
                args.expect_count(1, 2)?;
                let system = args.system(0, "sys")?;
                let poles = system.poles()?;
                let zeros = system.zeros()?;
                if args.flag(1, "plot", true)? {
                    let figure = context.figures.current_figure()?;
                    charts::pole_zero_map(figure, &poles, &zeros);
                }
                Ok(Value::Tuple(vec![
                    Value::from_roots(poles),
                    Value::from_roots(zeros),
                ]))
            }
            "bode_plot" => {
                args.expect_count(1, 2)?;
                let system = args.system(0, "sys")?;
                let omega = control::frequency_grid(&system)?;
                let response = control::frequency_response(&system, &omega);
                let margins = args
                    .flag(1, "margins", false)?
                    .then(|| control::stability_margins(&response));

                let figure = context.figures.current_figure()?;
                charts::bode(figure, &response, margins.as_ref());
                Ok(Value::Tuple(vec![
                    Value::Vector(response.magnitude),
                    Value::Vector(response.phase),
                    Value::Vector(response.omega),
                ]))
            }
            "root_locus" => {
                args.expect_count(1, 2)?;
                let system = args.system(0, "sys")?;
                if system.order() == 0 {
                    return Err(MatliteError::control(
                        "root locus needs a system with at least one pole",
                    ));
                }
                let locus = control::root_locus(&system, context.timeout())?;
                if args.flag(1, "plot", true)? {
                    let zeros = system.zeros()?;
                    let figure = context.figures.current_figure()?;
                    charts::root_locus(figure, &locus, &zeros);
                }
                Ok(Value::Vector(locus.gains))
            }
            "nyquist_plot" => {
                args.expect_count(1, 1)?;
                let system = args.system(0, "sys")?;
                let omega = control::frequency_grid(&system)?;
                let (positive, mirrored) = control::nyquist_curve(&system, &omega);
                let figure = context.figures.current_figure()?;
                charts::nyquist(figure, positive, mirrored);
                Ok(Value::None)
            }
            other => Err(MatliteError::name(&format!("controlsys.{}", other))),
        }
    }
}

/// `tf(num, den)`, or `tf('s')` for the Laplace variable
fn tf(args: &Arguments) -> MatliteResult<Value> {
    args.expect_count(1, 2)?;
    if args.len() == 1 {
        return match args.text(0, "num")?.as_str() {
            "s" => Ok(Value::System(TransferFunction::laplace_variable())),
            other => Err(MatliteError::value_error(format!(
                "tf() with one argument expects 's', got '{}'",
                other
            ))),
        };
    }
    let num = args.vector(0, "num")?;
    let den = args.vector(1, "den")?;
    Ok(Value::System(TransferFunction::new(&num, &den)?))
}
