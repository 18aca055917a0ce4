use crate::error::MatliteError;
use crate::plot::parse_color;
use crate::runtime::bindings::{Arguments, Library};
use crate::runtime::context::ExecutionContext;
use crate::runtime::Value;
use crate::MatliteResult;

/// `plot`: figure selection, decorations and line plots on the current axes
pub struct PlotLibrary;

impl Library for PlotLibrary {
    fn name(&self) -> &'static str {
        "plot"
    }

    fn functions(&self) -> &'static [&'static str] {
        &["figure", "grid", "title", "xlabel", "ylabel", "legend", "plot"]
    }

    fn call(
        &self,
        function: &str,
        args: Arguments,
        context: &mut ExecutionContext,
    ) -> MatliteResult<Value> {
        match function {
            "figure" => {
                args.expect_count(0, 1)?;
                match args.get(0) {
                    Some(_) => {
                        let id = args.number(0, "num")?;
                        if id < 0.0 || id.fract() != 0.0 || id > u32::MAX as f64 {
                            return Err(MatliteError::plot(format!(
                                "figure number must be a non-negative integer, got {}",
                                id
                            )));
                        }
                        context.figures.select(id as u32)?;
                    }
                    None => {
                        context.figures.current_figure()?;
                    }
                }
                Ok(Value::None)
            }
            "grid" => {
                args.expect_count(0, 1)?;
                let visible = args.flag(0, "visible", true)?;
                context.figures.current_figure()?.current_axes().grid = visible;
                Ok(Value::None)
            }
            "title" | "xlabel" | "ylabel" => {
                args.expect_count(1, 1)?;
                let text = args.text(0, "label")?;
                let axes = context.figures.current_figure()?.current_axes();
                match function {
                    "title" => axes.title = Some(text),
                    "xlabel" => axes.xlabel = Some(text),
                    _ => axes.ylabel = Some(text),
                }
                Ok(Value::None)
            }
            "legend" => {
                args.expect_count(0, 1)?;
                let entries = match args.get(0) {
                    None => vec![],
                    Some(Value::List(items)) | Some(Value::Tuple(items)) => {
                        items.iter().map(legend_text).collect()
                    }
                    Some(Value::Vector(values)) => values
                        .iter()
                        .map(|v| legend_text(&Value::Number(*v)))
                        .collect(),
                    Some(other) => vec![legend_text(other)],
                };
                context.figures.current_figure()?.current_axes().legend = Some(entries);
                Ok(Value::None)
            }
            "plot" => {
                args.expect_count(2, 4)?;
                let x = args.vector(0, "x")?;
                let y = args.vector(1, "y")?;
                if x.len() != y.len() {
                    return Err(MatliteError::value_error(format!(
                        "x and y must have same first dimension, but have shapes ({},) and ({},)",
                        x.len(),
                        y.len()
                    )));
                }
                let color = match args.optional_text(2, "color")? {
                    Some(name) => Some(parse_color(&name).ok_or_else(|| {
                        MatliteError::plot(format!("'{}' is not a valid color value", name))
                    })?),
                    None => None,
                };
                let label = args.optional_text(3, "label")?;
                let points = x.into_iter().zip(y).collect();
                context
                    .figures
                    .current_figure()?
                    .current_axes()
                    .add_line(points, color, label);
                Ok(Value::None)
            }
            other => Err(MatliteError::name(&format!("plot.{}", other))),
        }
    }
}

fn legend_text(value: &Value) -> String {
    match value {
        Value::Text(text) => text.clone(),
        other => other.to_string(),
    }
}
