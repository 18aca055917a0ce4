//! Sandboxed execution of translated programs
//!
//! Executes a program by:
//! 1. Rejecting it whole if any line failed to parse
//! 2. Running instructions in order against a fresh context and the fixed bindings
//! 3. Handing back the captured output and figures, whatever the outcome

pub mod bindings;
pub mod context;
pub mod expression;
pub mod libraries;
pub mod operations;
pub mod timeout;
pub mod value;

pub use bindings::{Arguments, Bindings, Library};
pub use context::ExecutionContext;
pub use timeout::TimeoutTracker;
pub use value::{Callable, Value};

use crate::ast::Expr;
use crate::error::{Location, MatliteError};
use crate::plot::FigureRegistry;
use crate::program::{Instruction, Program, RESPONSE_AMPLITUDE_VAR, RESPONSE_TIME_VAR};
use crate::{MatliteResult, ResourceLimits};
use expression::{evaluate_expression, execute_statement};
use tracing::debug;

/// What a run left behind
#[derive(Debug)]
pub struct Execution {
    /// Captured print output, also after a failure
    pub output: String,
    /// Figures drawn before the run ended
    pub figures: FigureRegistry,
    pub outcome: MatliteResult<()>,
}

/// Runs programs in isolation: each run gets its own variables, figures and output buffer
pub struct Sandbox {
    bindings: Bindings,
    limits: ResourceLimits,
}

impl Sandbox {
    pub fn new(limits: ResourceLimits) -> Self {
        Self {
            bindings: Bindings::standard(),
            limits,
        }
    }

    pub fn execute(&self, program: &Program) -> Execution {
        let mut context = ExecutionContext::new(self.limits.clone());
        let outcome = check_syntax(program).and_then(|()| self.run(program, &mut context));

        debug!(
            instructions = program.len(),
            figures = context.figures.len(),
            output_bytes = context.output.len(),
            elapsed_ms = context.timeout().elapsed_ms(),
            success = outcome.is_ok(),
            "Executed program"
        );

        Execution {
            output: context.output,
            figures: context.figures,
            outcome,
        }
    }

    fn run(&self, program: &Program, context: &mut ExecutionContext) -> MatliteResult<()> {
        for (index, line) in program.lines().iter().enumerate() {
            context.check_timeout()?;
            let location = Location {
                program_line: index + 1,
                source_line: line.source_line,
                text: line.instruction.to_string(),
            };
            self.execute_instruction(&line.instruction, context)
                .map_err(|e| e.at(&location))?;
        }
        Ok(())
    }

    fn execute_instruction(
        &self,
        instruction: &Instruction,
        context: &mut ExecutionContext,
    ) -> MatliteResult<()> {
        let bindings = &self.bindings;
        match instruction {
            Instruction::Comment(_) => {}
            Instruction::SelectFigure(id) => {
                bindings.call("plot", "figure", vec![Value::Integer(i64::from(*id))], context)?;
            }
            Instruction::SetGrid(on) => {
                bindings.call("plot", "grid", vec![Value::Bool(*on)], context)?;
            }
            Instruction::Title(text) => {
                bindings.call("plot", "title", vec![Value::Text(text.clone())], context)?;
            }
            Instruction::AxisLabel { axis, text } => {
                bindings.call("plot", axis.function(), vec![Value::Text(text.clone())], context)?;
            }
            Instruction::Legend { entries, .. } => {
                let entries = entries
                    .iter()
                    .map(|entry| evaluate_expression(entry, bindings, context))
                    .collect::<MatliteResult<Vec<_>>>()?;
                bindings.call("plot", "legend", vec![Value::List(entries)], context)?;
            }
            Instruction::ComputeResponse { kind, system } => {
                let system = expression::resolve(system, bindings, context)?;
                let response = bindings.call("controlsys", kind.function(), vec![system], context)?;
                let (time, amplitude) = match response {
                    Value::Tuple(mut parts) if parts.len() == 2 => {
                        let amplitude = parts.pop().unwrap_or(Value::None);
                        let time = parts.pop().unwrap_or(Value::None);
                        (time, amplitude)
                    }
                    other => {
                        return Err(MatliteError::type_error(format!(
                            "cannot unpack non-pair '{}'",
                            other.type_name()
                        )))
                    }
                };
                context.assign(RESPONSE_TIME_VAR, time);
                context.assign(RESPONSE_AMPLITUDE_VAR, amplitude);
            }
            Instruction::Plot { x, y, color, label } => {
                let x = expression::resolve(x, bindings, context)?;
                let y = expression::resolve(y, bindings, context)?;
                let optional = |text: &Option<String>| {
                    text.as_ref().map_or(Value::None, |t| Value::Text(t.clone()))
                };
                bindings.call(
                    "plot",
                    "plot",
                    vec![x, y, optional(color), optional(label)],
                    context,
                )?;
            }
            Instruction::Analysis { kind, system } => {
                let system = expression::resolve(system, bindings, context)?;
                let mut args = vec![system];
                if let Some(flag) = kind.flag_value() {
                    args.push(Value::Bool(flag));
                }
                bindings.call("controlsys", kind.function(), args, context)?;
            }
            Instruction::StepInfo { target, system } => {
                let system = expression::resolve(system, bindings, context)?;
                let info = bindings.call("controlsys", "step_info", vec![system], context)?;
                context.assign(target.clone(), info);
            }
            Instruction::Print { expr, .. } => {
                let print = Expr::Call {
                    callee: Box::new(Expr::Identifier("print".to_string())),
                    args: vec![expr.clone()],
                };
                evaluate_expression(&print, bindings, context)?;
            }
            Instruction::Statement { stmt, .. } => execute_statement(stmt, bindings, context)?,
            Instruction::Invalid { error, .. } => {
                return Err(MatliteError::value_error(error.message.clone()))
            }
        }
        Ok(())
    }
}

/// The whole program is rejected before anything runs if one line does not parse
fn check_syntax(program: &Program) -> MatliteResult<()> {
    match program.syntax_errors().next() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}
