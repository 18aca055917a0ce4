//! Translated program: typed instructions in source order
//!
//! The translator emits [`Instruction`]s, the runtime executes them. Each instruction renders to one
//! line of host text, which is what the user sees echoed in the console before any output.

use crate::ast::{Expr, Stmt};
use crate::error::{Location, MatliteError, SyntaxDetails};
use crate::parser::ParseFailure;
use std::fmt;

/// Variable receiving the time vector of a response computation
pub const RESPONSE_TIME_VAR: &str = "_t";
/// Variable receiving the amplitude vector of a response computation
pub const RESPONSE_AMPLITUDE_VAR: &str = "_y";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn function(&self) -> &'static str {
        match self {
            Axis::X => "xlabel",
            Axis::Y => "ylabel",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Step,
    Impulse,
}

impl ResponseKind {
    pub fn function(&self) -> &'static str {
        match self {
            ResponseKind::Step => "step_response",
            ResponseKind::Impulse => "impulse_response",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ResponseKind::Step => "Step Response",
            ResponseKind::Impulse => "Impulse Response",
        }
    }
}

/// Frequency- and root-domain analyses that draw into the current figure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisKind {
    PoleZeroMap,
    Bode,
    Margin,
    RootLocus,
    Nyquist,
}

impl AnalysisKind {
    pub fn function(&self) -> &'static str {
        match self {
            AnalysisKind::PoleZeroMap => "pzmap",
            AnalysisKind::Bode | AnalysisKind::Margin => "bode_plot",
            AnalysisKind::RootLocus => "root_locus",
            AnalysisKind::Nyquist => "nyquist_plot",
        }
    }

    /// Value of the trailing flag argument passed to the library function
    pub fn flag_value(&self) -> Option<bool> {
        self.flag().map(|_| true)
    }

    /// The literal keyword argument shown in the rendered call, if any
    fn flag(&self) -> Option<&'static str> {
        match self {
            AnalysisKind::PoleZeroMap | AnalysisKind::RootLocus => Some("plot=True"),
            AnalysisKind::Margin => Some("margins=True"),
            AnalysisKind::Bode | AnalysisKind::Nyquist => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// Text after the `%` marker
    Comment(String),
    SelectFigure(u32),
    SetGrid(bool),
    Title(String),
    AxisLabel {
        axis: Axis,
        text: String,
    },
    Legend {
        source: String,
        entries: Vec<Expr>,
    },
    /// `_t, _y = controlsys.<kind>(system)`
    ComputeResponse {
        kind: ResponseKind,
        system: String,
    },
    Plot {
        x: String,
        y: String,
        color: Option<String>,
        label: Option<String>,
    },
    Analysis {
        kind: AnalysisKind,
        system: String,
    },
    StepInfo {
        target: String,
        system: String,
    },
    Print {
        source: String,
        expr: Expr,
    },
    Statement {
        source: String,
        stmt: Stmt,
    },
    /// A pass-through line the statement grammar rejected; fails the run before execution
    Invalid {
        source: String,
        error: ParseFailure,
    },
}

fn quoted(text: &str) -> String {
    format!("'{}'", text.replace('\\', "\\\\").replace('\'', "\\'"))
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Comment(text) => write!(f, "#{}", text),
            Instruction::SelectFigure(id) => write!(f, "plot.figure({})", id),
            Instruction::SetGrid(on) => {
                write!(f, "plot.grid({})", if *on { "True" } else { "False" })
            }
            Instruction::Title(text) => write!(f, "plot.title({})", quoted(text)),
            Instruction::AxisLabel { axis, text } => {
                write!(f, "plot.{}({})", axis.function(), quoted(text))
            }
            Instruction::Legend { source, .. } => write!(f, "plot.legend([{}])", source),
            Instruction::ComputeResponse { kind, system } => write!(
                f,
                "{}, {} = controlsys.{}({})",
                RESPONSE_TIME_VAR,
                RESPONSE_AMPLITUDE_VAR,
                kind.function(),
                system
            ),
            Instruction::Plot { x, y, color, label } => {
                write!(f, "plot.plot({}, {}", x, y)?;
                if let Some(color) = color {
                    write!(f, ", color={}", quoted(color))?;
                }
                if let Some(label) = label {
                    write!(f, ", label={}", quoted(label))?;
                }
                write!(f, ")")
            }
            Instruction::Analysis { kind, system } => match kind.flag() {
                Some(flag) => write!(f, "controlsys.{}({}, {})", kind.function(), system, flag),
                None => write!(f, "controlsys.{}({})", kind.function(), system),
            },
            Instruction::StepInfo { target, system } => {
                write!(f, "{} = controlsys.step_info({})", target, system)
            }
            Instruction::Print { source, .. } => write!(f, "print({})", source),
            Instruction::Statement { source, .. } | Instruction::Invalid { source, .. } => {
                f.write_str(source)
            }
        }
    }
}

/// One instruction together with the script line it came from
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramLine {
    pub source_line: usize,
    pub instruction: Instruction,
}

/// The assembled unit handed to the sandbox
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    lines: Vec<ProgramLine>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, source_line: usize, instruction: Instruction) {
        self.lines.push(ProgramLine {
            source_line,
            instruction,
        });
    }

    pub fn lines(&self) -> &[ProgramLine] {
        &self.lines
    }

    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.lines.iter().map(|line| &line.instruction)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines rejected by the statement grammar, with their 1-based program line
    pub fn invalid_lines(&self) -> impl Iterator<Item = (usize, &ProgramLine)> {
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, line)| matches!(line.instruction, Instruction::Invalid { .. }))
            .map(|(index, line)| (index + 1, line))
    }

    /// One `SyntaxError` per rejected line, located in both the program and the script
    pub fn syntax_errors(&self) -> impl Iterator<Item = MatliteError> + '_ {
        self.invalid_lines()
            .filter_map(|(program_line, line)| match &line.instruction {
                Instruction::Invalid { source, error } => {
                    Some(MatliteError::Syntax(Box::new(SyntaxDetails {
                        message: error.message.clone(),
                        span: error.span.clone(),
                        location: Location {
                            program_line,
                            source_line: line.source_line,
                            text: source.clone(),
                        },
                    })))
                }
                _ => None,
            })
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, line) in self.lines.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", line.instruction)?;
        }
        Ok(())
    }
}
