use crate::ast::Span;
use std::fmt;
use thiserror::Error;

/// Where in the translated program a failure happened
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    /// 1-based line in the translated program
    pub program_line: usize,
    /// 1-based line in the submitted script
    pub source_line: usize,
    /// Rendered text of the failing statement
    pub text: String,
}

/// Call stack of a runtime failure, outermost first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Traceback {
    pub location: Option<Location>,
    pub calls: Vec<String>,
}

impl fmt::Display for Traceback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Traceback (most recent call last):")?;
        match &self.location {
            Some(location) => write!(
                f,
                "  program line {} (source line {}): {}",
                location.program_line, location.source_line, location.text
            )?,
            None => write!(f, "  <program>")?,
        }
        for call in &self.calls {
            write!(f, "\n    in {}", call)?;
        }
        Ok(())
    }
}

/// Category of a runtime failure, named the way users of scripting hosts expect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NameError,
    TypeError,
    ValueError,
    IndexError,
    AttributeError,
    ZeroDivisionError,
    ControlError,
    PlotError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::NameError => "NameError",
            ErrorKind::TypeError => "TypeError",
            ErrorKind::ValueError => "ValueError",
            ErrorKind::IndexError => "IndexError",
            ErrorKind::AttributeError => "AttributeError",
            ErrorKind::ZeroDivisionError => "ZeroDivisionError",
            ErrorKind::ControlError => "ControlError",
            ErrorKind::PlotError => "PlotError",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeDetails {
    pub kind: ErrorKind,
    pub message: String,
    pub traceback: Traceback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxDetails {
    pub message: String,
    /// Span inside `location.text`
    pub span: Span,
    pub location: Location,
}

/// Error types for the matlite pipeline
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatliteError {
    /// Rejected before translation
    #[error("{0}")]
    Input(String),

    /// A pass-through line that the statement grammar does not accept
    #[error("SyntaxError: {} (program line {})", .0.message, .0.location.program_line)]
    Syntax(Box<SyntaxDetails>),

    /// Failure raised while executing an instruction
    #[error("{}: {}", .0.kind, .0.message)]
    Runtime(Box<RuntimeDetails>),

    #[error("TimeoutError: execution took {elapsed_ms}ms, exceeding the limit of {limit_ms}ms")]
    Timeout { limit_ms: u64, elapsed_ms: u64 },

    #[error("Resource limit exceeded: {limit_name} (limit {limit_value}, actual {actual_value}). {suggestion}")]
    ResourceLimitExceeded {
        limit_name: String,
        limit_value: String,
        actual_value: String,
        suggestion: String,
    },

    #[error("RenderError: {0}")]
    Render(String),
}

impl MatliteError {
    pub fn runtime(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::Runtime(Box::new(RuntimeDetails {
            kind,
            message: message.into(),
            traceback: Traceback::default(),
        }))
    }

    pub fn name(name: &str) -> Self {
        Self::runtime(
            ErrorKind::NameError,
            format!("name '{}' is not defined", name),
        )
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::runtime(ErrorKind::TypeError, message)
    }

    pub fn value_error(message: impl Into<String>) -> Self {
        Self::runtime(ErrorKind::ValueError, message)
    }

    pub fn control(message: impl Into<String>) -> Self {
        Self::runtime(ErrorKind::ControlError, message)
    }

    pub fn plot(message: impl Into<String>) -> Self {
        Self::runtime(ErrorKind::PlotError, message)
    }

    /// Record that the error passed through a library call. Calls are added innermost first
    /// while unwinding, so they are inserted at the front.
    pub fn within_call(mut self, call: impl Into<String>) -> Self {
        if let Self::Runtime(details) = &mut self {
            details.traceback.calls.insert(0, call.into());
        }
        self
    }

    /// Attach the failing program line, unless a location is already known
    pub fn at(mut self, location: &Location) -> Self {
        if let Self::Runtime(details) = &mut self {
            if details.traceback.location.is_none() {
                details.traceback.location = Some(location.clone());
            }
        }
        self
    }

    /// Caller-facing text: the error line, followed by the traceback when one exists
    pub fn report(&self) -> String {
        match self {
            Self::Runtime(details) => format!("{}\n{}", self, details.traceback),
            Self::Syntax(details) => {
                let prefix = format!(
                    "  program line {} (source line {}): ",
                    details.location.program_line, details.location.source_line
                );
                let marker = " ".repeat(prefix.len() + details.span.col.max(1) - 1);
                format!(
                    "SyntaxError: {}\n{}{}\n{}^",
                    details.message, prefix, details.location.text, marker
                )
            }
            other => other.to_string(),
        }
    }
}

impl From<std::fmt::Error> for MatliteError {
    fn from(err: std::fmt::Error) -> Self {
        MatliteError::Render(format!("Format error: {}", err))
    }
}
