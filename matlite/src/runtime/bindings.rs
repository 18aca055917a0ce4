//! The fixed names every program can reach: `numeric`, `plot`, `controlsys` and `print`

use crate::control::TransferFunction;
use crate::error::{ErrorKind, MatliteError};
use crate::runtime::context::ExecutionContext;
use crate::runtime::libraries::{ControlLibrary, NumericLibrary, PlotLibrary};
use crate::runtime::value::{Callable, Value};
use crate::MatliteResult;

/// A module of callable functions
pub trait Library: Send + Sync {
    fn name(&self) -> &'static str;

    fn functions(&self) -> &'static [&'static str];

    fn call(
        &self,
        function: &str,
        args: Arguments,
        context: &mut ExecutionContext,
    ) -> MatliteResult<Value>;
}

/// Mapping from bound names to libraries; identical for every run
pub struct Bindings {
    libraries: Vec<Box<dyn Library>>,
}

impl Bindings {
    pub fn standard() -> Self {
        Self {
            libraries: vec![
                Box::new(NumericLibrary),
                Box::new(PlotLibrary),
                Box::new(ControlLibrary),
            ],
        }
    }

    pub fn library(&self, name: &str) -> Option<&dyn Library> {
        self.libraries
            .iter()
            .find(|library| library.name() == name)
            .map(|library| library.as_ref())
    }

    /// Value bound to a top-level name
    pub fn lookup(&self, name: &str) -> Option<Value> {
        if name == "print" {
            return Some(Value::Function(Callable::Print));
        }
        self.library(name).map(|library| Value::Module(library.name()))
    }

    /// Function value for `module.name`
    pub fn member(&self, module: &str, name: &str) -> MatliteResult<Value> {
        let library = self.library(module).ok_or_else(|| MatliteError::name(module))?;
        library
            .functions()
            .iter()
            .copied()
            .find(|function| *function == name)
            .map(|function| {
                Value::Function(Callable::Library {
                    module: library.name(),
                    function,
                })
            })
            .ok_or_else(|| {
                MatliteError::runtime(
                    ErrorKind::AttributeError,
                    format!("module '{}' has no attribute '{}'", module, name),
                )
            })
    }

    /// Invoke `module.function`. Errors record the call in their traceback.
    pub fn call(
        &self,
        module: &str,
        function: &str,
        values: Vec<Value>,
        context: &mut ExecutionContext,
    ) -> MatliteResult<Value> {
        let call = format!("{}.{}", module, function);
        context.check_timeout()?;
        let library = self.library(module).ok_or_else(|| MatliteError::name(module))?;
        library
            .call(function, Arguments::new(call.clone(), values), context)
            .map_err(|e| e.within_call(call))
    }
}

/// Positional arguments of one library call, with typed accessors that produce
/// consistent error messages
pub struct Arguments {
    call: String,
    values: Vec<Value>,
}

impl Arguments {
    pub fn new(call: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            call: call.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Present and not `None`
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index).filter(|v| **v != Value::None)
    }

    pub fn expect_count(&self, min: usize, max: usize) -> MatliteResult<()> {
        let count = self.values.len();
        if count < min || count > max {
            let expected = if min == max {
                format!("{}", min)
            } else {
                format!("{} to {}", min, max)
            };
            return Err(MatliteError::type_error(format!(
                "{}() takes {} positional arguments but {} were given",
                self.call, expected, count
            )));
        }
        Ok(())
    }

    fn required(&self, index: usize, name: &str) -> MatliteResult<&Value> {
        self.get(index).ok_or_else(|| {
            MatliteError::type_error(format!(
                "{}() missing required argument '{}'",
                self.call, name
            ))
        })
    }

    fn wrong_type(&self, name: &str, expected: &str, value: &Value) -> MatliteError {
        MatliteError::type_error(format!(
            "{}() argument '{}' must be {}, not {}",
            self.call,
            name,
            expected,
            value.type_name()
        ))
    }

    pub fn value(&self, index: usize, name: &str) -> MatliteResult<&Value> {
        self.required(index, name)
    }

    pub fn number(&self, index: usize, name: &str) -> MatliteResult<f64> {
        let value = self.required(index, name)?;
        value
            .as_number()
            .ok_or_else(|| self.wrong_type(name, "a number", value))
    }

    pub fn optional_number(&self, index: usize, name: &str, default: f64) -> MatliteResult<f64> {
        match self.get(index) {
            Some(_) => self.number(index, name),
            None => Ok(default),
        }
    }

    pub fn vector(&self, index: usize, name: &str) -> MatliteResult<Vec<f64>> {
        let value = self.required(index, name)?;
        value
            .as_vector()
            .ok_or_else(|| self.wrong_type(name, "a number or a numeric vector", value))
    }

    pub fn text(&self, index: usize, name: &str) -> MatliteResult<String> {
        match self.required(index, name)? {
            Value::Text(text) => Ok(text.clone()),
            other => Err(self.wrong_type(name, "a string", other)),
        }
    }

    pub fn optional_text(&self, index: usize, name: &str) -> MatliteResult<Option<String>> {
        match self.get(index) {
            Some(_) => self.text(index, name).map(Some),
            None => Ok(None),
        }
    }

    pub fn flag(&self, index: usize, name: &str, default: bool) -> MatliteResult<bool> {
        match self.get(index) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(other) => other
                .as_number()
                .map(|n| n != 0.0)
                .ok_or_else(|| self.wrong_type(name, "a boolean", other)),
        }
    }

    /// A transfer function; plain numbers are accepted as static gains
    pub fn system(&self, index: usize, name: &str) -> MatliteResult<TransferFunction> {
        match self.required(index, name)? {
            Value::System(system) => Ok(system.clone()),
            other => match other.as_number() {
                Some(gain) => TransferFunction::gain(gain),
                None => Err(self.wrong_type(name, "a transfer function", other)),
            },
        }
    }

    pub fn systems(&self, name: &str) -> MatliteResult<Vec<TransferFunction>> {
        (0..self.values.len())
            .map(|index| self.system(index, name))
            .collect()
    }
}
