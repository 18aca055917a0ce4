//! Execution context for running one translated program
//!
//! Contains all state a run accumulates: program variables, the figures drawn so far and the
//! captured print output.

use crate::plot::FigureRegistry;
use crate::runtime::timeout::TimeoutTracker;
use crate::runtime::Value;
use crate::{MatliteResult, ResourceLimits};
use std::collections::HashMap;

pub struct ExecutionContext {
    /// Program variables; they shadow the bound library names
    pub variables: HashMap<String, Value>,

    /// Figures created during this run
    pub figures: FigureRegistry,

    /// Everything printed so far
    pub output: String,

    pub limits: ResourceLimits,

    timeout: TimeoutTracker,
}

impl ExecutionContext {
    pub fn new(limits: ResourceLimits) -> Self {
        Self {
            variables: HashMap::new(),
            figures: FigureRegistry::new(limits.max_figures),
            output: String::new(),
            timeout: TimeoutTracker::new(limits.max_execution_time_ms),
            limits,
        }
    }

    pub fn timeout(&self) -> &TimeoutTracker {
        &self.timeout
    }

    pub fn check_timeout(&self) -> MatliteResult<()> {
        self.timeout.check_timeout()
    }

    /// Append one printed line to the captured output
    pub fn print_line(&mut self, text: &str) {
        self.output.push_str(text);
        self.output.push('\n');
    }

    pub fn assign(&mut self, name: impl Into<String>, value: Value) {
        self.variables.insert(name.into(), value);
    }
}
