use crate::capture::capture_figures;
use crate::error::MatliteError;
use crate::plot::RenderOptions;
use crate::program::Program;
use crate::result::{console_transcript, ExecutionResult};
use crate::runtime::Sandbox;
use crate::translator::Translator;
use crate::{MatliteResult, ResourceLimits};
use tracing::{debug, info};

/// The matlite pipeline: translate a script, run it in a sandbox, capture its figures.
///
/// An engine holds no per-run state, so one engine can serve any number of runs.
pub struct Engine {
    translator: Translator,
    sandbox: Sandbox,
    render: RenderOptions,
    limits: ResourceLimits,
}

impl Default for Engine {
    fn default() -> Self {
        Self::with_limits(ResourceLimits::default())
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with custom resource limits
    pub fn with_limits(limits: ResourceLimits) -> Self {
        Self {
            translator: Translator::with_max_depth(limits.max_expression_depth),
            sandbox: Sandbox::new(limits.clone()),
            render: RenderOptions::default(),
            limits,
        }
    }

    pub fn with_render_options(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }

    /// Get the current resource limits
    pub fn limits(&self) -> &ResourceLimits {
        &self.limits
    }

    pub fn render_options(&self) -> &RenderOptions {
        &self.render
    }

    /// Translate a script without running it
    pub fn translate(&self, code: &str) -> MatliteResult<Program> {
        if code.len() > self.limits.max_script_bytes {
            return Err(MatliteError::ResourceLimitExceeded {
                limit_name: "max_script_bytes".to_string(),
                limit_value: self.limits.max_script_bytes.to_string(),
                actual_value: code.len().to_string(),
                suggestion: "Split the script into smaller scripts.".to_string(),
            });
        }
        let lines = code.split('\n').count();
        if lines > self.limits.max_lines {
            return Err(MatliteError::ResourceLimitExceeded {
                limit_name: "max_lines".to_string(),
                limit_value: self.limits.max_lines.to_string(),
                actual_value: lines.to_string(),
                suggestion: "Split the script into smaller scripts.".to_string(),
            });
        }
        Ok(self.translator.translate(code))
    }

    /// Translate and execute a script. Every failure is reported inside the result.
    pub fn run(&self, code: &str) -> ExecutionResult {
        if code.trim().is_empty() {
            return ExecutionResult::no_code();
        }

        let program = match self.translate(code) {
            Ok(program) => program,
            Err(error) => return ExecutionResult::failed(String::new(), error.report()),
        };
        let program_text = program.to_string();

        let mut execution = self.sandbox.execute(&program);
        let console = console_transcript(&program_text, &execution.output);

        let result = match execution.outcome {
            Ok(()) => match capture_figures(&mut execution.figures, &self.render) {
                Ok(plots) => ExecutionResult::completed(plots, console),
                Err(error) => ExecutionResult::failed(console, error.report()),
            },
            Err(error) => {
                debug!(error = %error, "Run failed");
                ExecutionResult::failed(console, error.report())
            }
        };

        info!(
            success = result.success,
            plots = result.plots.len(),
            "Script executed"
        );
        result
    }
}
