//! # matlite
//!
//! **MATLAB-style control scripts, translated and run in a sandbox**
//!
//! matlite takes a short script written in MATLAB-like syntax, translates it line by line into
//! typed instructions against a numeric, plotting and control-systems library, executes them in
//! isolation and returns the printed output and every figure as a base64-encoded PNG.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use matlite::Engine;
//!
//! let engine = Engine::new();
//! let result = engine.run(r#"
//!     G = tf([1], [1 2 1]);
//!     figure(1)
//!     step(G, 'r')
//!     grid on
//!     disp(dcgain(G))
//! "#);
//!
//! assert!(result.success);
//! println!("{}", result.console);
//! ```
//!
//! ## Pipeline
//!
//! ### Translation
//! Every line runs through an ordered rule table: vector literals are normalized, known commands
//! (`figure`, `step`, `bode`, ...) become dedicated instructions, library names are qualified and
//! whatever remains is parsed as an assignment or expression.
//!
//! ### Execution
//! The translated [`Program`] runs against a fresh set of variables and figures. The first
//! failing instruction stops the run with a traceback; output printed before it is kept.
//!
//! ### Capture
//! After a successful run each figure is rendered, cropped to its content and encoded as PNG.

pub mod ast;
pub mod capture;
pub mod control;
pub mod engine;
pub mod error;
pub mod parser;
pub mod plot;
pub mod program;
pub mod resource_limits;
pub mod result;
pub mod runtime;
pub mod translator;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use ast::Span;
pub use engine::Engine;
pub use error::{ErrorKind, MatliteError};
pub use plot::RenderOptions;
pub use program::{Instruction, Program, ProgramLine};
pub use resource_limits::ResourceLimits;
pub use result::{Artifact, ExecutionResult};
pub use translator::Translator;

/// Result type for matlite operations
pub type MatliteResult<T> = Result<T, MatliteError>;

#[cfg(test)]
mod tests;
