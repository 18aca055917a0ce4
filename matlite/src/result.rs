use serde::{Deserialize, Serialize};

/// Error text returned for an empty or whitespace-only script
pub const NO_CODE_ERROR: &str = "No code provided";

/// One rendered figure: `plot_<figure id>` and its base64-encoded PNG
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub id: String,
    pub image: String,
}

/// Outcome of one run, as returned to callers
///
/// A failed run never carries artifacts and a successful run never carries an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    pub plots: Vec<Artifact>,
    pub console: String,
    pub error: Option<String>,
}

impl ExecutionResult {
    pub fn completed(plots: Vec<Artifact>, console: String) -> Self {
        Self {
            success: true,
            plots,
            console,
            error: None,
        }
    }

    pub fn failed(console: String, error: impl Into<String>) -> Self {
        Self {
            success: false,
            plots: vec![],
            console,
            error: Some(error.into()),
        }
    }

    pub fn no_code() -> Self {
        Self::failed(String::new(), NO_CODE_ERROR)
    }

    /// Failure outside the sandbox, such as a malformed request or a crashed worker
    pub fn server_error(message: &str, detail: &str) -> Self {
        Self::failed(String::new(), format!("Server error: {}\n{}", message, detail))
    }
}

/// Console text: the translated program first, then whatever the run printed
pub fn console_transcript(program: &str, output: &str) -> String {
    let mut console = format!("# Translated program:\n{}\n", program);
    if !output.is_empty() {
        console.push_str("\n# Output:\n");
        console.push_str(output);
    }
    console
}
