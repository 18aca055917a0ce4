/// Resource limits that keep a single run bounded
///
/// Scripts are typed by people into a browser editor, so real usage sits far below every limit.
#[derive(Debug, Clone)]
pub struct ResourceLimits {
    /// Maximum script size in bytes
    /// Real usage: ~1KB, Limit: 64KB
    pub max_script_bytes: usize,

    /// Maximum number of script lines
    /// Real usage: ~40 lines, Limit: 2000
    pub max_lines: usize,

    /// Maximum bracket/parenthesis nesting inside one statement
    pub max_expression_depth: usize,

    /// Maximum wall-clock time for executing a translated program
    /// Checked between instructions and before every library call
    pub max_execution_time_ms: u64,

    /// Maximum number of simultaneously open figures
    pub max_figures: usize,

    /// Maximum number of samples in a simulated time response
    pub max_samples: usize,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_script_bytes: 64 * 1024, // 64 KB
            max_lines: 2000,
            max_expression_depth: 64,
            max_execution_time_ms: 10_000, // 10 seconds
            max_figures: 32,
            max_samples: 20_000,
        }
    }
}

impl ResourceLimits {
    pub fn new() -> Self {
        Self::default()
    }
}
