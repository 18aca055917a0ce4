//! Deadline tracking for program execution
//!
//! On native targets elapsed time comes from `std::time::Instant`. On WASM the check is a no-op
//! since `Instant` is not available in the wasm32 target.

use crate::error::MatliteError;

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Deadline for one run
///
/// Checked between instructions, before every library call and periodically inside long
/// numeric loops.
#[derive(Debug, Clone)]
pub struct TimeoutTracker {
    limit_ms: u64,
    #[cfg(not(target_arch = "wasm32"))]
    start_time: Instant,
}

impl TimeoutTracker {
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new(limit_ms: u64) -> Self {
        Self {
            limit_ms,
            start_time: Instant::now(),
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn new(limit_ms: u64) -> Self {
        Self { limit_ms }
    }

    pub fn limit_ms(&self) -> u64 {
        self.limit_ms
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn elapsed_ms(&self) -> u64 {
        self.start_time.elapsed().as_millis() as u64
    }

    #[cfg(target_arch = "wasm32")]
    pub fn elapsed_ms(&self) -> u64 {
        0
    }

    /// Fail with [`MatliteError::Timeout`] once the limit has passed
    pub fn check_timeout(&self) -> Result<(), MatliteError> {
        let elapsed_ms = self.elapsed_ms();
        if elapsed_ms > self.limit_ms {
            return Err(MatliteError::Timeout {
                limit_ms: self.limit_ms,
                elapsed_ms,
            });
        }
        Ok(())
    }
}
