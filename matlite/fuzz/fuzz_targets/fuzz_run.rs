#![no_main]

use libfuzzer_sys::fuzz_target;
use matlite::{Engine, ResourceLimits};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let engine = Engine::with_limits(ResourceLimits {
            max_execution_time_ms: 1_000,
            max_figures: 4,
            ..ResourceLimits::default()
        });

        let result = engine.run(s);
        assert!(result.success != result.error.is_some());
    }
});
