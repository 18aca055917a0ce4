#![no_main]

use libfuzzer_sys::fuzz_target;
use matlite::Translator;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let program = Translator::new().translate(s);
        let _ = program.to_string();
    }
});
