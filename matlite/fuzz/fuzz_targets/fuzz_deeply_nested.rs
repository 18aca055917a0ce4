#![no_main]

use libfuzzer_sys::fuzz_target;
use matlite::Engine;

fuzz_target!(|depth: u16| {
    let depth = depth as usize % 200 + 1;

    let mut expr = String::from("1");
    for _ in 0..depth {
        expr = format!("({} + 1)", expr);
    }

    let _ = Engine::new().run(&format!("x = {}\ndisp(x)", expr));
});
