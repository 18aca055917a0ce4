use matlite::Engine;

fn run(code: &str) -> matlite::ExecutionResult {
    let result = Engine::new().run(code);
    assert!(result.success, "script failed: {:?}\n{}", result.error, result.console);
    result
}

#[test]
fn test_pole_zero_map_script() {
    let result = run("G = tf([1 3], [1 2 5]);\npzmap(G)");
    assert_eq!(result.plots.len(), 1);
    assert!(result.console.contains("plot.title('Pole-Zero Map')"));
}

#[test]
fn test_bode_and_margin_scripts() {
    let result = run("G = tf(1, [1 3 2 0]);\nfigure(1)\nbode(G)\nfigure(2)\nmargin(G)");
    assert_eq!(result.plots.len(), 2);
    assert!(result
        .console
        .contains("controlsys.bode_plot(G, margins=True)"));
}

#[test]
fn test_root_locus_script() {
    let result = run("G = tf([1 1], conv([1 0], [1 2 2]));\nrlocus(G)");
    assert_eq!(result.plots.len(), 1);
    assert!(result.console.contains("plot.title('Root Locus')"));
}

#[test]
fn test_nyquist_script() {
    let result = run("G = tf(5, [1 2 1]);\nnyquist(G)");
    assert_eq!(result.plots.len(), 1);
}

#[test]
fn test_stepinfo_script_prints_metrics() {
    let result = run("G = tf(1, [1 0.4 1]);\nS = stepinfo(G)");
    assert!(result.console.contains("'Overshoot': 5"));
    assert!(result.console.contains("'SteadyStateValue': 1.0"));
}

#[test]
fn test_margins_as_values() {
    let result = run("G = tf(1, [1 3 2 0]);\nm = controlsys.stability_margins(G)\ndisp(m(1))");
    let output = result.console.split("# Output:\n").nth(1).unwrap();
    let gain_margin: f64 = output.trim().parse().unwrap();
    assert!((gain_margin - 6.0).abs() < 0.05);
}

#[test]
fn test_roots_and_zeros() {
    let result = run("r = roots([1 -3 2])\ndisp(r(2))\nz = zero(tf([1 4], [1 1]))\ndisp(z)");
    assert!(result.console.contains("# Output:\n"));
    let output = result.console.split("# Output:\n").nth(1).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("1.0") || lines[0].starts_with("0.9999"));
    assert!(lines[1].starts_with("[-4.0") || lines[1].starts_with("[-3.9999"));
}

#[test]
fn test_improper_system_step_fails() {
    let result = Engine::new().run("G = tf([1 0 0], [1 1]);\nstep(G)");
    assert!(!result.success);
    let error = result.error.unwrap();
    assert!(error.starts_with("ControlError"));
    assert!(error.contains("in controlsys.step_response"));
}
