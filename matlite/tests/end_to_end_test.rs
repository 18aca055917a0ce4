use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use matlite::{Engine, ExecutionResult, Instruction, Translator};

fn decode_png(result: &ExecutionResult, index: usize) -> image::DynamicImage {
    let bytes = STANDARD.decode(&result.plots[index].image).unwrap();
    image::load_from_memory(&bytes).unwrap()
}

#[test]
fn test_end_to_end_closed_loop_step() {
    let code = r#"
% Second-order plant under unity feedback
G = tf([1], [1 3 2]);
T = feedback(G, 1);
figure(1)
step(T, 'b')
grid on
title('Closed-loop step response')
disp(dcgain(T))
"#;

    let result = Engine::new().run(code);
    println!("Console: {}", result.console);

    assert!(result.success, "{:?}", result.error);
    assert_eq!(result.plots.len(), 1);
    assert_eq!(result.plots[0].id, "plot_1");
    assert!(result.console.contains("_t, _y = controlsys.step_response(T)"));
    assert!(result.console.ends_with("# Output:\n0.3333333333333333\n"));

    let image = decode_png(&result, 0);
    assert!(image.width() > 100);
    assert!(image.height() > 100);
}

#[test]
fn test_end_to_end_comment_only() {
    let result = Engine::new().run("% nothing to do\n% still nothing");
    assert!(result.success);
    assert!(result.plots.is_empty());
    assert!(result.error.is_none());
}

#[test]
fn test_end_to_end_figure_selection() {
    let translator = Translator::new();
    assert_eq!(
        translator.translate_line("figure(3)"),
        vec![Instruction::SelectFigure(3)]
    );
    assert_eq!(
        translator.translate_line("figure"),
        vec![Instruction::SelectFigure(1)]
    );

    let result = Engine::new().run("G = tf(1, [1 1])\nfigure(3)\nstep(G)");
    assert!(result.success);
    let ids: Vec<&str> = result.plots.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["plot_3"]);
}

#[test]
fn test_end_to_end_two_figures() {
    let code = r#"
G = tf(10, [1 2 10]);
figure(1)
step(G, 'r')
figure(2)
impulse(G, 'k')
"#;
    let result = Engine::new().run(code);
    assert!(result.success, "{:?}", result.error);
    let ids: Vec<&str> = result.plots.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["plot_1", "plot_2"]);
    assert_ne!(result.plots[0].image, result.plots[1].image);
}

#[test]
fn test_end_to_end_partial_output_on_error() {
    let code = "disp('partial')\nfigure(1)\nG = tf(1, [1 1])\nstep(G)\nbogus(1)";
    let result = Engine::new().run(code);

    assert!(!result.success);
    assert!(result.console.contains("partial"));
    assert!(result.plots.is_empty());
    let error = result.error.unwrap();
    assert!(error.starts_with("NameError: name 'bogus' is not defined"));
    assert!(error.contains("(source line 5)"));
}

#[test]
fn test_end_to_end_repeat_runs() {
    let engine = Engine::new();
    let code = "G = tf(1, [1 1])\nfigure(1)\nstep(G)\nfigure(2)\nbode(G)";
    let counts: Vec<usize> = (0..3).map(|_| engine.run(code).plots.len()).collect();
    assert_eq!(counts, vec![2, 2, 2]);
}

#[test]
fn test_end_to_end_no_code() {
    let result = Engine::new().run("");
    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("No code provided"));
}

#[test]
fn test_end_to_end_laplace_variable() {
    let code = r#"
s = tf('s');
C = 2 + 1/s;
P = 1/(s^2 + s);
L = series(C, P);
T = feedback(L, 1);
disp(pole(T))
"#;
    let result = Engine::new().run(code);
    assert!(result.success, "{:?}", result.error);
    assert!(result.console.contains("print(controlsys.poles(T))"));
}

#[test]
fn test_end_to_end_hold_is_ignored() {
    let code = "G = tf(1, [1 1])\nH = tf(2, [1 2])\nhold on\nstep(G)\nstep(H)\nhold off\nlegend('G', 'H')";
    let result = Engine::new().run(code);
    assert!(result.success, "{:?}", result.error);
    assert_eq!(result.plots.len(), 1);
    assert!(!result.console.contains("hold"));
}

#[test]
fn test_end_to_end_statements_share_a_line() {
    let result = Engine::new().run("a = 1; b = a + 1\ndisp(b)");
    assert!(result.success, "{:?}", result.error);
    assert!(result.console.contains("a = 1\nb = a + 1\n"));
    assert!(result.console.ends_with("# Output:\n2\n"));

    let result = Engine::new().run("num = [1]; den = [1 2];\nG = tf(num, den);\ndisp(dcgain(G))");
    assert!(result.success, "{:?}", result.error);
    assert!(result.console.ends_with("# Output:\n0.5\n"));
}
