use crate::ast::{Expr, Stmt};
use crate::program::{AnalysisKind, Axis, Instruction, ResponseKind};
use crate::Translator;

fn rendered(line: &str) -> Vec<String> {
    Translator::new()
        .translate_line(line)
        .iter()
        .map(|i| i.to_string())
        .collect()
}

#[test]
fn test_blank_lines_emit_nothing() {
    let translator = Translator::new();
    assert!(translator.translate_line("").is_empty());
    assert!(translator.translate_line("   \t ").is_empty());
    assert!(translator.translate_line(";").is_empty());
}

#[test]
fn test_comment_line_becomes_host_comment() {
    let instructions = Translator::new().translate_line("  % plant model");
    assert_eq!(
        instructions,
        vec![Instruction::Comment(" plant model".to_string())]
    );
    assert_eq!(instructions[0].to_string(), "# plant model");
}

#[test]
fn test_figure_forms() {
    let translator = Translator::new();
    assert_eq!(
        translator.translate_line("figure(3)"),
        vec![Instruction::SelectFigure(3)]
    );
    assert_eq!(
        translator.translate_line("figure"),
        vec![Instruction::SelectFigure(1)]
    );
    assert_eq!(
        translator.translate_line("figure()"),
        vec![Instruction::SelectFigure(1)]
    );
    assert_eq!(
        translator.translate_line("FIGURE 2;"),
        vec![Instruction::SelectFigure(2)]
    );
}

#[test]
fn test_figure_number_out_of_range_is_invalid() {
    let instructions = Translator::new().translate_line("figure(99999999999)");
    assert_eq!(instructions.len(), 1);
    match &instructions[0] {
        Instruction::Invalid { source, error } => {
            assert_eq!(source, "plot.figure(99999999999)");
            assert!(error.message.contains("out of range"));
        }
        other => panic!("expected invalid instruction, got {:?}", other),
    }
}

#[test]
fn test_hold_is_dropped() {
    let translator = Translator::new();
    assert!(translator.translate_line("hold on").is_empty());
    assert!(translator.translate_line("HOLD OFF;").is_empty());
}

#[test]
fn test_grid_toggles() {
    let translator = Translator::new();
    assert_eq!(
        translator.translate_line("grid on"),
        vec![Instruction::SetGrid(true)]
    );
    assert_eq!(
        translator.translate_line("Grid Off"),
        vec![Instruction::SetGrid(false)]
    );
}

#[test]
fn test_title_and_axis_labels() {
    let translator = Translator::new();
    assert_eq!(
        translator.translate_line("title('Closed loop')"),
        vec![Instruction::Title("Closed loop".to_string())]
    );
    assert_eq!(
        translator.translate_line("xlabel(\"Time\")"),
        vec![Instruction::AxisLabel {
            axis: Axis::X,
            text: "Time".to_string()
        }]
    );
    assert_eq!(rendered("ylabel('Output')"), vec!["plot.ylabel('Output')"]);
}

#[test]
fn test_percent_inside_quotes_is_not_a_comment() {
    assert_eq!(rendered("title('50% overshoot')"), vec!["plot.title('50% overshoot')"]);
}

#[test]
fn test_trailing_comment_is_stripped() {
    assert_eq!(rendered("x = 1 % one"), vec!["x = 1"]);
    assert_eq!(rendered("grid on % show grid"), vec!["plot.grid(True)"]);
}

#[test]
fn test_legend_entries_are_parsed() {
    let instructions = Translator::new().translate_line("legend('open', 'closed')");
    assert_eq!(
        instructions,
        vec![Instruction::Legend {
            source: "'open', 'closed'".to_string(),
            entries: vec![
                Expr::Text("open".to_string()),
                Expr::Text("closed".to_string())
            ],
        }]
    );
    assert_eq!(instructions[0].to_string(), "plot.legend(['open', 'closed'])");
}

#[test]
fn test_step_with_color_code() {
    let instructions = Translator::new().translate_line("step(sys, 'r')");
    assert_eq!(instructions.len(), 4);
    assert_eq!(
        instructions[0],
        Instruction::ComputeResponse {
            kind: ResponseKind::Step,
            system: "sys".to_string()
        }
    );
    assert_eq!(
        rendered("step(sys,'r')"),
        vec![
            "_t, _y = controlsys.step_response(sys)",
            "plot.plot(_t, _y, color='red', label='Step Response')",
            "plot.xlabel('Time (s)')",
            "plot.ylabel('Amplitude')",
        ]
    );
}

#[test]
fn test_impulse_without_color() {
    assert_eq!(
        rendered("impulse(G)"),
        vec![
            "_t, _y = controlsys.impulse_response(G)",
            "plot.plot(_t, _y, label='Impulse Response')",
            "plot.xlabel('Time (s)')",
            "plot.ylabel('Amplitude')",
        ]
    );
}

#[test]
fn test_unknown_color_code_passes_through() {
    let instructions = Translator::new().translate_line("step(G, orange)");
    match &instructions[1] {
        Instruction::Plot { color, .. } => assert_eq!(color.as_deref(), Some("orange")),
        other => panic!("expected plot instruction, got {:?}", other),
    }
}

#[test]
fn test_analysis_commands() {
    assert_eq!(
        rendered("pzmap(G)"),
        vec!["controlsys.pzmap(G, plot=True)", "plot.title('Pole-Zero Map')"]
    );
    assert_eq!(rendered("bode(G)"), vec!["controlsys.bode_plot(G)"]);
    assert_eq!(
        rendered("margin(G)"),
        vec!["controlsys.bode_plot(G, margins=True)"]
    );
    assert_eq!(
        rendered("rlocus(G)"),
        vec!["controlsys.root_locus(G, plot=True)", "plot.title('Root Locus')"]
    );
    assert_eq!(rendered("nyquist(G)"), vec!["controlsys.nyquist_plot(G)"]);

    let instructions = Translator::new().translate_line("margin(L);");
    assert_eq!(
        instructions,
        vec![Instruction::Analysis {
            kind: AnalysisKind::Margin,
            system: "L".to_string()
        }]
    );
}

#[test]
fn test_stepinfo_assigns_and_prints() {
    assert_eq!(
        rendered("S = stepinfo(G)"),
        vec!["S = controlsys.step_info(G)", "print(S)"]
    );
}

#[test]
fn test_disp_becomes_print() {
    let instructions = Translator::new().translate_line("disp(x + 1)");
    assert_eq!(instructions.len(), 1);
    assert_eq!(instructions[0].to_string(), "print(x + 1)");
    assert!(matches!(instructions[0], Instruction::Print { .. }));
}

#[test]
fn test_disp_with_bad_expression_is_invalid() {
    let instructions = Translator::new().translate_line("disp(1 +)");
    match &instructions[0] {
        Instruction::Invalid { source, error } => {
            assert_eq!(source, "print(1 +)");
            assert!(error.span.col > "print(".len());
        }
        other => panic!("expected invalid instruction, got {:?}", other),
    }
}

#[test]
fn test_library_functions_are_qualified() {
    assert_eq!(
        rendered("G = tf([1], [1 2 1]);"),
        vec!["G = controlsys.tf([1], [1, 2, 1])"]
    );
    assert_eq!(
        rendered("H = feedback(series(C, G), 1)"),
        vec!["H = controlsys.feedback(controlsys.series(C, G), 1)"]
    );
    assert_eq!(
        rendered("p = conv([1 1], [1 2])"),
        vec!["p = numeric.convolve([1, 1], [1, 2])"]
    );
    assert_eq!(rendered("r = roots(p)"), vec!["r = numeric.roots(p)"]);
    assert_eq!(rendered("k = dcgain(G)"), vec!["k = controlsys.dcgain(G)"]);
}

#[test]
fn test_substitution_respects_word_boundaries() {
    assert_eq!(rendered("y = mytf(1)"), vec!["y = mytf(1)"]);
    assert_eq!(rendered("z = zeros_count"), vec!["z = zeros_count"]);
}

#[test]
fn test_pass_through_statement_is_parsed() {
    let instructions = Translator::new().translate_line("x = 2 * y");
    match &instructions[0] {
        Instruction::Statement { source, stmt } => {
            assert_eq!(source, "x = 2 * y");
            assert!(matches!(stmt, Stmt::Assign { target, .. } if target == "x"));
        }
        other => panic!("expected statement, got {:?}", other),
    }
}

#[test]
fn test_semicolons_separate_statements() {
    assert_eq!(
        rendered("num = [1]; den = [1 2];"),
        vec!["num = [1]", "den = [1, 2]"]
    );
    assert_eq!(rendered("a = 1; b = a + 1"), vec!["a = 1", "b = a + 1"]);
    assert_eq!(
        rendered("disp('a; b'); x = 2"),
        vec!["print('a; b')", "x = 2"]
    );
}

#[test]
fn test_each_statement_goes_through_the_rules() {
    let instructions = Translator::new().translate_line("G = tf(1, [1 1]); step(G)  % plant");
    assert!(matches!(instructions[0], Instruction::Statement { .. }));
    assert!(matches!(
        instructions[1],
        Instruction::ComputeResponse { kind: ResponseKind::Step, .. }
    ));
}

#[test]
fn test_unparseable_line_is_invalid() {
    let instructions = Translator::new().translate_line("x = = 2");
    assert!(matches!(instructions[0], Instruction::Invalid { .. }));

    let instructions = Translator::new().translate_line("for k = 1:10");
    assert!(matches!(instructions[0], Instruction::Invalid { .. }));
}

#[test]
fn test_translate_numbers_source_lines() {
    let program = Translator::new().translate("% header\n\nstep(G)\ngrid on");
    let source_lines: Vec<usize> = program.lines().iter().map(|l| l.source_line).collect();
    assert_eq!(source_lines, vec![1, 3, 3, 3, 3, 4]);
    assert_eq!(program.invalid_lines().count(), 0);
}

#[test]
fn test_translated_program_text() {
    let script = "% Closed loop\nG = tf([1], [1 3 2]);\nH = feedback(G, 1);\nfigure(1)\nstep(H, 'b')\ngrid on\ndisp(dcgain(H))";
    let program = Translator::new().translate(script);

    insta::assert_snapshot!(program.to_string(), @r###"
    # Closed loop
    G = controlsys.tf([1], [1, 3, 2])
    H = controlsys.feedback(G, 1)
    plot.figure(1)
    _t, _y = controlsys.step_response(H)
    plot.plot(_t, _y, color='blue', label='Step Response')
    plot.xlabel('Time (s)')
    plot.ylabel('Amplitude')
    plot.grid(True)
    print(controlsys.dcgain(H))
    "###);
}

#[test]
fn test_rule_table_order() {
    let translator = Translator::new();
    let names: Vec<&str> = translator.rules().iter().map(|r| r.name()).collect();
    assert_eq!(names.first(), Some(&"vector"));
    assert_eq!(names.last(), Some(&"disp"));

    let position = |name: &str| names.iter().position(|n| *n == name).unwrap();
    assert!(position("tf") < position("time_response"));
    assert!(position("figure") < position("tf"));

    let terminal = translator
        .rules()
        .iter()
        .filter(|r| r.is_terminal())
        .count();
    assert_eq!(terminal, 10);
}

#[test]
fn test_syntax_errors_locate_rejected_lines() {
    let program = Translator::new().translate("% setup\nx = 1\ny = = 2\n\nfor k = 1:10");
    let errors: Vec<_> = program.syntax_errors().collect();
    assert_eq!(errors.len(), 2);

    match &errors[0] {
        crate::MatliteError::Syntax(details) => {
            assert_eq!(details.location.source_line, 3);
            assert_eq!(details.location.text, "y = = 2");
        }
        other => panic!("expected a syntax error, got {:?}", other),
    }
    match &errors[1] {
        crate::MatliteError::Syntax(details) => assert_eq!(details.location.source_line, 5),
        other => panic!("expected a syntax error, got {:?}", other),
    }
}
