//! The ordered rule table
//!
//! Each rule pairs a pattern with a production. Rewrites change the line and let later rules see
//! the result; emitting rules are terminal and produce the line's instructions.

use crate::ast::Span;
use crate::parser::{self, ParseFailure};
use crate::program::{
    AnalysisKind, Axis, Instruction, ResponseKind, RESPONSE_AMPLITUDE_VAR, RESPONSE_TIME_VAR,
};
use crate::translator::vector::{rewrite_vector, VECTOR_PATTERN};
use regex::{Captures, Regex};

/// Single-letter colour codes accepted by `step` and `impulse`
pub const COLOR_CODES: [(&str, &str); 7] = [
    ("r", "red"),
    ("g", "green"),
    ("b", "blue"),
    ("k", "black"),
    ("m", "magenta"),
    ("c", "cyan"),
    ("y", "yellow"),
];

/// Map a colour code to its name; unknown codes are passed through as colour names
pub fn color_name(code: &str) -> String {
    COLOR_CODES
        .iter()
        .find(|(short, _)| *short == code)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| code.to_string())
}

pub enum Production {
    /// Rewrite every match through a function; matching continues
    Rewrite(fn(&Captures<'_>) -> String),
    /// Replace every match with fixed text; matching continues
    Substitute(&'static str),
    /// Emit the line's instructions; matching stops
    Emit(fn(&Captures<'_>, usize) -> Vec<Instruction>),
}

pub enum RuleOutcome {
    NoMatch,
    Rewritten(String),
    Emitted(Vec<Instruction>),
}

pub struct TranslationRule {
    name: &'static str,
    pattern: Regex,
    production: Production,
}

impl TranslationRule {
    fn new(name: &'static str, pattern: &str, production: Production) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("built-in rule pattern is valid"),
            production,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Whether a match stops the cascade for this line
    pub fn is_terminal(&self) -> bool {
        matches!(self.production, Production::Emit(_))
    }

    pub fn apply(&self, line: &str, max_depth: usize) -> RuleOutcome {
        match &self.production {
            Production::Rewrite(rewrite) => {
                if !self.pattern.is_match(line) {
                    return RuleOutcome::NoMatch;
                }
                RuleOutcome::Rewritten(
                    self.pattern
                        .replace_all(line, |caps: &Captures<'_>| rewrite(caps))
                        .into_owned(),
                )
            }
            Production::Substitute(replacement) => {
                if !self.pattern.is_match(line) {
                    return RuleOutcome::NoMatch;
                }
                RuleOutcome::Rewritten(
                    self.pattern.replace_all(line, *replacement).into_owned(),
                )
            }
            Production::Emit(emit) => match self.pattern.captures(line) {
                Some(caps) => RuleOutcome::Emitted(emit(&caps, max_depth)),
                None => RuleOutcome::NoMatch,
            },
        }
    }
}

/// Bare library functions and the qualified calls they become
const SUBSTITUTIONS: [(&str, &str, &str); 10] = [
    ("tf", r"\btf\s*\(", "controlsys.tf("),
    ("conv", r"\bconv\s*\(", "numeric.convolve("),
    ("feedback", r"\bfeedback\s*\(", "controlsys.feedback("),
    ("pole", r"\bpole\s*\(", "controlsys.poles("),
    ("zero", r"\bzero\s*\(", "controlsys.zeros("),
    ("series", r"\bseries\s*\(", "controlsys.series("),
    ("parallel", r"\bparallel\s*\(", "controlsys.parallel("),
    ("dcgain", r"\bdcgain\s*\(", "controlsys.dcgain("),
    ("roots", r"\broots\s*\(", "numeric.roots("),
    ("polyval", r"\bpolyval\s*\(", "numeric.polyval("),
];

/// The standard cascade in priority order. The identity fallback is not part of the table.
pub fn standard_rules() -> Vec<TranslationRule> {
    let mut rules = vec![
        TranslationRule::new("vector", VECTOR_PATTERN, Production::Rewrite(rewrite_vector)),
        TranslationRule::new(
            "figure",
            r"(?i)^figure\s*(?:\(\s*(\d*)\s*\)|\s+(\d+))?$",
            Production::Emit(emit_figure),
        ),
        TranslationRule::new("hold", r"(?i)^hold\s+(?:on|off)$", Production::Emit(|_, _| vec![])),
        TranslationRule::new("grid", r"(?i)^grid\s+(on|off)$", Production::Emit(emit_grid)),
        TranslationRule::new(
            "title",
            r#"^title\s*\(\s*['"](.+)['"]\s*\)$"#,
            Production::Emit(|caps, _| vec![Instruction::Title(caps[1].to_string())]),
        ),
        TranslationRule::new(
            "axis_label",
            r#"^(xlabel|ylabel)\s*\(\s*['"](.+)['"]\s*\)$"#,
            Production::Emit(emit_axis_label),
        ),
        TranslationRule::new("legend", r"^legend\s*\((.+)\)$", Production::Emit(emit_legend)),
    ];

    rules.extend(
        SUBSTITUTIONS
            .iter()
            .map(|(name, pattern, replacement)| {
                TranslationRule::new(name, pattern, Production::Substitute(replacement))
            }),
    );

    rules.extend([
        TranslationRule::new(
            "time_response",
            r#"^(step|impulse)\s*\(\s*(\w+)\s*(?:,\s*['"]?(\w+)['"]?)?\s*\)$"#,
            Production::Emit(emit_time_response),
        ),
        TranslationRule::new(
            "analysis",
            r"^(pzmap|bode|margin|rlocus|nyquist)\s*\(\s*(\w+)\s*\)$",
            Production::Emit(emit_analysis),
        ),
        TranslationRule::new(
            "stepinfo",
            r"(?i)^(\w+)\s*=\s*stepinfo\s*\(\s*(\w+)\s*\)$",
            Production::Emit(emit_step_info),
        ),
        TranslationRule::new("disp", r"^disp\s*\(\s*(.+?)\s*\)$", Production::Emit(emit_disp)),
    ]);

    rules
}

fn emit_figure(caps: &Captures<'_>, _: usize) -> Vec<Instruction> {
    let digits = caps
        .get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str())
        .filter(|d| !d.is_empty());

    match digits {
        None => vec![Instruction::SelectFigure(1)],
        Some(digits) => match digits.parse::<u32>() {
            Ok(id) => vec![Instruction::SelectFigure(id)],
            Err(_) => {
                let source = format!("plot.figure({})", digits);
                let error = ParseFailure::new(
                    format!("figure number {} is out of range", digits),
                    Span {
                        start: 12,
                        end: source.len() - 1,
                        line: 1,
                        col: 13,
                    },
                );
                vec![Instruction::Invalid { source, error }]
            }
        },
    }
}

fn emit_grid(caps: &Captures<'_>, _: usize) -> Vec<Instruction> {
    vec![Instruction::SetGrid(caps[1].eq_ignore_ascii_case("on"))]
}

fn emit_axis_label(caps: &Captures<'_>, _: usize) -> Vec<Instruction> {
    let axis = if &caps[1] == "xlabel" { Axis::X } else { Axis::Y };
    vec![Instruction::AxisLabel {
        axis,
        text: caps[2].to_string(),
    }]
}

fn emit_legend(caps: &Captures<'_>, max_depth: usize) -> Vec<Instruction> {
    let source = caps[1].to_string();
    match parser::parse_expression_list(&source, max_depth) {
        Ok(entries) => vec![Instruction::Legend { source, entries }],
        Err(error) => vec![invalid("plot.legend([", &source, "])", error)],
    }
}

fn emit_time_response(caps: &Captures<'_>, _: usize) -> Vec<Instruction> {
    let kind = if &caps[1] == "step" {
        ResponseKind::Step
    } else {
        ResponseKind::Impulse
    };
    let system = caps[2].to_string();
    let color = caps.get(3).map(|m| color_name(m.as_str()));

    vec![
        Instruction::ComputeResponse { kind, system },
        Instruction::Plot {
            x: RESPONSE_TIME_VAR.to_string(),
            y: RESPONSE_AMPLITUDE_VAR.to_string(),
            color,
            label: Some(kind.label().to_string()),
        },
        Instruction::AxisLabel {
            axis: Axis::X,
            text: "Time (s)".to_string(),
        },
        Instruction::AxisLabel {
            axis: Axis::Y,
            text: "Amplitude".to_string(),
        },
    ]
}

fn emit_analysis(caps: &Captures<'_>, _: usize) -> Vec<Instruction> {
    let system = caps[2].to_string();
    let (kind, title) = match &caps[1] {
        "pzmap" => (AnalysisKind::PoleZeroMap, Some("Pole-Zero Map")),
        "bode" => (AnalysisKind::Bode, None),
        "margin" => (AnalysisKind::Margin, None),
        "rlocus" => (AnalysisKind::RootLocus, Some("Root Locus")),
        _ => (AnalysisKind::Nyquist, None),
    };

    let mut instructions = vec![Instruction::Analysis { kind, system }];
    if let Some(title) = title {
        instructions.push(Instruction::Title(title.to_string()));
    }
    instructions
}

fn emit_step_info(caps: &Captures<'_>, _: usize) -> Vec<Instruction> {
    let target = caps[1].to_string();
    vec![
        Instruction::StepInfo {
            target: target.clone(),
            system: caps[2].to_string(),
        },
        Instruction::Print {
            source: target.clone(),
            expr: crate::ast::Expr::Identifier(target),
        },
    ]
}

fn emit_disp(caps: &Captures<'_>, max_depth: usize) -> Vec<Instruction> {
    let source = caps[1].to_string();
    match parser::parse_expression(&source, max_depth) {
        Ok(expr) => vec![Instruction::Print { source, expr }],
        Err(error) => vec![invalid("print(", &source, ")", error)],
    }
}

/// Build an `Invalid` instruction whose text is the rendered call, shifting the failure span
/// from the argument text into the rendered line
pub(crate) fn invalid(prefix: &str, text: &str, suffix: &str, error: ParseFailure) -> Instruction {
    let shift = prefix.len();
    let span = Span {
        start: error.span.start + shift,
        end: error.span.end + shift,
        line: error.span.line,
        col: error.span.col + prefix.chars().count(),
    };
    Instruction::Invalid {
        source: format!("{}{}{}", prefix, text, suffix),
        error: ParseFailure::new(error.message, span),
    }
}
