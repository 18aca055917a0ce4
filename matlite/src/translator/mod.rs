//! Line-by-line translation of MATLAB-style scripts into typed instructions

pub mod rules;
pub mod vector;

pub use rules::{color_name, standard_rules, RuleOutcome, TranslationRule};
pub use vector::{normalize_vector_body, normalize_vectors};

use crate::parser;
use crate::program::{Instruction, Program};
use tracing::debug;

const DEFAULT_MAX_DEPTH: usize = 64;

/// Applies the rule cascade to every line of a script
pub struct Translator {
    rules: Vec<TranslationRule>,
    max_depth: usize,
}

impl Default for Translator {
    fn default() -> Self {
        Self::new()
    }
}

impl Translator {
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    /// Translator whose statement parser rejects nesting deeper than `max_depth`
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            rules: standard_rules(),
            max_depth,
        }
    }

    pub fn rules(&self) -> &[TranslationRule] {
        &self.rules
    }

    /// Translate a whole script. Lines are numbered from 1 in the result.
    pub fn translate(&self, script: &str) -> Program {
        let mut program = Program::new();
        for (index, line) in script.split('\n').enumerate() {
            for instruction in self.translate_line(line) {
                program.push(index + 1, instruction);
            }
        }
        debug!(
            source_lines = script.split('\n').count(),
            instructions = program.len(),
            invalid = program.invalid_lines().count(),
            "Translated script"
        );
        program
    }

    /// Translate one source line into zero or more instructions
    pub fn translate_line(&self, line: &str) -> Vec<Instruction> {
        let line = line.trim();
        if line.is_empty() {
            return vec![];
        }
        if let Some(comment) = line.strip_prefix('%') {
            return vec![Instruction::Comment(comment.to_string())];
        }

        split_statements(strip_trailing_comment(line))
            .into_iter()
            .flat_map(|statement| self.translate_statement(statement))
            .collect()
    }

    fn translate_statement(&self, statement: &str) -> Vec<Instruction> {
        let mut current = statement.to_string();
        for rule in &self.rules {
            match rule.apply(&current, self.max_depth) {
                RuleOutcome::NoMatch => {}
                RuleOutcome::Rewritten(rewritten) => current = rewritten,
                RuleOutcome::Emitted(instructions) => {
                    debug!(rule = rule.name(), line = %current, "Rule matched");
                    return instructions;
                }
            }
        }

        match parser::parse_statement(&current, self.max_depth) {
            Ok(stmt) => vec![Instruction::Statement {
                source: current,
                stmt,
            }],
            Err(error) => vec![Instruction::Invalid {
                source: current,
                error,
            }],
        }
    }
}

/// Statements separated by `;` outside quotes and brackets; empty pieces are dropped
fn split_statements(line: &str) -> Vec<&str> {
    let mut statements = Vec::new();
    let mut quote: Option<char> = None;
    let mut depth = 0usize;
    let mut start = 0;
    for (offset, ch) in line.char_indices() {
        match (quote, ch) {
            (Some(open), _) if ch == open => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(ch),
            (None, '(' | '[' | '{') => depth += 1,
            (None, ')' | ']' | '}') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                statements.push(&line[start..offset]);
                start = offset + 1;
            }
            _ => {}
        }
    }
    statements.push(&line[start..]);
    statements
        .into_iter()
        .map(str::trim)
        .filter(|statement| !statement.is_empty())
        .collect()
}

/// Drop a `%` comment that follows code, ignoring `%` inside quoted text
fn strip_trailing_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;
    for (offset, ch) in line.char_indices() {
        match (quote, ch) {
            (None, '\'' | '"') => quote = Some(ch),
            (Some(open), _) if ch == open => quote = None,
            (None, '%') => return &line[..offset],
            _ => {}
        }
    }
    line
}
