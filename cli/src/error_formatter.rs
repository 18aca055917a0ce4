use ariadne::{Color, Label, Report, ReportKind, Source};
use matlite::MatliteError;

/// Format a MatliteError for the terminal; syntax errors get an Ariadne report
pub fn format_error(error: &MatliteError) -> String {
    match error {
        MatliteError::Syntax(details) => {
            let mut output = Vec::new();
            let source_id = format!(
                "program line {} (source line {})",
                details.location.program_line, details.location.source_line
            );
            let text = details.location.text.as_str();
            let start = char_offset(text, details.span.start);
            let end = char_offset(text, details.span.end).max(start + 1);

            let report = Report::build(ReportKind::Error, &source_id, start)
                .with_message(format!("SyntaxError: {}", details.message))
                .with_label(
                    Label::new((&source_id, start..end))
                        .with_message("the statement grammar stops here")
                        .with_color(Color::Red),
                )
                .with_help("only assignments, expressions and the supported commands are accepted");

            match report
                .finish()
                .write((&source_id, Source::from(text)), &mut output)
            {
                Ok(_) => String::from_utf8_lossy(&output).to_string(),
                Err(_) => error.report(),
            }
        }
        MatliteError::ResourceLimitExceeded {
            limit_name,
            limit_value,
            actual_value,
            suggestion,
        } => {
            format!(
                "Resource limit exceeded: {}\n  Limit: {}\n  Actual: {}\n  {}",
                limit_name, limit_value, actual_value, suggestion
            )
        }
        other => other.report(),
    }
}

fn char_offset(text: &str, byte_offset: usize) -> usize {
    let clamped = byte_offset.min(text.len());
    text.char_indices()
        .take_while(|(index, _)| *index < clamped)
        .count()
}
