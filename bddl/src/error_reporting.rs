//! Source locations and caret-style diagnostics for BDDL text.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 1-based line/column range inside a BDDL source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

impl SourceSpan {
    pub fn new(start_line: usize, start_column: usize, end_line: usize, end_column: usize) -> Self {
        Self {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }

    pub fn point(line: usize, column: usize) -> Self {
        Self::new(line, column, line, column)
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_column)
    }
}

/// Renders `message` with the offending source line and a caret under the column.
pub fn render_diagnostic(
    source: &str,
    file_path: Option<&str>,
    span: Option<SourceSpan>,
    message: &str,
) -> String {
    let location = file_path.unwrap_or("<input>");
    let Some(span) = span else {
        return format!("error: {}\n  --> {}", message, location);
    };

    let line_text = source.lines().nth(span.start_line.saturating_sub(1)).unwrap_or("");
    let gutter = span.start_line.to_string();
    let pad = " ".repeat(gutter.len());
    let caret_pad = " ".repeat(span.start_column.saturating_sub(1));
    format!(
        "error: {message}\n{pad}--> {location}:{span}\n{pad} |\n{gutter} | {line_text}\n{pad} | {caret_pad}^"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_points_at_column() {
        let rendered = render_diagnostic(
            "(define\n  (:goal ))",
            Some("task.bddl"),
            Some(SourceSpan::point(2, 3)),
            "empty goal",
        );
        assert!(rendered.contains("task.bddl:2:3"));
        assert!(rendered.ends_with("  ^"));
    }
}
