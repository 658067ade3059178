use crate::error_reporting::SourceSpan;
use crate::parser::Rule;
use pest::error::{Error as PestError, LineColLocation};
use pest::iterators::Pair;

fn display_span(span: &Option<SourceSpan>) -> String {
    span.map(|s| format!(" at {}", s)).unwrap_or_default()
}

/// Errors produced while reading BDDL text into a [`crate::ast::Problem`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("syntax error at {span}: {message}")]
    Syntax { message: String, span: SourceSpan },

    #[error("invalid input{}: {message}", display_span(.span))]
    InvalidInput {
        message: String,
        span: Option<SourceSpan>,
    },

    #[error("missing required section ':{0}'")]
    MissingSection(String),

    #[error("duplicate section ':{section}' at {span}")]
    DuplicateSection { section: String, span: SourceSpan },
}

impl ParseError {
    pub fn span(&self) -> Option<SourceSpan> {
        match self {
            ParseError::Syntax { span, .. } => Some(*span),
            ParseError::InvalidInput { span, .. } => *span,
            ParseError::MissingSection(_) => None,
            ParseError::DuplicateSection { span, .. } => Some(*span),
        }
    }

    /// The bare message without location, for diagnostics that print the span separately.
    pub fn message(&self) -> String {
        match self {
            ParseError::Syntax { message, .. } | ParseError::InvalidInput { message, .. } => {
                message.clone()
            }
            ParseError::MissingSection(section) => {
                format!("missing required section ':{}'", section)
            }
            ParseError::DuplicateSection { section, .. } => {
                format!("duplicate section ':{}'", section)
            }
        }
    }
}

impl From<PestError<Rule>> for ParseError {
    fn from(error: PestError<Rule>) -> Self {
        let span = match error.line_col {
            LineColLocation::Pos((line, col)) => SourceSpan::point(line, col),
            LineColLocation::Span((l1, c1), (l2, c2)) => SourceSpan::new(l1, c1, l2, c2),
        };
        ParseError::Syntax {
            message: error.variant.message().to_string(),
            span,
        }
    }
}

pub fn pair_to_source_span(pair: &Pair<Rule>) -> SourceSpan {
    let span = pair.as_span();
    let (start_line, start_column) = span.start_pos().line_col();
    let (end_line, end_column) = span.end_pos().line_col();
    SourceSpan::new(start_line, start_column, end_line, end_column)
}

pub fn invalid_input_error(message: impl Into<String>, span: SourceSpan) -> ParseError {
    ParseError::InvalidInput {
        message: message.into(),
        span: Some(span),
    }
}
