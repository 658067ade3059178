use crate::error_reporting::SourceSpan;
use crate::parser::errors::{invalid_input_error, pair_to_source_span, ParseError};
use crate::parser::Rule;
use pest::iterators::Pair;

/// Untyped s-expression node with its source location.
#[derive(Debug, Clone, PartialEq)]
pub enum SExpr {
    List(Vec<SExpr>, SourceSpan),
    Symbol(String, SourceSpan),
    /// Keyword name without the leading `:`.
    Keyword(String, SourceSpan),
    /// Parsed value and the token exactly as written.
    Number(f64, String, SourceSpan),
}

impl SExpr {
    pub fn span(&self) -> SourceSpan {
        match self {
            SExpr::List(_, span)
            | SExpr::Symbol(_, span)
            | SExpr::Keyword(_, span)
            | SExpr::Number(_, _, span) => *span,
        }
    }

    pub fn as_list(&self) -> Option<&[SExpr]> {
        match self {
            SExpr::List(items, _) => Some(items),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            SExpr::Symbol(s, _) => Some(s),
            _ => None,
        }
    }

    pub fn as_keyword(&self) -> Option<&str> {
        match self {
            SExpr::Keyword(k, _) => Some(k),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            SExpr::Number(n, _, _) => Some(*n),
            _ => None,
        }
    }

    /// Source text of an atom, used when a section takes free-form words.
    pub fn atom_text(&self) -> Option<String> {
        match self {
            SExpr::Symbol(s, _) => Some(s.clone()),
            SExpr::Keyword(k, _) => Some(format!(":{}", k)),
            SExpr::Number(_, text, _) => Some(text.clone()),
            SExpr::List(..) => None,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            SExpr::List(..) => "list",
            SExpr::Symbol(..) => "symbol",
            SExpr::Keyword(..) => "keyword",
            SExpr::Number(..) => "number",
        }
    }
}

pub fn build_sexpr(pair: Pair<Rule>) -> Result<SExpr, ParseError> {
    let span = pair_to_source_span(&pair);
    match pair.as_rule() {
        Rule::list => {
            let items = pair
                .into_inner()
                .map(build_sexpr)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(SExpr::List(items, span))
        }
        Rule::symbol => Ok(SExpr::Symbol(pair.as_str().to_string(), span)),
        Rule::keyword => Ok(SExpr::Keyword(pair.as_str()[1..].to_string(), span)),
        Rule::number => {
            let text = pair.as_str();
            text.parse::<f64>()
                .map(|n| SExpr::Number(n, text.to_string(), span))
                .map_err(|e| invalid_input_error(format!("bad number '{}': {}", text, e), span))
        }
        other => Err(invalid_input_error(
            format!("unexpected rule {:?}", other),
            span,
        )),
    }
}
