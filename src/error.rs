//! Error types and parse-error formatting.
//!
//! One crate-wide error enum covers the query layer's taxonomy; lexer and
//! parser failures are rendered into user-friendly reports with ariadne
//! before being wrapped as `InvalidQuery`.

use ariadne::{Color, Label, Report, ReportKind, Source};
use chumsky::prelude::Simple;
use std::fmt;
use std::ops::Range;

use crate::lexer::Token;

/// Errors raised by the query and conversion layer.
#[derive(Clone, Debug)]
pub enum PrologError {
    /// Goal or clause text failed to parse. Surfaces at execution time,
    /// when the engine's reader sees the substituted text.
    InvalidQuery { message: String },
    /// A requested variable is absent from a binding set.
    UnknownVariable(String),
    /// Placeholder count and supplied argument count disagree.
    ArgumentCountMismatch { expected: usize, supplied: usize },
    /// No object or term converter applies to the given value or term.
    NoConverterFound(String),
    /// A converter applied but the value does not fit the requested type.
    Conversion(String),
    /// Argument index past the end of a term's arguments.
    IndexOutOfRange { index: usize, arity: usize },
    /// The goal had no solutions and a result was requested.
    NoSolution,
    /// Engine-level solve failure, distinct from the layer's own errors.
    Engine(String),
}

impl fmt::Display for PrologError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrologError::InvalidQuery { message } => {
                write!(f, "invalid query: {}", message)
            }
            PrologError::UnknownVariable(name) => {
                write!(f, "unknown variable: {}", name)
            }
            PrologError::ArgumentCountMismatch { expected, supplied } => {
                write!(
                    f,
                    "argument count mismatch: {} placeholder(s), {} argument(s)",
                    expected, supplied
                )
            }
            PrologError::NoConverterFound(what) => {
                write!(f, "no converter found for {}", what)
            }
            PrologError::Conversion(msg) => write!(f, "conversion failed: {}", msg),
            PrologError::IndexOutOfRange { index, arity } => {
                write!(f, "argument index {} out of range for arity {}", index, arity)
            }
            PrologError::NoSolution => write!(f, "goal has no solution"),
            PrologError::Engine(msg) => write!(f, "engine error: {}", msg),
        }
    }
}

impl std::error::Error for PrologError {}

pub type Result<T> = std::result::Result<T, PrologError>;

/// Format lexer errors into a user-friendly string
pub fn format_lexer_errors(source: &str, errors: Vec<Simple<char>>) -> String {
    let mut output = Vec::new();

    for error in errors {
        let span = error.span();
        let report = Report::build(ReportKind::Error, (), span.start)
            .with_message("Lexical error")
            .with_label(
                Label::new(span.clone())
                    .with_message(format_lexer_error(&error))
                    .with_color(Color::Red),
            );

        if report
            .finish()
            .write(Source::from(source), &mut output)
            .is_err()
        {
            return "error formatting failed".to_string();
        }
    }

    String::from_utf8(output).unwrap_or_else(|_| "error formatting failed".to_string())
}

/// Format a single lexer error into a readable message
fn format_lexer_error(error: &Simple<char>) -> String {
    let found = error
        .found()
        .map(|c| format!("'{}'", c))
        .unwrap_or_else(|| "end of input".to_string());

    let expected: Vec<String> = error
        .expected()
        .filter_map(|opt| opt.as_ref())
        .map(|c| format!("'{}'", c))
        .collect();

    if expected.is_empty() {
        format!("Unexpected character {}", found)
    } else {
        format!("Unexpected {}, expected {}", found, expected.join(" or "))
    }
}

/// Format parser errors into a user-friendly string
pub fn format_parser_errors(source: &str, errors: Vec<Simple<Token>>) -> String {
    let mut output = Vec::new();

    for error in errors {
        let span = error.span();

        // Token streams carry character spans, so the error span maps
        // directly onto the source; clamp for the end-of-input marker.
        let start = span.start.min(source.len());
        let end = span.end.min(source.len());
        let char_span: Range<usize> = start..end;

        let report = Report::build(ReportKind::Error, (), char_span.start)
            .with_message("Parse error")
            .with_label(
                Label::new(char_span.clone())
                    .with_message(format_parser_error(&error))
                    .with_color(Color::Red),
            );

        if report
            .finish()
            .write(Source::from(source), &mut output)
            .is_err()
        {
            return "error formatting failed".to_string();
        }
    }

    String::from_utf8(output).unwrap_or_else(|_| "error formatting failed".to_string())
}

/// Format a single parser error into a readable message
fn format_parser_error(error: &Simple<Token>) -> String {
    use chumsky::error::SimpleReason;

    let found = error
        .found()
        .map(|t| format!("'{}'", t))
        .unwrap_or_else(|| "end of input".to_string());

    if let SimpleReason::Custom(msg) = error.reason() {
        return msg.clone();
    }

    let expected: Vec<String> = error
        .expected()
        .filter_map(|opt| opt.as_ref())
        .map(|t| format!("'{}'", t))
        .collect();

    if !expected.is_empty() {
        format!("Unexpected {}, expected one of: {}", found, expected.join(", "))
    } else if let Some(label) = error.label() {
        label.to_string()
    } else {
        format!("Unexpected token {}", found)
    }
}
