//! Error types shared by the parser and the compile pipeline.

use serde::Serialize;

use crate::ast::Program;

/// A syntax error recovered while parsing.
///
/// `start` and `end` are byte offsets into the source (end exclusive) covering
/// the construct that failed; `line` is the 1-based line the construct starts on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{message} at line {line} ({start}..{end})")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub start: usize,
    pub end: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, line: usize, start: usize, end: usize) -> Self {
        Self {
            message: message.into(),
            line,
            start,
            end,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// Parsing finished but recorded errors. `program` holds whatever was recovered.
    #[error("failed to parse source: {} syntax error(s)", .errors.len())]
    Syntax {
        errors: Vec<ParseError>,
        program: Option<Program>,
    },

    #[error("source contains no statements")]
    EmptyProgram,
}
