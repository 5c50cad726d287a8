//! Grammar of the surface language
//!
//! Rules are methods on [`Grammar`], spread over one `impl` block per area:
//! - `literal`: numbers, strings, booleans, nil and identifiers
//! - `expression`: unary, member access and the parenthesized forms
//! - `statement`: definitions, print, blocks and the program loop's unit
//!
//! Rules are rebuilt on every use, so recursion between them is plain
//! method calls from inside `seq` bodies.

mod expression;
pub mod keywords;
mod literal;
mod statement;

use std::fmt;
use std::rc::Rc;

use crate::ast::{Expr, Program};
use crate::error::ParseError;

use super::combinators::{run_parser, skip, BoxedParser};
use super::state::{Parser, Reply, State};
use super::trace::Tracer;

/// Entry point for parsing. Carries the optional tracing hook into every rule.
#[derive(Clone, Default)]
pub struct Grammar {
    tracer: Option<Rc<dyn Tracer>>,
}

impl fmt::Debug for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grammar")
            .field("traced", &self.tracer.is_some())
            .finish()
    }
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report every named rule to `tracer` as it is entered and left.
    pub fn with_tracer(tracer: impl Tracer + 'static) -> Self {
        Self {
            tracer: Some(Rc::new(tracer)),
        }
    }

    fn rule<T: 'static>(&self, name: &'static str, parser: BoxedParser<T>) -> BoxedParser<T> {
        parser.traced(name, self.tracer.clone())
    }

    /// Parse `source` as a whole program.
    ///
    /// Returns `None` when the source holds no statements. Syntax errors do
    /// not stop parsing: they appear as [`Expr::ParseError`] statements and
    /// in the returned state's error list.
    pub fn parse(&self, source: &str) -> (Option<Program>, State) {
        let (reply, state) = run_parser(source, &self.program());
        let program = reply.into_match();
        tracing::debug!(
            statements = program.as_ref().map_or(0, |program| program.body.len()),
            errors = state.errors().len(),
            "parsed source"
        );
        (program, state)
    }

    /// program := statement+ EOF
    ///
    /// Input that no statement accepts is reported once, skipped up to the
    /// next synchronization point, and parsing carries on from there. A
    /// statement that recovered from a nested error is closed off without a
    /// second report, so its remaining arguments never become statements.
    pub fn program(&self) -> BoxedParser<Program> {
        let statement = self.statement();
        let layout = skip();
        let parser = BoxedParser::new(move |state: &State| {
            let mut body = Vec::new();
            let mut current = state.clone();
            while !current.is_at_end() {
                match statement.parse(&current) {
                    (Reply::Match(expr), next) => {
                        body.push(expr);
                        current = next;
                    }
                    (Reply::Recovered(error), next) => {
                        body.push(Expr::ParseError(error));
                        current = next.close_statement(&current);
                    }
                    (Reply::NoMatch, _) => {
                        let (_, rest) = layout.parse(&current);
                        if rest.is_at_end() {
                            current = rest;
                            break;
                        }
                        let resumed = rest.synchronize();
                        let error = ParseError::new(
                            "Unexpected input after statement",
                            rest.line(),
                            rest.offset(),
                            resumed.offset(),
                        );
                        tracing::debug!(%error, "skipping unparsable input");
                        body.push(Expr::ParseError(error.clone()));
                        current = resumed.with_error(error);
                    }
                }
            }
            if body.is_empty() {
                return (Reply::NoMatch, state.clone());
            }
            (Reply::Match(Program::new(body)), current)
        });
        self.rule("program", parser)
    }
}
