//! Rule-level tracing hook.
//!
//! A [`Tracer`] is handed to [`Grammar::with_tracer`](super::Grammar::with_tracer)
//! and sees every named rule as it is entered and left. Grammars built without
//! one skip the wrapping entirely.

use super::state::{Reply, State};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Matched,
    NoMatch,
    Recovered,
}

impl<T> From<&Reply<T>> for Outcome {
    fn from(reply: &Reply<T>) -> Self {
        match reply {
            Reply::Match(_) => Outcome::Matched,
            Reply::NoMatch => Outcome::NoMatch,
            Reply::Recovered(_) => Outcome::Recovered,
        }
    }
}

pub trait Tracer {
    fn enter(&self, rule: &'static str, state: &State);

    fn exit(&self, rule: &'static str, outcome: Outcome, state: &State);
}

/// Forwards rule events to `tracing` at TRACE level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTracer;

impl Tracer for LogTracer {
    fn enter(&self, rule: &'static str, state: &State) {
        tracing::trace!(
            rule,
            offset = state.offset(),
            line = state.line(),
            column = state.column(),
            "enter"
        );
    }

    fn exit(&self, rule: &'static str, outcome: Outcome, state: &State) {
        tracing::trace!(
            rule,
            ?outcome,
            offset = state.offset(),
            line = state.line(),
            column = state.column(),
            "exit"
        );
    }
}
