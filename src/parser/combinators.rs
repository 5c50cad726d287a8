use std::ops::{Add, BitOr, Mul, Shr, Sub};
use std::rc::Rc;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::ParseError;

use super::state::{ParseResult, Parser, Reply, State};
use super::trace::{Outcome, Tracer};

type ParserFn<T> = Rc<dyn Fn(&State) -> ParseResult<T>>;

// === Boxed Parser for type erasure ===

pub struct BoxedParser<T> {
    parser: ParserFn<T>,
}

impl<T> Clone for BoxedParser<T> {
    fn clone(&self) -> Self {
        BoxedParser {
            parser: Rc::clone(&self.parser),
        }
    }
}

impl<T: 'static> BoxedParser<T> {
    pub fn new<P: Parser<T> + 'static>(parser: P) -> Self {
        BoxedParser {
            parser: Rc::new(move |state: &State| parser.parse(state)),
        }
    }
}

impl<T> Parser<T> for BoxedParser<T> {
    fn parse(&self, state: &State) -> ParseResult<T> {
        (self.parser)(state)
    }
}

// === Combinators as methods ===

impl<T: 'static> BoxedParser<T> {
    /// Sequence: parse self then other, return (T, U)
    pub fn then<U: 'static>(self, other: BoxedParser<U>) -> BoxedParser<(T, U)> {
        BoxedParser::new(move |state: &State| {
            let (first, after_first) = match self.parse(state) {
                (Reply::Match(first), next) => (first, next),
                (Reply::NoMatch, _) => return (Reply::NoMatch, state.clone()),
                (Reply::Recovered(error), next) => return (Reply::Recovered(error), next),
            };
            match other.parse(&after_first) {
                (Reply::Match(second), next) => (Reply::Match((first, second)), next),
                (Reply::NoMatch, _) => (Reply::NoMatch, state.clone()),
                (Reply::Recovered(error), next) => (Reply::Recovered(error), next),
            }
        })
    }

    /// Keep left: parse self then other, discard other's result
    pub fn skip<U: 'static>(self, other: BoxedParser<U>) -> BoxedParser<T> {
        self.then(other).map(|(first, _)| first)
    }

    /// Keep right: parse self then other, discard self's result
    pub fn skip_left<U: 'static>(self, other: BoxedParser<U>) -> BoxedParser<U> {
        self.then(other).map(|(_, second)| second)
    }

    /// Map: transform a successful result
    pub fn map<U: 'static, F: Fn(T) -> U + 'static>(self, f: F) -> BoxedParser<U> {
        BoxedParser::new(move |state: &State| {
            let (reply, next) = self.parse(state);
            (reply.map(&f), next)
        })
    }

    /// Like `map`, but `None` turns the match into a soft mismatch.
    pub fn try_map<U: 'static, F: Fn(T) -> Option<U> + 'static>(self, f: F) -> BoxedParser<U> {
        BoxedParser::new(move |state: &State| match self.parse(state) {
            (Reply::Match(value), next) => match f(value) {
                Some(mapped) => (Reply::Match(mapped), next),
                None => (Reply::NoMatch, state.clone()),
            },
            (Reply::NoMatch, _) => (Reply::NoMatch, state.clone()),
            (Reply::Recovered(error), next) => (Reply::Recovered(error), next),
        })
    }

    /// Ordered choice: try self, and only on a soft mismatch try other from
    /// the same starting state. Recovered errors are committed and returned.
    pub fn or(self, other: BoxedParser<T>) -> BoxedParser<T> {
        BoxedParser::new(move |state: &State| match self.parse(state) {
            (Reply::NoMatch, _) => other.parse(state),
            result => result,
        })
    }

    /// Report entry and exit of this parser to `tracer` under the name `rule`.
    pub fn traced(self, rule: &'static str, tracer: Option<Rc<dyn Tracer>>) -> BoxedParser<T> {
        let Some(tracer) = tracer else {
            return self;
        };
        BoxedParser::new(move |state: &State| {
            tracer.enter(rule, state);
            let (reply, next) = self.parse(state);
            tracer.exit(rule, Outcome::from(&reply), &next);
            (reply, next)
        })
    }
}

// === Operator Overloading ===

/// `+` for sequence: A + B -> (A, B)
impl<T: 'static, U: 'static> Add<BoxedParser<U>> for BoxedParser<T> {
    type Output = BoxedParser<(T, U)>;

    fn add(self, rhs: BoxedParser<U>) -> Self::Output {
        self.then(rhs)
    }
}

/// `-` for keep left: A - B -> A (parse B, discard result)
impl<T: 'static, U: 'static> Sub<BoxedParser<U>> for BoxedParser<T> {
    type Output = BoxedParser<T>;

    fn sub(self, rhs: BoxedParser<U>) -> Self::Output {
        self.skip(rhs)
    }
}

/// `*` for keep right: A * B -> B (parse A, discard result)
impl<T: 'static, U: 'static> Mul<BoxedParser<U>> for BoxedParser<T> {
    type Output = BoxedParser<U>;

    fn mul(self, rhs: BoxedParser<U>) -> Self::Output {
        self.skip_left(rhs)
    }
}

/// `|` for choice: A | B -> A or B
impl<T: 'static> BitOr<BoxedParser<T>> for BoxedParser<T> {
    type Output = BoxedParser<T>;

    fn bitor(self, rhs: BoxedParser<T>) -> Self::Output {
        self.or(rhs)
    }
}

/// `>>` for map: A >> fn -> B
impl<T: 'static, U: 'static, F: Fn(T) -> U + 'static> Shr<F> for BoxedParser<T> {
    type Output = BoxedParser<U>;

    fn shr(self, f: F) -> Self::Output {
        self.map(f)
    }
}

// === Sequencing with early exit ===

/// Why a [`seq`] body stopped early.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// A speculative step did not match; the whole sequence backtracks.
    Break,
    /// A committed step did not match; the sequence reports this message.
    Expected(String),
    /// A step returned an already-recovered error; it is passed up unchanged.
    Deep(ParseError),
}

/// Threads the state through the steps of a [`seq`] body.
pub struct Emitter {
    state: State,
}

impl Emitter {
    /// Run `parser` at the current position. A mismatch breaks the sequence.
    pub fn emit<U>(&mut self, parser: &impl Parser<U>) -> Result<U, Signal> {
        self.step(parser, None)
    }

    /// Run `parser` at the current position. A mismatch is a hard error
    /// reported as `message`.
    pub fn expect<U>(&mut self, parser: &impl Parser<U>, message: &str) -> Result<U, Signal> {
        self.step(parser, Some(message))
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    fn step<U>(&mut self, parser: &impl Parser<U>, message: Option<&str>) -> Result<U, Signal> {
        match parser.parse(&self.state) {
            (Reply::Match(value), next) => {
                self.state = next;
                Ok(value)
            }
            (Reply::NoMatch, _) => match message {
                Some(message) => Err(Signal::Expected(message.to_owned())),
                None => Err(Signal::Break),
            },
            (Reply::Recovered(error), next) => {
                self.state = next;
                Err(Signal::Deep(error))
            }
        }
    }
}

/// Build a parser from a sequence of steps run through an [`Emitter`].
///
/// - `Break` restores the state the sequence started from.
/// - `Expected` records a [`ParseError`] spanning from the start of the
///   sequence to the failing step, then synchronizes.
/// - `Deep` keeps the state the inner recovery left behind.
pub fn seq<T: 'static, F>(sequence: F) -> BoxedParser<T>
where
    F: Fn(&mut Emitter) -> Result<T, Signal> + 'static,
{
    BoxedParser::new(move |state: &State| {
        let mut emitter = Emitter {
            state: state.clone(),
        };
        match sequence(&mut emitter) {
            Ok(value) => (Reply::Match(value), emitter.state),
            Err(Signal::Break) => (Reply::NoMatch, state.clone()),
            Err(Signal::Expected(message)) => {
                let error = ParseError::new(
                    message,
                    state.line(),
                    state.offset(),
                    emitter.state.offset(),
                );
                let recovered = emitter.state.with_error(error.clone()).synchronize();
                (Reply::Recovered(error), recovered)
            }
            Err(Signal::Deep(error)) => (Reply::Recovered(error), emitter.state),
        }
    })
}

// === Repetition and choice ===

/// Parse zero or more occurrences. Stops on a mismatch, at end of input, or
/// after an iteration that consumed nothing.
pub fn many<T: 'static>(parser: BoxedParser<T>) -> BoxedParser<Vec<T>> {
    BoxedParser::new(move |state: &State| {
        let mut results = Vec::new();
        let mut current = state.clone();
        while !current.is_at_end() {
            match parser.parse(&current) {
                (Reply::Match(item), next) => {
                    let progressed = next.offset() > current.offset();
                    results.push(item);
                    current = next;
                    if !progressed {
                        break;
                    }
                }
                (Reply::NoMatch, _) => break,
                (Reply::Recovered(error), next) => return (Reply::Recovered(error), next),
            }
        }
        (Reply::Match(results), current)
    })
}

/// Parse one or more occurrences
pub fn one_or_more<T: 'static>(parser: BoxedParser<T>) -> BoxedParser<Vec<T>> {
    many(parser).try_map(|items| if items.is_empty() { None } else { Some(items) })
}

/// Optional: parse zero or one
pub fn optional<T: 'static>(parser: BoxedParser<T>) -> BoxedParser<Option<T>> {
    BoxedParser::new(move |state: &State| match parser.parse(state) {
        (Reply::Match(item), next) => (Reply::Match(Some(item)), next),
        (Reply::NoMatch, _) => (Reply::Match(None), state.clone()),
        (Reply::Recovered(error), next) => (Reply::Recovered(error), next),
    })
}

/// Ordered choice over any number of alternatives.
pub fn choice<T: 'static>(parsers: Vec<BoxedParser<T>>) -> BoxedParser<T> {
    BoxedParser::new(move |state: &State| {
        for parser in &parsers {
            match parser.parse(state) {
                (Reply::NoMatch, _) => continue,
                result => return result,
            }
        }
        (Reply::NoMatch, state.clone())
    })
}

/// Negative lookahead: matches, without consuming, where `parser` does not.
pub fn not<T: 'static>(parser: BoxedParser<T>) -> BoxedParser<()> {
    BoxedParser::new(move |state: &State| match parser.parse(state) {
        (Reply::NoMatch, _) => (Reply::Match(()), state.clone()),
        _ => (Reply::NoMatch, state.clone()),
    })
}

// === Primitive Parsers ===

/// A single character satisfying `predicate`. Never matches at end of input.
pub fn satisfy<F: Fn(char) -> bool + 'static>(predicate: F) -> BoxedParser<char> {
    BoxedParser::new(move |state: &State| match state.peek() {
        Some(c) if predicate(c) => (Reply::Match(c), state.advance()),
        _ => (Reply::NoMatch, state.clone()),
    })
}

pub fn character(expected: char) -> BoxedParser<char> {
    satisfy(move |c| c == expected)
}

/// The exact text `expected`.
pub fn literal(expected: &'static str) -> BoxedParser<&'static str> {
    BoxedParser::new(move |state: &State| {
        if !expected.is_empty() && state.rest().starts_with(expected) {
            (Reply::Match(expected), state.advance_by(expected.len()))
        } else {
            (Reply::NoMatch, state.clone())
        }
    })
}

/// The longest non-empty match of `pattern` at the current position.
/// Patterns should be anchored with `^`.
pub fn regex(pattern: &'static Regex) -> BoxedParser<String> {
    BoxedParser::new(move |state: &State| match pattern.find(state.rest()) {
        Some(found) if found.start() == 0 && !found.is_empty() => (
            Reply::Match(found.as_str().to_owned()),
            state.advance_by(found.end()),
        ),
        _ => (Reply::NoMatch, state.clone()),
    })
}

fn layout_pattern() -> &'static Regex {
    static LAYOUT: OnceLock<Regex> = OnceLock::new();
    LAYOUT.get_or_init(|| Regex::new(r"^(?:\s+|;[^\n]*)").expect("layout pattern is valid"))
}

/// Whitespace and `;` line comments. Always matches, possibly consuming nothing.
pub fn skip() -> BoxedParser<()> {
    many(regex(layout_pattern())) >> |_| ()
}

/// Run `parser` over `source` from the beginning.
pub fn run_parser<T>(source: &str, parser: &impl Parser<T>) -> ParseResult<T> {
    parser.parse(&State::new(source))
}
