//! Parse position, recovered errors and the parser contract.
//!
//! A [`State`] is a value: advancing returns a new state and never touches the
//! one it was derived from. Backtracking is therefore just "keep the old state".

use std::rc::Rc;

use crate::error::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub struct State {
    source: Rc<str>,
    offset: usize,
    line: usize,
    column: usize,
    errors: Rc<Vec<ParseError>>,
}

impl State {
    pub fn new(source: &str) -> Self {
        Self {
            source: Rc::from(source),
            offset: 0,
            line: 1,
            column: 0,
            errors: Rc::new(Vec::new()),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Byte offset into the source.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// 1-based line number.
    pub fn line(&self) -> usize {
        self.line
    }

    /// 0-based column within the current line, counted in characters.
    pub fn column(&self) -> usize {
        self.column
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// The unconsumed part of the source.
    pub fn rest(&self) -> &str {
        &self.source[self.offset..]
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn is_at_end(&self) -> bool {
        self.offset >= self.source.len()
    }

    /// Returns the state one character further on. At end of input the state
    /// is returned as is.
    pub fn advance(&self) -> State {
        let mut next = self.clone();
        if let Some(c) = self.peek() {
            next.consume(c);
        }
        next
    }

    /// Returns the state `len` bytes further on, keeping line and column in step
    /// with every character passed over.
    pub fn advance_by(&self, len: usize) -> State {
        let target = (self.offset + len).min(self.source.len());
        let mut next = self.clone();
        while next.offset < target {
            match next.peek() {
                Some(c) => next.consume(c),
                None => break,
            }
        }
        next
    }

    pub fn with_error(&self, error: ParseError) -> State {
        let mut next = self.clone();
        Rc::make_mut(&mut next.errors).push(error);
        next
    }

    /// Skips input until the `)` closing the current construct has been consumed,
    /// or until end of input. Balanced `(`…`)` pairs and string literals on the
    /// way are skipped whole. Once past the failure point, a `(` in the first
    /// column also stops it: that opens the next top-level form.
    pub fn synchronize(&self) -> State {
        self.skip_unclosed(1, self.offset + 1)
    }

    /// Skips input until every `(` opened between `start` and here is closed.
    /// A statement that recovered from an error deeper inside it resumes here.
    pub fn close_statement(&self, start: &State) -> State {
        let mut nesting = Nesting::default();
        self.source[start.offset..self.offset]
            .chars()
            .for_each(|c| nesting.step(c));
        self.skip_unclosed(nesting.depth, self.offset)
    }

    fn skip_unclosed(&self, depth: usize, fresh_from: usize) -> State {
        let mut next = self.clone();
        let mut nesting = Nesting {
            depth,
            ..Nesting::default()
        };
        while nesting.depth > 0 {
            let Some(c) = next.peek() else {
                break;
            };
            if c == '(' && next.column == 0 && next.offset >= fresh_from {
                break;
            }
            next.consume(c);
            nesting.step(c);
        }
        next
    }

    // the only place line/column move
    fn consume(&mut self, c: char) {
        self.offset += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }
}

/// Parenthesis depth over raw source text. Parentheses inside string
/// literals do not count; a newline always ends a string.
#[derive(Debug, Default)]
struct Nesting {
    depth: usize,
    in_string: bool,
    escaped: bool,
}

impl Nesting {
    fn step(&mut self, c: char) {
        if self.escaped {
            self.escaped = false;
            if c != '\n' {
                return;
            }
        }
        match c {
            '\\' if self.in_string => self.escaped = true,
            '"' => self.in_string = !self.in_string,
            '\n' => self.in_string = false,
            '(' if !self.in_string => self.depth += 1,
            ')' if !self.in_string => self.depth = self.depth.saturating_sub(1),
            _ => {}
        }
    }
}

/// What a parser produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply<T> {
    Match(T),
    /// Soft mismatch. The accompanying state is the input state.
    NoMatch,
    /// A committed construct failed. The error is already recorded in the
    /// accompanying state, which has been synchronized past the failure.
    Recovered(ParseError),
}

impl<T> Reply<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reply<U> {
        match self {
            Reply::Match(value) => Reply::Match(f(value)),
            Reply::NoMatch => Reply::NoMatch,
            Reply::Recovered(error) => Reply::Recovered(error),
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, Reply::Match(_))
    }

    pub fn into_match(self) -> Option<T> {
        match self {
            Reply::Match(value) => Some(value),
            _ => None,
        }
    }
}

pub type ParseResult<T> = (Reply<T>, State);

pub trait Parser<T> {
    fn parse(&self, state: &State) -> ParseResult<T>;
}

impl<T, F: Fn(&State) -> ParseResult<T>> Parser<T> for F {
    fn parse(&self, state: &State) -> ParseResult<T> {
        self(state)
    }
}
