//! Literal and name rules: numbers, strings, booleans, nil and identifiers.

use std::sync::OnceLock;

use regex::Regex;

use crate::ast::Expr;
use crate::parser::combinators::{character, literal, not, optional, regex, satisfy, seq, BoxedParser};

use super::keywords::{self, is_keyword};
use super::Grammar;

fn number_pattern() -> &'static Regex {
    static NUMBER: OnceLock<Regex> = OnceLock::new();
    NUMBER.get_or_init(|| {
        Regex::new(r"^[0-9]+(?:_[0-9]+)*(?:\.[0-9]+(?:_[0-9]+)*)?").expect("number pattern is valid")
    })
}

fn identifier_pattern() -> &'static Regex {
    static IDENTIFIER: OnceLock<Regex> = OnceLock::new();
    IDENTIFIER
        .get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*").expect("identifier pattern is valid"))
}

fn string_body_pattern() -> &'static Regex {
    static STRING_BODY: OnceLock<Regex> = OnceLock::new();
    STRING_BODY
        .get_or_init(|| Regex::new(r#"^(?:[^"\\\n]|\\[^\n])+"#).expect("string pattern is valid"))
}

pub(super) fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl Grammar {
    /// number := digits ("_" digits)* ("." digits ("_" digits)*)?
    ///
    /// Digit runs too large for a finite `f64` are not numbers.
    pub fn number(&self) -> BoxedParser<Expr> {
        let parser = regex(number_pattern()).try_map(|text| {
            text.replace('_', "")
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .map(Expr::number)
        });
        self.rule("number", parser)
    }

    /// string := '"' body '"'. The body may not contain a raw newline;
    /// backslash escapes are kept as written.
    pub fn string(&self) -> BoxedParser<Expr> {
        let parser = seq(|e| {
            e.emit(&character('"'))?;
            let body = e.emit(&optional(regex(string_body_pattern())))?;
            e.expect(&character('"'), "Expected '\"' terminating a string")?;
            Ok(Expr::string(body.unwrap_or_default()))
        });
        self.rule("string", parser)
    }

    pub fn boolean(&self) -> BoxedParser<Expr> {
        let parser = (self.keyword("true") >> |_| Expr::boolean(true))
            | (self.keyword("false") >> |_| Expr::boolean(false));
        self.rule("boolean", parser)
    }

    pub fn nil(&self) -> BoxedParser<Expr> {
        self.rule("nil", self.keyword(keywords::NIL) >> |_| Expr::Nil)
    }

    /// `word` not directly followed by another identifier character.
    pub fn keyword(&self, word: &'static str) -> BoxedParser<&'static str> {
        literal(word) - not(satisfy(is_identifier_char))
    }

    /// A non-reserved name.
    pub fn name(&self) -> BoxedParser<String> {
        regex(identifier_pattern()).try_map(|word| (!is_keyword(&word)).then_some(word))
    }

    pub fn identifier(&self) -> BoxedParser<Expr> {
        self.rule("identifier", self.name() >> |name| Expr::Identifier { name })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{run_parser, Reply};

    #[test]
    fn number_drops_digit_separators() {
        let (reply, state) = run_parser("1_000.2_5", &Grammar::new().number());
        assert_eq!(reply, Reply::Match(Expr::number(1000.25)));
        assert!(state.is_at_end());
    }

    #[test]
    fn number_rejects_overflowing_digits() {
        let digits = format!("1{}", "0".repeat(400));
        let (reply, state) = run_parser(&digits, &Grammar::new().number());
        assert_eq!(reply, Reply::NoMatch);
        assert_eq!(state.offset(), 0);
    }

    #[test]
    fn keyword_requires_boundary() {
        let g = Grammar::new();
        assert!(run_parser("nil", &g.nil()).0.is_match());
        assert!(!run_parser("nils", &g.nil()).0.is_match());
    }

    #[test]
    fn reserved_words_are_not_names() {
        let g = Grammar::new();
        for word in keywords::KEYWORDS {
            let (reply, state) = run_parser(word, &g.name());
            assert_eq!(reply, Reply::NoMatch, "{word}");
            assert_eq!(state.offset(), 0);
        }
        assert_eq!(
            run_parser("define", &g.name()).0,
            Reply::Match("define".to_string())
        );
    }
}
