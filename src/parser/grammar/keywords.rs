//! Reserved words. None of these can be used as an identifier.

pub const DEFINE: &str = "def";
pub const AND: &str = "and";
pub const OR: &str = "or";
pub const PRINT: &str = "print";
pub const CONDITION: &str = "cond";
pub const ELSE: &str = "else";
pub const NIL: &str = "nil";

pub const KEYWORDS: [&str; 7] = [DEFINE, AND, OR, PRINT, CONDITION, ELSE, NIL];

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}
