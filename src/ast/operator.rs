use serde::Serialize;

/// Binary operators of the explicit `(op left right)` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    UShr,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
}

impl BinaryOperator {
    /// Every operator, longest spelling first so that prefixes never shadow
    /// longer operators during matching.
    pub const ALL: [BinaryOperator; 19] = [
        BinaryOperator::UShr,
        BinaryOperator::Shr,
        BinaryOperator::Shl,
        BinaryOperator::GtEq,
        BinaryOperator::LtEq,
        BinaryOperator::NotEq,
        BinaryOperator::Gt,
        BinaryOperator::Lt,
        BinaryOperator::Eq,
        BinaryOperator::Add,
        BinaryOperator::Sub,
        BinaryOperator::Mul,
        BinaryOperator::Div,
        BinaryOperator::Rem,
        BinaryOperator::BitAnd,
        BinaryOperator::BitOr,
        BinaryOperator::BitXor,
        BinaryOperator::And,
        BinaryOperator::Or,
    ];

    /// Surface spelling.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Rem => "%",
            BinaryOperator::BitAnd => "&",
            BinaryOperator::BitOr => "|",
            BinaryOperator::BitXor => "^",
            BinaryOperator::Shl => "<<",
            BinaryOperator::Shr => ">>",
            BinaryOperator::UShr => ">>>",
            BinaryOperator::Eq => "=",
            BinaryOperator::NotEq => "!=",
            BinaryOperator::Lt => "<",
            BinaryOperator::LtEq => "<=",
            BinaryOperator::Gt => ">",
            BinaryOperator::GtEq => ">=",
            BinaryOperator::And => "and",
            BinaryOperator::Or => "or",
        }
    }

    /// Spelled as a word, and so subject to keyword boundaries.
    pub fn is_word(self) -> bool {
        matches!(self, BinaryOperator::And | BinaryOperator::Or)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum UnaryOperator {
    Not,
    Negate,
    BitNot,
}

impl UnaryOperator {
    pub const ALL: [UnaryOperator; 3] = [
        UnaryOperator::Not,
        UnaryOperator::Negate,
        UnaryOperator::BitNot,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOperator::Not => "!",
            UnaryOperator::Negate => "-",
            UnaryOperator::BitNot => "~",
        }
    }
}
