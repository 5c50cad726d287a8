//! Syntax tree produced by the grammar and consumed by the code generator.
//!
//! Every node owns its children. Nodes are never rewritten after parsing;
//! later passes read the tree and build new output from it.

use serde::Serialize;

pub mod expression;
pub mod operator;

pub use expression::*;
pub use operator::{BinaryOperator, UnaryOperator};

/// A parsed source file: its top-level statements in source order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub body: Vec<Expr>,
}

impl Program {
    pub fn new(body: Vec<Expr>) -> Self {
        Self { body }
    }

    /// Recovered syntax errors embedded in the top-level statements.
    pub fn parse_errors(&self) -> impl Iterator<Item = &crate::error::ParseError> {
        self.body.iter().filter_map(|statement| match statement {
            Expr::ParseError(error) => Some(error),
            _ => None,
        })
    }
}
