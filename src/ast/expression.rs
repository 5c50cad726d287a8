use serde::Serialize;

use crate::error::ParseError;

use super::operator::{BinaryOperator, UnaryOperator};

/// Any node that may appear where a value or a statement is expected.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Expr {
    Number { value: f64 },
    /// String body as written, escape sequences included.
    String { value: String },
    Boolean { value: bool },
    Nil,
    Array { items: Vec<Expr> },
    Identifier { name: String },
    UnaryOp(UnaryOp),
    BinaryOp(BinaryOp),
    Call(Call),
    MethodCallChain(MethodCallChain),
    /// `target/key`. An identifier key is a named property, anything else is
    /// a computed index.
    Member(Member),
    VariableDecl(VariableDecl),
    FunctionDecl(FunctionDecl),
    Print { value: Box<Expr> },
    Block(Block),
    Function(FunctionExpr),
    Cond(Cond),
    /// Placeholder for a statement or sub-expression that failed to parse.
    ParseError(ParseError),
}

impl Expr {
    pub fn number(value: f64) -> Self {
        Expr::Number { value }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::String {
            value: value.into(),
        }
    }

    pub fn boolean(value: bool) -> Self {
        Expr::Boolean { value }
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Expr::Identifier { name: name.into() }
    }

    /// The name bound by a declaration.
    pub fn declared_name(&self) -> Option<&str> {
        match self {
            Expr::VariableDecl(decl) => Some(&decl.name),
            Expr::FunctionDecl(decl) => Some(&decl.name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnaryOp {
    pub op: UnaryOperator,
    pub operand: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinaryOp {
    pub op: BinaryOperator,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Call {
    pub callee: Box<Expr>,
    pub args: Vec<Expr>,
}

/// `(~> receiver ~> call ...)`: each call is applied to the result of the
/// previous one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodCallChain {
    pub receiver: Box<Expr>,
    pub calls: Vec<MethodCall>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodCall {
    pub target: Expr,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Member {
    pub target: Box<Expr>,
    pub key: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableDecl {
    pub name: String,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<String>,
    pub body: Block,
}

/// A sequence of statements whose last one yields the block's value.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Block {
    pub statements: Vec<Expr>,
}

impl Block {
    pub fn new(statements: Vec<Expr>) -> Self {
        Self { statements }
    }
}

/// Closure literal `|a b| body`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionExpr {
    pub params: Vec<String>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cond {
    pub branches: Vec<CondBranch>,
    pub else_body: Option<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CondBranch {
    pub condition: Expr,
    pub body: Block,
}
