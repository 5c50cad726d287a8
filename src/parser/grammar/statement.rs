//! Statement rules: definitions, print and blocks.

use crate::ast::{Block, Expr, FunctionDecl, VariableDecl};
use crate::parser::combinators::{character, many, one_or_more, seq, skip, BoxedParser};

use super::keywords;
use super::Grammar;

/// What follows `def`: a parenthesized signature or a plain name.
enum DefinitionHead {
    Function { name: String, params: Vec<String> },
    Variable(String),
}

impl Grammar {
    /// statement := skip (definition | print | expression) skip
    pub fn statement(&self) -> BoxedParser<Expr> {
        let parser = skip() * (self.definition() | self.print() | self.expression()) - skip();
        self.rule("statement", parser)
    }

    /// definition := "(" "def" (signature statement+ | name expression) ")"
    pub fn definition(&self) -> BoxedParser<Expr> {
        let g = self.clone();
        let parser = seq(move |e| {
            e.emit(&character('('))?;
            e.emit(&skip())?;
            e.emit(&g.keyword(keywords::DEFINE))?;
            e.emit(&skip())?;
            let head = e.expect(&g.definition_head(), "Expected a name after 'def'")?;
            e.emit(&skip())?;
            let declaration = match head {
                DefinitionHead::Function { name, params } => {
                    let statements =
                        e.expect(&one_or_more(g.statement()), "Expected a function body")?;
                    Expr::FunctionDecl(FunctionDecl {
                        name,
                        params,
                        body: function_body(statements),
                    })
                }
                DefinitionHead::Variable(name) => {
                    let value =
                        e.expect(&g.expression(), "Expected a value for the definition")?;
                    Expr::VariableDecl(VariableDecl {
                        name,
                        value: Box::new(value),
                    })
                }
            };
            e.emit(&skip())?;
            e.expect(&character(')'), "Expected ')' closing a definition")?;
            Ok(declaration)
        });
        self.rule("definition", parser)
    }

    fn definition_head(&self) -> BoxedParser<DefinitionHead> {
        let g = self.clone();
        let signature = seq(move |e| {
            e.emit(&character('('))?;
            e.emit(&skip())?;
            let name = e.emit(&g.name())?;
            let params = e.emit(&many(skip() * g.name()))?;
            e.emit(&skip())?;
            e.expect(&character(')'), "Expected ')' closing the parameter list")?;
            Ok(DefinitionHead::Function { name, params })
        });
        signature | (self.name() >> DefinitionHead::Variable)
    }

    /// print := "(" "print" expression ")"
    pub fn print(&self) -> BoxedParser<Expr> {
        let g = self.clone();
        let parser = seq(move |e| {
            e.emit(&character('('))?;
            e.emit(&skip())?;
            e.emit(&g.keyword(keywords::PRINT))?;
            e.emit(&skip())?;
            let value = e.expect(&g.expression(), "Expected an expression to print")?;
            e.emit(&skip())?;
            e.expect(&character(')'), "Expected ')' closing print")?;
            Ok(Expr::Print {
                value: Box::new(value),
            })
        });
        self.rule("print", parser)
    }

    /// block := "{" statement* "}"
    pub fn block(&self) -> BoxedParser<Block> {
        let g = self.clone();
        let parser = seq(move |e| {
            e.emit(&character('{'))?;
            let statements = e.emit(&many(g.statement()))?;
            e.emit(&skip())?;
            e.expect(&character('}'), "Expected '}' closing a block")?;
            Ok(Block::new(statements))
        });
        self.rule("block", parser)
    }

    /// body := block | expression
    ///
    /// A lone expression becomes a block holding just that expression.
    pub fn body(&self) -> BoxedParser<Block> {
        self.block() | (self.expression() >> |expr| Block::new(vec![expr]))
    }
}

/// A function whose whole body is one `{ ... }` takes that block directly.
fn function_body(mut statements: Vec<Expr>) -> Block {
    if let [Expr::Block(_)] = statements.as_slice() {
        if let Some(Expr::Block(block)) = statements.pop() {
            return block;
        }
    }
    Block::new(statements)
}
