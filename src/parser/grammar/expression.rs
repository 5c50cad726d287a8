//! Expression rules, from primary forms outward to unary operators.

use crate::ast::{
    BinaryOp, BinaryOperator, Block, Call, Cond, CondBranch, Expr, FunctionExpr, Member,
    MethodCall, MethodCallChain, UnaryOp, UnaryOperator,
};
use crate::parser::combinators::{
    character, choice, literal, many, one_or_more, optional, satisfy, seq, skip, BoxedParser,
};

use super::keywords;
use super::Grammar;

impl Grammar {
    /// expression := unary
    pub fn expression(&self) -> BoxedParser<Expr> {
        self.unary()
    }

    /// unary := ("!" | "-" | "~") unary | member
    pub fn unary(&self) -> BoxedParser<Expr> {
        let g = self.clone();
        let prefixed = seq(move |e| {
            let op = e.emit(&unary_operator())?;
            let operand = e.emit(&g.unary())?;
            Ok(Expr::UnaryOp(UnaryOp {
                op,
                operand: Box::new(operand),
            }))
        });
        self.rule("unary", prefixed | self.member())
    }

    /// member := primary ("/" primary)*
    ///
    /// Keys fold to the left, so `a/b/c` is `(a/b)/c`.
    pub fn member(&self) -> BoxedParser<Expr> {
        let g = self.clone();
        let parser = seq(move |e| {
            let mut target = e.emit(&g.primary())?;
            while e.emit(&optional(character('/')))?.is_some() {
                let key = e.expect(&g.primary(), "Expected a key after '/'")?;
                target = Expr::Member(Member {
                    target: Box::new(target),
                    key: Box::new(key),
                });
            }
            Ok(target)
        });
        self.rule("member", parser)
    }

    /// primary := number | string | boolean | nil | array | identifier | cond
    ///          | closure | binary_call | method_chain | block | call
    pub fn primary(&self) -> BoxedParser<Expr> {
        choice(vec![
            self.number(),
            self.string(),
            self.boolean(),
            self.nil(),
            self.array(),
            self.identifier(),
            self.cond(),
            self.closure(),
            self.binary_call(),
            self.method_chain(),
            self.block_expression(),
            self.call(),
        ])
    }

    /// array := "[" (skip expression)* skip "]"
    pub fn array(&self) -> BoxedParser<Expr> {
        let g = self.clone();
        let parser = seq(move |e| {
            e.emit(&character('['))?;
            let items = e.emit(&g.arguments())?;
            e.emit(&skip())?;
            e.expect(&character(']'), "Expected ']' closing an array")?;
            Ok(Expr::Array { items })
        });
        self.rule("array", parser)
    }

    /// cond := "(" "cond" (expression body)+ ("else" body)? ")"
    pub fn cond(&self) -> BoxedParser<Expr> {
        let g = self.clone();
        let parser = seq(move |e| {
            e.emit(&character('('))?;
            e.emit(&skip())?;
            e.emit(&g.keyword(keywords::CONDITION))?;
            let branches = e.expect(
                &one_or_more(g.cond_branch()),
                "Expected at least one cond branch",
            )?;
            let else_body = e.emit(&optional(g.else_branch()))?;
            e.emit(&skip())?;
            e.expect(&character(')'), "Expected ')' closing cond")?;
            Ok(Expr::Cond(Cond {
                branches,
                else_body,
            }))
        });
        self.rule("cond", parser)
    }

    fn cond_branch(&self) -> BoxedParser<CondBranch> {
        let g = self.clone();
        seq(move |e| {
            e.emit(&skip())?;
            let condition = e.emit(&g.expression())?;
            e.emit(&skip())?;
            let body = e.expect(&g.body(), "Expected a body for the cond branch")?;
            Ok(CondBranch { condition, body })
        })
    }

    fn else_branch(&self) -> BoxedParser<Block> {
        let g = self.clone();
        seq(move |e| {
            e.emit(&skip())?;
            e.emit(&g.keyword(keywords::ELSE))?;
            e.emit(&skip())?;
            e.expect(&g.body(), "Expected a body after 'else'")
        })
    }

    /// closure := "|" name* "|" body
    pub fn closure(&self) -> BoxedParser<Expr> {
        let g = self.clone();
        let parser = seq(move |e| {
            e.emit(&character('|'))?;
            e.emit(&skip())?;
            let params = e.emit(&many(g.name() - skip()))?;
            e.expect(&character('|'), "Expected '|' closing closure parameters")?;
            e.emit(&skip())?;
            let body = e.expect(&g.body(), "Expected a closure body")?;
            Ok(Expr::Function(FunctionExpr { params, body }))
        });
        self.rule("closure", parser)
    }

    /// binary_call := "(" binary_operator expression expression ")"
    pub fn binary_call(&self) -> BoxedParser<Expr> {
        let g = self.clone();
        let parser = seq(move |e| {
            e.emit(&character('('))?;
            e.emit(&skip())?;
            let op = e.emit(&g.binary_operator())?;
            e.emit(&skip())?;
            let left = e.expect(&g.expression(), "Expected a left operand")?;
            e.emit(&skip())?;
            let right = e.expect(&g.expression(), "Expected a right operand")?;
            e.emit(&skip())?;
            e.expect(&character(')'), "Expected ')' closing a binary operation")?;
            Ok(Expr::BinaryOp(BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            }))
        });
        self.rule("binary_call", parser)
    }

    /// Any binary operator, longest spelling first. Symbols must be followed
    /// by whitespace, words by a non-identifier character.
    pub fn binary_operator(&self) -> BoxedParser<BinaryOperator> {
        let alternatives = BinaryOperator::ALL
            .into_iter()
            .map(|op| {
                let spelled = if op.is_word() {
                    self.keyword(op.symbol())
                } else {
                    literal(op.symbol()) - satisfy(char::is_whitespace)
                };
                spelled >> move |_| op
            })
            .collect();
        choice(alternatives)
    }

    /// method_chain := "(" "~>" expression ("~>" chain_call)* ")"
    pub fn method_chain(&self) -> BoxedParser<Expr> {
        let g = self.clone();
        let parser = seq(move |e| {
            e.emit(&character('('))?;
            e.emit(&skip())?;
            e.emit(&literal("~>"))?;
            e.emit(&skip())?;
            let receiver = e.expect(&g.expression(), "Expected a receiver after '~>'")?;
            let mut calls = Vec::new();
            loop {
                e.emit(&skip())?;
                if e.emit(&optional(literal("~>")))?.is_none() {
                    break;
                }
                e.emit(&skip())?;
                calls.push(e.expect(&g.chain_call(), "Expected a call after '~>'")?);
            }
            e.expect(&character(')'), "Expected ')' closing a method chain")?;
            Ok(Expr::MethodCallChain(MethodCallChain {
                receiver: Box::new(receiver),
                calls,
            }))
        });
        self.rule("method_chain", parser)
    }

    /// chain_call := "(" member expression* ")" | member
    fn chain_call(&self) -> BoxedParser<MethodCall> {
        let g = self.clone();
        let applied = seq(move |e| {
            e.emit(&character('('))?;
            e.emit(&skip())?;
            let target = e.emit(&g.member())?;
            let args = e.emit(&g.arguments())?;
            e.emit(&skip())?;
            e.expect(&character(')'), "Expected ')' closing a call")?;
            Ok(MethodCall { target, args })
        });
        let bare = self.member() >> |target| MethodCall {
            target,
            args: Vec::new(),
        };
        applied | bare
    }

    /// block := "{" statement* "}"
    pub fn block_expression(&self) -> BoxedParser<Expr> {
        self.block() >> Expr::Block
    }

    /// call := "(" member expression* ")"
    pub fn call(&self) -> BoxedParser<Expr> {
        let g = self.clone();
        let parser = seq(move |e| {
            e.emit(&character('('))?;
            e.emit(&skip())?;
            let callee = e.emit(&g.member())?;
            let args = e.emit(&g.arguments())?;
            e.emit(&skip())?;
            e.expect(&character(')'), "Expected ')' closing a call")?;
            Ok(Expr::Call(Call {
                callee: Box::new(callee),
                args,
            }))
        });
        self.rule("call", parser)
    }

    /// Whitespace-separated expressions, possibly none.
    fn arguments(&self) -> BoxedParser<Vec<Expr>> {
        many(skip() * self.expression())
    }
}

fn unary_operator() -> BoxedParser<UnaryOperator> {
    let alternatives = UnaryOperator::ALL
        .into_iter()
        .map(|op| literal(op.symbol()) >> move |_| op)
        .collect();
    choice(alternatives)
}
