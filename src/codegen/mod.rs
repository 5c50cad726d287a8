//! JavaScript code generation
//!
//! [`Generator`] walks a [`Program`] and renders every node as JavaScript
//! text. It never fails: recovered [`Expr::ParseError`] nodes render as
//! nothing, and every other node kind has a rendering.

pub mod runtime;

use crate::ast::{
    BinaryOperator, Block, Cond, Expr, FunctionDecl, FunctionExpr, MethodCallChain, Program,
    UnaryOperator,
};

use runtime::{CURRY_HELPER, CURRY_NAME};

const INDENT: &str = "  ";

/// Renders AST nodes as JavaScript, one output per program.
#[derive(Debug, Default)]
pub struct Generator {
    depth: usize,
    needs_curry: bool,
}

impl Generator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render a whole program.
    ///
    /// Statements are terminated with `;` and separated by newlines. The
    /// curry helper is prepended once if any closure takes two or more
    /// parameters.
    pub fn compile(program: &Program) -> String {
        let mut generator = Generator::new();
        let code = program
            .body
            .iter()
            .filter(|statement| !matches!(statement, Expr::ParseError(_)))
            .map(|statement| format!("{};", generator.expression(statement)))
            .collect::<Vec<_>>()
            .join("\n");

        tracing::debug!(
            statements = program.body.len(),
            curry_helper = generator.needs_curry(),
            "generated code"
        );

        if generator.needs_curry() {
            format!("{CURRY_HELPER}\n{code}")
        } else {
            code
        }
    }

    /// Whether anything rendered so far relies on the curry helper.
    pub fn needs_curry(&self) -> bool {
        self.needs_curry
    }

    pub fn expression(&mut self, expr: &Expr) -> String {
        match expr {
            Expr::Number { value } => value.to_string(),
            Expr::String { value } => format!("\"{value}\""),
            Expr::Boolean { value } => value.to_string(),
            Expr::Nil => "null".to_string(),
            Expr::Array { items } => format!("[{}]", self.list(items)),
            Expr::Identifier { name } => name.clone(),
            Expr::UnaryOp(unary) => {
                let operand = self.operand(&unary.operand);
                if unary.op == UnaryOperator::Negate && operand.starts_with('-') {
                    format!("-({operand})")
                } else {
                    format!("{}{operand}", unary_symbol(unary.op))
                }
            }
            Expr::BinaryOp(binary) => {
                let left = self.operand(&binary.left);
                let right = self.operand(&binary.right);
                format!("({left} {} {right})", binary_symbol(binary.op))
            }
            Expr::Call(call) => {
                let callee = self.target(&call.callee);
                format!("{callee}({})", self.list(&call.args))
            }
            Expr::MethodCallChain(chain) => self.method_chain(chain),
            Expr::Member(member) => {
                let target = self.target(&member.target);
                format!("{target}{}", self.access(&member.key))
            }
            Expr::VariableDecl(decl) => {
                format!("const {} = {}", decl.name, self.expression(&decl.value))
            }
            Expr::FunctionDecl(decl) => self.function_declaration(decl),
            Expr::Print { value } => {
                format!("console.log(String({}))", self.expression(value))
            }
            Expr::Block(block) => format!("(() => {})()", self.block(block)),
            Expr::Function(function) => self.closure(function),
            Expr::Cond(cond) => self.cond(cond),
            Expr::ParseError(_) => String::new(),
        }
    }

    /// Render a block at the current depth. The last statement becomes the
    /// block's return value; a trailing declaration returns the declared name.
    pub fn block(&mut self, block: &Block) -> String {
        let statements = block
            .statements
            .iter()
            .filter(|statement| !matches!(statement, Expr::ParseError(_)))
            .collect::<Vec<_>>();
        let Some((last, init)) = statements.split_last() else {
            return "{}".to_string();
        };

        self.depth += 1;
        let indent = self.indent();
        let mut lines = init
            .iter()
            .map(|statement| format!("{indent}{};", self.expression(statement)))
            .collect::<Vec<_>>();
        match last.declared_name() {
            Some(name) => {
                lines.push(format!("{indent}{};", self.expression(last)));
                lines.push(format!("{indent}return {name};"));
            }
            None => lines.push(format!("{indent}return {};", self.expression(last))),
        }
        self.depth -= 1;

        format!("{{\n{}\n{}}}", lines.join("\n"), self.indent())
    }

    fn closure(&mut self, function: &FunctionExpr) -> String {
        let rendered = format!(
            "({}) => {}",
            function.params.join(", "),
            self.block(&function.body)
        );
        if function.params.len() > 1 {
            self.needs_curry = true;
            format!("{CURRY_NAME}({rendered})")
        } else {
            rendered
        }
    }

    fn function_declaration(&mut self, decl: &FunctionDecl) -> String {
        format!(
            "function {}({}) {}",
            decl.name,
            decl.params.join(", "),
            self.block(&decl.body)
        )
    }

    fn method_chain(&mut self, chain: &MethodCallChain) -> String {
        let mut rendered = self.target(&chain.receiver);
        for call in &chain.calls {
            let access = self.access(&call.target);
            let args = self.list(&call.args);
            rendered.push_str(&format!("{access}({args})"));
        }
        rendered
    }

    /// An immediately invoked arrow function holding an `if` chain, so the
    /// conditional can be used as a value.
    fn cond(&mut self, cond: &Cond) -> String {
        self.depth += 1;
        let mut chain = String::new();
        for (index, branch) in cond.branches.iter().enumerate() {
            if index > 0 {
                chain.push_str(" else ");
            }
            let condition = self.expression(&branch.condition);
            let body = self.block(&branch.body);
            chain.push_str(&format!("if ({condition}) {body}"));
        }
        if let Some(else_body) = &cond.else_body {
            chain.push_str(&format!(" else {}", self.block(else_body)));
        }
        let inner = self.indent();
        self.depth -= 1;

        format!("(() => {{\n{inner}{chain}\n{}}})()", self.indent())
    }

    /// `.name` for identifier keys, `[key]` for anything else.
    fn access(&mut self, key: &Expr) -> String {
        match key {
            Expr::Identifier { name } => format!(".{name}"),
            other => format!("[{}]", self.expression(other)),
        }
    }

    /// Render something that is called or indexed. Number literals and
    /// closures need parentheses to be valid there.
    fn target(&mut self, expr: &Expr) -> String {
        let rendered = self.expression(expr);
        match expr {
            Expr::Number { .. } | Expr::Function(_) => format!("({rendered})"),
            _ => rendered,
        }
    }

    /// Render an operator operand. An arrow function cannot stand there bare.
    fn operand(&mut self, expr: &Expr) -> String {
        let rendered = self.expression(expr);
        match expr {
            Expr::Function(_) => format!("({rendered})"),
            _ => rendered,
        }
    }

    fn list(&mut self, items: &[Expr]) -> String {
        items
            .iter()
            .map(|item| self.expression(item))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn indent(&self) -> String {
        INDENT.repeat(self.depth)
    }
}

/// JavaScript spelling of a binary operator.
pub fn binary_symbol(op: BinaryOperator) -> &'static str {
    match op {
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
        BinaryOperator::Eq => "===",
        BinaryOperator::NotEq => "!==",
        BinaryOperator::Lt => "<",
        BinaryOperator::LtEq => "<=",
        BinaryOperator::Gt => ">",
        BinaryOperator::GtEq => ">=",
        BinaryOperator::And => "&&",
        BinaryOperator::Or => "||",
    }
}

/// JavaScript spelling of a unary operator.
pub fn unary_symbol(op: UnaryOperator) -> &'static str {
    match op {
        UnaryOperator::Not => "!",
        UnaryOperator::Negate => "-",
        UnaryOperator::BitNot => "~",
    }
}
