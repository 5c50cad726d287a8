//! Diagnostic printing
//!
//! Renders the AST as an indented tree and the parse state as a short
//! summary. Used by the command line driver for `--ast`, `--state` and
//! failure reports.

use std::fmt::{self, Display, Write};

use crate::ast::{Block, Expr, Program};
use crate::parser::State;

const INDENT: &str = "  ";

struct Formatter {
    buffer: String,
    indent_level: usize,
}

impl Formatter {
    fn new() -> Self {
        Self {
            buffer: String::new(),
            indent_level: 0,
        }
    }

    fn indent(&mut self) {
        self.indent_level += 1;
    }

    fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    /// Write `text` as a line of its own at the current indentation.
    fn line(&mut self, text: &str) {
        for _ in 0..self.indent_level {
            self.buffer.push_str(INDENT);
        }
        self.buffer.push_str(text);
        self.buffer.push('\n');
    }

    /// A labelled child node, printed one level deeper than the label.
    fn field(&mut self, label: &str, expr: &Expr) {
        self.line(&format!("{label}:"));
        self.indent();
        format_expression(expr, self);
        self.dedent();
    }

    /// A labelled list of children. Empty lists print as `label: []`.
    fn list(&mut self, label: &str, items: &[Expr]) {
        if items.is_empty() {
            self.line(&format!("{label}: []"));
            return;
        }
        self.line(&format!("{label}:"));
        self.indent();
        for item in items {
            format_expression(item, self);
        }
        self.dedent();
    }

    fn block(&mut self, label: &str, block: &Block) {
        self.list(label, &block.statements);
    }

    fn finish(self) -> String {
        self.buffer
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut formatter = Formatter::new();
        formatter.line("Program");
        formatter.indent();
        for statement in &self.body {
            format_expression(statement, &mut formatter);
        }
        f.write_str(&formatter.finish())
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut formatter = Formatter::new();
        format_expression(self, &mut formatter);
        f.write_str(&formatter.finish())
    }
}

fn format_expression(expr: &Expr, fmt: &mut Formatter) {
    match expr {
        Expr::Number { value } => fmt.line(&format!("Number {value}")),
        Expr::String { value } => fmt.line(&format!("String \"{value}\"")),
        Expr::Boolean { value } => fmt.line(&format!("Boolean {value}")),
        Expr::Nil => fmt.line("Nil"),
        Expr::Identifier { name } => fmt.line(&format!("Identifier {name}")),
        Expr::Array { items } => {
            fmt.line("Array");
            fmt.indent();
            fmt.list("items", items);
            fmt.dedent();
        }
        Expr::UnaryOp(unary) => {
            fmt.line(&format!("UnaryOp {}", unary.op.symbol()));
            fmt.indent();
            format_expression(&unary.operand, fmt);
            fmt.dedent();
        }
        Expr::BinaryOp(binary) => {
            fmt.line(&format!("BinaryOp {}", binary.op.symbol()));
            fmt.indent();
            fmt.field("left", &binary.left);
            fmt.field("right", &binary.right);
            fmt.dedent();
        }
        Expr::Call(call) => {
            fmt.line("Call");
            fmt.indent();
            fmt.field("callee", &call.callee);
            fmt.list("args", &call.args);
            fmt.dedent();
        }
        Expr::MethodCallChain(chain) => {
            fmt.line("MethodCallChain");
            fmt.indent();
            fmt.field("receiver", &chain.receiver);
            for call in &chain.calls {
                fmt.line("~>");
                fmt.indent();
                fmt.field("target", &call.target);
                fmt.list("args", &call.args);
                fmt.dedent();
            }
            fmt.dedent();
        }
        Expr::Member(member) => {
            fmt.line("Member");
            fmt.indent();
            fmt.field("target", &member.target);
            fmt.field("key", &member.key);
            fmt.dedent();
        }
        Expr::VariableDecl(decl) => {
            fmt.line(&format!("VariableDecl {}", decl.name));
            fmt.indent();
            format_expression(&decl.value, fmt);
            fmt.dedent();
        }
        Expr::FunctionDecl(decl) => {
            fmt.line(&format!("FunctionDecl {}({})", decl.name, decl.params.join(" ")));
            fmt.indent();
            fmt.block("body", &decl.body);
            fmt.dedent();
        }
        Expr::Print { value } => {
            fmt.line("Print");
            fmt.indent();
            format_expression(value, fmt);
            fmt.dedent();
        }
        Expr::Block(block) => {
            fmt.line("Block");
            fmt.indent();
            fmt.block("statements", block);
            fmt.dedent();
        }
        Expr::Function(function) => {
            fmt.line(&format!("Function |{}|", function.params.join(" ")));
            fmt.indent();
            fmt.block("body", &function.body);
            fmt.dedent();
        }
        Expr::Cond(cond) => {
            fmt.line("Cond");
            fmt.indent();
            for branch in &cond.branches {
                fmt.field("when", &branch.condition);
                fmt.block("then", &branch.body);
            }
            if let Some(else_body) = &cond.else_body {
                fmt.block("else", else_body);
            }
            fmt.dedent();
        }
        Expr::ParseError(error) => fmt.line(&format!("ParseError {error}")),
    }
}

/// Summary of a finished parse: where it stopped and what went wrong.
pub struct StateReport<'a>(pub &'a State);

impl Display for StateReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.0;
        let mut out = String::new();
        writeln!(
            out,
            "State at offset {} (line {}, column {}) of {}",
            state.offset(),
            state.line(),
            state.column(),
            state.source().len()
        )?;
        if state.errors().is_empty() {
            writeln!(out, "{INDENT}no errors")?;
        }
        for error in state.errors() {
            writeln!(out, "{INDENT}{error}")?;
        }
        f.write_str(&out)
    }
}
