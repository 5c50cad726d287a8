//! # mtlang - a Lisp-like language compiled to JavaScript
//!
//! mtlang reads S-expression source text and emits equivalent JavaScript.
//! There is no type checking and no optimization: the compiler is one parse
//! pass followed by one generation pass.
//!
//! ## Pipeline Flow
//!
//! ```text
//! Source Code (&str)
//!     ↓
//! [Parser] → AST (ast::Program) + final parser::State with recovered errors
//!     ↓
//! [Code Generator] → JavaScript (String)
//! ```
//!
//! ## Key Design Decisions
//!
//! ### Scannerless combinators over a value-threaded state
//! Parsers consume characters directly. Every parser takes a [`parser::State`]
//! and returns a new one, so backtracking keeps the old state and nothing has
//! to be undone.
//!
//! ### Errors as values
//! A committed construct that fails becomes an [`ast::Expr::ParseError`] node
//! and an entry in the state's error list. Parsing resumes after the closing
//! `)` of the broken construct, so one bad statement does not hide the rest.
//!
//! ### Currying at generation time
//! Closures with two or more parameters are wrapped in a small inlined
//! `__curry` helper, so partial application works in the generated code.
//!
//! ## Module Structure
//!
//! - [`parser`] - Combinator engine, parse state and the grammar
//! - [`ast`] - Syntax tree definitions
//! - [`codegen`] - JavaScript generation
//! - [`fmt`] - Tree printer for diagnostics
//! - [`error`] - Error types
//!
//! ## Example Program
//!
//! ```text
//! (def add |a b| (+ a b))
//! (def (greet name) (concat "hello " name))
//! (print (~> [1 2 3] ~> (map (add 1)) ~> (join ", ")))
//! ```

pub mod ast;
pub mod codegen;
pub mod error;
pub mod fmt;
pub mod parser;

use ast::Program;
use codegen::Generator;
use error::CompileError;
use parser::{Grammar, State};

/// Parse `source` into a program and the final parse state.
///
/// The program is `None` when the source holds no statements. Recovered
/// syntax errors are listed in [`State::errors`] and embedded in the program.
pub fn parse(source: &str) -> (Option<Program>, State) {
    Grammar::new().parse(source)
}

/// Render a parsed program as JavaScript.
pub fn generate(program: &Program) -> String {
    Generator::compile(program)
}

/// Parse and generate in one step, failing if any syntax error was recorded.
pub fn compile(source: &str) -> Result<String, CompileError> {
    let (program, state) = parse(source);
    if !state.errors().is_empty() {
        return Err(CompileError::Syntax {
            errors: state.errors().to_vec(),
            program,
        });
    }
    let program = program.ok_or(CompileError::EmptyProgram)?;
    Ok(generate(&program))
}
