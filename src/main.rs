use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use mtlang::ast::Program;
use mtlang::error::ParseError;
use mtlang::fmt::StateReport;
use mtlang::parser::{Grammar, LogTracer};

#[derive(Parser)]
#[command(name = "mtc")]
#[command(about = "Compile Lisp-like source to JavaScript", version)]
struct Cli {
    /// Source file (reads standard input when omitted)
    input: Option<PathBuf>,

    /// Print the syntax tree before the generated code
    #[arg(long)]
    ast: bool,

    /// Print the final parse state
    #[arg(long)]
    state: bool,

    /// Emit the syntax tree and errors as JSON instead of code
    #[arg(long)]
    json: bool,

    /// Log every grammar rule as it is tried
    #[arg(long)]
    trace: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    program: Option<&'a Program>,
    errors: &'a [ParseError],
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.trace);

    let source = read_source(cli.input.as_ref())?;
    let grammar = if cli.trace {
        Grammar::with_tracer(LogTracer)
    } else {
        Grammar::new()
    };
    let (program, state) = grammar.parse(&source);

    if cli.json {
        let report = Report {
            program: program.as_ref(),
            errors: state.errors(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(exit_code(state.errors().is_empty()));
    }

    if cli.state {
        eprint!("{}", StateReport(&state));
    }

    if !state.errors().is_empty() {
        eprintln!("Failed to parse source");
        if let Some(program) = &program {
            eprint!("{program}");
        }
        for error in state.errors() {
            eprintln!("{error}");
        }
        return Ok(ExitCode::FAILURE);
    }

    let Some(program) = program else {
        eprintln!("Nothing to compile");
        return Ok(ExitCode::FAILURE);
    };

    if cli.ast {
        print!("{program}");
    }
    println!("{}", mtlang::generate(&program));

    Ok(ExitCode::SUCCESS)
}

fn init_logging(trace: bool) {
    let default = if trace { "mtlang=trace" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_source(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .context("failed to read standard input")?;
            Ok(source)
        }
    }
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
