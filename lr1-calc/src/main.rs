//! Command-line interface for lr1-calc.
//!
//! Parses one arithmetic expression, binds variables from trailing
//! `NAME VALUE` pairs and prints `<expression> = <value>`.
//!
//! ```text
//! $ lr1 "(x + 1) * y" x 3 y 0.5
//! (x+1)*y = 2
//! ```

use anyhow::Context;
use clap::Parser as ClapParser;
use lr1_calc::{Bindings, CalcParser, ErrorMode, Symbol};
use std::io::{self, Write};
use std::process::ExitCode;

#[derive(ClapParser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Stop at the first unexpected token instead of discarding it
    #[arg(long)]
    abort: bool,

    /// Print lexer and parser counters to stderr
    #[arg(long)]
    stats: bool,

    /// Arithmetic expression, e.g. "(x + 1) * 2"
    expression: String,

    /// Variable bindings given as NAME VALUE pairs
    #[arg(value_name = "NAME VALUE", allow_hyphen_values = true)]
    bindings: Vec<String>,
}

/// Runs one command. Results go to `out`, diagnostics and the optional
/// counters to `diag`. Returns the process exit status.
fn run(args: &Args, out: &mut impl Write, diag: &mut impl Write) -> anyhow::Result<u8> {
    let bindings = Bindings::from_pairs(&args.bindings).context("invalid bindings")?;
    let mode = if args.abort {
        ErrorMode::Abort
    } else {
        ErrorMode::Resync
    };

    let mut parser = CalcParser::with_mode(args.expression.chars(), mode);
    let analysis = parser.analyze();
    for diagnostic in &analysis.diagnostics {
        writeln!(diag, "[Error] {diagnostic}")?;
    }
    if args.stats {
        let (lexer, driver) = parser.stats();
        writeln!(diag, "{lexer:?}")?;
        writeln!(diag, "{driver:?}")?;
    }

    let Some(axiom) = analysis.into_result().and_then(Symbol::into_axiom) else {
        writeln!(out, "Invalid arithmetic expression!")?;
        return Ok(1);
    };
    let value = axiom
        .eval(&bindings)
        .with_context(|| format!("cannot evaluate '{axiom}'"))?;
    writeln!(out, "{axiom} = {value}")?;
    Ok(0)
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();
    let status = run(&args, &mut io::stdout().lock(), &mut io::stderr().lock());
    match status {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
