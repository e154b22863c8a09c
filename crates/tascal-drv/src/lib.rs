//! tascal-drv - the ambient CLI wrapper around the compiler's three passes.
//!
//! Owns argument parsing, file I/O, structured logging, and diagnostic
//! printing; carries none of the compiler's decision logic. `compile` is
//! the single entry point `main.rs` calls, returning the process exit code
//! rather than deciding it inline, so it can be driven directly from
//! integration tests too.

mod cli;
mod error;

pub use cli::{Cli, EmitTarget};
pub use error::DriverError;

use std::path::{Path, PathBuf};

use tascal_gen::Generator;
use tascal_lex::Lexer;
use tascal_par::Parser;
use tascal_util::Diagnostics;
use tracing_subscriber::EnvFilter;

/// Initializes `tracing-subscriber`. Default level is `warn`; `-v` raises it
/// to `debug` so phase boundaries (tokens produced, symbols installed,
/// labels allocated) are traced. Never touches diagnostics or exit codes.
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Runs the full lex -> parse -> (optionally) generate pipeline for one
/// input file and returns the process exit code: `0` on success, `1` on any
/// diagnostic or a missing input file.
pub fn compile(cli: &Cli) -> anyhow::Result<i32> {
    if !cli.input.exists() {
        return Err(DriverError::NoInputFile(cli.input.clone()).into());
    }

    let source = std::fs::read_to_string(&cli.input).map_err(DriverError::Io)?;
    tracing::debug!(path = %cli.input.display(), bytes = source.len(), "read source file");

    let mut diagnostics = Diagnostics::new();
    let tokens = Lexer::new(&source, &mut diagnostics).tokenize();
    tracing::debug!(count = tokens.len(), "lexed tokens");

    if cli.emit == EmitTarget::Tokens {
        for token in &tokens {
            println!("{token:?}");
        }
    }

    let (program, symbols) = Parser::new(tokens, &mut diagnostics).parse();
    tracing::debug!(symbols = symbols.len(), "parsed program");

    // All lexical, then all syntactic, then all semantic.
    if !diagnostics.is_empty() {
        for diagnostic in diagnostics.iter() {
            println!("{diagnostic}");
        }
        return Ok(1);
    }

    let Some(program) = program else {
        // Diagnostics empty but no root AST node: the grammar never leaves
        // this state reachable (a missing PROGRAM/ID/BEGIN always raises a
        // syntactic diagnostic first), kept as a defensive fallback.
        return Ok(1);
    };

    if cli.emit == EmitTarget::Ast {
        println!("{program:#?}");
        return Ok(0);
    }

    let lines = Generator::generate(&program, &symbols);
    tracing::debug!(lines = lines.len(), "generated MEPA instructions");

    if cli.emit == EmitTarget::Mepa {
        let output_path = cli
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(&cli.input));
        let mut text = lines.join("\n");
        text.push('\n');
        std::fs::write(&output_path, text).map_err(DriverError::Io)?;
        tracing::info!(path = %output_path.display(), "wrote MEPA output");
    }

    Ok(0)
}

fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("mepa")
}
