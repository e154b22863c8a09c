//! Command-line surface for the `tascal` binary.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Tascal - a compiler for the Tascal teaching language, emitting MEPA
/// stack-machine assembly.
#[derive(Parser, Debug)]
#[command(name = "tascal")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Source file to compile
    pub input: PathBuf,

    /// Output path (default: input path with its extension replaced by `.mepa`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Raise logging to include per-phase trace lines
    #[arg(short, long)]
    pub verbose: bool,

    /// Print an intermediate representation instead of writing the `.mepa` file
    #[arg(long, value_enum, default_value_t = EmitTarget::Mepa)]
    pub emit: EmitTarget,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum EmitTarget {
    Tokens,
    Ast,
    Mepa,
}
