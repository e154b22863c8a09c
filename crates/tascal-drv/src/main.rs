//! Entry point for the `tascal` binary.

use clap::Parser;
use tascal_drv::{compile, init_logging, Cli};

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("tascal: {err}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run() -> anyhow::Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    compile(&cli)
}
