//! `sysmaint` binary entry point.
use std::process::ExitCode;

use clap::Parser;
use sysmaint::cli::Cli;
use sysmaint::commands::maintain;

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    maintain::run(&args)
}
