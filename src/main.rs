//! pxsheet - Command-line tool for generating sprite sheets from definitions

use std::process::ExitCode;

use pxsheet::cli;

fn main() -> ExitCode {
    cli::run()
}
