use std::process::ExitCode;

use clap::Parser;
use reelcheck_cli::Cli;
use reelcheck_core::errors::ReelErrorCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match reelcheck_cli::run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("reelcheck: {}", e.coded_string());
            ExitCode::from(reelcheck_cli::EXIT_CONFIG_ERROR)
        }
    }
}
