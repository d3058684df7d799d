//! Binary entry point dispatching the `start` and `stop` subcommands.

use std::process::ExitCode;

use clap::Parser;

use gantryd::cli::{Cli, Command};
use gantryd::lifecycle::run_start;
use gantryd::stop::run_stop;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let outcome = match &cli.command {
        Command::Start(flags) => run_start(flags),
        Command::Stop(flags) => run_stop(flags),
    };
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("gantryd: {error}");
            ExitCode::FAILURE
        }
    }
}
