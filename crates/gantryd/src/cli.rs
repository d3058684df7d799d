//! Command-line surface of the daemon binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Parsed invocation of the `gantryd` binary.
#[derive(Debug, Parser)]
#[command(name = "gantryd", version, about = "Boots and stops the gantry server")]
pub struct Cli {
    /// Requested lifecycle command.
    #[command(subcommand)]
    pub command: Command,
}

/// Lifecycle commands accepted by the binary.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Starts the server.
    Start(RunFlags),
    /// Stops a previously started server.
    Stop(RunFlags),
}

/// Flags shared by both lifecycle commands.
#[derive(Debug, Clone, Default, Args)]
pub struct RunFlags {
    /// The configuration file to use for the server.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Enables verbose logging.
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_accepts_config_and_verbose() {
        let cli = Cli::try_parse_from(["gantryd", "start", "--config", "custom.toml", "--verbose"])
            .expect("flags should parse");
        let Command::Start(flags) = cli.command else {
            panic!("expected the start command");
        };
        assert_eq!(flags.config.as_deref(), Some(std::path::Path::new("custom.toml")));
        assert!(flags.verbose);
    }

    #[test]
    fn stop_parses_without_flags() {
        let cli = Cli::try_parse_from(["gantryd", "stop"]).expect("stop should parse");
        assert!(matches!(cli.command, Command::Stop(_)));
    }

    #[test]
    fn missing_subcommand_is_an_error() {
        assert!(Cli::try_parse_from(["gantryd"]).is_err());
    }
}
