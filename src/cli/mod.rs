//! CLI module for the accounts server
//!
//! Provides command-line argument parsing for the `accounts-server` binary.

use clap::Parser;
use std::path::PathBuf;

/// Accounts Server - register, sign in and manage an account over HTTP
#[derive(Parser, Debug)]
#[command(
    name = "accounts-server",
    version,
    about = "Minimal account API with RS256 session cookies",
    after_help = "EXAMPLES:\n    \
                  accounts-server                        # Start with ./accounts.toml\n    \
                  accounts-server --config prod.toml     # Use a custom config file\n    \
                  accounts-server --port 8080 --verbose  # Override the port, log at debug"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "ACCOUNTS_CONFIG", default_value = "accounts.toml")]
    pub config: PathBuf,

    /// Override `server.port` from the configuration file
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Log at debug level regardless of `server.log_level`
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["accounts-server"]).expect("should parse");
        assert_eq!(cli.port, None);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "accounts-server",
            "--config",
            "custom.toml",
            "--port",
            "8080",
            "-v",
        ])
        .expect("should parse");

        assert_eq!(cli.config, PathBuf::from("custom.toml"));
        assert_eq!(cli.port, Some(8080));
        assert!(cli.verbose);
    }
}
