//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Static site generator and prototyping server for HTML templates
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Config file (default: jen.toml in the working directory, if present)
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serves content from specified <source> directory
    #[command(alias = "serve")]
    Server {
        /// Site directory with templates and static files
        source: PathBuf,

        /// Interface to bind on
        #[arg(short, long)]
        interface: Option<String>,

        /// The port you should provide
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Builds a static site from <source> into the new <target> directory
    Build {
        /// Site directory with templates and static files
        source: PathBuf,

        /// Output directory, must not exist yet
        target: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, error::ErrorKind};

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_help_lists_all_commands() {
        let help = Cli::command().render_help().to_string();
        assert!(help.contains("server"));
        assert!(help.contains("build"));
    }

    #[test]
    fn test_build_arguments() {
        let cli = Cli::parse_from(["jen", "build", "site", "dist"]);
        match cli.command {
            Commands::Build { source, target } => {
                assert_eq!(source, PathBuf::from("site"));
                assert_eq!(target, PathBuf::from("dist"));
            }
            Commands::Server { .. } => panic!("expected build"),
        }
    }

    #[test]
    fn test_server_arguments() {
        let cli = Cli::parse_from(["jen", "-C", "dev.toml", "server", "site", "-p", "3000"]);
        assert_eq!(cli.config, Some(PathBuf::from("dev.toml")));
        match cli.command {
            Commands::Server {
                source,
                interface,
                port,
            } => {
                assert_eq!(source, PathBuf::from("site"));
                assert_eq!(interface, None);
                assert_eq!(port, Some(3000));
            }
            Commands::Build { .. } => panic!("expected server"),
        }
    }

    #[test]
    fn test_serve_alias() {
        let cli = Cli::parse_from(["jen", "serve", "site"]);
        assert!(matches!(cli.command, Commands::Server { .. }));
    }

    #[test]
    fn test_missing_argument() {
        let err = Cli::try_parse_from(["jen", "build", "site"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_unknown_command() {
        let err = Cli::try_parse_from(["jen", "foo"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
    }

    #[test]
    fn test_no_arguments_shows_help() {
        let err = Cli::try_parse_from(["jen"]).unwrap_err();
        assert_eq!(
            err.kind(),
            ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        );
    }
}
