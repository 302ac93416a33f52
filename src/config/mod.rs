//! Configuration management for `jen.toml`.
//!
//! The file is optional; every field has a default.
//!
//! # Sections
//!
//! | Section     | Purpose                                      |
//! |-------------|----------------------------------------------|
//! | `[serve]`   | Development server (interface, port)         |
//! | `[context]` | Variables available in every template        |
//!
//! # Example
//!
//! ```toml
//! [serve]
//! port = 8000
//!
//! [context]
//! site_name = "My Prototype"
//! nav = ["home", "about"]
//! ```

pub mod defaults;
mod error;
mod serve;

pub use error::ConfigError;
pub use serve::ServeConfig;

use crate::{
    cli::{Cli, Commands},
    render::Context,
};
use anyhow::Result;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    net::IpAddr,
    path::{Path, PathBuf},
};

/// Root configuration structure representing jen.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Path the config was loaded from, `None` when defaults are used
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Development server settings
    #[serde(default)]
    pub serve: ServeConfig,

    /// Global render context shared by all templates
    #[serde(default)]
    pub context: Context,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, &defaults::config_path())
    }

    fn parse(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|err| ConfigError::Parse(origin.to_path_buf(), err))
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Read(path.to_path_buf(), err))?;
        let mut config = Self::parse(&content, path)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Load the config named on the command line, or `jen.toml` if present.
    ///
    /// An explicitly given file must exist; the default one may be absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_path(path),
            None => {
                let path = defaults::config_path();
                if path.is_file() {
                    Self::from_path(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        if let Commands::Server {
            interface, port, ..
        } = &cli.command
        {
            Self::update_option(&mut self.serve.interface, interface.as_ref());
            Self::update_option(&mut self.serve.port, port.as_ref());
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.serve.interface.parse::<IpAddr>().is_err() {
            return Err(ConfigError::InvalidInterface(
                self.serve.interface.clone(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = SiteConfig::from_str("").unwrap();
        assert!(config.context.is_empty());
        assert_eq!(config.serve.port, 8000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_context_section() {
        let config = SiteConfig::from_str(
            r#"
            [context]
            site_name = "Prototype"
            year = 2024
            nav = ["home", "about"]

            [context.author]
            name = "Ana"
            "#,
        )
        .unwrap();

        assert_eq!(config.context["site_name"], json!("Prototype"));
        assert_eq!(config.context["year"], json!(2024));
        assert_eq!(config.context["nav"], json!(["home", "about"]));
        assert_eq!(config.context["author"]["name"], json!("Ana"));
    }

    #[test]
    fn test_unknown_section_rejection() {
        let result = SiteConfig::from_str("[deploy]\nforce = true\n");
        assert!(matches!(result, Err(ConfigError::Parse(..))));
    }

    #[test]
    fn test_from_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("jen.toml");
        fs::write(&path, "[serve]\nport = 9000\n").unwrap();

        let config = SiteConfig::from_path(&path).unwrap();
        assert_eq!(config.serve.port, 9000);
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[serve]\nport = \"eighty\"\n").unwrap();

        let err = SiteConfig::from_path(&path).unwrap_err();
        assert!(matches!(&err, ConfigError::Parse(origin, _) if *origin == path));
        assert!(err.to_string().contains("custom.toml"));
    }

    #[test]
    fn test_explicit_missing_config_fails() {
        let dir = TempDir::new().unwrap();
        let result = SiteConfig::load(Some(&dir.path().join("missing.toml")));
        assert!(matches!(result, Err(ConfigError::Read(..))));
    }

    #[test]
    fn test_cli_overrides_serve_section() {
        let mut config = SiteConfig::from_str("[serve]\nport = 9000\ninterface = \"0.0.0.0\"\n").unwrap();
        let cli = Cli::parse_from(["jen", "server", "site", "--port", "3000"]);

        config.update_with_cli(&cli);
        assert_eq!(config.serve.port, 3000);
        assert_eq!(config.serve.interface, "0.0.0.0");
    }

    #[test]
    fn test_build_command_keeps_serve_section() {
        let mut config = SiteConfig::from_str("[serve]\nport = 9000\n").unwrap();
        let cli = Cli::parse_from(["jen", "build", "site", "dist"]);

        config.update_with_cli(&cli);
        assert_eq!(config.serve.port, 9000);
    }

    #[test]
    fn test_invalid_interface() {
        let config = SiteConfig::from_str("[serve]\ninterface = \"localhost\"\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidInterface(interface)) if interface == "localhost"
        ));
    }
}
