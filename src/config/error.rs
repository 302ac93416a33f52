//! Errors raised while loading `jen.toml`.

use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file `{0}`")]
    Read(PathBuf, #[source] io::Error),

    /// Bad TOML, an unknown section, or a field of the wrong type.
    #[error("invalid config file `{0}`")]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("[serve.interface] `{0}` is not an IP address")]
    InvalidInterface(String),
}
