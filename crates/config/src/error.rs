#![forbid(unsafe_code)]

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load configuration: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("failed to serialize TOML: {0}")]
    TomlSer(#[from] toml_edit::ser::Error),

    #[error("config file not found: {0}")]
    InvalidPath(PathBuf),

    #[error("no user or no password configured for the cloud API")]
    MissingCredentials,

    #[error("invalid policy for `{vm}`: {reason}")]
    InvalidPolicy { vm: String, reason: String },
}
