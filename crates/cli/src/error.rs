use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to load configuration: {0}")]
    Config(#[from] config::Error),

    #[error("Failed to set up the cloud API client: {0}")]
    Api(#[from] cloudapi::Error),

    #[error(transparent)]
    Pass(#[from] orchestrator::Error),

    #[error("Failed to write the report: {0}")]
    Output(#[from] io::Error),
}

impl Error {
    /// The cloud API refused the configured credentials.
    pub fn is_unauthorized(&self) -> bool {
        match self {
            Self::Api(err) => err.is_unauthorized(),
            Self::Pass(err) => err.is_unauthorized(),
            _ => false,
        }
    }
}
