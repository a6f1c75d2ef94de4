/// Failure of a single call against the cloud API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configured credentials were refused (HTTP 401).
    #[error("credentials for the cloud API are invalid")]
    Unauthorized,

    /// The API answered with a non-success status.
    #[error("cloud API answered {status}: {body}")]
    Status { status: u16, body: String },

    /// The request did not complete (DNS, TLS, timeout, connection reset, ...).
    #[error("cloud API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body did not have the expected shape.
    #[error("failed to decode cloud API response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A field the client relies on was absent from an otherwise valid response.
    #[error("{resource} `{id}` has no {field}")]
    MissingField {
        resource: &'static str,
        id: String,
        field: &'static str,
    },
}

impl Error {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}
