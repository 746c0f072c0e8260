// ── API error type ──

/// Errors from the NetBox REST layer.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Transport-level failure (DNS, TLS, connection reset).
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured base URL could not be parsed.
    #[error("invalid base URL: {0}")]
    Url(#[from] url::ParseError),

    /// The token header value itself was malformed.
    #[error("authentication setup failed: {message}")]
    Authentication { message: String },

    /// The service rejected the API token (HTTP 401/403).
    #[error("API token rejected by the server")]
    InvalidToken,

    /// A 2xx body that did not match the expected shape.
    #[error("failed to decode response: {message}")]
    Deserialization { message: String, body: String },

    /// Any other non-2xx response, with the server's own message.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },
}

impl Error {
    /// Whether the failure is a validation conflict the reconcilers are
    /// prepared to absorb (uniqueness violations, interface types that
    /// cannot terminate a cable). NetBox reports these as 400/409.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Api { status: 400 | 409, .. })
    }
}

impl From<Error> for topsync_core::Error {
    fn from(err: Error) -> Self {
        if err.is_conflict() {
            topsync_core::Error::conflict(err.to_string())
        } else {
            topsync_core::Error::store(err.to_string())
        }
    }
}
