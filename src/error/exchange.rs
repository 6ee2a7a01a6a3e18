use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExchangeError {
    /// Backend answered with a non-success status.
    #[error("Token exchange failed with status {status}: {message}")]
    Status { status: u16, message: String },
    /// Envelope carried `success: false`.
    #[error("Token exchange was rejected by the backend: {0}")]
    Rejected(String),
    /// Envelope was successful but carried no `data`.
    #[error("Token exchange response did not include session data")]
    MissingData,
    /// Response body was not a recognizable exchange envelope.
    #[error("Failed to parse token exchange response: {0}")]
    Malformed(#[source] serde_json::Error),
}
