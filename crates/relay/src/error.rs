/// Failure to construct the outbound request.
///
/// Raised before anything is sent, so no outcome and no history exist for
/// it. Transport failures are never errors; they become status-0 outcomes.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// The URL, a header name or a header value cannot be sent as given.
    #[error("Invalid outbound request: {0}")]
    InvalidRequest(String),

    /// The HTTP client could not be created from the relay configuration.
    #[error("HTTP client construction failed: {0}")]
    Client(#[from] reqwest::Error),
}
