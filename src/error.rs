use bytes::Bytes;
use thiserror::Error;

/// Boxed error type carried by open-ended variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failures raised at the network-service boundary, after transport
/// errors have been classified.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// The server answered with a non-2xx status code.
    #[error("server responded with status {status}")]
    HttpStatus {
        status: u16,
        /// Raw error body, when the server sent one.
        body: Option<Bytes>,
    },
    /// The transport could not reach the server (connect or timeout).
    #[error("not connected")]
    NotConnected,
    /// The request was cancelled before a terminal outcome was delivered.
    #[error("cancelled")]
    Cancelled,
    /// The endpoint and configuration could not be combined into a valid
    /// request; nothing was sent.
    #[error("failed to generate request URL")]
    UrlGeneration,
    /// Any other transport failure.
    #[error("network error: {0}")]
    Generic(#[source] BoxError),
}

impl NetworkError {
    /// True for classified HTTP error responses, as opposed to
    /// connectivity-level failures.
    pub fn has_status(&self) -> bool {
        matches!(self, NetworkError::HttpStatus { .. })
    }
}

/// Failures surfaced to callers of the data-transfer service.
#[derive(Debug, Error)]
pub enum DataTransferError {
    /// The server reported success but sent no body to decode.
    #[error("no response payload")]
    NoResponsePayload,
    /// The response body could not be decoded into the requested type.
    #[error("failed to decode response: {0}")]
    DecodingFailed(#[source] BoxError),
    /// A network failure passed through the resolver unchanged.
    #[error(transparent)]
    NetworkFailure(#[from] NetworkError),
    /// A network failure the error resolver substituted with a
    /// domain-specific error.
    #[error("request failed: {0}")]
    ResolvedFailure(#[source] BoxError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_display_includes_code() {
        let err = NetworkError::HttpStatus {
            status: 404,
            body: Some(Bytes::from_static(b"not found")),
        };
        assert_eq!(format!("{err}"), "server responded with status 404");
        assert!(err.has_status());
    }

    #[test]
    fn network_failure_is_transparent() {
        let err = DataTransferError::from(NetworkError::NotConnected);
        assert_eq!(format!("{err}"), "not connected");
    }

    #[test]
    fn connectivity_errors_carry_no_status() {
        assert!(!NetworkError::NotConnected.has_status());
        assert!(!NetworkError::Cancelled.has_status());
        assert!(!NetworkError::UrlGeneration.has_status());
    }
}
