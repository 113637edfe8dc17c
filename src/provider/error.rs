//! Error types shared by the streaming-provider HTTP clients.

use reqwest::StatusCode;
use thiserror::Error;

/// Convenient result alias returning [`ProviderError`] failures.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Failures that can occur while talking to the streaming provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build provider client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// A request to a provider endpoint could not be sent.
    #[error("failed to send provider request to `{path}`")]
    RequestSend {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// The provider returned an unexpected status code.
    #[error("unexpected provider response status {status} for `{path}`")]
    RequestStatus { path: String, status: StatusCode },
    /// Response payload could not be parsed into JSON.
    #[error("failed to decode provider response for `{path}`")]
    DecodeResponse {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// The token endpoint answered without a usable bearer token.
    #[error("token exchange rejected: {reason}")]
    TokenRejected { reason: String },
    /// A provider URL could not be assembled from the configuration.
    #[error("invalid provider url `{url}`")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl ProviderError {
    /// True when the provider answered with a 401, meaning the bearer token
    /// is no longer accepted and the session must be re-established.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            ProviderError::RequestStatus {
                status: StatusCode::UNAUTHORIZED,
                ..
            }
        )
    }
}
