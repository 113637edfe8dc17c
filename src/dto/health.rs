use serde::Serialize;
use utoipa::ToSchema;

/// Simple health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status; always "ok" — the process has no hard dependencies.
    pub status: String,
    /// Whether a provider session is currently held.
    pub authenticated: bool,
}

impl HealthResponse {
    /// Create a health response with the current authentication flag.
    pub fn ok(authenticated: bool) -> Self {
        Self {
            status: "ok".to_string(),
            authenticated,
        }
    }
}
