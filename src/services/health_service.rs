use crate::{dto::health::HealthResponse, state::SharedState};

/// Respond with the process health and the current authentication flag.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let authenticated = {
        let auth = state.auth().read().await;
        auth.authenticated()
    };

    HealthResponse::ok(authenticated)
}
