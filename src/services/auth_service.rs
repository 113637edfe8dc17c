//! Authorization lifecycle: PKCE login, token exchange, session restore,
//! device registration, and logout. Credentials live on the explicit
//! [`crate::state::session::AuthSession`]; nothing is stored ambiently.

use tracing::{info, warn};
use url::Url;

use crate::{
    dto::{auth::SessionSummary, game::ActionResponse},
    error::ServiceError,
    provider::{error::ProviderError, pkce},
    state::SharedState,
};

/// Start a login attempt: generate a verifier, remember it on the session,
/// and return the provider authorize URL the user agent must navigate to.
pub async fn begin_login(state: &SharedState) -> Result<String, ServiceError> {
    let config = state.config();
    let verifier = pkce::generate_verifier();
    let challenge = pkce::derive_challenge(&verifier);

    {
        let mut auth = state.auth().write().await;
        auth.begin_login(verifier);
    }

    let url = Url::parse_with_params(
        config.authorize_url(),
        &[
            ("client_id", config.client_id()),
            ("response_type", "code"),
            ("redirect_uri", config.redirect_uri()),
            ("scope", config.scopes()),
            ("code_challenge_method", "S256"),
            ("code_challenge", challenge.as_str()),
        ],
    )
    .map_err(|source| {
        ServiceError::Provider(ProviderError::InvalidUrl {
            url: config.authorize_url().to_string(),
            source,
        })
    })?;

    Ok(url.to_string())
}

/// Exchange the authorization code for a bearer token using the verifier
/// stored by [`begin_login`], then load the account profile.
pub async fn complete_login(
    state: &SharedState,
    code: String,
) -> Result<SessionSummary, ServiceError> {
    let verifier = {
        let mut auth = state.auth().write().await;
        auth.take_verifier()
    };

    let Some(verifier) = verifier else {
        let message = "login was not initiated from this session".to_string();
        let mut auth = state.auth().write().await;
        auth.record_failure(message.clone());
        return Err(ServiceError::AuthExchange(message));
    };

    match state.catalog().exchange_code(code, verifier).await {
        Ok(grant) => {
            {
                let mut auth = state.auth().write().await;
                auth.install_token(grant.access_token);
            }
            load_profile(state).await?;

            info!("provider session established");
            let auth = state.auth().read().await;
            Ok(SessionSummary::from(&*auth))
        }
        Err(err) => {
            let message = err.to_string();
            warn!(error = %err, "token exchange failed");
            let mut auth = state.auth().write().await;
            auth.record_failure(message.clone());
            Err(ServiceError::AuthExchange(message))
        }
    }
}

/// Restore the session around an already-held token: fetch the profile and
/// derive the tier. A provider 401 clears the token locally and leaves the
/// session unauthenticated; it is a recovery, not a failure.
pub async fn restore_session(state: &SharedState) -> Result<SessionSummary, ServiceError> {
    let token = {
        let auth = state.auth().read().await;
        auth.access_token().map(str::to_string)
    };

    if let Some(token) = token {
        match state.catalog().fetch_profile(token).await {
            Ok(profile) => {
                let mut auth = state.auth().write().await;
                auth.install_profile(profile);
            }
            Err(err) if err.is_auth_failure() => {
                warn!("stored token rejected by the provider; clearing session");
                let mut auth = state.auth().write().await;
                auth.clear();
            }
            Err(err) => return Err(err.into()),
        }
    }

    let auth = state.auth().read().await;
    Ok(SessionSummary::from(&*auth))
}

/// Install the configured seed token (if any) and try to restore a session
/// around it. Spawned once at startup.
pub async fn seed_session(state: SharedState) {
    let Some(token) = state.config().seed_access_token().map(str::to_string) else {
        return;
    };

    {
        let mut auth = state.auth().write().await;
        auth.install_token(token);
    }

    match restore_session(&state).await {
        Ok(summary) if summary.authenticated => info!("restored provider session from seed token"),
        Ok(_) => info!("seed token rejected; waiting for interactive login"),
        Err(err) => warn!(error = %err, "session restore failed"),
    }
}

/// Register the playback device id reported by the browser SDK.
pub async fn register_device(
    state: &SharedState,
    device_id: String,
) -> Result<ActionResponse, ServiceError> {
    let mut device = state.device().write().await;
    device.register_device(device_id);
    info!("playback device registered");
    Ok(ActionResponse {
        message: "device registered".into(),
    })
}

/// Clear every credential and the registered device. Idempotent.
pub async fn logout(state: &SharedState) -> Result<ActionResponse, ServiceError> {
    {
        let mut auth = state.auth().write().await;
        auth.clear();
    }
    {
        let mut device = state.device().write().await;
        device.clear();
    }

    info!("provider session cleared");
    Ok(ActionResponse {
        message: "logged out".into(),
    })
}

/// Fetch the profile for the freshly installed token.
async fn load_profile(state: &SharedState) -> Result<(), ServiceError> {
    let token = state.access_token().await?;
    let profile = state.catalog().fetch_profile(token).await?;
    let mut auth = state.auth().write().await;
    auth.install_profile(profile);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::AppConfig,
        provider::stubs::{StubCatalog, StubPlayback},
        state::AppState,
        state::session::AccountTier,
    };

    fn state_with(catalog: StubCatalog) -> SharedState {
        AppState::new(
            AppConfig::default(),
            Arc::new(catalog),
            Arc::new(StubPlayback::default()),
        )
    }

    #[tokio::test]
    async fn begin_login_stores_a_verifier_and_builds_the_authorize_url() {
        let state = state_with(StubCatalog::default());

        let url = begin_login(&state).await.unwrap();
        assert!(url.contains("code_challenge_method=S256"));
        assert!(url.contains("response_type=code"));

        let mut auth = state.auth().write().await;
        let verifier = auth.take_verifier().expect("verifier stored");
        assert!(verifier.len() >= 43);
    }

    #[tokio::test]
    async fn complete_login_without_begin_fails_the_exchange() {
        let state = state_with(StubCatalog::default());

        let err = complete_login(&state, "code".into()).await.unwrap_err();
        assert!(matches!(err, ServiceError::AuthExchange(_)));

        let auth = state.auth().read().await;
        assert!(!auth.authenticated());
        assert!(auth.last_error().is_some());
    }

    #[tokio::test]
    async fn full_login_flow_authenticates_and_derives_the_tier() {
        let state = state_with(StubCatalog {
            premium: true,
            ..StubCatalog::default()
        });

        begin_login(&state).await.unwrap();
        let summary = complete_login(&state, "code".into()).await.unwrap();
        assert!(summary.authenticated);

        let auth = state.auth().read().await;
        assert_eq!(auth.tier(), AccountTier::Elevated);
        // The verifier is single-use.
        assert!(auth.access_token().is_some());
    }

    #[tokio::test]
    async fn rejected_exchange_records_the_failure() {
        let state = state_with(StubCatalog {
            reject_exchange: true,
            ..StubCatalog::default()
        });

        begin_login(&state).await.unwrap();
        let err = complete_login(&state, "code".into()).await.unwrap_err();
        assert!(matches!(err, ServiceError::AuthExchange(_)));

        let auth = state.auth().read().await;
        assert!(!auth.authenticated());
        assert!(auth.last_error().is_some());
    }

    #[tokio::test]
    async fn restore_with_rejected_token_recovers_locally() {
        let state = state_with(StubCatalog {
            reject_profile: true,
            ..StubCatalog::default()
        });

        {
            let mut auth = state.auth().write().await;
            auth.install_token("stale-token".into());
        }

        let summary = restore_session(&state).await.unwrap();
        assert!(!summary.authenticated);

        let auth = state.auth().read().await;
        assert!(auth.access_token().is_none());
    }

    #[tokio::test]
    async fn restore_without_token_reports_unauthenticated() {
        let state = state_with(StubCatalog::default());
        let summary = restore_session(&state).await.unwrap();
        assert!(!summary.authenticated);
    }

    #[tokio::test]
    async fn logout_is_idempotent_and_clears_the_device() {
        let state = state_with(StubCatalog::default());
        register_device(&state, "device-1".into()).await.unwrap();

        logout(&state).await.unwrap();
        logout(&state).await.unwrap();

        assert!(state.device().read().await.device_id().is_none());
        assert!(!state.auth().read().await.authenticated());
    }
}
