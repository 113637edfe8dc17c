use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::state::session::{AccountTier, AuthSession};

/// Account tier projection for clients.
#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TierSummary {
    /// Featured/public playlist listing only.
    Standard,
    /// Personal playlist listing and search unlocked.
    Elevated,
}

impl From<AccountTier> for TierSummary {
    fn from(value: AccountTier) -> Self {
        match value {
            AccountTier::Standard => TierSummary::Standard,
            AccountTier::Elevated => TierSummary::Elevated,
        }
    }
}

/// Snapshot of the authorization lifecycle returned by the auth routes.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionSummary {
    /// Whether a valid provider session is held.
    pub authenticated: bool,
    /// Capability tier of the session; standard when unauthenticated.
    pub tier: TierSummary,
    /// Display name of the account, when authenticated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Most recent login failure, surfaced to the login view.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&AuthSession> for SessionSummary {
    fn from(session: &AuthSession) -> Self {
        Self {
            authenticated: session.authenticated(),
            tier: session.tier().into(),
            display_name: session
                .profile()
                .map(|profile| profile.display_name.clone()),
            error: session.last_error().map(str::to_string),
        }
    }
}

/// Query parameters delivered by the provider redirect after authorization.
#[derive(Debug, Deserialize, IntoParams)]
pub struct CallbackQuery {
    /// Single-use authorization code to exchange for a bearer token.
    pub code: String,
}

/// Payload registering the playback device negotiated by the browser SDK.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterDeviceRequest {
    /// Device identifier reported by the SDK `ready` event.
    pub device_id: String,
}

impl Validate for RegisterDeviceRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.device_id.trim().is_empty() {
            let mut err = ValidationError::new("device_id_blank");
            err.message = Some("Device id must not be empty".into());
            errors.add("device_id", err);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
