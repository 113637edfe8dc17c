//! Explicit credential and device state. The original kept these in ambient
//! browser storage; here they are plain fields owned by [`crate::state::AppState`].

/// Account capability level derived from the provider profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AccountTier {
    /// Restricted to the featured/public playlist listing.
    #[default]
    Standard,
    /// Full personal playlist listing and search.
    Elevated,
}

/// Profile of the authenticated account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountProfile {
    /// Provider account identifier.
    pub id: String,
    /// Human-readable account name.
    pub display_name: String,
    /// Whether the subscription unlocks the elevated tier.
    pub premium: bool,
}

impl AccountProfile {
    /// Tier granted by this profile.
    pub fn tier(&self) -> AccountTier {
        if self.premium {
            AccountTier::Elevated
        } else {
            AccountTier::Standard
        }
    }
}

/// Credential state for the provider session.
#[derive(Debug, Default)]
pub struct AuthSession {
    access_token: Option<String>,
    pending_verifier: Option<String>,
    profile: Option<AccountProfile>,
    last_error: Option<String>,
}

impl AuthSession {
    /// True once a bearer token is held and a profile has been loaded.
    pub fn authenticated(&self) -> bool {
        self.access_token.is_some() && self.profile.is_some()
    }

    /// Current bearer token, if any.
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Profile of the authenticated account, if loaded.
    pub fn profile(&self) -> Option<&AccountProfile> {
        self.profile.as_ref()
    }

    /// Tier of the current session; standard when unauthenticated.
    pub fn tier(&self) -> AccountTier {
        self.profile
            .as_ref()
            .map(AccountProfile::tier)
            .unwrap_or_default()
    }

    /// Most recent login failure, surfaced to the login view.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Record the verifier of a freshly started login attempt. Replaces any
    /// earlier attempt and clears the previous failure.
    pub fn begin_login(&mut self, verifier: String) {
        self.pending_verifier = Some(verifier);
        self.last_error = None;
    }

    /// Take the pending verifier for the token exchange; the verifier is
    /// single-use and must not survive the attempt.
    pub fn take_verifier(&mut self) -> Option<String> {
        self.pending_verifier.take()
    }

    /// Install a token without profile data (startup seed / exchange result).
    pub fn install_token(&mut self, token: String) {
        self.access_token = Some(token);
        self.last_error = None;
    }

    /// Attach the account profile fetched for the current token.
    pub fn install_profile(&mut self, profile: AccountProfile) {
        self.profile = Some(profile);
    }

    /// Record a failed exchange; the session stays unauthenticated.
    pub fn record_failure(&mut self, message: String) {
        self.last_error = Some(message);
    }

    /// Drop every credential. Idempotent; used by logout and 401 recovery.
    pub fn clear(&mut self) {
        self.access_token = None;
        self.pending_verifier = None;
        self.profile = None;
    }
}

/// Remote playback device state.
#[derive(Debug, Default)]
pub struct PlaybackSession {
    device_id: Option<String>,
}

impl PlaybackSession {
    /// Device identifier negotiated by the browser playback SDK, if any.
    pub fn device_id(&self) -> Option<&str> {
        self.device_id.as_deref()
    }

    /// Register the device id once the SDK reports ready.
    pub fn register_device(&mut self, device_id: String) {
        self.device_id = Some(device_id);
    }

    /// Forget the device, e.g. on logout.
    pub fn clear(&mut self) {
        self.device_id = None;
    }
}
