//! Clients for the two external collaborators: the music catalog API and
//! the remote playback device. Game logic never lives here; both surfaces
//! are narrow traits so services can be tested against stubs.

pub mod error;
pub mod http;
pub mod models;
pub mod pkce;

use futures::future::BoxFuture;

use crate::provider::error::ProviderResult;
use crate::provider::models::{PlaylistEntry, TokenGrant};
use crate::state::game::Track;
use crate::state::session::AccountProfile;

/// Abstraction over the authenticated catalog endpoints of the provider.
///
/// Every method takes the bearer token explicitly; credentials live on the
/// [`crate::state::session::AuthSession`], never inside the client.
pub trait CatalogApi: Send + Sync {
    /// Exchange an authorization code plus the stored verifier for a token.
    fn exchange_code(
        &self,
        code: String,
        verifier: String,
    ) -> BoxFuture<'static, ProviderResult<TokenGrant>>;
    /// Fetch the account profile backing the current token.
    fn fetch_profile(&self, token: String) -> BoxFuture<'static, ProviderResult<AccountProfile>>;
    /// List the provider-curated featured playlists (standard tier).
    fn featured_playlists(
        &self,
        token: String,
    ) -> BoxFuture<'static, ProviderResult<Vec<PlaylistEntry>>>;
    /// List the account's own playlists (elevated tier).
    fn user_playlists(
        &self,
        token: String,
    ) -> BoxFuture<'static, ProviderResult<Vec<PlaylistEntry>>>;
    /// Search public playlists by free text (elevated tier).
    fn search_playlists(
        &self,
        token: String,
        query: String,
    ) -> BoxFuture<'static, ProviderResult<Vec<PlaylistEntry>>>;
    /// Fetch the playable tracks of a playlist. Entries without a playback
    /// handle are already filtered out.
    fn playlist_tracks(
        &self,
        token: String,
        playlist_id: String,
    ) -> BoxFuture<'static, ProviderResult<Vec<Track>>>;
}

/// Abstraction over the remote playback device commands.
pub trait PlaybackRemote: Send + Sync {
    /// Start playback of a track handle on the registered device.
    fn play(
        &self,
        token: String,
        device_id: String,
        handle: String,
    ) -> BoxFuture<'static, ProviderResult<()>>;
    /// Pause playback on the registered device.
    fn pause(&self, token: String, device_id: String) -> BoxFuture<'static, ProviderResult<()>>;
}

#[cfg(test)]
pub(crate) mod stubs {
    //! Canned provider implementations for service-level tests.

    use reqwest::StatusCode;

    use super::*;
    use crate::provider::error::ProviderError;
    use crate::state::session::AccountProfile;

    fn unauthorized(path: &str) -> ProviderError {
        ProviderError::RequestStatus {
            path: path.to_string(),
            status: StatusCode::UNAUTHORIZED,
        }
    }

    /// Catalog stub with configurable canned responses.
    #[derive(Default)]
    pub struct StubCatalog {
        pub premium: bool,
        pub reject_exchange: bool,
        pub reject_profile: bool,
        pub tracks: Vec<Track>,
    }

    impl CatalogApi for StubCatalog {
        fn exchange_code(
            &self,
            _code: String,
            _verifier: String,
        ) -> BoxFuture<'static, ProviderResult<TokenGrant>> {
            let result = if self.reject_exchange {
                Err(ProviderError::TokenRejected {
                    reason: "invalid authorization code".into(),
                })
            } else {
                Ok(TokenGrant {
                    access_token: "stub-token".into(),
                })
            };
            Box::pin(async move { result })
        }

        fn fetch_profile(
            &self,
            _token: String,
        ) -> BoxFuture<'static, ProviderResult<AccountProfile>> {
            let result = if self.reject_profile {
                Err(unauthorized("me"))
            } else {
                Ok(AccountProfile {
                    id: "account-1".into(),
                    display_name: "Stub Account".into(),
                    premium: self.premium,
                })
            };
            Box::pin(async move { result })
        }

        fn featured_playlists(
            &self,
            _token: String,
        ) -> BoxFuture<'static, ProviderResult<Vec<PlaylistEntry>>> {
            Box::pin(async move { Ok(Vec::new()) })
        }

        fn user_playlists(
            &self,
            _token: String,
        ) -> BoxFuture<'static, ProviderResult<Vec<PlaylistEntry>>> {
            Box::pin(async move { Ok(Vec::new()) })
        }

        fn search_playlists(
            &self,
            _token: String,
            _query: String,
        ) -> BoxFuture<'static, ProviderResult<Vec<PlaylistEntry>>> {
            Box::pin(async move { Ok(Vec::new()) })
        }

        fn playlist_tracks(
            &self,
            _token: String,
            _playlist_id: String,
        ) -> BoxFuture<'static, ProviderResult<Vec<Track>>> {
            let tracks = self.tracks.clone();
            Box::pin(async move { Ok(tracks) })
        }
    }

    /// Playback stub that either accepts or rejects every command.
    #[derive(Default)]
    pub struct StubPlayback {
        pub fail: bool,
    }

    impl PlaybackRemote for StubPlayback {
        fn play(
            &self,
            _token: String,
            _device_id: String,
            _handle: String,
        ) -> BoxFuture<'static, ProviderResult<()>> {
            let result = if self.fail {
                Err(ProviderError::RequestStatus {
                    path: "me/player/play".into(),
                    status: StatusCode::NOT_FOUND,
                })
            } else {
                Ok(())
            };
            Box::pin(async move { result })
        }

        fn pause(
            &self,
            _token: String,
            _device_id: String,
        ) -> BoxFuture<'static, ProviderResult<()>> {
            let result = if self.fail {
                Err(ProviderError::RequestStatus {
                    path: "me/player/pause".into(),
                    status: StatusCode::NOT_FOUND,
                })
            } else {
                Ok(())
            };
            Box::pin(async move { result })
        }
    }
}
