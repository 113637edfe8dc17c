//! reqwest-backed implementation of the catalog and playback traits.

use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::config::AppConfig;
use crate::provider::{
    CatalogApi, PlaybackRemote,
    error::{ProviderError, ProviderResult},
    models::{
        FeaturedPlaylistsPayload, PageOf, PlaylistEntry, PlaylistPayload, PlaylistTracksPayload,
        ProfilePayload, SearchPlaylistsPayload, TokenGrant, TokenPayload,
    },
};
use crate::state::game::Track;
use crate::state::session::AccountProfile;

/// HTTP client speaking to the streaming provider's REST surface.
#[derive(Clone)]
pub struct HttpProvider {
    client: Client,
    api_base: Arc<str>,
    token_url: Arc<str>,
    client_id: Arc<str>,
    redirect_uri: Arc<str>,
}

impl HttpProvider {
    /// Build the provider client from the application configuration.
    pub fn new(config: &AppConfig) -> ProviderResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| ProviderError::ClientBuilder { source })?;

        Ok(Self {
            client,
            api_base: Arc::from(config.api_base_url().trim_end_matches('/')),
            token_url: Arc::from(config.token_url()),
            client_id: Arc::from(config.client_id()),
            redirect_uri: Arc::from(config.redirect_uri()),
        })
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.api_base, path.trim_start_matches('/'));
        self.client.request(method, url)
    }

    async fn get_json<T>(
        &self,
        token: &str,
        path: &str,
        query: &[(&str, &str)],
    ) -> ProviderResult<T>
    where
        T: DeserializeOwned,
    {
        let response = self
            .request(Method::GET, path)
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .map_err(|source| ProviderError::RequestSend {
                path: path.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::RequestStatus {
                path: path.to_string(),
                status,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| ProviderError::DecodeResponse {
                path: path.to_string(),
                source,
            })
    }

    async fn put_command(
        &self,
        token: &str,
        path: &str,
        device_id: &str,
        body: Option<serde_json::Value>,
    ) -> ProviderResult<()> {
        let mut builder = self
            .request(Method::PUT, path)
            .bearer_auth(token)
            .query(&[("device_id", device_id)]);
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let response = builder
            .send()
            .await
            .map_err(|source| ProviderError::RequestSend {
                path: path.to_string(),
                source,
            })?;

        let status = response.status();
        // 204 is the usual answer; 202 means the command was queued.
        if status.is_success() || status == StatusCode::ACCEPTED {
            Ok(())
        } else {
            Err(ProviderError::RequestStatus {
                path: path.to_string(),
                status,
            })
        }
    }
}

impl CatalogApi for HttpProvider {
    fn exchange_code(
        &self,
        code: String,
        verifier: String,
    ) -> BoxFuture<'static, ProviderResult<TokenGrant>> {
        let provider = self.clone();
        Box::pin(async move {
            let path = provider.token_url.to_string();
            let form = [
                ("client_id", provider.client_id.as_ref()),
                ("grant_type", "authorization_code"),
                ("code", code.as_str()),
                ("redirect_uri", provider.redirect_uri.as_ref()),
                ("code_verifier", verifier.as_str()),
            ];

            let response = provider
                .client
                .post(&path)
                .form(&form)
                .send()
                .await
                .map_err(|source| ProviderError::RequestSend {
                    path: path.clone(),
                    source,
                })?;

            let payload = response.json::<TokenPayload>().await.map_err(|source| {
                ProviderError::DecodeResponse {
                    path: path.clone(),
                    source,
                }
            })?;

            match payload.access_token {
                Some(access_token) if !access_token.is_empty() => Ok(TokenGrant { access_token }),
                _ => {
                    let reason = payload
                        .error_description
                        .or(payload.error)
                        .unwrap_or_else(|| "no token in response".into());
                    Err(ProviderError::TokenRejected { reason })
                }
            }
        })
    }

    fn fetch_profile(&self, token: String) -> BoxFuture<'static, ProviderResult<AccountProfile>> {
        let provider = self.clone();
        Box::pin(async move {
            let payload = provider
                .get_json::<ProfilePayload>(&token, "me", &[])
                .await?;
            Ok(payload.into())
        })
    }

    fn featured_playlists(
        &self,
        token: String,
    ) -> BoxFuture<'static, ProviderResult<Vec<PlaylistEntry>>> {
        let provider = self.clone();
        Box::pin(async move {
            let payload = provider
                .get_json::<FeaturedPlaylistsPayload>(
                    &token,
                    "browse/featured-playlists",
                    &[("limit", "50")],
                )
                .await?;
            Ok(payload.playlists.items.into_iter().map(Into::into).collect())
        })
    }

    fn user_playlists(
        &self,
        token: String,
    ) -> BoxFuture<'static, ProviderResult<Vec<PlaylistEntry>>> {
        let provider = self.clone();
        Box::pin(async move {
            let payload = provider
                .get_json::<PageOf<PlaylistPayload>>(&token, "me/playlists", &[("limit", "50")])
                .await?;
            Ok(payload.items.into_iter().map(Into::into).collect())
        })
    }

    fn search_playlists(
        &self,
        token: String,
        query: String,
    ) -> BoxFuture<'static, ProviderResult<Vec<PlaylistEntry>>> {
        let provider = self.clone();
        Box::pin(async move {
            let payload = provider
                .get_json::<SearchPlaylistsPayload>(
                    &token,
                    "search",
                    &[("q", query.as_str()), ("type", "playlist"), ("limit", "20")],
                )
                .await?;
            Ok(payload.playlists.items.into_iter().map(Into::into).collect())
        })
    }

    fn playlist_tracks(
        &self,
        token: String,
        playlist_id: String,
    ) -> BoxFuture<'static, ProviderResult<Vec<Track>>> {
        let provider = self.clone();
        Box::pin(async move {
            let path = format!("playlists/{playlist_id}/tracks");
            let payload = provider
                .get_json::<PlaylistTracksPayload>(&token, &path, &[("limit", "100")])
                .await?;

            Ok(payload
                .items
                .into_iter()
                .filter_map(|envelope| envelope.track)
                .filter_map(|track| track.into_playable())
                .collect())
        })
    }
}

impl PlaybackRemote for HttpProvider {
    fn play(
        &self,
        token: String,
        device_id: String,
        handle: String,
    ) -> BoxFuture<'static, ProviderResult<()>> {
        let provider = self.clone();
        Box::pin(async move {
            let body = json!({ "uris": [handle], "position_ms": 0 });
            provider
                .put_command(&token, "me/player/play", &device_id, Some(body))
                .await
        })
    }

    fn pause(&self, token: String, device_id: String) -> BoxFuture<'static, ProviderResult<()>> {
        let provider = self.clone();
        Box::pin(async move {
            provider
                .put_command(&token, "me/player/pause", &device_id, None)
                .await
        })
    }
}
