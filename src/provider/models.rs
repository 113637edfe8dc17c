//! Wire payloads exchanged with the streaming provider, plus their
//! conversions into the domain types the rest of the crate consumes.

use serde::Deserialize;

use crate::state::game::Track;
use crate::state::session::AccountProfile;

/// Bearer token granted by the token endpoint after a successful exchange.
#[derive(Debug, Clone)]
pub struct TokenGrant {
    /// Opaque bearer credential used on every subsequent catalog call.
    pub access_token: String,
}

/// Playlist entry returned by the listing/search endpoints.
#[derive(Debug, Clone)]
pub struct PlaylistEntry {
    /// Provider identifier, opaque to this crate.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free-form description, may be empty.
    pub description: String,
    /// Cover image, when the provider supplies one.
    pub artwork_url: Option<String>,
    /// Number of tracks the provider reports for the playlist.
    pub track_count: u32,
}

/// Raw token endpoint response. Either `access_token` or an error pair is
/// populated, never both.
#[derive(Debug, Deserialize)]
pub struct TokenPayload {
    pub access_token: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Raw account profile payload (`GET /me`).
#[derive(Debug, Deserialize)]
pub struct ProfilePayload {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Subscription product flag; `"premium"` unlocks the elevated tier.
    #[serde(default)]
    pub product: Option<String>,
}

impl From<ProfilePayload> for AccountProfile {
    fn from(value: ProfilePayload) -> Self {
        let premium = value.product.as_deref() == Some("premium");
        Self {
            id: value.id.clone(),
            display_name: value.display_name.unwrap_or(value.id),
            premium,
        }
    }
}

/// Generic page wrapper used by every playlist listing endpoint.
#[derive(Debug, Deserialize)]
pub struct PageOf<T> {
    #[serde(default)]
    pub items: Vec<T>,
}

/// Envelope for the featured-playlists endpoint.
#[derive(Debug, Deserialize)]
pub struct FeaturedPlaylistsPayload {
    pub playlists: PageOf<PlaylistPayload>,
}

/// Envelope for the playlist-search endpoint.
#[derive(Debug, Deserialize)]
pub struct SearchPlaylistsPayload {
    pub playlists: PageOf<PlaylistPayload>,
}

/// Raw playlist metadata. Listing endpoints occasionally interleave null
/// entries, hence the blanket `Option` handling at the page level.
#[derive(Debug, Deserialize)]
pub struct PlaylistPayload {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<ImagePayload>,
    #[serde(default)]
    pub tracks: Option<TrackCountPayload>,
}

/// Nested track counter on a playlist payload.
#[derive(Debug, Deserialize)]
pub struct TrackCountPayload {
    pub total: u32,
}

/// Image reference as the provider ships it.
#[derive(Debug, Deserialize)]
pub struct ImagePayload {
    pub url: String,
}

impl From<PlaylistPayload> for PlaylistEntry {
    fn from(value: PlaylistPayload) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description.unwrap_or_default(),
            artwork_url: value.images.into_iter().next().map(|image| image.url),
            track_count: value.tracks.map(|tracks| tracks.total).unwrap_or(0),
        }
    }
}

/// Envelope for the playlist-tracks endpoint; each item wraps an optional
/// track because removed/unavailable entries come back as null.
#[derive(Debug, Deserialize)]
pub struct PlaylistTracksPayload {
    #[serde(default)]
    pub items: Vec<TrackEnvelope>,
}

/// One row of a playlist-tracks page.
#[derive(Debug, Deserialize)]
pub struct TrackEnvelope {
    pub track: Option<TrackPayload>,
}

/// Raw track metadata.
#[derive(Debug, Deserialize)]
pub struct TrackPayload {
    pub name: String,
    /// Playback handle consumed verbatim by the playback device.
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub artists: Vec<ArtistPayload>,
    pub album: AlbumPayload,
}

/// Artist reference nested in a track payload.
#[derive(Debug, Deserialize)]
pub struct ArtistPayload {
    pub name: String,
}

/// Album block nested in a track payload.
#[derive(Debug, Deserialize)]
pub struct AlbumPayload {
    pub name: String,
    /// ISO date, possibly truncated to a year or year-month.
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub images: Vec<ImagePayload>,
}

impl TrackPayload {
    /// Convert into a domain [`Track`], or `None` when the provider did not
    /// supply a playback handle (the track cannot be used in a game).
    pub fn into_playable(self) -> Option<Track> {
        let handle = self.uri.filter(|uri| !uri.is_empty())?;
        Some(Track {
            title: self.name,
            artists: self.artists.into_iter().map(|artist| artist.name).collect(),
            album: self.album.name,
            release_date: self.album.release_date.unwrap_or_default(),
            artwork_url: self.album.images.into_iter().next().map(|image| image.url),
            playback_handle: handle,
        })
    }
}
