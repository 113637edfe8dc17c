use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    dto::validation::validate_player_name,
    provider::models::PlaylistEntry,
    state::game::{GameConfiguration, Player},
};

/// Quiz settings submitted by the host during setup.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ConfigureRequest {
    /// Number of rounds to play.
    #[validate(range(min = 1, max = 100))]
    pub rounds: u32,
    /// Seconds allotted to each guessing phase.
    #[validate(range(min = 1, max = 600))]
    pub per_guess_seconds: u32,
    /// Provider identifier of the selected playlist.
    #[validate(length(min = 1))]
    pub playlist_id: String,
    /// Display name of the selected playlist.
    #[validate(length(min = 1))]
    pub playlist_name: String,
}

impl From<ConfigureRequest> for GameConfiguration {
    fn from(value: ConfigureRequest) -> Self {
        Self {
            round_count: value.rounds,
            per_guess_seconds: value.per_guess_seconds,
            playlist_id: value.playlist_id,
            playlist_name: value.playlist_name,
        }
    }
}

/// Projection of the stored configuration.
#[derive(Debug, Serialize, ToSchema)]
pub struct ConfigSummary {
    /// Number of rounds to play.
    pub rounds: u32,
    /// Seconds allotted to each guessing phase.
    pub per_guess_seconds: u32,
    /// Provider identifier of the selected playlist.
    pub playlist_id: String,
    /// Display name of the selected playlist.
    pub playlist_name: String,
}

impl From<&GameConfiguration> for ConfigSummary {
    fn from(value: &GameConfiguration) -> Self {
        Self {
            rounds: value.round_count,
            per_guess_seconds: value.per_guess_seconds,
            playlist_id: value.playlist_id.clone(),
            playlist_name: value.playlist_name.clone(),
        }
    }
}

/// Payload registering a new player on the roster.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AddPlayerRequest {
    /// Requested display name.
    pub name: String,
}

impl Validate for AddPlayerRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_player_name(&self.name) {
            errors.add("name", e);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Public projection of a rostered player.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct PlayerSummary {
    /// Stable player identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Cosmetic avatar label.
    pub avatar_tag: String,
    /// Cumulative score for the current game.
    pub score: u32,
}

impl From<Player> for PlayerSummary {
    fn from(player: Player) -> Self {
        Self {
            id: player.id,
            name: player.name,
            avatar_tag: player.avatar_tag,
            score: player.cumulative_score,
        }
    }
}

impl From<&Player> for PlayerSummary {
    fn from(player: &Player) -> Self {
        player.clone().into()
    }
}

/// Query parameters for the playlist listing.
#[derive(Debug, Deserialize, IntoParams)]
pub struct PlaylistQuery {
    /// Free-text search; requires the elevated tier.
    #[serde(default)]
    pub search: Option<String>,
}

/// One playlist the host can pick for a game.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlaylistListItem {
    /// Provider playlist identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free-form description, may be empty.
    pub description: String,
    /// Cover image, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artwork_url: Option<String>,
    /// Number of tracks the provider reports.
    pub track_count: u32,
}

impl From<PlaylistEntry> for PlaylistListItem {
    fn from(entry: PlaylistEntry) -> Self {
        Self {
            id: entry.id,
            name: entry.name,
            description: entry.description,
            artwork_url: entry.artwork_url,
            track_count: entry.track_count,
        }
    }
}
