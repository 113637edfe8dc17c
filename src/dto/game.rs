use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::{format_system_time, phase::VisibleStatus, setup::PlayerSummary},
    state::{
        game::{Track, TurnScoreSheet},
        orchestrator::{GameOrchestrator, GameStatus, GuessCategory},
        timer::TurnTimer,
    },
};

/// Track metadata shown once the answer is revealed.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct TrackSummary {
    /// Track title.
    pub title: String,
    /// Credited artists, in catalog order.
    pub artists: Vec<String>,
    /// Album name.
    pub album: String,
    /// Release year extracted from the catalog date, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_year: Option<String>,
    /// Album artwork, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artwork_url: Option<String>,
}

impl From<&Track> for TrackSummary {
    fn from(track: &Track) -> Self {
        Self {
            title: track.title.clone(),
            artists: track.artists.clone(),
            album: track.album.clone(),
            release_year: track.release_year().map(str::to_string),
            artwork_url: track.artwork_url.clone(),
        }
    }
}

/// Countdown snapshot for the active turn.
#[derive(Debug, Serialize, ToSchema, Clone, Copy)]
pub struct TimerSnapshot {
    /// Seconds left in the countdown.
    pub remaining_seconds: u32,
    /// Whether the countdown is ticking.
    pub running: bool,
    /// Whether the reveal already fired this turn.
    pub reveal_fired: bool,
}

impl From<TurnTimer> for TimerSnapshot {
    fn from(timer: TurnTimer) -> Self {
        Self {
            remaining_seconds: timer.remaining_seconds(),
            running: timer.running(),
            reveal_fired: timer.reveal_fired(),
        }
    }
}

/// Guess categories as clients submit them.
#[derive(Debug, Deserialize, ToSchema, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum GuessCategoryInput {
    /// The performing artist.
    Artist,
    /// The track title.
    Title,
    /// The release year.
    Year,
}

impl From<GuessCategoryInput> for GuessCategory {
    fn from(value: GuessCategoryInput) -> Self {
        match value {
            GuessCategoryInput::Artist => GuessCategory::Artist,
            GuessCategoryInput::Title => GuessCategory::Title,
            GuessCategoryInput::Year => GuessCategory::Year,
        }
    }
}

/// Payload flipping one guess flag on a player's turn sheet.
#[derive(Debug, Deserialize, ToSchema)]
pub struct MarkGuessRequest {
    /// Category being marked.
    pub category: GuessCategoryInput,
    /// Whether the guess was correct.
    pub correct: bool,
}

/// Per-player sheet projection for the active turn.
#[derive(Debug, Serialize, ToSchema)]
pub struct SheetSummary {
    /// Player the sheet belongs to.
    pub player_id: Uuid,
    /// Artist guessed correctly.
    pub artist: bool,
    /// Title guessed correctly.
    pub title: bool,
    /// Release year guessed correctly.
    pub year: bool,
    /// Points the sheet is currently worth (sweep bonus included).
    pub points: u32,
}

impl From<(Uuid, TurnScoreSheet)> for SheetSummary {
    fn from((player_id, sheet): (Uuid, TurnScoreSheet)) -> Self {
        Self {
            player_id,
            artist: sheet.artist,
            title: sheet.title,
            year: sheet.year,
            points: sheet.points(),
        }
    }
}

/// Full projection of the game session for the gameplay view.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameSummary {
    /// Current game status.
    pub status: VisibleStatus,
    /// Current round, 1-based while running.
    pub round_index: u32,
    /// Configured number of rounds.
    pub round_count: u32,
    /// Display name of the selected playlist.
    pub playlist_name: String,
    /// Rostered players in join order.
    pub players: Vec<PlayerSummary>,
    /// Whether a track is loaded for the active turn.
    pub track_loaded: bool,
    /// The active track; present only once the answer is revealed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track: Option<TrackSummary>,
    /// Mirror of the external playback device state.
    pub playback_active: bool,
    /// Countdown snapshot.
    pub timer: TimerSnapshot,
    /// Turn sheets, one per player.
    pub sheets: Vec<SheetSummary>,
}

impl GameSummary {
    /// Project orchestrator + timer state, hiding the track while guesses
    /// are still open.
    pub fn project(game: &GameOrchestrator, timer: TurnTimer) -> Self {
        let revealed = matches!(game.status(), GameStatus::Scoring | GameStatus::Finished);
        Self {
            status: game.status().into(),
            round_index: game.round_index(),
            round_count: game.configuration().round_count,
            playlist_name: game.configuration().playlist_name.clone(),
            players: game.roster().values().map(Into::into).collect(),
            track_loaded: game.active_track().is_some(),
            track: revealed
                .then(|| game.active_track().map(Into::into))
                .flatten(),
            playback_active: game.playback_active(),
            timer: timer.into(),
            sheets: game
                .sheets()
                .iter()
                .map(|(id, sheet)| (*id, *sheet).into())
                .collect(),
        }
    }
}

/// Generic acknowledgement for action routes.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActionResponse {
    /// Human-readable confirmation.
    pub message: String,
}

/// Outcome of a play request.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayResponse {
    /// Whether remote playback was started.
    pub playing: bool,
    /// Whether the countdown is running.
    pub timer_running: bool,
    /// Non-fatal playback warning, when the device could not start.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Standings after committing the turn sheets.
#[derive(Debug, Serialize, ToSchema)]
pub struct TurnScoresResponse {
    /// Players sorted by descending cumulative score.
    pub standings: Vec<PlayerSummary>,
}

/// Outcome of advancing past the scoring phase.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdvanceResponse {
    /// True when the game just finished.
    pub finished: bool,
    /// Round now in progress (unchanged when finished).
    pub round_index: u32,
}

/// Final standings shown on the results view.
#[derive(Debug, Serialize, ToSchema)]
pub struct ResultsSummary {
    /// Players sorted by descending cumulative score.
    pub standings: Vec<PlayerSummary>,
    /// Every player whose score equals the maximum.
    pub winners: Vec<PlayerSummary>,
    /// Display name of the played playlist.
    pub playlist_name: String,
    /// Number of rounds played.
    pub rounds_played: u32,
    /// RFC3339 timestamp of the game start, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
}

impl ResultsSummary {
    /// Build the results projection from a finished game.
    pub fn project(game: &GameOrchestrator) -> Self {
        Self {
            standings: game.standings().into_iter().map(Into::into).collect(),
            winners: game.winners().into_iter().map(Into::into).collect(),
            playlist_name: game.configuration().playlist_name.clone(),
            rounds_played: game.round_index(),
            started_at: game.started_at().map(format_system_time),
        }
    }
}
