use serde::Serialize;
use utoipa::ToSchema;

use crate::dto::{
    game::{TrackSummary, TimerSnapshot},
    phase::VisibleStatus,
    setup::{ConfigSummary, PlayerSummary},
};

#[derive(Clone, Debug)]
/// Dispatched payload carried across the SSE channel.
pub struct ServerEvent {
    /// Optional SSE event name.
    pub event: Option<String>,
    /// Serialized data field.
    pub data: String,
}

impl ServerEvent {
    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }

    /// Build an event carrying a plain-text payload.
    pub fn new(event: Option<String>, data: String) -> Self {
        Self { event, data }
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast whenever the game status changes.
pub struct PhaseChangedEvent {
    /// New visible status.
    pub phase: VisibleStatus,
    /// Current round, 1-based while running.
    pub round_index: u32,
    /// Configured number of rounds.
    pub round_count: u32,
    /// Present during scoring/finished to expose the revealed track.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track: Option<TrackSummary>,
    /// Present when finished to display the final scores.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scoreboard: Option<Vec<PlayerSummary>>,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast once per countdown second.
pub struct TimerTickEvent {
    /// Seconds left in the countdown.
    pub remaining_seconds: u32,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when the answer for the active turn is revealed.
pub struct RevealEvent {
    /// The revealed track.
    pub track: TrackSummary,
    /// Countdown snapshot at reveal time.
    pub timer: TimerSnapshot,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast after turn scores are committed.
pub struct ScoreUpdateEvent {
    /// Players sorted by descending cumulative score.
    pub standings: Vec<PlayerSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when the external playback state changes.
pub struct PlaybackEvent {
    /// Whether remote playback is active.
    pub active: bool,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when the roster changes during setup.
pub struct RosterUpdatedEvent {
    /// Rostered players in join order.
    pub players: Vec<PlayerSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when the host stores a new configuration.
pub struct ConfigUpdatedEvent {
    /// The stored configuration.
    pub config: ConfigSummary,
}
