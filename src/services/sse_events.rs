use serde::Serialize;
use tracing::warn;

use crate::{
    dto::{
        game::TrackSummary,
        setup::{ConfigSummary, PlayerSummary},
        sse::{
            ConfigUpdatedEvent, PhaseChangedEvent, PlaybackEvent, RevealEvent, RosterUpdatedEvent,
            ScoreUpdateEvent, ServerEvent, TimerTickEvent,
        },
    },
    state::{SharedState, orchestrator::GameStatus},
};

const EVENT_PHASE_CHANGED: &str = "phase_changed";
const EVENT_TIMER_TICK: &str = "timer.tick";
const EVENT_REVEAL: &str = "reveal";
const EVENT_SCORE_UPDATE: &str = "score.updated";
const EVENT_PLAYBACK: &str = "playback.updated";
const EVENT_ROSTER_UPDATED: &str = "roster.updated";
const EVENT_CONFIG_UPDATED: &str = "config.updated";

/// Broadcast a game status change, attaching the revealed track and, once
/// finished, the final scoreboard.
pub async fn broadcast_phase_changed(state: &SharedState) {
    let payload = state
        .read_game(|game| {
            let status = game.status();
            let revealed = matches!(status, GameStatus::Scoring | GameStatus::Finished);
            PhaseChangedEvent {
                phase: status.into(),
                round_index: game.round_index(),
                round_count: game.configuration().round_count,
                track: revealed
                    .then(|| game.active_track().map(TrackSummary::from))
                    .flatten(),
                scoreboard: matches!(status, GameStatus::Finished)
                    .then(|| game.standings().into_iter().map(Into::into).collect()),
            }
        })
        .await;

    send_board_event(state, EVENT_PHASE_CHANGED, &payload);
}

/// Broadcast the remaining seconds of the running countdown.
pub fn broadcast_timer_tick(state: &SharedState, remaining_seconds: u32) {
    let payload = TimerTickEvent { remaining_seconds };
    send_board_event(state, EVENT_TIMER_TICK, &payload);
}

/// Broadcast the reveal of the active track.
pub async fn broadcast_reveal(state: &SharedState) {
    let track = state
        .read_game(|game| game.active_track().map(TrackSummary::from))
        .await;
    let Some(track) = track else {
        warn!("reveal broadcast skipped: no active track loaded");
        return;
    };

    let timer = { *state.timer().read().await };
    let payload = RevealEvent {
        track,
        timer: timer.into(),
    };
    send_board_event(state, EVENT_REVEAL, &payload);
}

/// Broadcast the standings after committing turn scores.
pub fn broadcast_score_update(state: &SharedState, standings: Vec<PlayerSummary>) {
    let payload = ScoreUpdateEvent { standings };
    send_board_event(state, EVENT_SCORE_UPDATE, &payload);
}

/// Broadcast the mirrored playback device state.
pub fn broadcast_playback(state: &SharedState, active: bool) {
    let payload = PlaybackEvent { active };
    send_board_event(state, EVENT_PLAYBACK, &payload);
}

/// Broadcast the roster after a setup change.
pub async fn broadcast_roster(state: &SharedState) {
    let players = state
        .read_game(|game| game.roster().values().map(Into::into).collect::<Vec<_>>())
        .await;
    let payload = RosterUpdatedEvent { players };
    send_board_event(state, EVENT_ROSTER_UPDATED, &payload);
}

/// Broadcast the freshly stored configuration.
pub async fn broadcast_config(state: &SharedState) {
    let config = state
        .read_game(|game| ConfigSummary::from(game.configuration()))
        .await;
    let payload = ConfigUpdatedEvent { config };
    send_board_event(state, EVENT_CONFIG_UPDATED, &payload);
}

fn send_board_event(state: &SharedState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.board_sse().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize board SSE payload"),
    }
}
