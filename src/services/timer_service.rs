//! Countdown driver for the active turn. The timer state itself is pure
//! ([`crate::state::timer::TurnTimer`]); this service feeds it wall-clock
//! ticks from a background task and dispatches the reveal when it expires.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval};
use tracing::warn;

use crate::{
    error::ServiceError,
    services::{round_service, sse_events},
    state::{SharedState, timer::TickOutcome},
};

/// Re-arm the countdown for a fresh turn from the configured guess time.
/// Any previous driver task is aborted first.
pub async fn arm_for_turn(state: &SharedState) {
    let per_guess_seconds = state
        .read_game(|game| game.configuration().per_guess_seconds)
        .await;

    state.abort_timer_task().await;
    let mut timer = state.timer().write().await;
    timer.arm(per_guess_seconds);
}

/// Start (or resume) the countdown and spawn the tick driver.
pub async fn start_countdown(state: &SharedState) -> Result<(), ServiceError> {
    {
        let mut timer = state.timer().write().await;
        timer
            .start()
            .map_err(|err| ServiceError::InvalidState(err.to_string()))?;
    }

    spawn_driver(state).await;
    Ok(())
}

/// Pause the countdown, keeping the remaining seconds for a later resume.
pub async fn stop_countdown(state: &SharedState) {
    state.abort_timer_task().await;
    let mut timer = state.timer().write().await;
    timer.stop();
}

/// Spawn the 1-second tick loop. The task holds only a weak reference so a
/// dropped application state tears the loop down on its own.
async fn spawn_driver(state: &SharedState) {
    let weak = Arc::downgrade(state);

    let handle = tokio::spawn(async move {
        let mut ticks = interval(Duration::from_secs(1));
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; consume it so the countdown
        // decrements one full second after start.
        ticks.tick().await;

        loop {
            ticks.tick().await;

            let Some(state) = weak.upgrade() else {
                break;
            };

            let outcome = {
                let mut timer = state.timer().write().await;
                timer.tick()
            };

            match outcome {
                TickOutcome::Counting(remaining) => {
                    sse_events::broadcast_timer_tick(&state, remaining);
                }
                TickOutcome::Reveal => {
                    sse_events::broadcast_timer_tick(&state, 0);
                    if let Err(err) = round_service::complete_reveal(&state).await {
                        warn!(error = %err, "failed to apply countdown reveal");
                    }
                    break;
                }
                TickOutcome::Idle => break,
            }
        }
    });

    state.install_timer_task(handle).await;
}
