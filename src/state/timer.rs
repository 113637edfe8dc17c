//! Countdown state for the active turn. The timer is deliberately owned
//! outside the orchestrator so pausing playback can pause the countdown
//! without touching game state. The struct is pure; a service task feeds it
//! wall-clock ticks.

use thiserror::Error;

/// Result of advancing the countdown by one second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Timer is not running; nothing happened.
    Idle,
    /// Timer decremented and keeps counting; carries the remaining seconds.
    Counting(u32),
    /// The countdown just hit zero. Emitted exactly once per turn.
    Reveal,
}

/// Errors returned when starting the countdown is not possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimerError {
    /// The reveal already fired for this turn; the countdown cannot restart
    /// until the orchestrator advances and re-arms.
    #[error("the countdown already completed for this turn")]
    AlreadyRevealed,
}

/// Single countdown for the active turn.
#[derive(Debug, Clone, Copy)]
pub struct TurnTimer {
    remaining_seconds: u32,
    running: bool,
    reveal_fired: bool,
}

impl Default for TurnTimer {
    fn default() -> Self {
        // Disarmed until the first turn starts: a reveal that already
        // "fired" blocks start() until arm() is called.
        Self {
            remaining_seconds: 0,
            running: false,
            reveal_fired: true,
        }
    }
}

impl TurnTimer {
    /// Create a disarmed timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds left in the current countdown.
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    /// Whether the countdown is currently ticking.
    pub fn running(&self) -> bool {
        self.running
    }

    /// Whether the reveal already fired for this turn.
    pub fn reveal_fired(&self) -> bool {
        self.reveal_fired
    }

    /// Re-arm for a new turn. Called only on turn boundaries.
    pub fn arm(&mut self, per_guess_seconds: u32) {
        self.remaining_seconds = per_guess_seconds;
        self.running = false;
        self.reveal_fired = false;
    }

    /// Begin (or resume) counting. Resuming continues the same countdown;
    /// pause/resume, not restart.
    pub fn start(&mut self) -> Result<(), TimerError> {
        if self.reveal_fired || self.remaining_seconds == 0 {
            return Err(TimerError::AlreadyRevealed);
        }
        self.running = true;
        Ok(())
    }

    /// Pause the countdown, keeping the remaining seconds.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Consume the reveal immediately (host skipped the countdown). Returns
    /// false when it had already fired, so callers never act on it twice.
    pub fn reveal_now(&mut self) -> bool {
        self.running = false;
        if self.reveal_fired {
            return false;
        }
        self.reveal_fired = true;
        true
    }

    /// Advance the countdown by one elapsed second.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Idle;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds > 0 {
            return TickOutcome::Counting(self.remaining_seconds);
        }

        self.running = false;
        if self.reveal_fired {
            TickOutcome::Idle
        } else {
            self.reveal_fired = true;
            TickOutcome::Reveal
        }
    }
}
