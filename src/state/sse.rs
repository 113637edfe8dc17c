use tokio::sync::broadcast;

use crate::dto::sse::ServerEvent;

/// SSE-specific sub-state carved out from [`crate::state::AppState`].
pub struct SseState {
    board: SseHub,
}

impl SseState {
    /// Build the SSE sub-tree with the board-stream channel capacity.
    pub fn new(board_capacity: usize) -> Self {
        Self {
            board: SseHub::new(board_capacity),
        }
    }

    /// Access the board SSE hub used to fan out re-render events to views.
    pub fn board(&self) -> &SseHub {
        &self.board
    }
}

/// Simple broadcast hub wrapper used by the SSE services.
pub struct SseHub {
    sender: broadcast::Sender<ServerEvent>,
}

impl SseHub {
    /// Construct a new hub backed by a Tokio broadcast channel with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Register a new subscriber that will receive subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.sender.subscribe()
    }

    /// Send an event to all current subscribers, ignoring delivery errors.
    pub fn broadcast(&self, event: ServerEvent) {
        let _ = self.sender.send(event);
    }
}
