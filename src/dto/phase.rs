use serde::Serialize;
use utoipa::ToSchema;

use crate::state::orchestrator::GameStatus;

/// Publicly visible game status exposed to clients (REST/SSE).
#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VisibleStatus {
    /// Configuration and roster are being assembled.
    Setup,
    /// A track is playing and guesses are open.
    Playing,
    /// The answer is revealed and guesses are being scored.
    Scoring,
    /// All rounds complete; final standings available.
    Finished,
}

impl From<GameStatus> for VisibleStatus {
    fn from(value: GameStatus) -> Self {
        match value {
            GameStatus::Setup => VisibleStatus::Setup,
            GameStatus::Playing => VisibleStatus::Playing,
            GameStatus::Scoring => VisibleStatus::Scoring,
            GameStatus::Finished => VisibleStatus::Finished,
        }
    }
}
