use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::{provider::error::ProviderError, state::orchestrator::CommandError};

/// Errors that can occur in service layer operations. Every external-call
/// failure is caught at the transition boundary and mapped to one of these;
/// none of them is fatal to the process.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The authorization-code exchange failed; retry by restarting login.
    #[error("authorization exchange failed: {0}")]
    AuthExchange(String),
    /// The provider no longer accepts the bearer token (or none is held);
    /// recovered locally by clearing the session and returning to login.
    #[error("session expired; log in again")]
    SessionExpired,
    /// The selected playlist yields zero usable tracks.
    #[error("playlist `{0}` has no playable tracks")]
    NoPlayableTracks(String),
    /// The playback device is missing or rejected a command. Non-fatal: the
    /// countdown and scoring flow continue unaffected.
    #[error("playback unavailable: {0}")]
    PlaybackUnavailable(String),
    /// Invalid input provided by the client.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Operation cannot be performed in the current game status.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// Requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Catalog request failed for a reason other than authorization.
    #[error("provider request failed")]
    Provider(#[source] ProviderError),
}

impl From<ProviderError> for ServiceError {
    fn from(err: ProviderError) -> Self {
        if err.is_auth_failure() {
            ServiceError::SessionExpired
        } else {
            ServiceError::Provider(err)
        }
    }
}

impl From<CommandError> for ServiceError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::InvalidCommand { .. } | CommandError::StaleTrack { .. } => {
                ServiceError::InvalidState(err.to_string())
            }
            CommandError::EmptyPlayerName
            | CommandError::DuplicateName(_)
            | CommandError::RosterTooSmall { .. }
            | CommandError::NoTracks => ServiceError::InvalidInput(err.to_string()),
            CommandError::UnknownPlayer(id) => ServiceError::NotFound(format!("player `{id}`")),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::BadRequest(format!("validation failed: {}", err))
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Authorization is missing, expired, or was refused.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// Requested resource not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Conflict with current state.
    #[error("conflict: {0}")]
    Conflict(String),
    /// External collaborator unavailable.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::AuthExchange(message) => AppError::Unauthorized(message),
            ServiceError::SessionExpired => AppError::Unauthorized("session expired".into()),
            ServiceError::NoPlayableTracks(playlist) => AppError::Conflict(format!(
                "playlist `{playlist}` has no playable tracks; pick a different playlist"
            )),
            ServiceError::PlaybackUnavailable(message) => AppError::ServiceUnavailable(message),
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::InvalidState(message) => AppError::Conflict(message),
            ServiceError::NotFound(message) => AppError::NotFound(message),
            ServiceError::Provider(source) => AppError::ServiceUnavailable(source.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = Json(ErrorBody {
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}
