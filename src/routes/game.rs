use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::game::{
        ActionResponse, AdvanceResponse, GameSummary, MarkGuessRequest, PlayResponse,
        ResultsSummary, SheetSummary, TurnScoresResponse,
    },
    error::AppError,
    services::round_service,
    state::SharedState,
};

/// Routes driving gameplay: start, playback, reveal, scoring, advancement.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/game", get(current_game))
        .route("/game/start", post(start_game))
        .route("/game/play", post(play))
        .route("/game/pause", post(pause))
        .route("/game/reveal", post(reveal))
        .route("/game/sheets/{player_id}", put(mark_guess))
        .route("/game/scores", post(submit_scores))
        .route("/game/advance", post(advance_turn))
        .route("/game/leave", post(leave_game))
        .route("/game/reset", post(reset_game))
        .route("/game/results", get(results))
}

/// Current projection of the game session.
#[utoipa::path(
    get,
    path = "/game",
    tag = "game",
    responses((status = 200, description = "Game snapshot", body = GameSummary))
)]
pub async fn current_game(
    State(state): State<SharedState>,
) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(round_service::game_summary(&state).await?))
}

/// Fetch the playlist, queue one track per round, and open round 1.
#[utoipa::path(
    post,
    path = "/game/start",
    tag = "game",
    responses((status = 200, description = "Game started", body = GameSummary))
)]
pub async fn start_game(State(state): State<SharedState>) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(round_service::start_game(&state).await?))
}

/// Start remote playback and the countdown for the active turn.
#[utoipa::path(
    post,
    path = "/game/play",
    tag = "game",
    responses((status = 200, description = "Playback requested", body = PlayResponse))
)]
pub async fn play(State(state): State<SharedState>) -> Result<Json<PlayResponse>, AppError> {
    Ok(Json(round_service::play(&state).await?))
}

/// Pause playback and the countdown without resetting it.
#[utoipa::path(
    post,
    path = "/game/pause",
    tag = "game",
    responses((status = 200, description = "Playback paused", body = ActionResponse))
)]
pub async fn pause(State(state): State<SharedState>) -> Result<Json<ActionResponse>, AppError> {
    Ok(Json(round_service::pause(&state).await?))
}

/// Reveal the answer before the countdown expires.
#[utoipa::path(
    post,
    path = "/game/reveal",
    tag = "game",
    responses((status = 200, description = "Answer revealed", body = ActionResponse))
)]
pub async fn reveal(State(state): State<SharedState>) -> Result<Json<ActionResponse>, AppError> {
    Ok(Json(round_service::reveal(&state).await?))
}

/// Flip one guess flag on a player's turn sheet.
#[utoipa::path(
    put,
    path = "/game/sheets/{player_id}",
    tag = "game",
    params(("player_id" = Uuid, Path, description = "Player whose sheet is updated")),
    request_body = MarkGuessRequest,
    responses((status = 200, description = "Sheet updated", body = SheetSummary))
)]
pub async fn mark_guess(
    State(state): State<SharedState>,
    Path(player_id): Path<Uuid>,
    Json(payload): Json<MarkGuessRequest>,
) -> Result<Json<SheetSummary>, AppError> {
    Ok(Json(
        round_service::mark_guess(&state, player_id, payload).await?,
    ))
}

/// Commit the turn sheets to the cumulative scores.
#[utoipa::path(
    post,
    path = "/game/scores",
    tag = "game",
    responses((status = 200, description = "Scores committed", body = TurnScoresResponse))
)]
pub async fn submit_scores(
    State(state): State<SharedState>,
) -> Result<Json<TurnScoresResponse>, AppError> {
    Ok(Json(round_service::submit_scores(&state).await?))
}

/// Open the next round or finish the game after the last one.
#[utoipa::path(
    post,
    path = "/game/advance",
    tag = "game",
    responses((status = 200, description = "Turn advanced", body = AdvanceResponse))
)]
pub async fn advance_turn(
    State(state): State<SharedState>,
) -> Result<Json<AdvanceResponse>, AppError> {
    Ok(Json(round_service::advance_turn(&state).await?))
}

/// Back-navigation out of gameplay: stop the countdown, pause playback.
#[utoipa::path(
    post,
    path = "/game/leave",
    tag = "game",
    responses((status = 200, description = "Left gameplay", body = ActionResponse))
)]
pub async fn leave_game(
    State(state): State<SharedState>,
) -> Result<Json<ActionResponse>, AppError> {
    Ok(Json(round_service::leave_game(&state).await?))
}

/// Reset the session back to setup, preserving the roster.
#[utoipa::path(
    post,
    path = "/game/reset",
    tag = "game",
    responses((status = 200, description = "Game reset", body = ActionResponse))
)]
pub async fn reset_game(
    State(state): State<SharedState>,
) -> Result<Json<ActionResponse>, AppError> {
    Ok(Json(round_service::reset_game(&state).await?))
}

/// Final standings and winner set.
#[utoipa::path(
    get,
    path = "/game/results",
    tag = "game",
    responses((status = 200, description = "Final standings", body = ResultsSummary))
)]
pub async fn results(State(state): State<SharedState>) -> Result<Json<ResultsSummary>, AppError> {
    Ok(Json(round_service::results(&state).await?))
}
