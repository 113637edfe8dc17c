use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, put},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::setup::{
        AddPlayerRequest, ConfigSummary, ConfigureRequest, PlayerSummary, PlaylistListItem,
        PlaylistQuery,
    },
    error::AppError,
    services::setup_service,
    state::SharedState,
};

/// Routes for the setup phase: playlist selection, configuration, roster.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/setup/playlists", get(list_playlists))
        .route("/setup/config", put(set_configuration))
        .route("/setup/players", get(roster).post(add_player))
        .route("/setup/players/{id}", delete(remove_player))
}

/// List the playlists available to the authenticated account tier.
#[utoipa::path(
    get,
    path = "/setup/playlists",
    tag = "setup",
    params(PlaylistQuery),
    responses(
        (status = 200, description = "Available playlists", body = [PlaylistListItem])
    )
)]
pub async fn list_playlists(
    State(state): State<SharedState>,
    Query(query): Query<PlaylistQuery>,
) -> Result<Json<Vec<PlaylistListItem>>, AppError> {
    let playlists = setup_service::list_playlists(&state, query.search).await?;
    Ok(Json(playlists))
}

/// Store the quiz configuration.
#[utoipa::path(
    put,
    path = "/setup/config",
    tag = "setup",
    request_body = ConfigureRequest,
    responses(
        (status = 200, description = "Configuration stored", body = ConfigSummary)
    )
)]
pub async fn set_configuration(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<ConfigureRequest>>,
) -> Result<Json<ConfigSummary>, AppError> {
    let summary = setup_service::set_configuration(&state, payload).await?;
    Ok(Json(summary))
}

/// Current roster in join order.
#[utoipa::path(
    get,
    path = "/setup/players",
    tag = "setup",
    responses(
        (status = 200, description = "Current roster", body = [PlayerSummary])
    )
)]
pub async fn roster(State(state): State<SharedState>) -> Json<Vec<PlayerSummary>> {
    Json(setup_service::roster(&state).await)
}

/// Register a new player.
#[utoipa::path(
    post,
    path = "/setup/players",
    tag = "setup",
    request_body = AddPlayerRequest,
    responses(
        (status = 200, description = "Player registered", body = PlayerSummary)
    )
)]
pub async fn add_player(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<AddPlayerRequest>>,
) -> Result<Json<PlayerSummary>, AppError> {
    let summary = setup_service::add_player(&state, payload.name).await?;
    Ok(Json(summary))
}

/// Remove a player from the roster.
#[utoipa::path(
    delete,
    path = "/setup/players/{id}",
    tag = "setup",
    params(("id" = Uuid, Path, description = "Identifier of the player to remove")),
    responses((status = 204, description = "Player removed"))
)]
pub async fn remove_player(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    setup_service::remove_player(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
