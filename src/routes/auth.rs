use axum::{
    Json, Router,
    extract::{Query, State},
    response::Redirect,
    routing::{get, put},
};
use axum_valid::Valid;

use crate::{
    dto::{
        auth::{CallbackQuery, RegisterDeviceRequest, SessionSummary},
        game::ActionResponse,
    },
    error::AppError,
    services::auth_service,
    state::SharedState,
};

/// Routes driving the authorization lifecycle.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/auth/login", get(begin_login))
        .route("/auth/callback", get(complete_login))
        .route("/auth/session", get(session).delete(logout))
        .route("/auth/device", put(register_device))
}

/// Start the authorization-code flow and redirect to the provider.
#[utoipa::path(
    get,
    path = "/auth/login",
    tag = "auth",
    responses(
        (status = 303, description = "Redirect to the provider authorize endpoint")
    )
)]
pub async fn begin_login(State(state): State<SharedState>) -> Result<Redirect, AppError> {
    let authorize_url = auth_service::begin_login(&state).await?;
    Ok(Redirect::to(&authorize_url))
}

/// Exchange the authorization code delivered by the provider redirect.
#[utoipa::path(
    get,
    path = "/auth/callback",
    tag = "auth",
    params(CallbackQuery),
    responses(
        (status = 200, description = "Session established", body = SessionSummary)
    )
)]
pub async fn complete_login(
    State(state): State<SharedState>,
    Query(query): Query<CallbackQuery>,
) -> Result<Json<SessionSummary>, AppError> {
    let summary = auth_service::complete_login(&state, query.code).await?;
    Ok(Json(summary))
}

/// Restore and inspect the current session.
#[utoipa::path(
    get,
    path = "/auth/session",
    tag = "auth",
    responses(
        (status = 200, description = "Current session state", body = SessionSummary)
    )
)]
pub async fn session(State(state): State<SharedState>) -> Result<Json<SessionSummary>, AppError> {
    let summary = auth_service::restore_session(&state).await?;
    Ok(Json(summary))
}

/// Register the playback device negotiated by the browser SDK.
#[utoipa::path(
    put,
    path = "/auth/device",
    tag = "auth",
    request_body = RegisterDeviceRequest,
    responses(
        (status = 200, description = "Device registered", body = ActionResponse)
    )
)]
pub async fn register_device(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<RegisterDeviceRequest>>,
) -> Result<Json<ActionResponse>, AppError> {
    let response = auth_service::register_device(&state, payload.device_id).await?;
    Ok(Json(response))
}

/// Clear all credential state.
#[utoipa::path(
    delete,
    path = "/auth/session",
    tag = "auth",
    responses(
        (status = 200, description = "Session cleared", body = ActionResponse)
    )
)]
pub async fn logout(State(state): State<SharedState>) -> Result<Json<ActionResponse>, AppError> {
    let response = auth_service::logout(&state).await?;
    Ok(Json(response))
}
