use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Tune Trivia Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::auth::begin_login,
        crate::routes::auth::complete_login,
        crate::routes::auth::session,
        crate::routes::auth::register_device,
        crate::routes::auth::logout,
        crate::routes::setup::list_playlists,
        crate::routes::setup::set_configuration,
        crate::routes::setup::roster,
        crate::routes::setup::add_player,
        crate::routes::setup::remove_player,
        crate::routes::game::current_game,
        crate::routes::game::start_game,
        crate::routes::game::play,
        crate::routes::game::pause,
        crate::routes::game::reveal,
        crate::routes::game::mark_guess,
        crate::routes::game::submit_scores,
        crate::routes::game::advance_turn,
        crate::routes::game::leave_game,
        crate::routes::game::reset_game,
        crate::routes::game::results,
        crate::routes::sse::board_stream,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::auth::SessionSummary,
            crate::dto::auth::TierSummary,
            crate::dto::auth::RegisterDeviceRequest,
            crate::dto::setup::ConfigureRequest,
            crate::dto::setup::ConfigSummary,
            crate::dto::setup::AddPlayerRequest,
            crate::dto::setup::PlayerSummary,
            crate::dto::setup::PlaylistListItem,
            crate::dto::game::GameSummary,
            crate::dto::game::TrackSummary,
            crate::dto::game::TimerSnapshot,
            crate::dto::game::MarkGuessRequest,
            crate::dto::game::GuessCategoryInput,
            crate::dto::game::SheetSummary,
            crate::dto::game::ActionResponse,
            crate::dto::game::PlayResponse,
            crate::dto::game::TurnScoresResponse,
            crate::dto::game::AdvanceResponse,
            crate::dto::game::ResultsSummary,
            crate::dto::phase::VisibleStatus,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authorization lifecycle"),
        (name = "setup", description = "Game configuration and roster"),
        (name = "game", description = "Gameplay and scoring"),
        (name = "sse", description = "Server-sent events stream"),
    )
)]
pub struct ApiDoc;
