//! Setup-phase operations: quiz configuration, roster management, and the
//! tier-gated playlist listing.

use uuid::Uuid;

use crate::{
    dto::setup::{ConfigSummary, ConfigureRequest, PlayerSummary, PlaylistListItem},
    error::ServiceError,
    services::sse_events,
    state::{SharedState, orchestrator::GameCommand, session::AccountTier},
};

/// List the playlists the host can pick from, gated by the account tier:
/// standard accounts see the featured listing, elevated accounts get their
/// own playlists and free-text search.
pub async fn list_playlists(
    state: &SharedState,
    search: Option<String>,
) -> Result<Vec<PlaylistListItem>, ServiceError> {
    let token = state.access_token().await?;
    let tier = {
        let auth = state.auth().read().await;
        auth.tier()
    };

    let search = search
        .map(|query| query.trim().to_string())
        .filter(|query| !query.is_empty());

    let entries = match (tier, search) {
        (AccountTier::Standard, Some(_)) => {
            return Err(ServiceError::InvalidInput(
                "searching playlists requires an elevated account".into(),
            ));
        }
        (AccountTier::Standard, None) => state.catalog().featured_playlists(token).await?,
        (AccountTier::Elevated, Some(query)) => {
            state.catalog().search_playlists(token, query).await?
        }
        (AccountTier::Elevated, None) => state.catalog().user_playlists(token).await?,
    };

    Ok(entries.into_iter().map(Into::into).collect())
}

/// Store the quiz configuration while still in setup.
pub async fn set_configuration(
    state: &SharedState,
    request: ConfigureRequest,
) -> Result<ConfigSummary, ServiceError> {
    state
        .dispatch(GameCommand::SetConfiguration(request.into()))
        .await?;

    sse_events::broadcast_config(state).await;
    let summary = state
        .read_game(|game| ConfigSummary::from(game.configuration()))
        .await;
    Ok(summary)
}

/// Register a new player on the roster.
pub async fn add_player(
    state: &SharedState,
    name: String,
) -> Result<PlayerSummary, ServiceError> {
    state.dispatch(GameCommand::AddPlayer { name }).await?;

    let summary = state
        .read_game(|game| game.roster().values().last().map(PlayerSummary::from))
        .await
        .ok_or_else(|| ServiceError::NotFound("player was not registered".into()))?;

    sse_events::broadcast_roster(state).await;
    Ok(summary)
}

/// Remove a player from the roster during setup.
pub async fn remove_player(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    state.dispatch(GameCommand::RemovePlayer(id)).await?;
    sse_events::broadcast_roster(state).await;
    Ok(())
}

/// Current roster in join order.
pub async fn roster(state: &SharedState) -> Vec<PlayerSummary> {
    state
        .read_game(|game| game.roster().values().map(Into::into).collect())
        .await
}
