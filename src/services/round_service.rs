//! Gameplay operations: starting a game, driving playback and the
//! countdown, revealing, scoring, advancing turns, and the final results.

use rand::seq::SliceRandom;
use tracing::warn;
use uuid::Uuid;

use crate::{
    dto::game::{
        ActionResponse, AdvanceResponse, GameSummary, MarkGuessRequest, PlayResponse,
        ResultsSummary, SheetSummary, TurnScoresResponse,
    },
    error::ServiceError,
    services::{sse_events, timer_service},
    state::{
        SharedState,
        orchestrator::{GameCommand, GameStatus},
    },
};

/// Start the configured game: fetch the playlist tracks, shuffle them, queue
/// one per round, and open round 1 with the countdown armed.
pub async fn start_game(state: &SharedState) -> Result<GameSummary, ServiceError> {
    let configuration = state
        .read_game(|game| game.configuration().clone())
        .await;
    if configuration.playlist_id.is_empty() {
        return Err(ServiceError::InvalidInput("no playlist selected".into()));
    }

    let token = state.access_token().await?;
    let mut tracks = state
        .catalog()
        .playlist_tracks(token, configuration.playlist_id.clone())
        .await?;

    if tracks.is_empty() {
        return Err(ServiceError::NoPlayableTracks(
            configuration.playlist_name.clone(),
        ));
    }

    {
        let mut rng = rand::rng();
        tracks.shuffle(&mut rng);
    }
    tracks.truncate(configuration.round_count as usize);

    // The orchestrator re-validates setup status and roster size, so a
    // status change during the fetch is rejected here rather than applied.
    state.dispatch(GameCommand::StartGame { tracks }).await?;

    timer_service::arm_for_turn(state).await;
    sse_events::broadcast_phase_changed(state).await;

    game_summary(state).await
}

/// Current projection of the game for the gameplay view.
pub async fn game_summary(state: &SharedState) -> Result<GameSummary, ServiceError> {
    let timer = { *state.timer().read().await };
    let summary = state
        .read_game(|game| GameSummary::project(game, timer))
        .await;
    Ok(summary)
}

/// Start remote playback of the active track and the countdown. Playback is
/// best-effort: when the device cannot start, the request succeeds with a
/// warning and the countdown stays idle so the host can retry or count
/// without audio.
pub async fn play(state: &SharedState) -> Result<PlayResponse, ServiceError> {
    let handle = state
        .read_game(|game| match (game.status(), game.active_track()) {
            (GameStatus::Playing, Some(track)) => Ok(track.playback_handle.clone()),
            (GameStatus::Playing, None) => Err(ServiceError::InvalidState(
                "no track is loaded for this turn".into(),
            )),
            (status, _) => Err(ServiceError::InvalidState(format!(
                "cannot start playback while in {status:?}"
            ))),
        })
        .await?;

    {
        let timer = state.timer().read().await;
        if timer.reveal_fired() {
            return Err(ServiceError::InvalidState(
                "the answer is already revealed for this turn".into(),
            ));
        }
    }

    match request_play(state, handle).await {
        Ok(()) => {
            timer_service::start_countdown(state).await?;
            let _ = state.dispatch(GameCommand::SetPlaybackActive(true)).await;
            sse_events::broadcast_playback(state, true);
            Ok(PlayResponse {
                playing: true,
                timer_running: true,
                warning: None,
            })
        }
        Err(err) => {
            warn!(error = %err, "playback could not start; countdown left idle");
            Ok(PlayResponse {
                playing: false,
                timer_running: false,
                warning: Some(err.to_string()),
            })
        }
    }
}

/// Pause playback and the countdown, keeping the remaining seconds.
pub async fn pause(state: &SharedState) -> Result<ActionResponse, ServiceError> {
    timer_service::stop_countdown(state).await;
    request_pause(state).await;
    let _ = state.dispatch(GameCommand::SetPlaybackActive(false)).await;
    sse_events::broadcast_playback(state, false);

    Ok(ActionResponse {
        message: "paused".into(),
    })
}

/// Reveal the answer before the countdown expires.
pub async fn reveal(state: &SharedState) -> Result<ActionResponse, ServiceError> {
    {
        let mut timer = state.timer().write().await;
        if !timer.reveal_now() {
            return Err(ServiceError::InvalidState(
                "the answer is already revealed for this turn".into(),
            ));
        }
    }
    state.abort_timer_task().await;

    complete_reveal(state).await?;
    Ok(ActionResponse {
        message: "revealed".into(),
    })
}

/// Apply the reveal transition and its side effects. Shared between the
/// countdown driver and the manual reveal.
pub(crate) async fn complete_reveal(state: &SharedState) -> Result<(), ServiceError> {
    state.dispatch(GameCommand::Reveal).await?;
    request_pause(state).await;

    sse_events::broadcast_playback(state, false);
    sse_events::broadcast_reveal(state).await;
    sse_events::broadcast_phase_changed(state).await;
    Ok(())
}

/// Flip one guess flag on a player's turn sheet.
pub async fn mark_guess(
    state: &SharedState,
    player_id: Uuid,
    request: MarkGuessRequest,
) -> Result<SheetSummary, ServiceError> {
    state
        .dispatch(GameCommand::MarkGuess {
            player_id,
            category: request.category.into(),
            correct: request.correct,
        })
        .await?;

    let summary = state
        .read_game(|game| {
            game.sheets()
                .get(&player_id)
                .map(|sheet| SheetSummary::from((player_id, *sheet)))
        })
        .await
        .ok_or_else(|| ServiceError::NotFound(format!("player `{player_id}`")))?;

    Ok(summary)
}

/// Commit the turn sheets: award each player their sheet points (sweep
/// bonus included) and broadcast the updated standings.
pub async fn submit_scores(state: &SharedState) -> Result<TurnScoresResponse, ServiceError> {
    let status = state.game_status().await;
    if status != GameStatus::Scoring {
        return Err(ServiceError::InvalidState(format!(
            "scores can only be committed while scoring, current status {status:?}"
        )));
    }

    let sheets = state.read_game(|game| game.sheets().clone()).await;
    for (player_id, sheet) in sheets {
        let points = sheet.points();
        if points > 0 {
            state
                .dispatch(GameCommand::RecordScore { player_id, points })
                .await?;
        }
    }

    let standings = state
        .read_game(|game| {
            game.standings()
                .into_iter()
                .map(Into::into)
                .collect::<Vec<_>>()
        })
        .await;
    sse_events::broadcast_score_update(state, standings.clone());

    Ok(TurnScoresResponse { standings })
}

/// Close the scoring phase: open the next round with a fresh countdown, or
/// finish the game after the last one.
pub async fn advance_turn(state: &SharedState) -> Result<AdvanceResponse, ServiceError> {
    let status = state.dispatch(GameCommand::AdvanceTurn).await?;

    match status {
        GameStatus::Playing => timer_service::arm_for_turn(state).await,
        _ => state.abort_timer_task().await,
    }
    sse_events::broadcast_phase_changed(state).await;

    let round_index = state.read_game(|game| game.round_index()).await;
    Ok(AdvanceResponse {
        finished: status == GameStatus::Finished,
        round_index,
    })
}

/// Back-navigation out of the gameplay view: stop the countdown and request
/// a playback pause without touching game state.
pub async fn leave_game(state: &SharedState) -> Result<ActionResponse, ServiceError> {
    timer_service::stop_countdown(state).await;
    request_pause(state).await;
    let _ = state.dispatch(GameCommand::SetPlaybackActive(false)).await;
    sse_events::broadcast_playback(state, false);

    Ok(ActionResponse {
        message: "left gameplay".into(),
    })
}

/// Reset the session: zero scores, keep the roster, return to setup.
pub async fn reset_game(state: &SharedState) -> Result<ActionResponse, ServiceError> {
    timer_service::stop_countdown(state).await;
    state.dispatch(GameCommand::Reset).await?;
    sse_events::broadcast_phase_changed(state).await;

    Ok(ActionResponse {
        message: "reset".into(),
    })
}

/// Final standings and winner set; only available once the game finished.
pub async fn results(state: &SharedState) -> Result<ResultsSummary, ServiceError> {
    state
        .read_game(|game| {
            if game.status() != GameStatus::Finished {
                return Err(ServiceError::InvalidState(
                    "results are only available once the game is finished".into(),
                ));
            }
            Ok(ResultsSummary::project(game))
        })
        .await
}

/// Ask the device to start the given track.
async fn request_play(state: &SharedState, handle: String) -> Result<(), ServiceError> {
    let token = state.access_token().await?;
    let device_id = state.require_device().await?;
    state
        .playback_remote()
        .play(token, device_id, handle)
        .await?;
    Ok(())
}

/// Best-effort playback pause; failures are logged, never propagated. The
/// countdown and scoring flow do not depend on the device.
pub(crate) async fn request_pause(state: &SharedState) {
    let result: Result<(), ServiceError> = async {
        let token = state.access_token().await?;
        let device_id = state.require_device().await?;
        state.playback_remote().pause(token, device_id).await?;
        Ok(())
    }
    .await;

    if let Err(err) = result {
        warn!(error = %err, "playback pause request failed");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::AppConfig,
        dto::game::GuessCategoryInput,
        provider::stubs::{StubCatalog, StubPlayback},
        services::{auth_service, setup_service},
        state::{AppState, game::Track},
    };

    fn catalog_track(title: &str) -> Track {
        Track {
            title: title.to_string(),
            artists: vec!["Artist".into()],
            album: "Album".into(),
            release_date: "2001-05-04".into(),
            artwork_url: None,
            playback_handle: format!("handle:{title}"),
        }
    }

    fn state_with(catalog: StubCatalog, playback: StubPlayback) -> SharedState {
        AppState::new(AppConfig::default(), Arc::new(catalog), Arc::new(playback))
    }

    async fn authenticate(state: &SharedState) {
        auth_service::begin_login(state).await.unwrap();
        auth_service::complete_login(state, "code".into())
            .await
            .unwrap();
    }

    async fn configured_state(tracks: Vec<Track>) -> SharedState {
        let state = state_with(
            StubCatalog {
                premium: true,
                tracks,
                ..StubCatalog::default()
            },
            StubPlayback::default(),
        );
        authenticate(&state).await;

        setup_service::set_configuration(
            &state,
            crate::dto::setup::ConfigureRequest {
                rounds: 2,
                per_guess_seconds: 30,
                playlist_id: "pl-1".into(),
                playlist_name: "Hits".into(),
            },
        )
        .await
        .unwrap();
        setup_service::add_player(&state, "Al".into()).await.unwrap();
        setup_service::add_player(&state, "Bo".into()).await.unwrap();

        state
    }

    #[tokio::test]
    async fn start_game_queues_tracks_and_arms_the_timer() {
        let state = configured_state(vec![
            catalog_track("one"),
            catalog_track("two"),
            catalog_track("three"),
        ])
        .await;

        let summary = start_game(&state).await.unwrap();
        assert_eq!(summary.round_index, 1);
        assert_eq!(summary.round_count, 2);
        assert!(summary.track_loaded);
        // The answer is hidden while guesses are open.
        assert!(summary.track.is_none());
        assert_eq!(summary.timer.remaining_seconds, 30);
        assert!(!summary.timer.running);
    }

    #[tokio::test]
    async fn start_game_requires_a_selected_playlist() {
        let state = state_with(
            StubCatalog {
                premium: true,
                ..StubCatalog::default()
            },
            StubPlayback::default(),
        );
        authenticate(&state).await;

        let err = start_game(&state).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn start_game_surfaces_empty_playlists() {
        let state = configured_state(Vec::new()).await;

        let err = start_game(&state).await.unwrap_err();
        assert!(matches!(err, ServiceError::NoPlayableTracks(_)));
        assert_eq!(state.game_status().await, GameStatus::Setup);
    }

    #[tokio::test]
    async fn start_game_requires_authentication() {
        let state = state_with(StubCatalog::default(), StubPlayback::default());
        setup_service::set_configuration(
            &state,
            crate::dto::setup::ConfigureRequest {
                rounds: 2,
                per_guess_seconds: 30,
                playlist_id: "pl-1".into(),
                playlist_name: "Hits".into(),
            },
        )
        .await
        .unwrap();

        let err = start_game(&state).await.unwrap_err();
        assert!(matches!(err, ServiceError::SessionExpired));
    }

    #[tokio::test]
    async fn play_without_a_device_warns_and_keeps_the_countdown_idle() {
        let state = configured_state(vec![catalog_track("one"), catalog_track("two")]).await;
        start_game(&state).await.unwrap();

        let response = play(&state).await.unwrap();
        assert!(!response.playing);
        assert!(!response.timer_running);
        assert!(response.warning.is_some());
        assert!(!state.timer().read().await.running());
    }

    #[tokio::test]
    async fn play_with_a_device_starts_playback_and_the_countdown() {
        let state = configured_state(vec![catalog_track("one"), catalog_track("two")]).await;
        auth_service::register_device(&state, "device-1".into())
            .await
            .unwrap();
        start_game(&state).await.unwrap();

        let response = play(&state).await.unwrap();
        assert!(response.playing);
        assert!(response.timer_running);
        assert!(state.read_game(|game| game.playback_active()).await);

        // Pausing keeps the remaining seconds for a later resume.
        pause(&state).await.unwrap();
        assert!(!state.timer().read().await.running());
        assert!(!state.read_game(|game| game.playback_active()).await);
    }

    #[tokio::test]
    async fn full_round_trip_through_scoring_and_advance() {
        let state = configured_state(vec![catalog_track("one"), catalog_track("two")]).await;
        start_game(&state).await.unwrap();

        let (al, bo) = state
            .read_game(|game| {
                let mut ids = game.roster().keys().copied();
                (ids.next().unwrap(), ids.next().unwrap())
            })
            .await;

        reveal(&state).await.unwrap();
        assert_eq!(state.game_status().await, GameStatus::Scoring);

        // Double reveal is rejected.
        assert!(reveal(&state).await.is_err());

        for category in [
            GuessCategoryInput::Artist,
            GuessCategoryInput::Title,
            GuessCategoryInput::Year,
        ] {
            mark_guess(
                &state,
                al,
                MarkGuessRequest {
                    category,
                    correct: true,
                },
            )
            .await
            .unwrap();
        }
        let bo_sheet = mark_guess(
            &state,
            bo,
            MarkGuessRequest {
                category: GuessCategoryInput::Artist,
                correct: true,
            },
        )
        .await
        .unwrap();
        assert_eq!(bo_sheet.points, 1);

        let scores = submit_scores(&state).await.unwrap();
        assert_eq!(scores.standings[0].score, 4);
        assert_eq!(scores.standings[1].score, 1);

        let advance = advance_turn(&state).await.unwrap();
        assert!(!advance.finished);
        assert_eq!(advance.round_index, 2);
        // Fresh countdown for the new turn.
        assert_eq!(state.timer().read().await.remaining_seconds(), 30);

        reveal(&state).await.unwrap();
        let advance = advance_turn(&state).await.unwrap();
        assert!(advance.finished);

        let results = results(&state).await.unwrap();
        assert_eq!(results.rounds_played, 2);
        assert_eq!(results.winners.len(), 1);
        assert_eq!(results.winners[0].score, 4);
    }

    #[tokio::test]
    async fn submit_scores_is_rejected_outside_scoring() {
        let state = configured_state(vec![catalog_track("one"), catalog_track("two")]).await;
        start_game(&state).await.unwrap();

        let err = submit_scores(&state).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[tokio::test]
    async fn results_require_a_finished_game() {
        let state = configured_state(vec![catalog_track("one"), catalog_track("two")]).await;
        let err = results(&state).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[tokio::test]
    async fn reset_returns_to_setup_and_keeps_the_roster() {
        let state = configured_state(vec![catalog_track("one"), catalog_track("two")]).await;
        start_game(&state).await.unwrap();

        reset_game(&state).await.unwrap();
        assert_eq!(state.game_status().await, GameStatus::Setup);
        assert_eq!(
            state.read_game(|game| game.roster().len()).await,
            2,
            "roster survives a reset"
        );
    }
}
