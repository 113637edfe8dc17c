//! Shared application state: the game orchestrator, turn timer, auth and
//! playback sessions, and the SSE hub, all behind one [`Arc`].

pub mod game;
pub mod orchestrator;
pub mod session;
mod sse;
pub mod timer;

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

use crate::config::AppConfig;
use crate::error::ServiceError;
use crate::provider::{CatalogApi, PlaybackRemote};
use crate::state::orchestrator::{CommandError, GameCommand, GameOrchestrator, GameStatus};
use crate::state::session::{AuthSession, PlaybackSession};
use crate::state::sse::SseState;
use crate::state::timer::TurnTimer;

pub use self::sse::SseHub;

/// Cheaply clonable handle to the application state.
pub type SharedState = Arc<AppState>;

/// Central application state owning the canonical game session.
pub struct AppState {
    config: AppConfig,
    catalog: Arc<dyn CatalogApi>,
    playback: Arc<dyn PlaybackRemote>,
    auth: RwLock<AuthSession>,
    device: RwLock<PlaybackSession>,
    game: RwLock<GameOrchestrator>,
    timer: RwLock<TurnTimer>,
    timer_task: Mutex<Option<JoinHandle<()>>>,
    sse: SseState,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(
        config: AppConfig,
        catalog: Arc<dyn CatalogApi>,
        playback: Arc<dyn PlaybackRemote>,
    ) -> SharedState {
        Arc::new(Self {
            config,
            catalog,
            playback,
            auth: RwLock::new(AuthSession::default()),
            device: RwLock::new(PlaybackSession::default()),
            game: RwLock::new(GameOrchestrator::new()),
            timer: RwLock::new(TurnTimer::new()),
            timer_task: Mutex::new(None),
            sse: SseState::new(16),
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Catalog API client.
    pub fn catalog(&self) -> &Arc<dyn CatalogApi> {
        &self.catalog
    }

    /// Remote playback device client.
    pub fn playback_remote(&self) -> &Arc<dyn PlaybackRemote> {
        &self.playback
    }

    /// Credential state for the provider session.
    pub fn auth(&self) -> &RwLock<AuthSession> {
        &self.auth
    }

    /// Remote playback device state.
    pub fn device(&self) -> &RwLock<PlaybackSession> {
        &self.device
    }

    /// Countdown state for the active turn.
    pub fn timer(&self) -> &RwLock<TurnTimer> {
        &self.timer
    }

    /// Broadcast hub used for the board SSE stream.
    pub fn board_sse(&self) -> &SseHub {
        self.sse.board()
    }

    /// Apply a command to the shared orchestrator, returning the new status.
    ///
    /// State mutation is single-writer: every transition in the application
    /// funnels through this method.
    pub async fn dispatch(&self, command: GameCommand) -> Result<GameStatus, CommandError> {
        let mut game = self.game.write().await;
        game.apply(command)
    }

    /// Snapshot the current status of the shared orchestrator.
    pub async fn game_status(&self) -> GameStatus {
        self.game.read().await.status()
    }

    /// Run a closure against a read lock on the orchestrator.
    pub async fn read_game<F, T>(&self, read: F) -> T
    where
        F: FnOnce(&GameOrchestrator) -> T,
    {
        let game = self.game.read().await;
        read(&game)
    }

    /// Current bearer token, or a session-expired error when the user must
    /// go through login (again).
    pub async fn access_token(&self) -> Result<String, ServiceError> {
        let auth = self.auth.read().await;
        auth.access_token()
            .map(str::to_string)
            .ok_or(ServiceError::SessionExpired)
    }

    /// Registered playback device id, or a playback-unavailable error.
    pub async fn require_device(&self) -> Result<String, ServiceError> {
        let device = self.device.read().await;
        device
            .device_id()
            .map(str::to_string)
            .ok_or_else(|| ServiceError::PlaybackUnavailable("no playback device registered".into()))
    }

    /// Replace the countdown driver task, aborting any previous one.
    pub async fn install_timer_task(&self, handle: JoinHandle<()>) {
        let mut slot = self.timer_task.lock().await;
        if let Some(previous) = slot.replace(handle) {
            previous.abort();
        }
    }

    /// Abort the countdown driver task, if one is running.
    pub async fn abort_timer_task(&self) {
        let mut slot = self.timer_task.lock().await;
        if let Some(handle) = slot.take() {
            handle.abort();
        }
    }
}
