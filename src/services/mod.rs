/// Authorization lifecycle: PKCE login, session restore, logout.
pub mod auth_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Gameplay operations: playback, reveal, scoring, turn advancement.
pub mod round_service;
/// Setup-phase operations: configuration, roster, playlist listing.
pub mod setup_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
/// Countdown driver for the active turn.
pub mod timer_service;
