//! Single source of truth for one game session: configuration, roster,
//! round pointer, active track, per-turn sheets, and derived standings.
//! All mutation flows through one exhaustive command dispatch.

use std::time::SystemTime;

use indexmap::IndexMap;
use thiserror::Error;
use uuid::Uuid;

use crate::state::game::{AVATAR_TAGS, GameConfiguration, Player, Track, TurnScoreSheet};

/// High-level statuses a game session can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// Configuration and roster are being assembled.
    Setup,
    /// A track is (or is about to be) playing and guesses are open.
    Playing,
    /// The answer is revealed and the host records guess results.
    Scoring,
    /// All rounds are complete; standings are final.
    Finished,
}

/// Guess categories tracked on a turn score sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessCategory {
    /// The performing artist.
    Artist,
    /// The track title.
    Title,
    /// The release year.
    Year,
}

/// Tag attached to asynchronous work started for a specific turn. Results
/// whose token no longer matches the current state are discarded instead of
/// applied (a fetch for round N must not land after round N+1 started).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnToken {
    /// Session generation; bumped on every reset.
    pub generation: u64,
    /// Round the work was started for.
    pub round: u32,
}

/// Commands accepted by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameCommand {
    /// Store the quiz settings while still in setup.
    SetConfiguration(GameConfiguration),
    /// Register a new player during setup.
    AddPlayer {
        /// Requested display name; trimmed before any checks.
        name: String,
    },
    /// Remove a player during setup.
    RemovePlayer(Uuid),
    /// Leave setup with the fetched track queue and open round 1.
    StartGame {
        /// Shuffled tracks, one per round, first entry dealt immediately.
        tracks: Vec<Track>,
    },
    /// Install a late-fetched track for the turn identified by `token`.
    SetActiveTrack {
        /// Turn the fetch was started for.
        token: TurnToken,
        /// Track to install.
        track: Track,
    },
    /// Mirror the external playback device state.
    SetPlaybackActive(bool),
    /// Flip one guess flag on a player's turn sheet.
    MarkGuess {
        /// Player whose sheet is updated.
        player_id: Uuid,
        /// Category being marked.
        category: GuessCategory,
        /// Whether the guess was correct.
        correct: bool,
    },
    /// End the guessing phase and switch to scoring.
    Reveal,
    /// Add points to a player's cumulative score.
    RecordScore {
        /// Player receiving the points.
        player_id: Uuid,
        /// Points to add; never subtracted.
        points: u32,
    },
    /// Close the scoring phase: next round, or finish after the last one.
    AdvanceTurn,
    /// Return to setup, zeroing scores but keeping the roster.
    Reset,
}

/// Error returned when a command cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The command is not valid in the current status.
    #[error("invalid command: {command:?} cannot be applied while in {status:?}")]
    InvalidCommand {
        /// Status the orchestrator was in when the command was received.
        status: GameStatus,
        /// The rejected command.
        command: GameCommand,
    },
    /// A player name was empty after trimming.
    #[error("player name must not be empty")]
    EmptyPlayerName,
    /// A player with the same name (case-insensitively) already exists.
    #[error("a player named `{0}` already exists")]
    DuplicateName(String),
    /// Fewer than two players are registered.
    #[error("at least 2 players are required to start (got {count})")]
    RosterTooSmall {
        /// Current roster size.
        count: usize,
    },
    /// The referenced player is not part of the roster.
    #[error("no player with id `{0}`")]
    UnknownPlayer(Uuid),
    /// A game cannot start without any playable track.
    #[error("cannot start a game with an empty track queue")]
    NoTracks,
    /// An async result arrived for a turn that is no longer current.
    #[error("discarded stale track tagged {got:?} (current turn {current:?})")]
    StaleTrack {
        /// Token carried by the late result.
        got: TurnToken,
        /// Token of the current turn.
        current: TurnToken,
    },
}

/// The game orchestrator. Owns `GameState` exclusively; views and timers
/// interact with it only through [`GameOrchestrator::apply`].
#[derive(Debug, Clone)]
pub struct GameOrchestrator {
    configuration: GameConfiguration,
    roster: IndexMap<Uuid, Player>,
    round_index: u32,
    queued_tracks: Vec<Track>,
    active_track: Option<Track>,
    status: GameStatus,
    playback_active: bool,
    sheets: IndexMap<Uuid, TurnScoreSheet>,
    generation: u64,
    started_at: Option<SystemTime>,
}

impl Default for GameOrchestrator {
    fn default() -> Self {
        Self {
            configuration: GameConfiguration::default(),
            roster: IndexMap::new(),
            round_index: 0,
            queued_tracks: Vec::new(),
            active_track: None,
            status: GameStatus::Setup,
            playback_active: false,
            sheets: IndexMap::new(),
            generation: 0,
            started_at: None,
        }
    }
}

impl GameOrchestrator {
    /// Create a new orchestrator in the setup status.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Current configuration.
    pub fn configuration(&self) -> &GameConfiguration {
        &self.configuration
    }

    /// Ordered roster keyed by player id.
    pub fn roster(&self) -> &IndexMap<Uuid, Player> {
        &self.roster
    }

    /// Current round, 1-based while a game is running; 0 in setup.
    pub fn round_index(&self) -> u32 {
        self.round_index
    }

    /// Track for the active turn, when one is loaded.
    pub fn active_track(&self) -> Option<&Track> {
        self.active_track.as_ref()
    }

    /// Mirror of the external playback device state.
    pub fn playback_active(&self) -> bool {
        self.playback_active
    }

    /// Score sheets for the active turn.
    pub fn sheets(&self) -> &IndexMap<Uuid, TurnScoreSheet> {
        &self.sheets
    }

    /// Wall-clock time the current game started, if one is running.
    pub fn started_at(&self) -> Option<SystemTime> {
        self.started_at
    }

    /// Token identifying the current turn; attach it to asynchronous work so
    /// late results can be recognised and discarded.
    pub fn turn_token(&self) -> TurnToken {
        TurnToken {
            generation: self.generation,
            round: self.round_index,
        }
    }

    /// Players sorted by descending cumulative score (ties keep roster order).
    pub fn standings(&self) -> Vec<Player> {
        let mut players = self.roster.values().cloned().collect::<Vec<_>>();
        players.sort_by(|a, b| b.cumulative_score.cmp(&a.cumulative_score));
        players
    }

    /// Every player whose score equals the maximum. Ties produce multiple
    /// winners, never an arbitrary tiebreak.
    pub fn winners(&self) -> Vec<Player> {
        let Some(top) = self
            .roster
            .values()
            .map(|player| player.cumulative_score)
            .max()
        else {
            return Vec::new();
        };

        self.roster
            .values()
            .filter(|player| player.cumulative_score == top)
            .cloned()
            .collect()
    }

    /// Apply a command, returning the resulting status.
    ///
    /// Rejected commands leave the state untouched.
    pub fn apply(&mut self, command: GameCommand) -> Result<GameStatus, CommandError> {
        match (self.status, command) {
            (GameStatus::Setup, GameCommand::SetConfiguration(configuration)) => {
                self.configuration = configuration;
            }
            (GameStatus::Setup, GameCommand::AddPlayer { name }) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(CommandError::EmptyPlayerName);
                }
                let lowered = name.to_lowercase();
                if self
                    .roster
                    .values()
                    .any(|player| player.name.to_lowercase() == lowered)
                {
                    return Err(CommandError::DuplicateName(name.to_string()));
                }

                let id = Uuid::new_v4();
                let avatar_tag = AVATAR_TAGS[self.roster.len() % AVATAR_TAGS.len()].to_string();
                self.roster.insert(
                    id,
                    Player {
                        id,
                        name: name.to_string(),
                        avatar_tag,
                        cumulative_score: 0,
                    },
                );
            }
            (GameStatus::Setup, GameCommand::RemovePlayer(id)) => {
                if self.roster.shift_remove(&id).is_none() {
                    return Err(CommandError::UnknownPlayer(id));
                }
            }
            (GameStatus::Setup, GameCommand::StartGame { tracks }) => {
                if self.roster.len() < 2 {
                    return Err(CommandError::RosterTooSmall {
                        count: self.roster.len(),
                    });
                }
                if tracks.is_empty() {
                    return Err(CommandError::NoTracks);
                }

                self.round_index = 1;
                self.status = GameStatus::Playing;
                self.active_track = tracks.first().cloned();
                self.queued_tracks = tracks;
                self.playback_active = false;
                self.started_at = Some(SystemTime::now());
                self.reset_sheets();
            }
            (GameStatus::Playing, GameCommand::SetActiveTrack { token, track }) => {
                let current = self.turn_token();
                if token != current {
                    return Err(CommandError::StaleTrack {
                        got: token,
                        current,
                    });
                }
                self.active_track = Some(track);
            }
            (_, GameCommand::SetPlaybackActive(active)) => {
                self.playback_active = active;
            }
            (
                GameStatus::Playing | GameStatus::Scoring,
                GameCommand::MarkGuess {
                    player_id,
                    category,
                    correct,
                },
            ) => {
                if !self.roster.contains_key(&player_id) {
                    return Err(CommandError::UnknownPlayer(player_id));
                }
                let sheet = self.sheets.entry(player_id).or_default();
                match category {
                    GuessCategory::Artist => sheet.artist = correct,
                    GuessCategory::Title => sheet.title = correct,
                    GuessCategory::Year => sheet.year = correct,
                }
            }
            (GameStatus::Playing, GameCommand::Reveal) => {
                self.status = GameStatus::Scoring;
                self.playback_active = false;
            }
            (
                GameStatus::Playing | GameStatus::Scoring,
                GameCommand::RecordScore { player_id, points },
            ) => {
                let player = self
                    .roster
                    .get_mut(&player_id)
                    .ok_or(CommandError::UnknownPlayer(player_id))?;
                player.cumulative_score += points;
            }
            (GameStatus::Scoring, GameCommand::AdvanceTurn) => {
                if self.round_index >= self.configuration.round_count {
                    self.status = GameStatus::Finished;
                    self.playback_active = false;
                } else {
                    self.round_index += 1;
                    self.status = GameStatus::Playing;
                    // The queue was dealt at start; a missing entry leaves the
                    // track empty until a tagged late fetch installs one.
                    self.active_track = self
                        .queued_tracks
                        .get((self.round_index - 1) as usize)
                        .cloned();
                    self.playback_active = false;
                    self.reset_sheets();
                }
            }
            (_, GameCommand::Reset) => {
                for player in self.roster.values_mut() {
                    player.cumulative_score = 0;
                }
                self.round_index = 0;
                self.status = GameStatus::Setup;
                self.active_track = None;
                self.queued_tracks.clear();
                self.playback_active = false;
                self.sheets.clear();
                self.started_at = None;
                self.generation += 1;
            }
            (status, command) => {
                return Err(CommandError::InvalidCommand { status, command });
            }
        }

        Ok(self.status)
    }

    /// Fresh sheets for every rostered player.
    fn reset_sheets(&mut self) {
        self.sheets = self
            .roster
            .keys()
            .map(|id| (*id, TurnScoreSheet::default()))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(orchestrator: &mut GameOrchestrator, command: GameCommand) -> GameStatus {
        orchestrator.apply(command).unwrap()
    }

    fn track(title: &str) -> Track {
        Track {
            title: title.to_string(),
            artists: vec!["Artist".into()],
            album: "Album".into(),
            release_date: "1999-03-01".into(),
            artwork_url: None,
            playback_handle: format!("handle:{title}"),
        }
    }

    fn configured(rounds: u32) -> GameOrchestrator {
        let mut orchestrator = GameOrchestrator::new();
        apply(
            &mut orchestrator,
            GameCommand::SetConfiguration(GameConfiguration {
                round_count: rounds,
                per_guess_seconds: 30,
                playlist_id: "pl-1".into(),
                playlist_name: "Hits".into(),
            }),
        );
        orchestrator
    }

    fn with_players(rounds: u32, names: &[&str]) -> GameOrchestrator {
        let mut orchestrator = configured(rounds);
        for name in names {
            apply(
                &mut orchestrator,
                GameCommand::AddPlayer {
                    name: name.to_string(),
                },
            );
        }
        orchestrator
    }

    fn player_id(orchestrator: &GameOrchestrator, name: &str) -> Uuid {
        orchestrator
            .roster()
            .values()
            .find(|player| player.name == name)
            .map(|player| player.id)
            .unwrap()
    }

    #[test]
    fn initial_state_is_setup() {
        let orchestrator = GameOrchestrator::new();
        assert_eq!(orchestrator.status(), GameStatus::Setup);
        assert_eq!(orchestrator.round_index(), 0);
    }

    #[test]
    fn duplicate_player_name_is_rejected_case_insensitively() {
        let mut orchestrator = with_players(3, &["Alice"]);

        let err = orchestrator
            .apply(GameCommand::AddPlayer {
                name: "  aLiCe ".into(),
            })
            .unwrap_err();
        assert_eq!(err, CommandError::DuplicateName("aLiCe".into()));
        assert_eq!(orchestrator.roster().len(), 1);
    }

    #[test]
    fn empty_player_name_is_rejected() {
        let mut orchestrator = configured(3);
        let err = orchestrator
            .apply(GameCommand::AddPlayer { name: "   ".into() })
            .unwrap_err();
        assert_eq!(err, CommandError::EmptyPlayerName);
        assert!(orchestrator.roster().is_empty());
    }

    #[test]
    fn avatar_tags_are_assigned_round_robin() {
        let orchestrator = with_players(3, &["A", "B"]);
        let tags = orchestrator
            .roster()
            .values()
            .map(|player| player.avatar_tag.as_str())
            .collect::<Vec<_>>();
        assert_eq!(tags, vec![AVATAR_TAGS[0], AVATAR_TAGS[1]]);
    }

    #[test]
    fn start_game_requires_two_players() {
        let mut orchestrator = with_players(3, &["Solo"]);

        let err = orchestrator
            .apply(GameCommand::StartGame {
                tracks: vec![track("one")],
            })
            .unwrap_err();
        assert_eq!(err, CommandError::RosterTooSmall { count: 1 });
        assert_eq!(orchestrator.status(), GameStatus::Setup);
        assert_eq!(orchestrator.round_index(), 0);
    }

    #[test]
    fn start_game_deals_the_first_track() {
        let mut orchestrator = with_players(2, &["Al", "Bo"]);

        let status = apply(
            &mut orchestrator,
            GameCommand::StartGame {
                tracks: vec![track("one"), track("two")],
            },
        );

        assert_eq!(status, GameStatus::Playing);
        assert_eq!(orchestrator.round_index(), 1);
        assert_eq!(orchestrator.active_track().unwrap().title, "one");
        assert!(!orchestrator.playback_active());
        assert_eq!(orchestrator.sheets().len(), 2);
    }

    #[test]
    fn start_game_with_no_tracks_is_rejected() {
        let mut orchestrator = with_players(2, &["Al", "Bo"]);
        let err = orchestrator
            .apply(GameCommand::StartGame { tracks: vec![] })
            .unwrap_err();
        assert_eq!(err, CommandError::NoTracks);
        assert_eq!(orchestrator.status(), GameStatus::Setup);
    }

    #[test]
    fn roster_changes_are_rejected_outside_setup() {
        let mut orchestrator = with_players(2, &["Al", "Bo"]);
        apply(
            &mut orchestrator,
            GameCommand::StartGame {
                tracks: vec![track("one")],
            },
        );

        let err = orchestrator
            .apply(GameCommand::AddPlayer { name: "Cy".into() })
            .unwrap_err();
        assert!(matches!(err, CommandError::InvalidCommand { .. }));
        assert_eq!(orchestrator.roster().len(), 2);
    }

    #[test]
    fn stale_track_results_are_discarded() {
        let mut orchestrator = with_players(3, &["Al", "Bo"]);
        apply(
            &mut orchestrator,
            GameCommand::StartGame {
                tracks: vec![track("one"), track("two"), track("three")],
            },
        );

        // Token captured during round 1, result landing in round 2.
        let stale = orchestrator.turn_token();
        apply(&mut orchestrator, GameCommand::Reveal);
        apply(&mut orchestrator, GameCommand::AdvanceTurn);

        let err = orchestrator
            .apply(GameCommand::SetActiveTrack {
                token: stale,
                track: track("late"),
            })
            .unwrap_err();
        assert!(matches!(err, CommandError::StaleTrack { .. }));
        assert_eq!(orchestrator.active_track().unwrap().title, "two");

        // A token for the current turn is accepted.
        let current = orchestrator.turn_token();
        apply(
            &mut orchestrator,
            GameCommand::SetActiveTrack {
                token: current,
                track: track("refetched"),
            },
        );
        assert_eq!(orchestrator.active_track().unwrap().title, "refetched");
    }

    #[test]
    fn reset_bumps_the_generation_so_inflight_results_die() {
        let mut orchestrator = with_players(2, &["Al", "Bo"]);
        apply(
            &mut orchestrator,
            GameCommand::StartGame {
                tracks: vec![track("one"), track("two")],
            },
        );

        let pre_reset = orchestrator.turn_token();
        apply(&mut orchestrator, GameCommand::Reset);
        apply(
            &mut orchestrator,
            GameCommand::StartGame {
                tracks: vec![track("fresh"), track("fresh2")],
            },
        );

        // Same round number, older generation: still rejected.
        assert_eq!(pre_reset.round, orchestrator.turn_token().round);
        let err = orchestrator
            .apply(GameCommand::SetActiveTrack {
                token: pre_reset,
                track: track("ghost"),
            })
            .unwrap_err();
        assert!(matches!(err, CommandError::StaleTrack { .. }));
        assert_eq!(orchestrator.active_track().unwrap().title, "fresh");
    }

    #[test]
    fn advance_on_final_round_finishes_without_incrementing() {
        let mut orchestrator = with_players(1, &["Al", "Bo"]);
        apply(
            &mut orchestrator,
            GameCommand::StartGame {
                tracks: vec![track("only")],
            },
        );
        apply(&mut orchestrator, GameCommand::Reveal);

        let status = apply(&mut orchestrator, GameCommand::AdvanceTurn);
        assert_eq!(status, GameStatus::Finished);
        assert_eq!(orchestrator.round_index(), 1);

        let err = orchestrator.apply(GameCommand::AdvanceTurn).unwrap_err();
        assert!(matches!(err, CommandError::InvalidCommand { .. }));
    }

    #[test]
    fn advance_mid_game_deals_next_track_and_resets_sheets() {
        let mut orchestrator = with_players(2, &["Al", "Bo"]);
        let al = player_id(&orchestrator, "Al");
        apply(
            &mut orchestrator,
            GameCommand::StartGame {
                tracks: vec![track("one"), track("two")],
            },
        );
        apply(
            &mut orchestrator,
            GameCommand::MarkGuess {
                player_id: al,
                category: GuessCategory::Artist,
                correct: true,
            },
        );
        apply(&mut orchestrator, GameCommand::Reveal);

        let status = apply(&mut orchestrator, GameCommand::AdvanceTurn);
        assert_eq!(status, GameStatus::Playing);
        assert_eq!(orchestrator.round_index(), 2);
        assert_eq!(orchestrator.active_track().unwrap().title, "two");
        assert!(orchestrator.sheets().values().all(|sheet| !sheet.artist));
    }

    #[test]
    fn reveal_is_only_valid_while_playing() {
        let mut orchestrator = with_players(2, &["Al", "Bo"]);
        let err = orchestrator.apply(GameCommand::Reveal).unwrap_err();
        assert!(matches!(err, CommandError::InvalidCommand { .. }));
    }

    #[test]
    fn playback_state_is_mirrored_in_any_status() {
        let mut orchestrator = GameOrchestrator::new();
        apply(&mut orchestrator, GameCommand::SetPlaybackActive(true));
        assert!(orchestrator.playback_active());
        apply(&mut orchestrator, GameCommand::SetPlaybackActive(false));
        assert!(!orchestrator.playback_active());
    }

    #[test]
    fn reset_zeroes_scores_and_keeps_roster() {
        let mut orchestrator = with_players(2, &["Al", "Bo"]);
        let al = player_id(&orchestrator, "Al");
        let ids = orchestrator.roster().keys().copied().collect::<Vec<_>>();

        apply(
            &mut orchestrator,
            GameCommand::StartGame {
                tracks: vec![track("one"), track("two")],
            },
        );
        apply(
            &mut orchestrator,
            GameCommand::RecordScore {
                player_id: al,
                points: 4,
            },
        );

        let status = apply(&mut orchestrator, GameCommand::Reset);
        assert_eq!(status, GameStatus::Setup);
        assert_eq!(orchestrator.round_index(), 0);
        assert!(orchestrator.active_track().is_none());
        assert_eq!(
            orchestrator.roster().keys().copied().collect::<Vec<_>>(),
            ids
        );
        assert!(
            orchestrator
                .roster()
                .values()
                .all(|player| player.cumulative_score == 0)
        );
    }

    #[test]
    fn winner_set_includes_every_top_scorer() {
        let mut orchestrator = with_players(1, &["P1", "P2", "P3"]);
        let p1 = player_id(&orchestrator, "P1");
        let p2 = player_id(&orchestrator, "P2");
        let p3 = player_id(&orchestrator, "P3");
        apply(
            &mut orchestrator,
            GameCommand::StartGame {
                tracks: vec![track("one")],
            },
        );

        for (id, points) in [(p1, 10), (p2, 10), (p3, 7)] {
            apply(
                &mut orchestrator,
                GameCommand::RecordScore {
                    player_id: id,
                    points,
                },
            );
        }
        let winners = orchestrator
            .winners()
            .into_iter()
            .map(|player| player.name)
            .collect::<Vec<_>>();
        assert_eq!(winners, vec!["P1", "P2"]);

        apply(
            &mut orchestrator,
            GameCommand::RecordScore {
                player_id: p1,
                points: 3,
            },
        );
        let winners = orchestrator
            .winners()
            .into_iter()
            .map(|player| player.name)
            .collect::<Vec<_>>();
        assert_eq!(winners, vec!["P1"]);
    }

    #[test]
    fn full_three_round_game_accumulates_sweep_bonuses() {
        let mut orchestrator = with_players(3, &["Al", "Bo"]);
        let al = player_id(&orchestrator, "Al");
        let bo = player_id(&orchestrator, "Bo");
        apply(
            &mut orchestrator,
            GameCommand::StartGame {
                tracks: vec![track("one"), track("two"), track("three")],
            },
        );

        for round in 1..=3 {
            assert_eq!(orchestrator.round_index(), round);

            // Al sweeps every category, Bo only names the artist.
            for category in [GuessCategory::Artist, GuessCategory::Title, GuessCategory::Year] {
                apply(
                    &mut orchestrator,
                    GameCommand::MarkGuess {
                        player_id: al,
                        category,
                        correct: true,
                    },
                );
            }
            apply(
                &mut orchestrator,
                GameCommand::MarkGuess {
                    player_id: bo,
                    category: GuessCategory::Artist,
                    correct: true,
                },
            );
            apply(&mut orchestrator, GameCommand::Reveal);

            for (id, sheet) in orchestrator.sheets().clone() {
                apply(
                    &mut orchestrator,
                    GameCommand::RecordScore {
                        player_id: id,
                        points: sheet.points(),
                    },
                );
            }
            apply(&mut orchestrator, GameCommand::AdvanceTurn);
        }

        assert_eq!(orchestrator.status(), GameStatus::Finished);
        assert_eq!(orchestrator.roster()[&al].cumulative_score, 12);
        assert_eq!(orchestrator.roster()[&bo].cumulative_score, 3);

        let winners = orchestrator
            .winners()
            .into_iter()
            .map(|player| player.name)
            .collect::<Vec<_>>();
        assert_eq!(winners, vec!["Al"]);
    }
}
