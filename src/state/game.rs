//! Domain types for a Tune Trivia session: configuration, players, tracks,
//! and per-turn score sheets.

use uuid::Uuid;

/// Cosmetic labels handed out round-robin as players join the roster.
pub const AVATAR_TAGS: &[&str] = &[
    "violet", "blue", "green", "amber", "red", "pink", "indigo", "teal",
];

/// Host-chosen quiz settings. Immutable once a game starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfiguration {
    /// Number of rounds (one shared track per round).
    pub round_count: u32,
    /// Countdown length for each guessing phase, in seconds.
    pub per_guess_seconds: u32,
    /// Provider identifier of the selected playlist.
    pub playlist_id: String,
    /// Display name of the selected playlist.
    pub playlist_name: String,
}

impl Default for GameConfiguration {
    fn default() -> Self {
        Self {
            round_count: 5,
            per_guess_seconds: 30,
            playlist_id: String::new(),
            playlist_name: String::new(),
        }
    }
}

/// One registered player. Identifiers are stable for the life of a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Stable identifier assigned when the player joins.
    pub id: Uuid,
    /// Display name, unique case-insensitively within the roster.
    pub name: String,
    /// Cosmetic avatar label.
    pub avatar_tag: String,
    /// Total points accumulated so far; only ever grows during one game.
    pub cumulative_score: u32,
}

/// Track metadata sourced from the catalog. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    /// Track title.
    pub title: String,
    /// Credited artists, in catalog order.
    pub artists: Vec<String>,
    /// Album name.
    pub album: String,
    /// ISO date as the catalog ships it, possibly truncated to a year.
    pub release_date: String,
    /// Album artwork, when available.
    pub artwork_url: Option<String>,
    /// Opaque handle consumed by the playback device.
    pub playback_handle: String,
}

impl Track {
    /// Extract the release year from the ISO-partial release date.
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .split('-')
            .next()
            .filter(|year| !year.is_empty())
    }
}

/// Per-player guess flags for the active turn. Reset at every turn boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurnScoreSheet {
    /// Artist guessed correctly.
    pub artist: bool,
    /// Title guessed correctly.
    pub title: bool,
    /// Release year guessed correctly.
    pub year: bool,
}

impl TurnScoreSheet {
    /// Points awarded for this sheet: one per correct category, plus one
    /// sweep bonus when all three are correct (3 correct is worth 4, never 3).
    pub fn points(&self) -> u32 {
        let base = u32::from(self.artist) + u32::from(self.title) + u32::from(self.year);
        if base == 3 { 4 } else { base }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_points_follow_sweep_bonus_rule() {
        let cases = [
            (false, false, false, 0),
            (true, false, false, 1),
            (false, true, false, 1),
            (true, false, true, 2),
            (false, true, true, 2),
            (true, true, true, 4),
        ];

        for (artist, title, year, expected) in cases {
            let sheet = TurnScoreSheet {
                artist,
                title,
                year,
            };
            assert_eq!(sheet.points(), expected, "sheet {sheet:?}");
        }
    }

    #[test]
    fn release_year_extraction() {
        let mut track = Track {
            title: "Song".into(),
            artists: vec!["Artist".into()],
            album: "Album".into(),
            release_date: "1987-06-01".into(),
            artwork_url: None,
            playback_handle: "handle:1".into(),
        };
        assert_eq!(track.release_year(), Some("1987"));

        track.release_date = "2003".into();
        assert_eq!(track.release_year(), Some("2003"));

        track.release_date = String::new();
        assert_eq!(track.release_year(), None);
    }
}
