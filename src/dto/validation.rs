//! Validation helpers for DTOs.

use validator::ValidationError;

/// Longest player name accepted by the roster.
const MAX_PLAYER_NAME_CHARS: usize = 32;

/// Validates that a player name is non-empty after trimming and fits on the
/// scoreboard.
///
/// # Examples
///
/// ```ignore
/// validate_player_name("Alice")  // Ok
/// validate_player_name("   ")    // Err - blank
/// ```
pub fn validate_player_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        let mut err = ValidationError::new("player_name_blank");
        err.message = Some("Player name must not be empty".into());
        return Err(err);
    }

    if trimmed.chars().count() > MAX_PLAYER_NAME_CHARS {
        let mut err = ValidationError::new("player_name_length");
        err.message = Some(
            format!("Player name must be at most {MAX_PLAYER_NAME_CHARS} characters").into(),
        );
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_player_name_valid() {
        assert!(validate_player_name("Alice").is_ok());
        assert!(validate_player_name("  Bo  ").is_ok());
        assert!(validate_player_name("Jean-Luc").is_ok());
    }

    #[test]
    fn test_validate_player_name_blank() {
        assert!(validate_player_name("").is_err());
        assert!(validate_player_name("   ").is_err());
        assert!(validate_player_name("\t\n").is_err());
    }

    #[test]
    fn test_validate_player_name_too_long() {
        let long = "x".repeat(MAX_PLAYER_NAME_CHARS + 1);
        assert!(validate_player_name(&long).is_err());

        let exact = "x".repeat(MAX_PLAYER_NAME_CHARS);
        assert!(validate_player_name(&exact).is_ok());
    }
}
