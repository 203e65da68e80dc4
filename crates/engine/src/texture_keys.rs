use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextureKeyError {
    #[error("texture key is empty")]
    Empty,
    #[error("texture key '{0}' is absolute")]
    Absolute(String),
    #[error("texture key '{0}' has an empty path segment")]
    EmptySegment(String),
    #[error("texture key contains unsupported character {character:?}")]
    InvalidCharacter { character: char },
}

/// Keys map to `<assets>/textures/<key>.png`, so only lowercase ascii,
/// digits, `_`, `-` and `/` separators are accepted.
pub(crate) fn validate_texture_key(key: &str) -> Result<(), TextureKeyError> {
    if key.is_empty() {
        return Err(TextureKeyError::Empty);
    }
    if key.starts_with('/') {
        return Err(TextureKeyError::Absolute(key.to_string()));
    }
    if let Some(character) = key.chars().find(|ch| !is_key_character(*ch)) {
        return Err(TextureKeyError::InvalidCharacter { character });
    }
    if key.split('/').any(str::is_empty) {
        return Err(TextureKeyError::EmptySegment(key.to_string()));
    }
    Ok(())
}

fn is_key_character(ch: char) -> bool {
    ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '_' | '-' | '/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_game_texture_keys() {
        for key in ["ship", "ship_powered", "fx/explosion-1"] {
            assert!(validate_texture_key(key).is_ok(), "key={key}");
        }
    }

    #[test]
    fn rejects_keys_that_leave_the_texture_dir() {
        for key in ["../ship", "fx/../../ship", "./ship"] {
            assert_eq!(
                validate_texture_key(key),
                Err(TextureKeyError::InvalidCharacter { character: '.' }),
                "key={key}"
            );
        }
        assert_eq!(
            validate_texture_key("/ship"),
            Err(TextureKeyError::Absolute("/ship".to_string()))
        );
    }

    #[test]
    fn rejects_malformed_keys() {
        for key in ["", "Ship", "ship.png", "fx//boom", "fx/", r"fx\boom"] {
            assert!(validate_texture_key(key).is_err(), "key={key}");
        }
    }
}
