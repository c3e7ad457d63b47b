//! Saving and loading whole games
//!
//! A game is written through its archived form, either as RON text or as
//! compact bincode. Loading can fall back to a fresh empty game so the
//! caller always has something to play with.

use crate::{Error, Result};
use std::fs;
use std::path::Path;
use tabula_core::{Game, GameArchive};

/// On-disk encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// RON text (Rust Object Notation)
    #[default]
    Ron,
    /// Compact binary
    Bincode,
}

/// Persistence configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub format: Format,
    /// Pretty-print RON output
    pub pretty: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            format: Format::Ron,
            pretty: true,
        }
    }
}

impl StoreConfig {
    /// Compact binary configuration
    pub fn bincode() -> Self {
        Self {
            format: Format::Bincode,
            pretty: false,
        }
    }
}

/// Serialize a game
pub fn save(game: &Game, config: &StoreConfig) -> Result<Vec<u8>> {
    let archive = GameArchive::try_from(game)?;
    let bytes = match config.format {
        Format::Ron if config.pretty => {
            ron::ser::to_string_pretty(&archive, ron::ser::PrettyConfig::default())
                .map_err(|e| Error::Serialization(e.to_string()))?
                .into_bytes()
        }
        Format::Ron => ron::to_string(&archive)
            .map_err(|e| Error::Serialization(e.to_string()))?
            .into_bytes(),
        Format::Bincode => {
            bincode::serialize(&archive).map_err(|e| Error::Serialization(e.to_string()))?
        }
    };
    tracing::debug!(
        game = %game.name(),
        actions = game.actions().len(),
        bytes = bytes.len(),
        format = ?config.format,
        "game saved"
    );
    Ok(bytes)
}

/// Deserialize a game
pub fn load(bytes: &[u8], config: &StoreConfig) -> Result<Game> {
    let archive: GameArchive = match config.format {
        Format::Ron => {
            let text =
                std::str::from_utf8(bytes).map_err(|e| Error::Serialization(e.to_string()))?;
            ron::from_str(text).map_err(|e| Error::Serialization(e.to_string()))?
        }
        Format::Bincode => {
            bincode::deserialize(bytes).map_err(|e| Error::Serialization(e.to_string()))?
        }
    };
    let game = Game::try_from(archive)?;
    tracing::debug!(game = %game.name(), actions = game.actions().len(), "game loaded");
    Ok(game)
}

/// Deserialize a game, falling back to a fresh one on failure
pub fn load_or_empty(bytes: &[u8], config: &StoreConfig) -> (Game, Option<Error>) {
    match load(bytes, config) {
        Ok(game) => (game, None),
        Err(e) => {
            tracing::warn!(error = %e, "load failed, starting a new game");
            (Game::new(), Some(e))
        }
    }
}

/// Save a game to a file
pub fn save_to_file(game: &Game, path: impl AsRef<Path>, config: &StoreConfig) -> Result<()> {
    let bytes = save(game, config)?;
    fs::write(path, bytes)?;
    Ok(())
}

/// Load a game from a file
pub fn load_from_file(path: impl AsRef<Path>, config: &StoreConfig) -> Result<Game> {
    let bytes = fs::read(path)?;
    load(&bytes, config)
}

/// Load a game from a file, falling back to a fresh one on failure
pub fn load_file_or_empty(path: impl AsRef<Path>, config: &StoreConfig) -> (Game, Option<Error>) {
    match fs::read(path) {
        Ok(bytes) => load_or_empty(&bytes, config),
        Err(e) => {
            tracing::warn!(error = %e, "could not read save file, starting a new game");
            (Game::new(), Some(e.into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_core::{Action, Transform, Value};

    fn sample_game() -> Game {
        let game = Game::new()
            .add_character("Kolobok")
            .make_action(&Action::create(Value::new("hp", 20)));
        let hp = game.entities().last().unwrap().clone();
        let (_, hit) = hp.change(Some(Transform::sub(7.0)), None);
        game.make_action(&hit)
    }

    #[test]
    fn test_ron_round_trip() {
        let game = sample_game();
        let config = StoreConfig::default();
        let bytes = save(&game, &config).unwrap();
        assert_eq!(load(&bytes, &config).unwrap(), game);
    }

    #[test]
    fn test_compact_ron_round_trip() {
        let game = sample_game();
        let config = StoreConfig {
            pretty: false,
            ..Default::default()
        };
        let bytes = save(&game, &config).unwrap();
        assert!(!bytes.contains(&b'\n'));
        assert_eq!(load(&bytes, &config).unwrap(), game);
    }

    #[test]
    fn test_bincode_round_trip() {
        let game = sample_game();
        let config = StoreConfig::bincode();
        let bytes = save(&game, &config).unwrap();
        assert_eq!(load(&bytes, &config).unwrap(), game);
    }

    #[test]
    fn test_load_or_empty_on_garbage() {
        let (game, error) = load_or_empty(b"not a game", &StoreConfig::default());
        assert_eq!(game, Game::new());
        assert!(matches!(error, Some(Error::Serialization(_))));
    }

    #[test]
    fn test_custom_transform_not_saved() {
        let value = Value::new("n", 1);
        let game = Game::new().make_action(&Action::create(value.clone()));
        let (_, custom) = value.change(Some(Transform::custom("double", |p| p.clone())), None);
        let game = game.make_action(&custom);

        let result = save(&game, &StoreConfig::default());
        assert!(matches!(
            result,
            Err(Error::Core(tabula_core::Error::UnserializableTransform(_)))
        ));
    }
}
