//! Static catalog of games served by GameHub.
//!
//! The registry is built once at startup and shared read-only (usually as an
//! `Arc<GameRegistry>`) with everything that needs to validate a game id.
//! Each game id doubles as the name of the game's download directory, so ids
//! are restricted to a single safe path segment.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Errors produced when building a registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("game id must not be empty")]
    EmptyId,

    #[error("invalid game id {0:?}: only ASCII letters, digits, '-' and '_' are allowed")]
    InvalidId(String),

    #[error("duplicate game id {0:?}")]
    DuplicateId(String),
}

/// A single catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    /// Stable identifier used in URLs and as the download directory name.
    pub id: String,
    pub name: String,
    pub description: String,
    /// Icon file name under the static `icons/` directory.
    pub icon: String,
}

impl Game {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            icon: icon.into(),
        }
    }
}

/// Immutable, insertion-ordered set of games keyed by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRegistry {
    games: Vec<Game>,
}

impl GameRegistry {
    /// Builds a registry, validating every id.
    pub fn new(games: Vec<Game>) -> Result<Self, RegistryError> {
        for (i, game) in games.iter().enumerate() {
            validate_id(&game.id)?;
            if games[..i].iter().any(|g| g.id == game.id) {
                return Err(RegistryError::DuplicateId(game.id.clone()));
            }
        }
        Ok(Self { games })
    }

    /// The catalog shipped with the server.
    pub fn builtin() -> Self {
        Self {
            games: vec![
                Game::new(
                    "ddnet",
                    "DDNet",
                    "DDNet - модификация Teeworlds с улучшенной физикой.",
                    "ddnet.png",
                ),
                Game::new(
                    "cs2",
                    "CS 2",
                    "Counter-Strike 2 - современный шутер от Valve.",
                    "cs2.png",
                ),
                Game::new(
                    "minecraft",
                    "Minecraft",
                    "Песочница с бесконечными возможностями.",
                    "minecraft.png",
                ),
            ],
        }
    }

    /// Looks up a game by id.
    pub fn lookup(&self, id: &str) -> Option<&Game> {
        self.games.iter().find(|g| g.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lookup(id).is_some()
    }

    /// All games in definition order.
    pub fn list_all(&self) -> impl Iterator<Item = &Game> {
        self.games.iter()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

impl Default for GameRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Value side of the `/api/games` object; the id is the key.
#[derive(Serialize)]
struct GameCard<'a> {
    name: &'a str,
    description: &'a str,
    icon: &'a str,
}

impl Serialize for GameRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.games.len()))?;
        for game in &self.games {
            map.serialize_entry(
                &game.id,
                &GameCard {
                    name: &game.name,
                    description: &game.description,
                    icon: &game.icon,
                },
            )?;
        }
        map.end()
    }
}

fn validate_id(id: &str) -> Result<(), RegistryError> {
    if id.is_empty() {
        return Err(RegistryError::EmptyId);
    }
    if !id
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    {
        return Err(RegistryError::InvalidId(id.to_string()));
    }
    Ok(())
}
