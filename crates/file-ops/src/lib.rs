//! Filesystem side of GameHub: listing a game's downloads and resolving
//! download requests to files on disk.
//!
//! Every game in the registry owns one directory, `download_root/<game id>`,
//! populated by something outside this process. Nothing here writes to it.

mod download;
mod listing;
mod size;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use gamehub_registry::{Game, GameRegistry};

pub use download::validate_file_name;
pub use listing::{FileEntry, download_url, format_modified, list_directory, sort_by_recency};
pub use size::format_size;

/// Default download root, relative to the working directory.
pub const DEFAULT_DOWNLOAD_ROOT: &str = "static/downloads";

/// Errors produced by listing and download resolution.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("game not found: {0}")]
    GameNotFound(String),

    #[error("invalid file name: {0:?}")]
    InvalidFileName(String),

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The registry bound to a download root.
///
/// Cheap to share behind an `Arc`; holds no mutable state.
#[derive(Debug, Clone)]
pub struct GameLibrary {
    registry: Arc<GameRegistry>,
    download_root: PathBuf,
}

impl GameLibrary {
    pub fn new(registry: Arc<GameRegistry>, download_root: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            download_root: download_root.into(),
        }
    }

    pub fn registry(&self) -> &GameRegistry {
        &self.registry
    }

    pub fn download_root(&self) -> &Path {
        &self.download_root
    }

    /// Resolves a game id, failing before any filesystem access.
    pub fn game(&self, game_id: &str) -> Result<&Game, Error> {
        self.registry
            .lookup(game_id)
            .ok_or_else(|| Error::GameNotFound(game_id.to_string()))
    }

    /// Directory holding the downloads of `game`.
    pub fn game_dir(&self, game: &Game) -> PathBuf {
        self.download_root.join(&game.id)
    }

    /// Lists the downloadable files of a game, most recent first.
    ///
    /// A game whose directory does not exist yet has no files.
    pub fn list_files(&self, game_id: &str) -> Result<Vec<FileEntry>, Error> {
        let game = self.game(game_id)?;
        list_directory(&self.game_dir(game), &game.id)
    }

    /// Resolves `filename` to a regular file directly inside the game's
    /// directory.
    pub fn resolve_download(&self, game_id: &str, filename: &str) -> Result<PathBuf, Error> {
        let game = self.game(game_id)?;
        download::resolve_in_dir(&self.game_dir(game), filename)
    }
}
