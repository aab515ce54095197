//! HTTP front door for GameHub.
//!
//! Serves the game catalog, per-game file listings and file downloads over
//! plain HTTP, plus the landing page and its static assets. All handlers are
//! stateless apart from the shared, read-only [`AppState`].

mod api;
mod download;
mod error;
mod landing;
mod routes;
mod server;
mod state;

pub use routes::router;
pub use server::{ServerConfig, WebServer};
pub use state::AppState;

/// Errors produced by the web server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid bind address {0:?}")]
    InvalidAddress(String),

    #[error("server already running")]
    AlreadyRunning,
}
