//! JSON API: game catalog and per-game file listings.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use gamehub_file_ops::FileEntry;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub(crate) struct FileList {
    pub files: Vec<FileEntry>,
}

/// `GET /api/games`
pub(crate) async fn games(State(state): State<AppState>) -> Response {
    Json(state.library.registry()).into_response()
}

/// `GET /api/files/{game}`
pub(crate) async fn files(
    State(state): State<AppState>,
    Path(game): Path<String>,
) -> Result<Json<FileList>, ApiError> {
    // Fail fast on unknown ids without a trip through the blocking pool.
    state.library.game(&game)?;

    let library = state.library.clone();
    let files = tokio::task::spawn_blocking(move || library.list_files(&game)).await??;
    Ok(Json(FileList { files }))
}
