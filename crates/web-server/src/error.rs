//! Conversion of domain errors into HTTP responses.
//!
//! API routes answer with a JSON `{"error": ...}` body, the download route
//! with plain text. Both log server-side failures before hiding them.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use gamehub_file_ops::Error as FileError;

const GAME_NOT_FOUND: &str = "Game not found";
const FILE_NOT_FOUND: &str = "File not found";
const INTERNAL: &str = "Internal server error";

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
}

/// Error returned by the JSON API handlers.
#[derive(Debug)]
pub(crate) enum ApiError {
    GameNotFound,
    Internal,
}

impl From<FileError> for ApiError {
    fn from(err: FileError) -> Self {
        match err {
            FileError::GameNotFound(_) => Self::GameNotFound,
            other => {
                tracing::error!(error = %other, "api request failed");
                Self::Internal
            }
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        tracing::error!(error = %err, "blocking task failed");
        Self::Internal
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            Self::GameNotFound => (StatusCode::NOT_FOUND, GAME_NOT_FOUND),
            Self::Internal => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL),
        };
        (status, Json(ErrorBody { error })).into_response()
    }
}

/// Error returned by the download handler.
#[derive(Debug)]
pub(crate) enum DownloadError {
    GameNotFound,
    FileNotFound,
    Internal,
}

impl From<FileError> for DownloadError {
    fn from(err: FileError) -> Self {
        match err {
            FileError::GameNotFound(_) => Self::GameNotFound,
            // Rejected names look exactly like missing files to the client.
            FileError::InvalidFileName(_) | FileError::FileNotFound(_) => Self::FileNotFound,
            other @ FileError::Io { .. } => {
                tracing::error!(error = %other, "download failed");
                Self::Internal
            }
        }
    }
}

impl From<tokio::task::JoinError> for DownloadError {
    fn from(err: tokio::task::JoinError) -> Self {
        tracing::error!(error = %err, "blocking task failed");
        Self::Internal
    }
}

impl IntoResponse for DownloadError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::GameNotFound => (StatusCode::NOT_FOUND, GAME_NOT_FOUND),
            Self::FileNotFound => (StatusCode::NOT_FOUND, FILE_NOT_FOUND),
            Self::Internal => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL),
        };
        (status, body).into_response()
    }
}
