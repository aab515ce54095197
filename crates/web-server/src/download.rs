//! File downloads streamed as attachments.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderName, HeaderValue, header};
use axum::response::{IntoResponse, Response};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use tokio_util::io::ReaderStream;

use crate::error::DownloadError;
use crate::state::AppState;

/// `GET /download/{game}/{filename}`
pub(crate) async fn download(
    State(state): State<AppState>,
    Path((game, filename)): Path<(String, String)>,
) -> Result<Response, DownloadError> {
    state.library.game(&game)?;

    let library = state.library.clone();
    let path = {
        let filename = filename.clone();
        tokio::task::spawn_blocking(move || library.resolve_download(&game, &filename)).await??
    };

    let file = tokio::fs::File::open(&path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            // Removed between resolution and open.
            DownloadError::FileNotFound
        } else {
            tracing::error!(path = %path.display(), error = %e, "failed to open download");
            DownloadError::Internal
        }
    })?;
    let len = file
        .metadata()
        .await
        .map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "failed to stat download");
            DownloadError::Internal
        })?
        .len();

    tracing::info!(path = %path.display(), bytes = len, "serving download");

    let headers: [(HeaderName, HeaderValue); 3] = [
        (
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/octet-stream"),
        ),
        (header::CONTENT_LENGTH, HeaderValue::from(len)),
        (header::CONTENT_DISPOSITION, content_disposition(&filename)?),
    ];
    let body = Body::from_stream(ReaderStream::new(file));
    Ok((headers, body).into_response())
}

/// Builds an `attachment` disposition with an ASCII fallback name and the
/// exact UTF-8 name in `filename*`.
fn content_disposition(filename: &str) -> Result<HeaderValue, DownloadError> {
    let fallback: String = filename
        .chars()
        .map(|c| match c {
            ' '..='~' if c != '"' && c != '\\' => c,
            _ => '_',
        })
        .collect();
    let encoded = utf8_percent_encode(filename, NON_ALPHANUMERIC);
    HeaderValue::from_str(&format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}"
    ))
    .map_err(|e| {
        tracing::error!(filename, error = %e, "unrepresentable content disposition");
        DownloadError::Internal
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disposition_for_ascii_name() {
        let value = content_disposition("client.zip").unwrap();
        assert_eq!(
            value.to_str().unwrap(),
            "attachment; filename=\"client.zip\"; filename*=UTF-8''client%2Ezip"
        );
    }

    #[test]
    fn disposition_replaces_unsafe_fallback_chars() {
        let value = content_disposition("сборка \"v2\".zip").unwrap();
        let text = value.to_str().unwrap();
        assert!(text.starts_with("attachment; filename=\"______ _v2_.zip\";"), "{text}");
        assert!(text.contains("filename*=UTF-8''%D1%81"), "{text}");
    }
}
