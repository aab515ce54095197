//! Route table.

use axum::Router;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use percent_encoding::percent_decode_str;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{api, download, landing};

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    let assets: Router = Router::new()
        .fallback_service(ServeDir::new(&state.static_dir))
        .layer(middleware::from_fn_with_state(state.clone(), hide_downloads));

    Router::new()
        .route("/", get(landing::index))
        .route("/api/games", get(api::games))
        .route("/api/files/{game}", get(api::files))
        .route("/download/{game}/{filename}", get(download::download))
        .nest_service("/static", assets)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Keeps the download root out of `/static` when it lives inside the static
/// directory; downloads only go through the registry-checked route.
async fn hide_downloads(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let Ok(path) = percent_decode_str(request.uri().path()).decode_utf8() else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let segments: Vec<&str> = path
        .split(['/', '\\'])
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();

    if state.is_hidden_asset(&segments) {
        tracing::warn!(path = %path, "refusing static request into the download root");
        return StatusCode::NOT_FOUND.into_response();
    }
    next.run(request).await
}
