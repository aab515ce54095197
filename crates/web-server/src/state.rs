//! Request-independent state shared by every handler.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use gamehub_file_ops::GameLibrary;

/// State shared by every request handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub library: Arc<GameLibrary>,
    /// Directory served under `/static`.
    pub static_dir: PathBuf,
    /// Path segments of the download root below `static_dir`, when the
    /// download root lives inside it. Those segments are never served as
    /// static assets.
    hidden_prefix: Option<Arc<[String]>>,
}

impl AppState {
    pub fn new(library: GameLibrary, static_dir: impl Into<PathBuf>) -> Self {
        let static_dir = static_dir.into();
        let hidden_prefix = nested_components(&static_dir, library.download_root());
        if let Some(prefix) = &hidden_prefix {
            tracing::info!(
                static_dir = %static_dir.display(),
                hidden = %prefix.join("/"),
                "download root is inside the static directory; hiding it from /static"
            );
        }
        Self {
            library: Arc::new(library),
            static_dir,
            hidden_prefix,
        }
    }

    /// Whether a decoded `/static`-relative path points into the download root.
    pub(crate) fn is_hidden_asset(&self, segments: &[&str]) -> bool {
        match &self.hidden_prefix {
            Some(prefix) => {
                segments.len() >= prefix.len()
                    && prefix.iter().zip(segments).all(|(p, s)| p == s)
            }
            None => false,
        }
    }
}

/// Components of `inner` relative to `outer` if `inner` is `outer` or lies
/// below it. Canonical paths are compared when both exist.
fn nested_components(outer: &Path, inner: &Path) -> Option<Arc<[String]>> {
    let canonical = std::fs::canonicalize(outer)
        .and_then(|o| std::fs::canonicalize(inner).map(|i| (o, i)));
    let (outer, inner) = match &canonical {
        Ok((o, i)) => (o.as_path(), i.as_path()),
        Err(_) => (outer, inner),
    };

    let rel = inner.strip_prefix(outer).ok()?;
    let components = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>();
    Some(components.into())
}

#[cfg(test)]
mod tests {
    use gamehub_registry::GameRegistry;

    use super::*;

    fn state(static_dir: &Path, download_root: &Path) -> AppState {
        let library = GameLibrary::new(Arc::new(GameRegistry::builtin()), download_root);
        AppState::new(library, static_dir)
    }

    #[test]
    fn separate_directories_hide_nothing() {
        let state = state(Path::new("/srv/static"), Path::new("/srv/downloads"));
        assert!(!state.is_hidden_asset(&["downloads", "cs2", "a.zip"]));
    }

    #[test]
    fn nested_download_root_is_hidden() {
        let state = state(Path::new("static"), Path::new("static/downloads"));
        assert!(state.is_hidden_asset(&["downloads"]));
        assert!(state.is_hidden_asset(&["downloads", "cs2", "a.zip"]));
        assert!(!state.is_hidden_asset(&["css", "style.css"]));
        assert!(!state.is_hidden_asset(&[]));
    }

    #[test]
    fn download_root_equal_to_static_dir_hides_everything() {
        let state = state(Path::new("static"), Path::new("static"));
        assert!(state.is_hidden_asset(&["css", "style.css"]));
    }

    #[test]
    fn nesting_is_detected_through_canonical_paths() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("static/downloads")).unwrap();
        std::fs::create_dir_all(tmp.path().join("static/css")).unwrap();
        let state = state(
            &tmp.path().join("static"),
            &tmp.path().join("static/./css/../downloads"),
        );
        assert!(state.is_hidden_asset(&["downloads", "cs2"]));
    }
}
