//! Download path resolution confined to a game directory.

use std::path::{Component, Path, PathBuf};

use crate::Error;

/// Checks that `filename` names exactly one entry directly inside a directory.
///
/// Rejects empty names, separators of either platform, NUL bytes, `.`/`..`,
/// and anything `Path` would treat as absolute or prefixed.
pub fn validate_file_name(filename: &str) -> Result<(), Error> {
    let invalid = || Error::InvalidFileName(filename.to_string());

    if filename.is_empty() || filename.contains(['/', '\\', '\0']) {
        return Err(invalid());
    }

    let mut components = Path::new(filename).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) if name == filename => Ok(()),
        _ => Err(invalid()),
    }
}

/// Resolves `filename` inside `dir`, requiring a regular file.
///
/// Symlinks are not followed, so a link planted in the directory cannot
/// point a download elsewhere.
pub(crate) fn resolve_in_dir(dir: &Path, filename: &str) -> Result<PathBuf, Error> {
    if let Err(e) = validate_file_name(filename) {
        tracing::warn!(dir = %dir.display(), filename, "rejected download file name");
        return Err(e);
    }

    let path = dir.join(filename);
    match std::fs::symlink_metadata(&path) {
        Ok(meta) if meta.is_file() => Ok(path),
        Ok(_) => Err(Error::FileNotFound(path)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::FileNotFound(path)),
        Err(source) => Err(Error::Io { path, source }),
    }
}
