//! Download directory listing.

use std::ffi::OsString;
use std::fs::Metadata;
use std::io::{self, ErrorKind};
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Local};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::{Deserialize, Serialize};

use crate::Error;
use crate::size::format_size;

/// Characters escaped in a single URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Display format of [`FileEntry::modified`].
const MODIFIED_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A downloadable file as shown in a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// File name as it appears on disk.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    pub size_human: String,
    /// Local modification time, `YYYY-MM-DD HH:MM`.
    pub modified: String,
    pub url: String,
}

/// Builds the download URL of `filename` for `game_id`.
pub fn download_url(game_id: &str, filename: &str) -> String {
    format!(
        "/download/{}/{}",
        utf8_percent_encode(game_id, PATH_SEGMENT),
        utf8_percent_encode(filename, PATH_SEGMENT)
    )
}

/// Formats a modification time in local time at minute precision.
pub fn format_modified(time: SystemTime) -> String {
    DateTime::<Local>::from(time).format(MODIFIED_FORMAT).to_string()
}

/// Orders entries most recent first; equal timestamps fall back to name order.
pub fn sort_by_recency(entries: &mut [FileEntry]) {
    entries.sort_by(|a, b| {
        b.modified
            .cmp(&a.modified)
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// Lists the regular files directly inside `dir`.
///
/// A missing directory yields an empty list. Subdirectories, symlinks and
/// special files are left out. Entries whose metadata cannot be read are
/// skipped with a warning instead of failing the whole listing.
pub fn list_directory(dir: &Path, game_id: &str) -> Result<Vec<FileEntry>, Error> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(game = game_id, dir = %dir.display(), "download directory absent");
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(Error::Io {
                path: dir.to_path_buf(),
                source,
            });
        }
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "skipping unreadable directory entry");
                continue;
            }
        };
        // DirEntry::metadata does not follow symlinks.
        let metadata = entry.metadata();
        if let Some(file) = file_entry(game_id, &entry.path(), entry.file_name(), metadata) {
            files.push(file);
        }
    }

    sort_by_recency(&mut files);
    tracing::debug!(game = game_id, count = files.len(), "listed download directory");
    Ok(files)
}

/// Builds the listing entry of one directory entry.
///
/// Returns `None` for anything that is not a regular file, and for files
/// whose metadata, modification time or UTF-8 name is unavailable; the
/// latter are logged.
fn file_entry(
    game_id: &str,
    path: &Path,
    name: OsString,
    metadata: io::Result<Metadata>,
) -> Option<FileEntry> {
    let metadata = match metadata {
        Ok(m) => m,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "skipping file: metadata unavailable");
            return None;
        }
    };
    if !metadata.is_file() {
        return None;
    }

    let modified = match metadata.modified() {
        Ok(t) => t,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "skipping file: modification time unavailable");
            return None;
        }
    };

    let Ok(name) = name.into_string() else {
        tracing::warn!(path = %path.display(), "skipping file: name is not valid UTF-8");
        return None;
    };

    Some(FileEntry {
        url: download_url(game_id, &name),
        size: metadata.len(),
        size_human: format_size(metadata.len()),
        modified: format_modified(modified),
        name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;
    use filetime::FileTime;

    fn set_local_mtime(path: &Path, y: i32, mo: u32, d: u32, h: u32, mi: u32) {
        let local = Local.with_ymd_and_hms(y, mo, d, h, mi, 0).single().unwrap();
        filetime::set_file_mtime(path, FileTime::from_unix_time(local.timestamp(), 0)).unwrap();
    }

    fn entry(name: &str, modified: &str) -> FileEntry {
        FileEntry {
            name: name.into(),
            size: 0,
            size_human: "0.0 B".into(),
            modified: modified.into(),
            url: download_url("ddnet", name),
        }
    }

    #[test]
    fn missing_directory_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let files = list_directory(&tmp.path().join("nope"), "ddnet").unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn path_to_a_file_is_an_io_error() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        assert!(matches!(
            list_directory(tmp.path(), "ddnet"),
            Err(Error::Io { .. })
        ));
    }

    #[test]
    fn lists_files_with_metadata() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("client.zip");
        std::fs::write(&file, vec![0u8; 1536]).unwrap();
        set_local_mtime(&file, 2024, 3, 15, 18, 45);

        let files = list_directory(tmp.path(), "ddnet").unwrap();

        assert_eq!(
            files,
            vec![FileEntry {
                name: "client.zip".into(),
                size: 1536,
                size_human: "1.5 KB".into(),
                modified: "2024-03-15 18:45".into(),
                url: "/download/ddnet/client.zip".into(),
            }]
        );
    }

    #[test]
    fn excludes_subdirectories() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("old-builds")).unwrap();
        std::fs::write(tmp.path().join("old-builds").join("inner.zip"), b"x").unwrap();
        std::fs::write(tmp.path().join("top.zip"), b"x").unwrap();

        let files = list_directory(tmp.path(), "cs2").unwrap();

        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["top.zip"]);
    }

    #[cfg(unix)]
    #[test]
    fn excludes_symlinks() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("real.zip"), b"x").unwrap();
        std::os::unix::fs::symlink(tmp.path().join("real.zip"), tmp.path().join("link.zip"))
            .unwrap();

        let files = list_directory(tmp.path(), "cs2").unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "real.zip");
    }

    // Not every unix filesystem accepts non-UTF-8 names.
    #[cfg(target_os = "linux")]
    #[test]
    fn skips_non_utf8_names_without_failing() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(OsStr::from_bytes(b"bad\xff.zip")), b"x").unwrap();
        std::fs::write(tmp.path().join("ok.zip"), b"x").unwrap();

        let files = list_directory(tmp.path(), "ddnet").unwrap();

        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["ok.zip"]);
    }

    #[test]
    fn unreadable_metadata_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("gone.zip");
        let metadata = Err(io::Error::new(ErrorKind::NotFound, "removed during listing"));

        assert!(file_entry("ddnet", &path, "gone.zip".into(), metadata).is_none());
    }

    #[test]
    fn file_entry_from_readable_metadata() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("ok.zip");
        std::fs::write(&path, b"abc").unwrap();

        let entry = file_entry("cs2", &path, "ok.zip".into(), std::fs::metadata(&path)).unwrap();
        assert_eq!(entry.size, 3);
        assert_eq!(entry.url, "/download/cs2/ok.zip");

        let dir = std::fs::metadata(tmp.path());
        assert!(file_entry("cs2", tmp.path(), "dir".into(), dir).is_none());
    }

    #[test]
    fn sorted_most_recent_first() {
        let tmp = tempfile::tempdir().unwrap();
        let times = [
            ("a.zip", (2024, 1, 1, 10, 0)),
            ("b.zip", (2024, 1, 3, 9, 0)),
            ("c.zip", (2024, 1, 2, 15, 30)),
        ];
        for (name, (y, mo, d, h, mi)) in times {
            let path = tmp.path().join(name);
            std::fs::write(&path, b"x").unwrap();
            set_local_mtime(&path, y, mo, d, h, mi);
        }

        let files = list_directory(tmp.path(), "minecraft").unwrap();

        let modified: Vec<&str> = files.iter().map(|f| f.modified.as_str()).collect();
        assert_eq!(
            modified,
            ["2024-01-03 09:00", "2024-01-02 15:30", "2024-01-01 10:00"]
        );
    }

    #[test]
    fn same_minute_ties_break_by_name() {
        let mut entries = vec![
            entry("zeta.zip", "2024-05-01 12:00"),
            entry("old.zip", "2023-05-01 12:00"),
            entry("alpha.zip", "2024-05-01 12:00"),
        ];
        sort_by_recency(&mut entries);

        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["alpha.zip", "zeta.zip", "old.zip"]);
    }

    #[test]
    fn url_escapes_reserved_characters() {
        assert_eq!(download_url("cs2", "plain.zip"), "/download/cs2/plain.zip");
        assert_eq!(
            download_url("cs2", "my map #1?.zip"),
            "/download/cs2/my%20map%20%231%3F.zip"
        );
        assert_eq!(download_url("cs2", "100%.txt"), "/download/cs2/100%25.txt");
    }

    #[test]
    fn format_modified_is_minute_precision() {
        let local = Local.with_ymd_and_hms(2024, 12, 31, 23, 59, 58).single().unwrap();
        assert_eq!(format_modified(local.into()), "2024-12-31 23:59");
    }

    #[test]
    fn file_entry_field_names() {
        let json = serde_json::to_value(entry("a.zip", "2024-01-01 00:00")).unwrap();
        let mut keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["modified", "name", "size", "size_human", "url"]);
    }
}
