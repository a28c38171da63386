use colored::*;
use log::debug;
use nix::unistd::{access, AccessFlags};
use serde::Serialize;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Descriptive record for one located path.
#[derive(Debug, Clone, Serialize)]
pub struct EntryInfo {
    pub directory: PathBuf,
    pub file_name: String,
    pub real_path: PathBuf,
    pub extension: String,
    pub entry_type: String,
    pub mime_type: String,
    pub size: u64,
    pub is_file: bool,
    pub is_dir: bool,
    pub is_symlink: bool,
    pub writable: bool,
    pub readable: bool,
    pub executable: bool,
}

/// Build a metadata record for each path that still exists.
///
/// Search results are a best-effort snapshot; a path that vanished since
/// the search ran is skipped without an error or a placeholder. The MIME
/// detector is initialized once and reused for every entry.
pub fn enrich(paths: &[PathBuf]) -> Vec<EntryInfo> {
    let detector = infer::Infer::new();

    paths
        .iter()
        .filter_map(|path| describe(path, &detector))
        .collect()
}

fn describe(path: &Path, detector: &infer::Infer) -> Option<EntryInfo> {
    let is_symlink = match fs::symlink_metadata(path) {
        Ok(meta) => meta.file_type().is_symlink(),
        Err(e) => {
            debug!("Skipping vanished entry {}: {e}", path.display());
            return None;
        }
    };

    // Follows symlinks, so a dangling link counts as vanished too.
    let Ok(meta) = fs::metadata(path) else {
        debug!("Skipping vanished entry {}", path.display());
        return None;
    };
    let Ok(real_path) = fs::canonicalize(path) else {
        debug!("Skipping vanished entry {}", path.display());
        return None;
    };

    let entry_type = if is_symlink {
        "link"
    } else if meta.is_dir() {
        "dir"
    } else if meta.is_file() {
        "file"
    } else {
        "unknown"
    };

    let mime_type = if meta.is_file() {
        match detector.get_from_path(path) {
            Ok(Some(kind)) => kind.mime_type().to_string(),
            _ => "unknown".to_string(),
        }
    } else {
        "unknown".to_string()
    };

    Some(EntryInfo {
        directory: path.parent().map(Path::to_path_buf).unwrap_or_default(),
        file_name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        real_path,
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_string(),
        entry_type: entry_type.to_string(),
        mime_type,
        size: meta.len(),
        is_file: meta.is_file(),
        is_dir: meta.is_dir(),
        is_symlink,
        writable: access(path, AccessFlags::W_OK).is_ok(),
        readable: access(path, AccessFlags::R_OK).is_ok(),
        executable: access(path, AccessFlags::X_OK).is_ok(),
    })
}

pub fn print_simple_list(paths: &[PathBuf]) {
    for path in paths {
        println!("{}", path.display());
    }
}

pub fn print_long_format(entries: &[EntryInfo]) {
    for entry in entries {
        let markers = format!(
            "{}{}{}",
            if entry.readable { "r" } else { "-" },
            if entry.writable { "w" } else { "-" },
            if entry.executable { "x" } else { "-" },
        );
        println!(
            "{:<60} {:>8} KB {:<6} {:<24} {}",
            entry.real_path.display(),
            entry.size / 1024,
            entry.entry_type.cyan(),
            entry.mime_type,
            markers.dimmed(),
        );
    }
}

/// JSON document with a query header and the entries array.
pub fn to_json(query: &str, root: &Path, entries: &[EntryInfo]) -> Value {
    json!({
        "query": query,
        "root": root.to_string_lossy(),
        "total_matches": entries.len(),
        "entries": entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn describes_a_plain_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.txt");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(b"hello world\n").unwrap();

        let entries = enrich(&[path.clone()]);
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.file_name, "notes.txt");
        assert_eq!(entry.extension, "txt");
        assert_eq!(entry.entry_type, "file");
        assert!(entry.is_file);
        assert!(!entry.is_dir);
        assert_eq!(entry.size, 12);
        assert!(entry.readable);
        // Plain text has no magic number to sniff.
        assert_eq!(entry.mime_type, "unknown");
    }

    #[test]
    fn sniffs_mime_from_content() {
        let temp = TempDir::new().unwrap();
        // PNG magic, deliberately behind a misleading extension.
        let path = temp.path().join("image.dat");
        fs::write(&path, b"\x89PNG\r\n\x1a\n0000IHDR").unwrap();

        let entries = enrich(&[path]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].mime_type, "image/png");
        assert_eq!(entries[0].extension, "dat");
    }

    #[test]
    fn directories_have_no_extension() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("logs");
        fs::create_dir(&dir).unwrap();

        let entries = enrich(&[dir]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].entry_type, "dir");
        assert_eq!(entries[0].extension, "");
        assert!(entries[0].is_dir);
    }

    #[test]
    fn vanished_paths_are_silently_omitted() {
        let temp = TempDir::new().unwrap();
        let alive = temp.path().join("alive.txt");
        fs::write(&alive, "x").unwrap();
        let gone = temp.path().join("gone.txt");

        let entries = enrich(&[alive.clone(), gone, alive.clone()]);
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.file_name == "alive.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_flagged() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("real.txt");
        fs::write(&target, "data").unwrap();
        let link = temp.path().join("alias.txt");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let entries = enrich(&[link]);
        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_symlink);
        assert_eq!(entries[0].entry_type, "link");
        assert!(entries[0].real_path.ends_with("real.txt"));
    }

    #[test]
    fn json_document_shape() {
        let doc = to_json("notes.txt", Path::new("/srv"), &[]);
        assert_eq!(doc["query"], "notes.txt");
        assert_eq!(doc["total_matches"], 0);
        assert!(doc["entries"].as_array().unwrap().is_empty());
    }
}
