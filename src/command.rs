use crate::cli::FinderKind;
use std::path::Path;

/// Reduce a caller-supplied target to a bare basename.
///
/// Directory components are stripped so a crafted name can never smuggle
/// an absolute path or an extra option into the `-name` position. Returns
/// `None` when nothing usable remains (`..`, `/`, empty string).
pub fn clean_target(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return None;
    }

    let base = Path::new(trimmed)
        .file_name()
        .and_then(|n| n.to_str())?
        .trim();

    if base.is_empty() {
        None
    } else {
        Some(base.to_string())
    }
}

/// Build the argument vector for one search invocation.
///
/// The result is a vector of discrete tokens handed straight to the
/// process executor; no shell is ever involved, so metacharacters in the
/// target are inert. The executable comes from the `FinderKind`
/// allow-list and from nowhere else.
pub fn find_command(
    kind: FinderKind,
    search_path: &Path,
    target: &str,
    directories_only: bool,
) -> Vec<String> {
    let executable = match kind {
        FinderKind::Find | FinderKind::Finder => "find",
    };

    let mut argv = vec![
        executable.to_string(),
        search_path.to_string_lossy().into_owned(),
        "-name".to_string(),
        target.to_string(),
    ];

    if directories_only {
        argv.push("-type".to_string());
        argv.push("d".to_string());
    }

    argv
}
