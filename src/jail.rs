use crate::error::{ConfindError, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A validated root directory that every search is confined to.
///
/// The root is canonicalized once at construction and is immutable
/// afterwards, so a `Jail` can be shared freely across threads.
#[derive(Debug, Clone)]
pub struct Jail {
    root: PathBuf,
}

/// Outcome of resolving a caller-supplied search path.
///
/// A path that does not exist is not a fault: the search space is simply
/// empty. Only a path that resolves *outside* the root is an error, and
/// that one is raised, never returned as a variant here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// Canonical path, confirmed to lie at or beneath the root.
    Inside(PathBuf),
    /// The path does not exist on disk.
    Missing,
}

impl Jail {
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let canonical = fs::canonicalize(root).map_err(|e| {
            ConfindError::InvalidConfig(format!(
                "root directory '{}' cannot be resolved: {e}",
                root.display()
            ))
        })?;

        if !canonical.is_dir() {
            return Err(ConfindError::InvalidConfig(format!(
                "root '{}' is not a directory",
                canonical.display()
            )));
        }

        Ok(Self { root: canonical })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Canonicalize `search_path` and check that it stays inside the root.
    ///
    /// Relative paths are interpreted against the root, so the default
    /// search path `"."` means the whole jail. Canonicalization resolves
    /// `.`, `..` and symlinks against the real filesystem; a symlink that
    /// points outside the root therefore canonicalizes outside and is
    /// rejected.
    ///
    /// The containment comparison is component-wise: `/var/www-secret`
    /// does not count as being under `/var/www`.
    pub fn resolve(&self, search_path: impl AsRef<Path>) -> Result<Resolved> {
        let search_path = search_path.as_ref();
        let joined = if search_path.is_absolute() {
            search_path.to_path_buf()
        } else {
            self.root.join(search_path)
        };

        let canonical = match fs::canonicalize(&joined) {
            Ok(p) => p,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Resolved::Missing),
            Err(e) => return Err(ConfindError::Io(e)),
        };

        if canonical == self.root || canonical.starts_with(&self.root) {
            Ok(Resolved::Inside(canonical))
        } else {
            Err(ConfindError::JailEscape {
                path: canonical,
                root: self.root.clone(),
            })
        }
    }
}
