use crate::cli::FinderKind;
use crate::command::{clean_target, find_command};
use crate::entry::{enrich, EntryInfo};
use crate::error::{ConfindError, Result};
use crate::executor::{ProcessExecutor, SystemExecutor};
use crate::jail::{Jail, Resolved};
use log::{debug, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Confined file locator.
///
/// Holds an immutable jail root, a search front-end from the closed
/// allow-list, and a timeout bound for the external command. All lookup
/// methods take `&self` and carry no per-request state, so one instance
/// can serve concurrent callers as long as its executor is reentrant
/// (`SystemExecutor` is).
#[derive(Debug)]
pub struct Locator<E: ProcessExecutor = SystemExecutor> {
    jail: Jail,
    finder: FinderKind,
    timeout: Duration,
    executor: E,
}

impl Locator<SystemExecutor> {
    pub fn new(
        root: impl AsRef<Path>,
        finder: FinderKind,
        timeout_seconds: u64,
    ) -> Result<Self> {
        Self::with_executor(root, finder, timeout_seconds, SystemExecutor::new())
    }
}

impl<E: ProcessExecutor> Locator<E> {
    /// Construct with an injected process executor. The root must resolve
    /// to an existing directory and the timeout must be positive.
    pub fn with_executor(
        root: impl AsRef<Path>,
        finder: FinderKind,
        timeout_seconds: u64,
        executor: E,
    ) -> Result<Self> {
        Ok(Self {
            jail: Jail::new(root)?,
            finder,
            timeout: validate_timeout(timeout_seconds)?,
            executor,
        })
    }

    pub fn root(&self) -> &Path {
        self.jail.root()
    }

    pub fn finder(&self) -> FinderKind {
        self.finder
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Adjust the timeout after construction, with the same validation as
    /// the constructor.
    pub fn set_timeout(&mut self, timeout_seconds: u64) -> Result<()> {
        self.timeout = validate_timeout(timeout_seconds)?;
        Ok(())
    }

    /// Locate files named `name` beneath `search_path`.
    ///
    /// The name is reduced to its basename before the command is built.
    /// In `Finder` mode a name that carries a directory component first
    /// resolves that component as a directory; the first hit, if any,
    /// narrows the search path for the file lookup.
    ///
    /// A missing search path yields an empty list; a search path that
    /// resolves outside the root fails with `JailEscape` before any
    /// process is spawned.
    pub fn find_file(&self, name: &str, search_path: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let Some(target) = clean_target(name) else {
            debug!("Target '{name}' has no usable basename, nothing to search");
            return Ok(Vec::new());
        };

        let mut dir = match self.jail.resolve(search_path)? {
            Resolved::Inside(dir) => dir,
            Resolved::Missing => return Ok(Vec::new()),
        };

        if self.finder == FinderKind::Finder {
            if let Some(parent) = nonempty_parent(name) {
                let hits = self.find_directory_in(parent, &dir)?;
                if let Some(first) = hits.first() {
                    debug!("Narrowed search path to {}", first.display());
                    dir = first.clone();
                }
            }
        }

        let argv = find_command(self.finder, &dir, &target, false);
        let stdout = self.run(&argv)?;
        Ok(parse_lines(&stdout))
    }

    /// Like [`find_file`](Self::find_file), but with an enriched metadata
    /// record per surviving path. Paths that vanish between the search
    /// and enrichment are silently omitted.
    pub fn find_file_info(
        &self,
        name: &str,
        search_path: impl AsRef<Path>,
    ) -> Result<Vec<EntryInfo>> {
        let paths = self.find_file(name, search_path)?;
        Ok(enrich(&paths))
    }

    /// Locate directories whose path ends with `relative_path`, searching
    /// beneath `search_path`.
    ///
    /// The external command matches on the last path segment only; the
    /// raw results are then post-filtered by a component-wise suffix
    /// match, so `foo/bar` matches `/root/a/foo/bar` but never
    /// `/root/notfoobar`.
    pub fn find_directory(
        &self,
        relative_path: impl AsRef<Path>,
        search_path: impl AsRef<Path>,
    ) -> Result<Vec<PathBuf>> {
        let dir = match self.jail.resolve(search_path)? {
            Resolved::Inside(dir) => dir,
            Resolved::Missing => return Ok(Vec::new()),
        };

        self.find_directory_in(relative_path.as_ref(), &dir)
    }

    fn find_directory_in(&self, relative_path: &Path, dir: &Path) -> Result<Vec<PathBuf>> {
        let Some(leaf) = relative_path.file_name().and_then(|n| n.to_str()) else {
            return Ok(Vec::new());
        };

        let argv = find_command(self.finder, dir, leaf, true);
        let stdout = self.run(&argv)?;
        Ok(filter_directory_matches(parse_lines(&stdout), relative_path))
    }

    /// Hand the argument vector to the executor and classify the outcome:
    /// clean exit yields captured stdout, anything else is fatal for this
    /// call. No retries.
    fn run(&self, argv: &[String]) -> Result<String> {
        let outcome = self.executor.execute(argv, self.timeout)?;

        if outcome.timed_out || !outcome.success {
            warn!(
                "Search command failed: argv={argv:?} exit_code={:?} timed_out={}",
                outcome.exit_code, outcome.timed_out
            );
            return Err(ConfindError::CommandFailed {
                exit_code: outcome.exit_code,
                timed_out: outcome.timed_out,
                stderr: outcome.stderr,
            });
        }

        Ok(outcome.stdout)
    }
}

fn validate_timeout(timeout_seconds: u64) -> Result<Duration> {
    if timeout_seconds == 0 {
        return Err(ConfindError::InvalidConfig(
            "timeout must be a positive number of seconds".to_string(),
        ));
    }
    Ok(Duration::from_secs(timeout_seconds))
}

fn nonempty_parent(name: &str) -> Option<&Path> {
    Path::new(name.trim())
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
}

/// Split line-oriented command output into paths: trim, drop empties,
/// deduplicate preserving first-occurrence order. The external command's
/// ordering is otherwise kept as-is.
fn parse_lines(output: &str) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| seen.insert(line.to_string()))
        .map(PathBuf::from)
        .collect()
}

/// Keep only results whose path ends with the requested segment sequence.
/// Plain substring containment would also match unrelated names, so the
/// comparison is component-wise with trailing separators ignored.
fn filter_directory_matches(results: Vec<PathBuf>, relative_path: &Path) -> Vec<PathBuf> {
    results
        .into_iter()
        .filter(|result| result.ends_with(relative_path))
        .collect()
}
