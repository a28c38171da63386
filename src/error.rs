use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfindError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Search path '{}' escapes the root directory '{}'", .path.display(), .root.display())]
    JailEscape { path: PathBuf, root: PathBuf },

    #[error("Search command failed (exit code {exit_code:?}, timed out: {timed_out}): {stderr}")]
    CommandFailed {
        exit_code: Option<i32>,
        timed_out: bool,
        stderr: String,
    },

    #[error("An unexpected error occurred: {0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ConfindError>;
