use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    /// Root directory that confines every search
    #[clap(long, value_parser)]
    pub root: Option<PathBuf>,

    /// Which search front-end to use
    #[clap(long, value_enum)]
    pub finder: Option<FinderKind>,

    /// Maximum run time of the external command, in seconds
    #[clap(long, value_parser)]
    pub timeout: Option<u64>,

    #[clap(long, value_parser, default_value_t = false)]
    pub verbose: bool,

    #[clap(long, value_parser)]
    pub log: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Locate files by name beneath a search path inside the root
    File {
        name: String,

        #[clap(default_value = ".")]
        search_path: PathBuf,

        /// Print bare paths instead of enriched metadata
        #[clap(long, value_parser, default_value_t = false)]
        plain: bool,

        #[clap(long, value_enum, default_value_t = OutputFormat::Text)]
        output_format: OutputFormat,
    },
    /// Locate directories matching a relative path beneath a search path
    Dir {
        path: PathBuf,

        #[clap(default_value = ".")]
        search_path: PathBuf,
    },
    /// Generate shell completions
    Completions {
        #[clap(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Closed allow-list of search front-ends. User input never selects the
/// executable directly; it can only pick one of these.
#[derive(ValueEnum, Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FinderKind {
    /// Plain find(1) invocation
    #[default]
    Find,
    /// find(1) with directory pre-resolution for names that carry a path
    Finder,
}

impl fmt::Display for FinderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinderKind::Find => write!(f, "find"),
            FinderKind::Finder => write!(f, "finder"),
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
