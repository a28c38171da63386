pub mod cli;
pub mod command;
pub mod config;
pub mod entry;
pub mod error;
pub mod executor;
pub mod jail;
pub mod locator;

pub use clap::Parser;
pub use cli::{Cli, Commands, FinderKind, OutputFormat};
pub use entry::{enrich, print_long_format, print_simple_list, EntryInfo};
pub use error::{ConfindError, Result};
pub use executor::{ExecOutcome, ProcessExecutor, SystemExecutor};
pub use jail::{Jail, Resolved};
pub use locator::Locator;
pub use std::path::PathBuf;
