use clap::CommandFactory;
use colored::*;
use confind::cli::{Cli, Commands, OutputFormat};
use confind::config::Config;
use confind::entry::{print_long_format, print_simple_list, to_json};
use confind::error::{ConfindError, Result as ConfindResult};
use confind::{Locator, Parser};
use env_logger::{Builder, Env, Target};
use log::{info, warn};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

fn main() -> ConfindResult<()> {
    let cli = Cli::parse();
    setup_logging(&cli)?;

    let start_time = Instant::now();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(*shell, &mut cmd, "confind", &mut std::io::stdout());
        return Ok(());
    }

    let config = Config::load().unwrap_or_else(|e| {
        warn!("Falling back to default configuration: {e}");
        Config::default()
    });

    // Flags beat the config file, which beats built-in defaults.
    let root = cli
        .root
        .clone()
        .or_else(|| config.locator.root.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    let finder = cli.finder.unwrap_or(config.locator.finder);
    let timeout = cli.timeout.unwrap_or(config.locator.timeout_seconds);

    let locator = Locator::new(&root, finder, timeout)?;
    info!(
        "Locator ready: root={} finder={finder} timeout={timeout}s",
        locator.root().display()
    );

    match &cli.command {
        Commands::File {
            name,
            search_path,
            plain,
            output_format,
        } => {
            if *plain {
                let paths = locator.find_file(name, search_path)?;
                report_paths(&paths, &config, &locator);
            } else {
                let entries = locator.find_file_info(name, search_path)?;
                match output_format {
                    OutputFormat::Json => {
                        let doc = to_json(name, locator.root(), &entries);
                        let rendered = serde_json::to_string_pretty(&doc)
                            .map_err(|e| ConfindError::Other(e.to_string()))?;
                        println!("{rendered}");
                    }
                    OutputFormat::Text => {
                        if entries.is_empty() {
                            println!("{}", "No matches found".yellow());
                        } else if config.display.long_format {
                            print_long_format(&entries);
                        } else {
                            let paths: Vec<PathBuf> =
                                entries.iter().map(|e| e.real_path.clone()).collect();
                            print_simple_list(&paths);
                        }
                        print_summary(entries.len(), &config, &locator);
                    }
                }
            }
        }
        Commands::Dir { path, search_path } => {
            let dirs = locator.find_directory(path, search_path)?;
            report_paths(&dirs, &config, &locator);
        }
        Commands::Completions { .. } => {}
    }

    info!(
        "Finished. Total elapsed time: {:.2?}",
        start_time.elapsed()
    );
    Ok(())
}

fn report_paths(paths: &[PathBuf], config: &Config, locator: &Locator) {
    if paths.is_empty() {
        println!("{}", "No matches found".yellow());
    } else {
        print_simple_list(paths);
    }
    print_summary(paths.len(), config, locator);
}

fn print_summary(count: usize, config: &Config, locator: &Locator) {
    if !config.display.show_summary {
        return;
    }
    println!("\n{}", "Summary:".green().bold());
    println!("{}: {}", "Total matches".cyan(), count);
    println!("{}: {}", "Root".cyan(), locator.root().display());
}

fn setup_logging(cli: &Cli) -> ConfindResult<()> {
    let default_filter = if cli.verbose { "debug" } else { "info" };
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_filter));

    builder.format(|buf, record| {
        use std::io::Write;
        writeln!(
            buf,
            "{} [{}] [{}] {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.module_path().unwrap_or("unknown"),
            record.args()
        )
    });

    if let Some(log_path) = &cli.log {
        if let Some(parent_dir) = log_path.parent() {
            if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
                fs::create_dir_all(parent_dir).map_err(ConfindError::Io)?;
            }
        }
        let log_file = fs::File::create(log_path).map_err(ConfindError::Io)?;
        builder.target(Target::Pipe(Box::new(log_file)));
    } else {
        builder.target(Target::Stderr);
    }

    builder
        .try_init()
        .map_err(|e| ConfindError::Other(e.to_string()))?;
    Ok(())
}
