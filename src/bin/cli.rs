//! resources-tracker CLI
//!
//! Inspect and compare language snapshots locally.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use resources_tracker::{
    config::load_config,
    error::Result,
    models::{Config, LanguageInfo},
    pipeline::{self, ChangeLog},
    storage::{LocalStorage, SnapshotStorage},
};

/// resources-tracker - Worksheet Translation Snapshot Tracker
#[derive(Parser, Debug)]
#[command(
    name = "resources-tracker",
    version,
    about = "Tracks worksheet translation snapshots and reports changes"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the changes between two snapshot files
    Diff {
        /// Previous snapshot
        old: PathBuf,
        /// Current snapshot
        new: PathBuf,
    },

    /// Summarize a snapshot file
    Info {
        snapshot: PathBuf,
    },

    /// Compare a snapshot file with the stored one and store it
    Store {
        snapshot: PathBuf,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn read_snapshot(path: &Path) -> Result<LanguageInfo> {
    let text = std::fs::read_to_string(path)?;
    let decoded = pipeline::decode(&text)?;
    if !decoded.diagnostics.is_empty() {
        log::info!(
            "{}: skipped {} file entries",
            path.display(),
            decoded.diagnostics.len()
        );
    }
    Ok(decoded.language_info)
}

fn print_changes(language_code: &str, changes: &ChangeLog) {
    if changes.is_empty() {
        log::info!("No changes for '{language_code}'");
        return;
    }
    log::info!("{} changes for '{}':", changes.len(), language_code);
    for change in changes.iter() {
        println!("{change}");
    }
}

fn print_info(config: &Config, info: &LanguageInfo) {
    println!("Language: {}", info.language_code());
    println!("Worksheets: {}", info.len());
    println!("Finished translations: {}", info.count_finished_translations());

    let incomplete = info.list_incomplete_translations(&config.completion_threshold());
    println!("Incomplete translations: {}", incomplete.len());
    for ws in incomplete {
        println!(
            "    {} ({}/{} translated, {} fuzzy)",
            ws.english_name(),
            ws.progress.translated(),
            ws.progress.total(),
            ws.progress.fuzzy()
        );
    }

    for file_type in &config.tracking.file_types {
        let missing = info.list_worksheets_with_missing(file_type);
        if missing.is_empty() {
            continue;
        }
        println!("Missing {file_type}: {}", missing.len());
        for ws in missing {
            println!("    {}", ws.english_name());
        }
    }
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load_or_default(&cli.config);
    init_logging(cli.verbose, &config.logging.level);

    match cli.command {
        Command::Diff { old, new } => {
            let old = read_snapshot(&old)?;
            let new = read_snapshot(&new)?;
            let changes = config.diff_calculator().calculate(&old, &new);
            print_changes(new.language_code(), &changes);
        }

        Command::Info { snapshot } => {
            let info = read_snapshot(&snapshot)?;
            print_info(&config, &info);
        }

        Command::Store { snapshot } => {
            let current = read_snapshot(&snapshot)?;
            let storage = LocalStorage::new(&config.storage.snapshot_dir);
            let previous = storage
                .load_snapshot(current.language_code())
                .await?
                .unwrap_or_else(|| LanguageInfo::new(current.language_code()));

            let changes = config.diff_calculator().calculate(&previous, &current);
            print_changes(current.language_code(), &changes);

            let meta = storage.save_snapshot(&current).await?;
            log::info!(
                "Stored {} worksheets for '{}' at {}",
                meta.worksheet_count,
                meta.language_code,
                meta.timestamp
            );
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            let config = load_config(&cli.config)?;
            log::info!(
                "✓ Config OK (threshold {}%, file types: {})",
                config.tracking.min_translated_percent,
                config.tracking.file_types.join(", ")
            );
        }
    }

    Ok(())
}
