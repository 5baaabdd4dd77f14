//! `barky` command-line entry point.
//!
//! # Responsibility
//! - Map subcommands onto the core bookmark commands.
//! - Resolve configuration from `BARKY_*` env vars and global flags.

use barky_core::config::ENV_LOG_LEVEL;
use barky_core::db::open_db;
use barky_core::{
    core_version, init_logging, init_stderr_logging, AddBookmarkCommand, BarkyConfig,
    ChannelLayer, DeleteBookmarkCommand, DomainBookmark, EditBookmarkCommand, GetBookmarkCommand,
    HookRegistry, ListBookmarksCommand, SqliteBookmarkRepository, STDERR_LOG_LEVEL,
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::{debug, info};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "barky")]
#[command(about = "Bookmark store with CSV audit and broadcast hooks")]
#[command(
    after_help = "Environment:\n  BARKY_DB_PATH          SQLite store path\n  BARKY_AUDIT_CSV        Audit CSV path\n  BARKY_BROADCAST_TOPIC  Broadcast topic name\n  BARKY_LOG_LEVEL        Log verbosity\n  BARKY_LOG_DIR          Absolute log directory (stderr logging when unset)"
)]
struct Cli {
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    #[arg(long, global = true)]
    audit_csv: Option<PathBuf>,
    #[arg(long, global = true)]
    topic: Option<String>,
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a bookmark; fires the audit and broadcast hooks.
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        url: String,
        #[arg(long, default_value = "")]
        notes: String,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    List {
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    Get {
        id: i64,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Change the given fields; others keep their stored values.
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    Delete {
        id: i64,
    },
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("barky: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    if matches!(cli.command, Commands::Version) {
        println!("barky {}", core_version());
        return Ok(());
    }

    let config = resolve_config(&cli)?;
    init_cli_logging(&cli, &config)?;

    let conn = open_db(&config.db_path).map_err(|err| err.to_string())?;
    let repo = SqliteBookmarkRepository::new(&conn);
    info!(
        "event=cli_command module=cli status=start command={} db_path={}",
        command_name(&cli.command),
        config.db_path.display()
    );

    match cli.command {
        Commands::Add {
            title,
            url,
            notes,
            date,
        } => {
            let mut bookmark = DomainBookmark::new(title, url, notes);
            if let Some(date) = date {
                bookmark.date_added = date;
            }
            // One-shot process: the layer has no subscribers.
            let layer = Arc::new(ChannelLayer::new());
            let hooks = HookRegistry::with_default_hooks(
                &config.audit_csv_path,
                layer,
                &config.broadcast_topic,
            )
            .map_err(|err| err.to_string())?;
            debug!(
                "event=cli_hooks module=cli status=ok hooks={} names={}",
                hooks.len(),
                hooks.hook_names().join(",")
            );
            let created = AddBookmarkCommand::new(&repo, &hooks)
                .execute(&bookmark)
                .map_err(|err| err.to_string())?;
            println!("created bookmark {}", created.id.unwrap_or_default());
        }
        Commands::List { json } => {
            let bookmarks = ListBookmarksCommand::new(&repo)
                .execute()
                .map_err(|err| err.to_string())?;
            if json {
                print_json(&bookmarks)?;
            } else {
                for bookmark in &bookmarks {
                    print_line(bookmark);
                }
                println!("{} bookmark(s)", bookmarks.len());
            }
        }
        Commands::Get { id, json } => {
            let bookmark = GetBookmarkCommand::new(&repo)
                .execute_required(id)
                .map_err(|err| err.to_string())?;
            if json {
                print_json(&bookmark)?;
            } else {
                print_line(&bookmark);
            }
        }
        Commands::Edit {
            id,
            title,
            url,
            notes,
            date,
        } => {
            let mut bookmark = GetBookmarkCommand::new(&repo)
                .execute_required(id)
                .map_err(|err| err.to_string())?;
            if let Some(title) = title {
                bookmark.title = title;
            }
            if let Some(url) = url {
                bookmark.url = url;
            }
            if let Some(notes) = notes {
                bookmark.notes = notes;
            }
            if let Some(date) = date {
                bookmark.date_added = date;
            }
            EditBookmarkCommand::new(&repo)
                .execute(&bookmark)
                .map_err(|err| err.to_string())?;
            println!("updated bookmark {id}");
        }
        Commands::Delete { id } => {
            let target = GetBookmarkCommand::new(&repo)
                .execute_required(id)
                .map_err(|err| err.to_string())?;
            DeleteBookmarkCommand::new(&repo)
                .execute(&target)
                .map_err(|err| err.to_string())?;
            println!("deleted bookmark {id}");
        }
        Commands::Version => println!("barky {}", core_version()),
    }

    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<BarkyConfig, String> {
    let mut config = BarkyConfig::from_env().map_err(|err| err.to_string())?;
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    if let Some(path) = &cli.audit_csv {
        config.audit_csv_path = path.clone();
    }
    if let Some(topic) = &cli.topic {
        config.broadcast_topic = topic.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(dir) = &cli.log_dir {
        config.log_dir = Some(dir.clone());
    }
    config.validate().map_err(|err| err.to_string())?;
    Ok(config)
}

/// Files under `log_dir` when set; otherwise stderr, quiet unless a level was asked for.
fn init_cli_logging(cli: &Cli, config: &BarkyConfig) -> Result<(), String> {
    if let Some(log_dir) = &config.log_dir {
        return init_logging(&config.log_level, &log_dir.to_string_lossy());
    }

    let level_requested = cli.log_level.is_some()
        || std::env::var(ENV_LOG_LEVEL).is_ok_and(|value| !value.trim().is_empty());
    if level_requested {
        init_stderr_logging(&config.log_level)
    } else {
        init_stderr_logging(STDERR_LOG_LEVEL)
    }
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Add { .. } => "add",
        Commands::List { .. } => "list",
        Commands::Get { .. } => "get",
        Commands::Edit { .. } => "edit",
        Commands::Delete { .. } => "delete",
        Commands::Version => "version",
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("expected YYYY-MM-DD, got `{raw}`: {err}"))
}

fn print_line(bookmark: &DomainBookmark) {
    println!(
        "{}\t{}\t{}\t{}\t{}",
        bookmark.id.unwrap_or_default(),
        bookmark.date_added,
        bookmark.title,
        bookmark.url,
        bookmark.notes
    );
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let rendered = serde_json::to_string_pretty(value).map_err(|err| err.to_string())?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{init_cli_logging, parse_date, Cli, Commands};
    use barky_core::{logging_status, BarkyConfig, LogSink};
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn edit_accepts_partial_flags() {
        let cli = Cli::parse_from(["barky", "edit", "3", "--title", "goofy"]);
        match cli.command {
            Commands::Edit { id, title, url, .. } => {
                assert_eq!(id, 3);
                assert_eq!(title.as_deref(), Some("goofy"));
                assert!(url.is_none());
            }
            _ => panic!("expected edit"),
        }
    }

    #[test]
    fn logging_falls_back_to_stderr_without_log_dir() {
        let cli = Cli::parse_from(["barky", "list"]);
        init_cli_logging(&cli, &BarkyConfig::default()).unwrap();

        let (_, sink) = logging_status().unwrap();
        assert_eq!(sink, LogSink::Stderr);
    }

    #[test]
    fn parse_date_rejects_other_formats() {
        assert!(parse_date("2024-02-29").is_ok());
        assert!(parse_date("29/02/2024").is_err());
    }
}
