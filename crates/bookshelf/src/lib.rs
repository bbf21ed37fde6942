//! `bookshelf`
//!
//! Command line front end of Bookshelf. Opens the configured catalog database and prints the
//! cataloged books through the display helpers of `bookshelf_core`.
use crate::commands::{list_books, show_book};
use crate::config::Config;
use crate::errors::Error as CliError;
use anyhow::{Context as _, Error, anyhow};
use bookshelf_core::Db;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt};
/// Commands rendering the catalog
mod commands;
/// Configuration sources
mod config;
/// Error types
mod errors;

#[derive(Debug, Parser)]
#[command(name = "bookshelf", version, about = "Browse the Bookshelf book catalog")]
struct Cli {
    /// Path to the catalog database, overrides BOOKSHELF_DATABASE
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List cataloged books, most recently posted first
    List {
        /// Include hidden books
        #[arg(long)]
        all: bool,
    },
    /// Show one book and its Goodreads metadata
    Show {
        /// URL the book was cataloged under
        url: String,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[allow(
    clippy::missing_inline_in_public_items,
    reason = "Executed once per run, never across crate boundaries"
)]
#[allow(
    clippy::print_stderr,
    reason = "Tracing might not be available here if run_safe() failed before its initialization"
)]
pub async fn run() -> ExitCode {
    match run_safe().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("bookshelf: {error:#}");
            ExitCode::FAILURE
        }
    }
}

/// Encapsulated run function that allows returning errors instead of panicking, `run()` turns
/// them into an exit code.
async fn run_safe() -> Result<(), Error> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!("Unable to set global tracing subscriber: {err}"))?;

    let cli = Cli::parse();
    let config = Config::resolve(cli.database)?;
    if !config.database.exists() {
        return Err(CliError::DatabaseNotFound(config.database).into());
    }

    let db = Db::init(&config.database)
        .await
        .with_context(|| format!("Failed to open database at {}", config.database.display()))?;
    let output = match cli.command {
        Command::List { all } => list_books(&db, all).await.map(|lines| lines.join("\n")),
        Command::Show { url, json } => show_book(&db, &url, json).await,
    };
    db.close().await;

    println!("{}", output?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_show() {
        let cli = Cli::try_parse_from([
            "bookshelf",
            "show",
            "https://example.org/mistborn",
            "--json",
            "--database",
            "library.db",
        ])
        .unwrap();

        assert_eq!(cli.database, Some(PathBuf::from("library.db")));
        assert!(matches!(
            cli.command,
            Command::Show { ref url, json: true } if url == "https://example.org/mistborn"
        ));
    }

    #[test]
    fn test_parse_list_defaults() {
        let cli = Cli::try_parse_from(["bookshelf", "list"]).unwrap();
        assert_eq!(cli.database, None);
        assert!(matches!(cli.command, Command::List { all: false }));
    }
}
