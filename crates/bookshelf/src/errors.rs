use bookshelf_core::CatalogError;
use std::path::PathBuf;

/// The Bookshelf CLI error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Neither `--database` nor `BOOKSHELF_DATABASE` name a database file
    #[error("No database configured, pass --database or set BOOKSHELF_DATABASE")]
    MissingDatabasePath,
    /// The configured database file does not exist
    #[error("Database file {} does not exist", .0.display())]
    DatabaseNotFound(PathBuf),
    /// No book is cataloged under the requested URL
    #[error("No book with url {0}")]
    UnknownBook(String),
    /// Error variant arising from the catalog store
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
}
