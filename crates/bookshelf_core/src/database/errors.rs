/// Errors raised by the catalog store.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// A book with the same URL is already cataloged
    #[error("book already exists (url={url})")]
    UniquenessViolation { url: String },

    /// A book references a Goodreads record that does not exist
    #[error("goodreads record does not exist (id={goodreads_id})")]
    ReferentialIntegrityViolation { goodreads_id: i64 },

    /// A serialized list column does not hold a JSON array of strings
    #[error("column `{column}` is not a valid list of strings: {source}")]
    DataFormat {
        column: &'static str,
        source: serde_json::Error,
    },

    /// The `timestamp` column holds a value outside the representable range
    #[error("invalid timestamp {0} in books table")]
    InvalidTimestamp(i64),

    /// Rating counts are negative or the star percentages do not add up to 100
    #[error("invalid ratings: {0}")]
    InvalidRatings(String),

    #[error("book not found (id={0})")]
    BookNotFound(i64),

    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}
