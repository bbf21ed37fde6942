//! Table definitions
//!
//! Column names and types match the layout of existing catalog databases, so an existing file can
//! be opened as is. Every statement is idempotent.
use sqlx::SqlitePool;

const CREATE_GOODREADS: &str = "
    CREATE TABLE IF NOT EXISTS goodreads (
        id INTEGER NOT NULL PRIMARY KEY,
        author TEXT,
        average_rating REAL,
        best_book_id TEXT,
        description TEXT,
        goodreads_id TEXT,
        image_url TEXT,
        image_url2 TEXT,
        ratings_count INTEGER,
        title TEXT,
        url TEXT,
        publication_year INTEGER,
        num_pages INTEGER,
        isbns TEXT,
        ratings_count5 INTEGER,
        ratings_count4 INTEGER,
        ratings_count3 INTEGER,
        ratings_count2 INTEGER,
        ratings_count1 INTEGER,
        ratings_count5_pct INTEGER,
        ratings_count4_pct INTEGER,
        ratings_count3_pct INTEGER,
        ratings_count2_pct INTEGER,
        ratings_count1_pct INTEGER
    );
";

const CREATE_BOOKS: &str = "
    CREATE TABLE IF NOT EXISTS books (
        id INTEGER NOT NULL PRIMARY KEY,
        goodreads_id INTEGER REFERENCES goodreads (id),
        author TEXT,
        best_image TEXT,
        category_str TEXT,
        file_format TEXT,
        goodreads_searched INTEGER,
        hidden INTEGER,
        image_url TEXT,
        keywords_str TEXT,
        language TEXT,
        post_date DATE NOT NULL,
        post_title TEXT,
        recommended INTEGER,
        timestamp INTEGER NOT NULL,
        title TEXT,
        url TEXT NOT NULL
    );
";

const CREATE_BOOKS_URL_INDEX: &str =
    "CREATE UNIQUE INDEX IF NOT EXISTS books_url ON books (url);";

const CREATE_BOOKS_GOODREADS_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS books_goodreads_id ON books (goodreads_id);";

/// Creates both tables and their indexes if they do not exist yet.
///
/// # Errors
/// Fails if any of the statements fails to execute.
pub async fn create_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in [
        CREATE_GOODREADS,
        CREATE_BOOKS,
        CREATE_BOOKS_URL_INDEX,
        CREATE_BOOKS_GOODREADS_INDEX,
    ] {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
