use crate::database::errors::CatalogError;
use crate::database::rows::{BookRow, GoodreadsRow, encode_list};
use crate::database::schema::create_schema;
use crate::database::types::{BookRecord, GoodreadsRecord, NewBook, NewGoodreads};
use core::str::FromStr as _;
use core::time::Duration;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::Path;

pub struct Db {
    pool: SqlitePool,
}

impl Db {
    /// Opens the catalog database at `path`, creating the file and its tables if needed.
    /// # Errors
    /// Fails if the file cannot be opened or the schema cannot be created.
    #[allow(
        clippy::missing_inline_in_public_items,
        reason = "Called once at start of program"
    )]
    pub async fn init(path: &Path) -> Result<Self, CatalogError> {
        let options = SqliteConnectOptions::new()
            .foreign_keys(true)
            .create_if_missing(true)
            .filename(path);
        let pool = SqlitePool::connect_with(options).await?;
        create_schema(&pool).await?;
        log::info!("Opened catalog database at {}", path.display());

        Ok(Self { pool })
    }

    /// Opens an empty in-memory database. All queries share a single connection that is never
    /// recycled, otherwise the data would be lost.
    /// # Errors
    /// Fails if the connection cannot be opened or the schema cannot be created.
    #[allow(
        clippy::missing_inline_in_public_items,
        reason = "Called once at start of program"
    )]
    pub async fn init_in_memory() -> Result<Self, CatalogError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await?;
        create_schema(&pool).await?;

        Ok(Self { pool })
    }

    #[allow(
        clippy::missing_inline_in_public_items,
        reason = "Called once at end of program"
    )]
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Stores new Goodreads metadata and returns its row ID.
    /// # Errors
    /// Returns `InvalidRatings` if a rating count is negative or the star percentages do not sum
    /// to roughly 100. Fails if the ISBN list cannot be encoded or the insert fails.
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn insert_goodreads(&self, record: &NewGoodreads) -> Result<i64, CatalogError> {
        if let Err(error) = validate_ratings(record) {
            log::warn!("Rejected goodreads record: {error}");
            return Err(error);
        }
        let isbns = encode_list("isbns", &record.isbns)?;
        let [count1, count2, count3, count4, count5] = record.star_counts;
        let [pct1, pct2, pct3, pct4, pct5] = record.star_percentages;

        let result = sqlx::query(
            r"
            INSERT INTO goodreads (
                author, average_rating, best_book_id, description, goodreads_id,
                image_url, image_url2, ratings_count, title, url,
                publication_year, num_pages, isbns,
                ratings_count5, ratings_count4, ratings_count3, ratings_count2, ratings_count1,
                ratings_count5_pct, ratings_count4_pct, ratings_count3_pct, ratings_count2_pct,
                ratings_count1_pct
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?);
        ",
        )
        .bind(&record.author)
        .bind(record.average_rating)
        .bind(&record.best_book_id)
        .bind(&record.description)
        .bind(&record.external_id)
        .bind(&record.image_url)
        .bind(&record.secondary_image_url)
        .bind(record.ratings_count)
        .bind(&record.title)
        .bind(&record.url)
        .bind(record.publication_year)
        .bind(record.page_count)
        .bind(isbns)
        .bind(count5)
        .bind(count4)
        .bind(count3)
        .bind(count2)
        .bind(count1)
        .bind(pct5)
        .bind(pct4)
        .bind(pct3)
        .bind(pct2)
        .bind(pct1)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Stores a new book and returns its row ID.
    /// # Errors
    /// Returns `UniquenessViolation` if a book with the same URL exists and
    /// `ReferentialIntegrityViolation` if the referenced Goodreads record does not exist.
    #[allow(
        clippy::missing_inline_in_public_items,
        reason = "Called rarely, large function"
    )]
    pub async fn insert_book(&self, book: &NewBook) -> Result<i64, CatalogError> {
        let category = encode_list("category_str", &book.category)?;
        let keywords = encode_list("keywords_str", &book.keywords)?;

        let result = sqlx::query(
            r"
            INSERT INTO books (
                goodreads_id, author, best_image, category_str, file_format,
                goodreads_searched, hidden, image_url, keywords_str, language,
                post_date, post_title, recommended, timestamp, title, url
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?);
        ",
        )
        .bind(book.goodreads_id)
        .bind(&book.author)
        .bind(&book.best_image)
        .bind(category)
        .bind(&book.file_format)
        .bind(book.goodreads_searched)
        .bind(book.hidden)
        .bind(&book.image_url)
        .bind(keywords)
        .bind(&book.language)
        .bind(book.post_date)
        .bind(&book.post_title)
        .bind(book.recommended)
        .bind(book.timestamp.timestamp())
        .bind(&book.title)
        .bind(&book.url)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => Ok(done.last_insert_rowid()),
            Err(error) if is_sqlite_unique_violation(&error) => {
                log::warn!("Rejected duplicate book {}", book.url);
                Err(CatalogError::UniquenessViolation {
                    url: book.url.clone(),
                })
            }
            Err(error) => Err(integrity_error(error, book.goodreads_id)),
        }
    }

    /// # Errors
    /// Fails if the query fails or the stored row cannot be decoded.
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn fetch_book(&self, id: i64) -> Result<Option<BookRecord>, CatalogError> {
        let row: Option<BookRow> = sqlx::query_as("SELECT * FROM books WHERE id = ?;")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(BookRecord::try_from).transpose()
    }

    /// # Errors
    /// Fails if the query fails or the stored row cannot be decoded.
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn fetch_book_by_url(&self, url: &str) -> Result<Option<BookRecord>, CatalogError> {
        let row: Option<BookRow> = sqlx::query_as("SELECT * FROM books WHERE url = ?;")
            .bind(url)
            .fetch_optional(&self.pool)
            .await?;
        row.map(BookRecord::try_from).transpose()
    }

    /// Fetches all books, most recently posted first. Hidden books are skipped unless
    /// `include_hidden` is set.
    /// # Errors
    /// Fails if the query fails or any stored row cannot be decoded.
    #[allow(
        clippy::missing_inline_in_public_items,
        reason = "Large function, called only when listing"
    )]
    pub async fn fetch_books(&self, include_hidden: bool) -> Result<Vec<BookRecord>, CatalogError> {
        let rows: Vec<BookRow> = sqlx::query_as(
            "
            SELECT *
            FROM books
            WHERE ?1 OR COALESCE(hidden, 0) = 0
            ORDER BY post_date DESC, id DESC;
        ",
        )
        .bind(include_hidden)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(BookRecord::try_from).collect()
    }

    /// # Errors
    /// Fails if the query fails or the stored row cannot be decoded.
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn fetch_goodreads(&self, id: i64) -> Result<Option<GoodreadsRecord>, CatalogError> {
        let row: Option<GoodreadsRow> = sqlx::query_as("SELECT * FROM goodreads WHERE id = ?;")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(GoodreadsRecord::try_from).transpose()
    }

    /// Follows the book's Goodreads reference. Returns `None` if the book has no reference.
    /// # Errors
    /// Fails if the query fails or the stored row cannot be decoded.
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn fetch_goodreads_for_book(
        &self,
        book: &BookRecord,
    ) -> Result<Option<GoodreadsRecord>, CatalogError> {
        match book.goodreads_id {
            Some(id) => self.fetch_goodreads(id).await,
            None => Ok(None),
        }
    }

    /// Fetches every book that references the given Goodreads record, oldest first.
    /// # Errors
    /// Fails if the query fails or any stored row cannot be decoded.
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn fetch_books_for_goodreads(
        &self,
        goodreads_id: i64,
    ) -> Result<Vec<BookRecord>, CatalogError> {
        let rows: Vec<BookRow> =
            sqlx::query_as("SELECT * FROM books WHERE goodreads_id = ? ORDER BY id ASC;")
                .bind(goodreads_id)
                .fetch_all(&self.pool)
                .await?;
        rows.into_iter().map(BookRecord::try_from).collect()
    }

    /// Sets or clears the book's Goodreads reference and marks the lookup as attempted.
    /// # Errors
    /// Returns `BookNotFound` for an unknown book and `ReferentialIntegrityViolation` if the
    /// Goodreads record does not exist.
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn link_goodreads(
        &self,
        book_id: i64,
        goodreads_id: Option<i64>,
    ) -> Result<(), CatalogError> {
        let result =
            sqlx::query("UPDATE books SET goodreads_id = ?, goodreads_searched = 1 WHERE id = ?;")
                .bind(goodreads_id)
                .bind(book_id)
                .execute(&self.pool)
                .await
                .map_err(|error| integrity_error(error, goodreads_id))?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::BookNotFound(book_id));
        }
        Ok(())
    }

    /// # Errors
    /// Returns `BookNotFound` for an unknown book.
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn set_hidden(&self, book_id: i64, hidden: bool) -> Result<(), CatalogError> {
        self.set_flag("hidden", book_id, hidden).await
    }

    /// # Errors
    /// Returns `BookNotFound` for an unknown book.
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn set_recommended(
        &self,
        book_id: i64,
        recommended: bool,
    ) -> Result<(), CatalogError> {
        self.set_flag("recommended", book_id, recommended).await
    }

    async fn set_flag(
        &self,
        column: &'static str,
        book_id: i64,
        value: bool,
    ) -> Result<(), CatalogError> {
        let statement = format!("UPDATE books SET {column} = ? WHERE id = ?;");
        let result = sqlx::query(&statement)
            .bind(value)
            .bind(book_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::BookNotFound(book_id));
        }
        Ok(())
    }
}

/// Percentages are rounded per star, so their sum may drift from 100 by a few points.
const PERCENTAGE_SUM_RANGE: core::ops::RangeInclusive<i64> = 95..=105;

/// Checks that rating counts and star percentages are non-negative, and that all five
/// percentages add up to about 100 when every one of them is known.
fn validate_ratings(record: &NewGoodreads) -> Result<(), CatalogError> {
    if let Some(count) = record.ratings_count.filter(|count| *count < 0) {
        return Err(CatalogError::InvalidRatings(format!(
            "negative ratings count {count}"
        )));
    }
    for (stars, (count, percentage)) in (1..=5).zip(
        record
            .star_counts
            .iter()
            .zip(record.star_percentages.iter()),
    ) {
        if let Some(count) = count.filter(|count| *count < 0) {
            return Err(CatalogError::InvalidRatings(format!(
                "negative count {count} for {stars} stars"
            )));
        }
        if let Some(percentage) = percentage.filter(|percentage| *percentage < 0) {
            return Err(CatalogError::InvalidRatings(format!(
                "negative percentage {percentage} for {stars} stars"
            )));
        }
    }

    let percentages: Option<Vec<i64>> = record.star_percentages.iter().copied().collect();
    if let Some(percentages) = percentages {
        let sum: i64 = percentages.iter().sum();
        if !PERCENTAGE_SUM_RANGE.contains(&sum) {
            return Err(CatalogError::InvalidRatings(format!(
                "star percentages sum to {sum}"
            )));
        }
    }
    Ok(())
}

/// Maps a foreign key failure to `ReferentialIntegrityViolation`, anything else stays a database
/// error.
fn integrity_error(error: sqlx::Error, goodreads_id: Option<i64>) -> CatalogError {
    match goodreads_id {
        Some(goodreads_id) if is_sqlite_foreign_key_violation(&error) => {
            log::warn!("Rejected reference to missing goodreads record {goodreads_id}");
            CatalogError::ReferentialIntegrityViolation { goodreads_id }
        }
        _ => CatalogError::Db(error),
    }
}

#[allow(
    clippy::pattern_type_mismatch,
    reason = "False positive, this is the idiomatic pattern"
)]
fn is_sqlite_unique_violation(error: &sqlx::Error) -> bool {
    // Check for unique violation by searching for matching text in error message
    if let sqlx::Error::Database(db_err) = error {
        db_err.message().contains("UNIQUE constraint failed")
    } else {
        false
    }
}

#[allow(
    clippy::pattern_type_mismatch,
    reason = "False positive, this is the idiomatic pattern"
)]
fn is_sqlite_foreign_key_violation(error: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = error {
        db_err.message().contains("FOREIGN KEY constraint failed")
    } else {
        false
    }
}
