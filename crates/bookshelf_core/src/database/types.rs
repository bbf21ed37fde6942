use chrono::{DateTime, NaiveDate, SubsecRound as _, Utc};
use serde::{Deserialize, Serialize};

/// Goodreads metadata for one book edition, as stored in the `goodreads` table.
///
/// Star ratings are kept as two arrays indexed by `stars - 1`, so index 0 holds the one-star
/// values and index 4 the five-star values.
#[non_exhaustive]
#[derive(Serialize, Debug, Deserialize, Clone, PartialEq)]
pub struct GoodreadsRecord {
    pub id: i64,
    pub author: Option<String>,
    pub average_rating: Option<f64>,
    pub best_book_id: Option<String>,
    pub description: Option<String>,
    /// The ID Goodreads itself uses for this edition
    pub external_id: Option<String>,
    pub image_url: Option<String>,
    pub secondary_image_url: Option<String>,
    pub ratings_count: Option<i64>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub publication_year: Option<i64>,
    pub page_count: Option<i64>,
    pub isbns: Vec<String>,
    pub star_counts: [Option<i64>; 5],
    pub star_percentages: [Option<i64>; 5],
}

/// A single cataloged book, as stored in the `books` table.
#[non_exhaustive]
#[derive(Serialize, Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct BookRecord {
    pub id: i64,
    /// Row ID of the matching Goodreads record, `None` while no match has been found
    pub goodreads_id: Option<i64>,
    pub author: Option<String>,
    pub best_image: Option<String>,
    pub category: Vec<String>,
    pub file_format: Option<String>,
    /// Whether a Goodreads lookup has been attempted for this book
    pub goodreads_searched: bool,
    pub hidden: bool,
    pub image_url: Option<String>,
    pub keywords: Vec<String>,
    pub language: Option<String>,
    pub post_date: NaiveDate,
    pub post_title: Option<String>,
    pub recommended: bool,
    /// When the book was added to the catalog
    pub timestamp: DateTime<Utc>,
    pub title: Option<String>,
    pub url: String,
}

/// One row of a rating distribution: the star label, the raw count and the percentage of all
/// ratings.
#[non_exhaustive]
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingBucket {
    pub label: &'static str,
    pub count: Option<i64>,
    pub percentage: Option<i64>,
}

impl RatingBucket {
    #[must_use]
    #[inline]
    pub const fn new(label: &'static str, count: Option<i64>, percentage: Option<i64>) -> Self {
        Self {
            label,
            count,
            percentage,
        }
    }
}

/// Goodreads metadata that has not been stored yet. Every field is optional.
#[non_exhaustive]
#[derive(Serialize, Debug, Deserialize, Clone, Default, PartialEq)]
pub struct NewGoodreads {
    pub author: Option<String>,
    pub average_rating: Option<f64>,
    pub best_book_id: Option<String>,
    pub description: Option<String>,
    pub external_id: Option<String>,
    pub image_url: Option<String>,
    pub secondary_image_url: Option<String>,
    pub ratings_count: Option<i64>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub publication_year: Option<i64>,
    pub page_count: Option<i64>,
    pub isbns: Vec<String>,
    pub star_counts: [Option<i64>; 5],
    pub star_percentages: [Option<i64>; 5],
}

/// A book that has not been stored yet.
#[non_exhaustive]
#[derive(Serialize, Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub goodreads_id: Option<i64>,
    pub author: Option<String>,
    pub best_image: Option<String>,
    pub category: Vec<String>,
    pub file_format: Option<String>,
    pub goodreads_searched: bool,
    pub hidden: bool,
    pub image_url: Option<String>,
    pub keywords: Vec<String>,
    pub language: Option<String>,
    pub post_date: NaiveDate,
    pub post_title: Option<String>,
    pub recommended: bool,
    pub timestamp: DateTime<Utc>,
    pub title: Option<String>,
    pub url: String,
}

impl NewBook {
    /// Creates a book with only the required fields set. The timestamp is the current instant,
    /// truncated to whole seconds since that is the resolution of the `timestamp` column.
    #[must_use]
    #[inline]
    pub fn new(url: String, post_date: NaiveDate) -> Self {
        Self {
            goodreads_id: None,
            author: None,
            best_image: None,
            category: Vec::new(),
            file_format: None,
            goodreads_searched: false,
            hidden: false,
            image_url: None,
            keywords: Vec::new(),
            language: None,
            post_date,
            post_title: None,
            recommended: false,
            timestamp: Utc::now().trunc_subsecs(0),
            title: None,
            url,
        }
    }
}
