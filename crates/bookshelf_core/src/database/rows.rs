//! Raw table rows and their conversion into records.
//!
//! Rows mirror the columns exactly as they are stored. Serialized list columns are decoded here,
//! so that no JSON text leaves the data-access layer.
use crate::database::errors::CatalogError;
use crate::database::types::{BookRecord, GoodreadsRecord};
use chrono::{DateTime, NaiveDate};

#[derive(Debug, sqlx::FromRow)]
pub struct GoodreadsRow {
    id: i64,
    author: Option<String>,
    average_rating: Option<f64>,
    best_book_id: Option<String>,
    description: Option<String>,
    goodreads_id: Option<String>,
    image_url: Option<String>,
    image_url2: Option<String>,
    ratings_count: Option<i64>,
    title: Option<String>,
    url: Option<String>,
    publication_year: Option<i64>,
    num_pages: Option<i64>,
    isbns: Option<String>,
    ratings_count5: Option<i64>,
    ratings_count4: Option<i64>,
    ratings_count3: Option<i64>,
    ratings_count2: Option<i64>,
    ratings_count1: Option<i64>,
    ratings_count5_pct: Option<i64>,
    ratings_count4_pct: Option<i64>,
    ratings_count3_pct: Option<i64>,
    ratings_count2_pct: Option<i64>,
    ratings_count1_pct: Option<i64>,
}

impl TryFrom<GoodreadsRow> for GoodreadsRecord {
    type Error = CatalogError;

    fn try_from(row: GoodreadsRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            author: row.author,
            average_rating: row.average_rating,
            best_book_id: row.best_book_id,
            description: row.description,
            external_id: row.goodreads_id,
            image_url: row.image_url,
            secondary_image_url: row.image_url2,
            ratings_count: row.ratings_count,
            title: row.title,
            url: row.url,
            publication_year: row.publication_year,
            page_count: row.num_pages,
            isbns: decode_list("isbns", row.isbns.as_deref())?,
            star_counts: [
                row.ratings_count1,
                row.ratings_count2,
                row.ratings_count3,
                row.ratings_count4,
                row.ratings_count5,
            ],
            star_percentages: [
                row.ratings_count1_pct,
                row.ratings_count2_pct,
                row.ratings_count3_pct,
                row.ratings_count4_pct,
                row.ratings_count5_pct,
            ],
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct BookRow {
    id: i64,
    goodreads_id: Option<i64>,
    author: Option<String>,
    best_image: Option<String>,
    category_str: Option<String>,
    file_format: Option<String>,
    goodreads_searched: Option<i64>,
    hidden: Option<i64>,
    image_url: Option<String>,
    keywords_str: Option<String>,
    language: Option<String>,
    post_date: NaiveDate,
    post_title: Option<String>,
    recommended: Option<i64>,
    timestamp: i64,
    title: Option<String>,
    url: String,
}

impl TryFrom<BookRow> for BookRecord {
    type Error = CatalogError;

    fn try_from(row: BookRow) -> Result<Self, Self::Error> {
        let timestamp = DateTime::from_timestamp(row.timestamp, 0)
            .ok_or(CatalogError::InvalidTimestamp(row.timestamp))?;

        Ok(Self {
            id: row.id,
            goodreads_id: row.goodreads_id,
            author: row.author,
            best_image: row.best_image,
            category: decode_list("category_str", row.category_str.as_deref())?,
            file_format: row.file_format,
            goodreads_searched: is_set(row.goodreads_searched),
            hidden: is_set(row.hidden),
            image_url: row.image_url,
            keywords: decode_list("keywords_str", row.keywords_str.as_deref())?,
            language: row.language,
            post_date: row.post_date,
            post_title: row.post_title,
            recommended: is_set(row.recommended),
            timestamp,
            title: row.title,
            url: row.url,
        })
    }
}

/// SQLite has no boolean type, flags are integers where anything but 0 or NULL is set.
fn is_set(flag: Option<i64>) -> bool {
    flag.is_some_and(|value| value != 0)
}

/// Decodes a JSON list column. NULL and blank text decode to an empty list.
///
/// # Errors
/// Returns `CatalogError::DataFormat` if the text is not a JSON array of strings.
pub fn decode_list(column: &'static str, raw: Option<&str>) -> Result<Vec<String>, CatalogError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Vec::new()),
        Some(text) => {
            serde_json::from_str(text).map_err(|source| CatalogError::DataFormat { column, source })
        }
    }
}

/// Encodes a list for a JSON list column. Empty lists are stored as NULL.
///
/// # Errors
/// Returns `CatalogError::DataFormat` if serialization fails.
pub fn encode_list(column: &'static str, values: &[String]) -> Result<Option<String>, CatalogError> {
    if values.is_empty() {
        return Ok(None);
    }
    serde_json::to_string(values)
        .map(Some)
        .map_err(|source| CatalogError::DataFormat { column, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_unset_list() {
        assert_eq!(decode_list("isbns", None).unwrap(), Vec::<String>::new());
        assert_eq!(decode_list("isbns", Some("  ")).unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_decode_list_keeps_order() {
        let isbns = decode_list("isbns", Some(r#"["0","1"]"#)).unwrap();
        assert_eq!(isbns, vec![String::from("0"), String::from("1")]);
    }

    #[test]
    fn test_decode_malformed_list() {
        let err = decode_list("keywords_str", Some("Fiction, Classic")).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::DataFormat {
                column: "keywords_str",
                ..
            }
        ));

        // valid JSON, but not a list of strings
        let err = decode_list("category_str", Some("[1, 2]")).unwrap_err();
        assert!(matches!(err, CatalogError::DataFormat { .. }));
    }

    #[test]
    fn test_encode_list() {
        assert_eq!(encode_list("isbns", &[]).unwrap(), None);
        let encoded = encode_list(
            "category_str",
            &[String::from("Fiction"), String::from("Classic")],
        )
        .unwrap();
        assert_eq!(encoded.as_deref(), Some(r#"["Fiction","Classic"]"#));
    }

    #[test]
    fn test_flags() {
        assert!(!is_set(None));
        assert!(!is_set(Some(0)));
        assert!(is_set(Some(1)));
    }
}
