use crate::errors::Error;
use bookshelf_core::{BookRecord, Db, GoodreadsRecord, RatingBucket};
use chrono::{DateTime, Local};
use core::fmt::Write as _;
use serde::Serialize;
use tracing::instrument;

/// Everything `show --json` prints for one book
#[derive(Serialize)]
struct BookView<'book> {
    book: &'book BookRecord,
    display_name: String,
    post_date_relative: String,
    date_added: DateTime<Local>,
    goodreads: Option<GoodreadsView<'book>>,
}

#[derive(Serialize)]
struct GoodreadsView<'book> {
    record: &'book GoodreadsRecord,
    display_name: String,
    rating_distribution: Option<Vec<RatingBucket>>,
}

/// One line per book: time since posting, display name and categories. Recommended books are
/// marked with `*`.
#[instrument(name = "cmd.list", skip(db))]
pub async fn list_books(db: &Db, include_hidden: bool) -> Result<Vec<String>, Error> {
    let books = db.fetch_books(include_hidden).await?;
    tracing::info!(count = books.len(), "books fetched");

    Ok(books.iter().map(list_line).collect())
}

fn list_line(book: &BookRecord) -> String {
    let mut line = format!("{:>4}  {}", book.post_date_relative(), book.display_name());
    if book.recommended {
        line.push_str(" *");
    }
    if book.hidden {
        line.push_str(" (hidden)");
    }
    if !book.category_list().is_empty() {
        line.push_str(" [");
        line.push_str(&book.category_text());
        line.push(']');
    }
    line
}

/// Renders a single book together with its Goodreads metadata.
#[instrument(name = "cmd.show", skip(db))]
pub async fn show_book(db: &Db, url: &str, json: bool) -> Result<String, Error> {
    let Some(book) = db.fetch_book_by_url(url).await? else {
        tracing::warn!("book not found");
        return Err(Error::UnknownBook(url.to_owned()));
    };
    let goodreads = db.fetch_goodreads_for_book(&book).await?;

    if json {
        let view = BookView {
            book: &book,
            display_name: book.display_name(),
            post_date_relative: book.post_date_relative(),
            date_added: book.date_added(),
            goodreads: goodreads.as_ref().map(|record| GoodreadsView {
                record,
                display_name: record.display_name(),
                rating_distribution: record.rating_distribution(),
            }),
        };
        return Ok(serde_json::to_string_pretty(&view)?);
    }

    Ok(render_book(&book, goodreads.as_ref()))
}

#[allow(clippy::unwrap_used, reason = "Writing to a String cannot fail")]
fn render_book(book: &BookRecord, goodreads: Option<&GoodreadsRecord>) -> String {
    let mut out = book.title_author(false);
    writeln!(out).unwrap();
    writeln!(out, "  url:      {}", book.url).unwrap();
    writeln!(
        out,
        "  posted:   {} ({} ago)",
        book.post_date,
        book.post_date_relative()
    )
    .unwrap();
    writeln!(
        out,
        "  added:    {}",
        book.date_added().format("%Y-%m-%d %H:%M %:z")
    )
    .unwrap();
    if let Some(format) = &book.file_format {
        writeln!(out, "  format:   {format}").unwrap();
    }
    if let Some(language) = &book.language {
        writeln!(out, "  language: {language}").unwrap();
    }
    if !book.category_list().is_empty() {
        writeln!(out, "  category: {}", book.category_text()).unwrap();
    }
    if !book.keyword_list().is_empty() {
        writeln!(out, "  keywords: {}", book.keyword_text()).unwrap();
    }

    match goodreads {
        Some(record) => {
            writeln!(out, "  goodreads: {}", record.display_name()).unwrap();
            if let Some(rating) = record.average_rating {
                writeln!(out, "    average rating: {rating:.2}").unwrap();
            }
            for bucket in record.rating_distribution().unwrap_or_default() {
                writeln!(
                    out,
                    "    {}: {} ({}%)",
                    bucket.label,
                    bucket.count.unwrap_or_default(),
                    bucket.percentage.unwrap_or_default()
                )
                .unwrap();
            }
            if !record.isbn_list().is_empty() {
                writeln!(out, "    isbns: {}", record.isbn_list().join(", ")).unwrap();
            }
        }
        None if book.goodreads_searched => writeln!(out, "  goodreads: no match").unwrap(),
        None => writeln!(out, "  goodreads: not searched yet").unwrap(),
    }

    out.trim_end().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookshelf_core::{NewBook, NewGoodreads};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    async fn catalog() -> Db {
        let db = Db::init_in_memory().await.unwrap();

        let mut goodreads = NewGoodreads::default();
        goodreads.title = Some(String::from("The Final Empire"));
        goodreads.author = Some(String::from("Brandon Sanderson"));
        goodreads.average_rating = Some(4.47);
        goodreads.ratings_count = Some(1000);
        goodreads.isbns = vec![String::from("0765311798")];
        goodreads.star_counts = [Some(10), Some(20), Some(70), Some(300), Some(600)];
        goodreads.star_percentages = [Some(1), Some(2), Some(7), Some(30), Some(60)];
        let goodreads_id = db.insert_goodreads(&goodreads).await.unwrap();

        let mut mistborn = NewBook::new(
            String::from("https://example.org/mistborn"),
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        );
        mistborn.title = Some(String::from("Mistborn: The Final Empire"));
        mistborn.author = Some(String::from("Brandon Sanderson"));
        mistborn.category = vec![String::from("Fantasy")];
        mistborn.recommended = true;
        mistborn.goodreads_id = Some(goodreads_id);
        mistborn.goodreads_searched = true;
        db.insert_book(&mistborn).await.unwrap();

        let mut hidden = NewBook::new(
            String::from("https://example.org/hidden"),
            NaiveDate::from_ymd_opt(2023, 1, 10).unwrap(),
        );
        hidden.title = Some(String::from("Spam"));
        hidden.hidden = true;
        db.insert_book(&hidden).await.unwrap();

        db
    }

    #[tokio::test]
    async fn test_list_skips_hidden() {
        let db = catalog().await;

        let lines = list_books(&db, false).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("Mistborn: The Final Empire by Brandon Sanderson * [Fantasy]"));

        let lines = list_books(&db, true).await.unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].ends_with("Spam by  (hidden)"));
    }

    #[tokio::test]
    async fn test_show_text() {
        let db = catalog().await;
        let text = show_book(&db, "https://example.org/mistborn", false)
            .await
            .unwrap();

        assert!(text.starts_with("Mistborn: The Final Empire - Brandon Sanderson\n"));
        assert!(text.contains("  category: Fantasy"));
        assert!(text.contains("  goodreads: The Final Empire by Brandon Sanderson"));
        assert!(text.contains("    5: 600 (60%)"));
        assert!(text.contains("    isbns: 0765311798"));

        let text = show_book(&db, "https://example.org/hidden", false)
            .await
            .unwrap();
        assert!(text.ends_with("  goodreads: not searched yet"));
    }

    #[tokio::test]
    async fn test_show_json() {
        let db = catalog().await;
        let json = show_book(&db, "https://example.org/mistborn", true)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["book"]["category"][0], "Fantasy");
        assert_eq!(value["goodreads"]["rating_distribution"][0]["label"], "5");
        assert_eq!(value["goodreads"]["rating_distribution"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_show_unknown_book() {
        let db = catalog().await;
        let err = show_book(&db, "https://example.org/missing", false)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnknownBook(url) if url == "https://example.org/missing"));
    }
}
