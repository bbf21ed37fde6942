//! Derived views over loaded records. Nothing in here touches the database.
use crate::database::types::{BookRecord, GoodreadsRecord, RatingBucket};
use crate::display::{AUTHOR_WIDTH, TITLE_WIDTH, relative_date, shorten};
use chrono::{DateTime, Local, NaiveDate};

const STAR_LABELS: [&str; 5] = ["1", "2", "3", "4", "5"];

/// Missing values shorten to empty strings rather than a "None" marker.
fn short_title_author(title: Option<&str>, author: Option<&str>) -> (String, String) {
    (
        shorten(title.unwrap_or_default(), TITLE_WIDTH),
        shorten(author.unwrap_or_default(), AUTHOR_WIDTH),
    )
}

impl GoodreadsRecord {
    #[must_use]
    #[inline]
    pub fn isbn_list(&self) -> &[String] {
        &self.isbns
    }

    /// Star ratings from five stars down to one. `None` if the book has no ratings.
    #[must_use]
    #[inline]
    pub fn rating_distribution(&self) -> Option<Vec<RatingBucket>> {
        if self.ratings_count.unwrap_or_default() == 0 {
            return None;
        }
        let distribution = STAR_LABELS
            .iter()
            .zip(self.star_counts.iter().zip(self.star_percentages.iter()))
            .rev()
            .map(|(label, (count, percentage))| RatingBucket::new(*label, *count, *percentage))
            .collect();
        Some(distribution)
    }

    /// "title by author", both shortened
    #[must_use]
    #[inline]
    pub fn display_name(&self) -> String {
        let (title, author) = short_title_author(self.title.as_deref(), self.author.as_deref());
        format!("{title} by {author}")
    }
}

impl BookRecord {
    /// "title by author", both shortened
    #[must_use]
    #[inline]
    pub fn display_name(&self) -> String {
        let (title, author) = short_title_author(self.title.as_deref(), self.author.as_deref());
        format!("{title} by {author}")
    }

    /// Time since the book was posted, e.g. "3d" or "2w"
    #[must_use]
    #[inline]
    pub fn post_date_relative(&self) -> String {
        self.post_date_relative_to(Local::now().date_naive())
    }

    #[must_use]
    #[inline]
    pub fn post_date_relative_to(&self, today: NaiveDate) -> String {
        relative_date(self.post_date, today)
    }

    /// When the book was added, in the local timezone
    #[must_use]
    #[inline]
    pub fn date_added(&self) -> DateTime<Local> {
        self.timestamp.with_timezone(&Local)
    }

    #[must_use]
    #[inline]
    pub fn keyword_list(&self) -> &[String] {
        &self.keywords
    }

    #[must_use]
    #[inline]
    pub fn category_list(&self) -> &[String] {
        &self.category
    }

    #[must_use]
    #[inline]
    pub fn keyword_text(&self) -> String {
        self.keywords.join(", ")
    }

    #[must_use]
    #[inline]
    pub fn category_text(&self) -> String {
        self.category.join(", ")
    }

    /// "title - author", shortened like `display_name` if `short` is set. Missing values are
    /// left empty.
    #[must_use]
    #[inline]
    pub fn title_author(&self, short: bool) -> String {
        let (title, author) = if short {
            short_title_author(self.title.as_deref(), self.author.as_deref())
        } else {
            (
                self.title.clone().unwrap_or_default(),
                self.author.clone().unwrap_or_default(),
            )
        };
        format!("{title} - {author}")
    }
}
