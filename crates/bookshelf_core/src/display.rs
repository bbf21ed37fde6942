//! Text helpers for presenting records
use chrono::{Datelike as _, NaiveDate};

/// Display width of a shortened title
pub const TITLE_WIDTH: usize = 30;
/// Display width of a shortened author name
pub const AUTHOR_WIDTH: usize = 20;
/// Appended to shortened text, counts towards the width
pub const PLACEHOLDER: &str = " [...]";

/// Collapses whitespace and shortens `text` to at most `width` characters.
///
/// Text that fits is returned with its whitespace collapsed. Otherwise whole words are kept from
/// the start as long as they fit together with [`PLACEHOLDER`]. Hyphenated words may be cut after
/// a hyphen, so "Marie-Antoinette" can be kept as "Marie-". If not even the first word fits, only
/// the placeholder itself is returned (without its leading space).
#[must_use]
#[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
pub fn shorten(text: &str, width: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let collapsed = words.join(" ");
    if collapsed.chars().count() <= width {
        return collapsed;
    }

    let budget = width.saturating_sub(PLACEHOLDER.chars().count());
    let mut kept = String::new();
    let mut kept_len = 0;
    'words: for word in words {
        for (index, chunk) in hyphen_chunks(word).into_iter().enumerate() {
            let separator = usize::from(index == 0 && !kept.is_empty());
            let chunk_len = chunk.chars().count();
            if kept_len + separator + chunk_len > budget {
                break 'words;
            }
            if separator == 1 {
                kept.push(' ');
            }
            kept.push_str(chunk);
            kept_len += separator + chunk_len;
        }
    }

    if kept.is_empty() {
        PLACEHOLDER.trim_start().to_owned()
    } else {
        kept + PLACEHOLDER
    }
}

/// Splits a word after every hyphen that has at least two letters or digits on either side, so
/// "Marie-Antoinette" breaks but "X-Men" does not.
fn hyphen_chunks(word: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = word.char_indices().collect();
    let alphanumeric = |range: core::ops::Range<usize>| {
        chars
            .get(range)
            .is_some_and(|run| run.iter().all(|&(_, letter)| letter.is_alphanumeric()))
    };

    let mut chunks = Vec::new();
    let mut start = 0;
    for (position, &(index, letter)) in chars.iter().enumerate() {
        if letter == '-'
            && position >= 2
            && alphanumeric(position - 2..position)
            && alphanumeric(position + 1..position + 3)
        {
            let end = index + letter.len_utf8();
            chunks.push(&word[start..end]);
            start = end;
        }
    }
    chunks.push(&word[start..]);
    chunks
}

/// Compact distance between two dates using the largest whole unit: `y`ears, `m`onths, `w`eeks
/// or `d`ays. The order of the dates does not matter.
#[must_use]
#[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
pub fn relative_date(date: NaiveDate, today: NaiveDate) -> String {
    let (earlier, later) = if date <= today {
        (date, today)
    } else {
        (today, date)
    };

    let mut months = (later.year() - earlier.year()) * 12 + later.month0() as i32
        - earlier.month0() as i32;
    if later.day() < earlier.day() {
        months -= 1;
    }

    if months >= 12 {
        format!("{}y", months / 12)
    } else if months >= 1 {
        format!("{months}m")
    } else {
        let days = (later - earlier).num_days();
        if days >= 7 {
            format!("{}w", days / 7)
        } else {
            format!("{days}d")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_shorten_keeps_short_text() {
        assert_eq!(shorten("The Hobbit", TITLE_WIDTH), "The Hobbit");
        assert_eq!(shorten("  The   Hobbit ", TITLE_WIDTH), "The Hobbit");
        assert_eq!(shorten("", TITLE_WIDTH), "");
    }

    #[test]
    fn test_shorten_cuts_at_word_boundary() {
        let titles = [
            "The Great Gatsby and Other Stories of Excess",
            "An Echo of Things to Come and Other Tales",
            "I Am Not A Serial Killer: A Novel of the Cleaver Square",
        ];

        let results: Vec<String> = titles
            .iter()
            .map(|title| shorten(title, TITLE_WIDTH))
            .collect();

        let expected = vec![
            String::from("The Great Gatsby and [...]"),
            String::from("An Echo of Things to [...]"),
            String::from("I Am Not A Serial [...]"),
        ];

        assert_eq!(results, expected);
        for result in results {
            assert!(result.chars().count() <= TITLE_WIDTH);
        }
    }

    #[test]
    fn test_shorten_long_first_word() {
        assert_eq!(shorten("Supercalifragilisticexpialidocious", 20), "[...]");
        // hyphenated words may be cut after the hyphen
        assert_eq!(shorten("Marie-Antoinette of Austria", 20), "Marie- [...]");
        assert_eq!(shorten("Spider-Man and the X-Men", 20), "Spider-Man and [...]");
        assert_eq!(shorten("X-Men and the Spider-Man", 20), "X-Men and the [...]");
    }

    #[test]
    fn test_shorten_counts_characters() {
        // 21 characters, but more bytes
        assert_eq!(shorten("Ærø Ærø Ærø Ærø Ærø Æ", AUTHOR_WIDTH), "Ærø Ærø Ærø [...]");
        assert_eq!(shorten("Ærø Ærø Ærø Ærø Ærø", AUTHOR_WIDTH), "Ærø Ærø Ærø Ærø Ærø");
    }

    #[test]
    fn test_relative_days_and_weeks() {
        let today = date(2024, 3, 20);
        assert_eq!(relative_date(today, today), "0d");
        assert_eq!(relative_date(date(2024, 3, 17), today), "3d");
        assert_eq!(relative_date(date(2024, 3, 13), today), "1w");
        assert_eq!(relative_date(date(2024, 3, 6), today), "2w");
    }

    #[test]
    fn test_relative_months_and_years() {
        let today = date(2024, 3, 20);
        assert_eq!(relative_date(date(2024, 2, 20), today), "1m");
        assert_eq!(relative_date(date(2023, 9, 1), today), "6m");
        assert_eq!(relative_date(date(2023, 3, 20), today), "1y");
        assert_eq!(relative_date(date(2021, 3, 21), today), "2y");
    }

    #[test]
    fn test_relative_partial_month() {
        // 28 days, not yet a full calendar month
        assert_eq!(relative_date(date(2024, 1, 31), date(2024, 2, 28)), "4w");
    }

    #[test]
    fn test_relative_future_date() {
        assert_eq!(relative_date(date(2024, 3, 23), date(2024, 3, 20)), "3d");
    }
}
