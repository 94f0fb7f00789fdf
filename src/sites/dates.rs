//! Date normalization for extracted records
//!
//! Publishers print dates in prose ("March 2023", "15 March 2023",
//! "Published: 2 February 2023"). The catalog expects months as `"1".."12"`
//! and article dates as `dd-mm-yyyy`.

use chrono::NaiveDate;

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Month number (1-12) of the first word of `text`
///
/// Accepts full or abbreviated English month names in any case, and bare
/// month numbers.
///
/// # Examples
///
/// ```
/// use catalog_crawler::sites::month_number;
///
/// assert_eq!(month_number("March 2023"), Some(3));
/// assert_eq!(month_number("sept."), Some(9));
/// assert_eq!(month_number("Spring 2023"), None);
/// ```
pub fn month_number(text: &str) -> Option<u32> {
    let word = text.split_whitespace().next()?;
    let word = word.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase();

    if let Ok(number) = word.parse::<u32>() {
        return (1..=12).contains(&number).then_some(number);
    }

    if word.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|month| word.starts_with(month))
        .map(|index| index as u32 + 1)
}

/// `month_number` as the catalog's string form; empty when unknown
pub fn month_published(text: &str) -> String {
    month_number(text)
        .map(|month| month.to_string())
        .unwrap_or_default()
}

/// Formats a printed date as `dd-mm-yyyy`
///
/// # Examples
///
/// ```
/// use catalog_crawler::sites::format_date;
///
/// assert_eq!(format_date("15 March 2023"), Some("15-03-2023".to_string()));
/// assert_eq!(format_date("Published: 2 Feb 2023"), Some("02-02-2023".to_string()));
/// assert_eq!(format_date("soon"), None);
/// ```
pub fn format_date(text: &str) -> Option<String> {
    const FORMATS: [&str; 5] = ["%d %B %Y", "%B %d, %Y", "%B %d %Y", "%Y-%m-%d", "%d/%m/%Y"];

    let cleaned = text.trim();
    let cleaned = cleaned
        .strip_prefix("Published:")
        .unwrap_or(cleaned)
        .trim()
        .trim_end_matches('.');

    FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(cleaned, format).ok())
        .map(|date| date.format("%d-%m-%Y").to_string())
}

/// The last four-digit year in `text`
pub fn last_year(text: &str) -> Option<i32> {
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|part| part.len() == 4)
        .filter_map(|part| part.parse().ok())
        .last()
}
