//! Publication dates arrive in whatever shape the scraped site used. Everything
//! is rendered as `DD/MM/YYYY`; anything unrecognized is shown as-is.

use board_logging::{board_debug, board_warn};
use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, Utc};

const DISPLAY_FORMAT: &str = "%d/%m/%Y";

const FRENCH_MONTHS: &[(&str, u32)] = &[
    ("janvier", 1),
    ("février", 2),
    ("fevrier", 2),
    ("mars", 3),
    ("avril", 4),
    ("mai", 5),
    ("juin", 6),
    ("juillet", 7),
    ("août", 8),
    ("aout", 8),
    ("septembre", 9),
    ("octobre", 10),
    ("novembre", 11),
    ("décembre", 12),
    ("decembre", 12),
];

const FALLBACK_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%d.%m.%Y"];

/// Normalizes a raw publication date relative to `today`.
///
/// Rules are tried in order and the first match wins:
/// 1. already `DD/MM/YYYY`: returned unchanged
/// 2. contains `T`: ISO-8601 instant (or RFC 2822, whose day names may carry
///    a `T`), reformatted from its UTC date
/// 3. `il y a N jours`: `today - N` days
/// 4. `<day> <mois> <year>` with a French month name
/// 5. a handful of numeric layouts and RFC 2822
///
/// Never fails: unparseable input comes back untouched, empty input as `""`.
pub fn normalize_date(raw: Option<&str>, today: NaiveDate) -> String {
    let Some(raw) = raw else {
        return String::new();
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    if is_display_format(trimmed) {
        return trimmed.to_string();
    }

    if trimmed.contains('T') {
        return match parse_iso_instant(trimmed).or_else(|| parse_rfc2822(trimmed)) {
            Some(date) => format_date(date),
            None => {
                board_warn!("Unparseable timestamp {:?}, keeping raw value", raw);
                raw.to_string()
            }
        };
    }

    if let Some(days) = parse_days_ago(trimmed) {
        return match today.checked_sub_days(Days::new(days)) {
            Some(date) => format_date(date),
            None => {
                board_warn!("Relative date {:?} underflows, keeping raw value", raw);
                raw.to_string()
            }
        };
    }

    if let Some(date) = parse_french_long_date(trimmed) {
        return format_date(date);
    }

    match parse_fallback(trimmed) {
        Some(date) => format_date(date),
        None => {
            board_debug!("No date format matched {:?}", raw);
            raw.to_string()
        }
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

fn is_display_format(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes[2] == b'/'
        && bytes[5] == b'/'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 2 || i == 5 || b.is_ascii_digit())
}

fn parse_iso_instant(s: &str) -> Option<NaiveDate> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(s) {
        return Some(instant.with_timezone(&Utc).date_naive());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .ok()
        .map(|dt| dt.date())
}

/// Extracts `N` from "... il y a N jour(s) ...".
fn parse_days_ago(s: &str) -> Option<u64> {
    let lower = s.to_lowercase();
    let rest = &lower[lower.find("il y a")? + "il y a".len()..];
    let mut words = rest.split_whitespace();
    let count = words.next()?.parse::<u64>().ok()?;
    match words.next()? {
        "jour" | "jours" => Some(count),
        _ => None,
    }
}

fn parse_french_long_date(s: &str) -> Option<NaiveDate> {
    let lower = s.to_lowercase();
    let parts: Vec<&str> = lower.split_whitespace().collect();
    let [day, month, year] = parts.as_slice() else {
        return None;
    };
    let day = day.trim_end_matches("er").parse::<u32>().ok()?;
    let month = FRENCH_MONTHS
        .iter()
        .find(|(name, _)| name == month)
        .map(|(_, number)| *number)?;
    if year.len() != 4 {
        return None;
    }
    let year = year.parse::<i32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_fallback(s: &str) -> Option<NaiveDate> {
    FALLBACK_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
        .or_else(|| parse_rfc2822(s))
}

fn parse_rfc2822(s: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc2822(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_format_requires_digits_and_slashes() {
        assert!(is_display_format("01/02/2024"));
        assert!(!is_display_format("1/02/2024"));
        assert!(!is_display_format("01-02-2024"));
        assert!(!is_display_format("ab/cd/efgh"));
    }

    #[test]
    fn days_ago_accepts_singular_and_surrounding_text() {
        assert_eq!(parse_days_ago("il y a 1 jour"), Some(1));
        assert_eq!(parse_days_ago("Publié il y a 12 jours"), Some(12));
        assert_eq!(parse_days_ago("il y a 3 heures"), None);
        assert_eq!(parse_days_ago("il y a quelques jours"), None);
    }

    #[test]
    fn french_long_date_handles_first_of_month() {
        assert_eq!(
            parse_french_long_date("1er mars 2024"),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert_eq!(parse_french_long_date("31 février 2024"), None);
        assert_eq!(parse_french_long_date("12 december 2024"), None);
    }
}
