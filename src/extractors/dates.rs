// src/extractors/dates.rs
use chrono::NaiveDate;

pub const PUBLISH_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a table cell as a `YYYY-MM-DD` date and returns it in ISO form.
///
/// Empty and free-text cells are common, so failure is `None` rather than
/// an error.
pub fn normalize_date(text: &str) -> Option<String> {
    match NaiveDate::parse_from_str(text, PUBLISH_DATE_FORMAT) {
        Ok(date) => Some(date.format("%Y-%m-%d").to_string()),
        Err(e) => {
            if !text.is_empty() {
                tracing::trace!("Unparsable date '{}': {}", text, e);
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_date_round_trips() {
        assert_eq!(normalize_date("2021-03-15").as_deref(), Some("2021-03-15"));
    }

    #[test]
    fn test_other_formats_are_null() {
        assert_eq!(normalize_date("15/03/2021"), None);
        assert_eq!(normalize_date("15.03.2021"), None);
        assert_eq!(normalize_date("in curs de avizare"), None);
        assert_eq!(normalize_date(""), None);
    }

    #[test]
    fn test_impossible_calendar_dates_are_null() {
        assert_eq!(normalize_date("2021-02-30"), None);
        assert_eq!(normalize_date("2021-13-01"), None);
    }

    #[test]
    fn test_trailing_text_is_rejected() {
        assert_eq!(normalize_date("2021-03-15 (prelungit)"), None);
    }
}
