//! `xs:date` element parsing.
//!
//! Case files write dates as `YYYY-MM-DD`, sometimes followed by a zone designator or a
//! time part (`2016-03-01Z`, `2016-03-01T00:00:00`). Only the calendar date is kept. An
//! empty element reads as no date.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_LEN: usize = 10;

pub(crate) fn parse_date(text: &str) -> Result<Option<NaiveDate>, String> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let head = text.get(..DATE_LEN).unwrap_or(text);
    NaiveDate::parse_from_str(head, DATE_FORMAT)
        .map(Some)
        .map_err(|err| format!("invalid date '{text}': {err}"))
}

/// `deserialize_with` target for optional date elements. Pair with `#[serde(default)]`.
pub(crate) fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = Option::<String>::deserialize(deserializer)?;
    match text {
        Some(text) => parse_date(&text).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn plain_and_decorated_dates_parse() {
        assert_eq!(parse_date("2016-03-01"), Ok(Some(ymd(2016, 3, 1))));
        assert_eq!(parse_date(" 2016-03-01Z "), Ok(Some(ymd(2016, 3, 1))));
        assert_eq!(parse_date("2016-03-01T10:00:00"), Ok(Some(ymd(2016, 3, 1))));
        assert_eq!(parse_date("2016-03-01+02:00"), Ok(Some(ymd(2016, 3, 1))));
    }

    #[test]
    fn blank_text_is_no_date() {
        assert_eq!(parse_date(""), Ok(None));
        assert_eq!(parse_date("   "), Ok(None));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_date("01/03/2016").is_err());
        assert!(parse_date("2016-13-01").is_err());
        assert!(parse_date("2016").is_err());
    }
}
