//! Value wrappers shared by the case-file model and the validation engine.
//!
//! Case files mark some elements as mandatory and others as optional, and the validation
//! rules treat the two differently:
//! - a *mandatory* element is always checked, even when it is missing or blank, so that a
//!   missing value surfaces as an "Empty (or missing)" error;
//! - an *optional* element is only checked when it carries a non-blank value.
//!
//! [`Field`] captures that distinction explicitly instead of relying on nullable values.

use chrono::NaiveDate;

/// A field value as seen by the validation rules.
///
/// `Present` means the rule must run against the wrapped value. `Absent` means the field
/// does not apply to this record (not part of the schema version, or an optional element
/// left out of the document) and the rule is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Field<T> {
    /// The value takes part in validation.
    Present(T),
    /// The field is skipped.
    #[default]
    Absent,
}

impl<T> Field<T> {
    /// Returns the wrapped value if present.
    pub fn as_present(&self) -> Option<&T> {
        match self {
            Field::Present(value) => Some(value),
            Field::Absent => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Field::Present(_))
    }

    /// Maps the wrapped value, keeping `Absent` as is.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Field<U> {
        match self {
            Field::Present(value) => Field::Present(f(value)),
            Field::Absent => Field::Absent,
        }
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Field::Present(value),
            None => Field::Absent,
        }
    }
}

impl Field<String> {
    /// Wraps a mandatory text element.
    ///
    /// The field is always present; a missing element reads as an empty string so the
    /// blank check reports it.
    pub fn mandatory_text(value: Option<&str>) -> Self {
        Field::Present(value.unwrap_or_default().to_owned())
    }

    /// Wraps an optional text element.
    ///
    /// Missing or blank values are `Absent`.
    pub fn optional_text(value: Option<&str>) -> Self {
        match value {
            Some(text) if !is_blank(text) => Field::Present(text.to_owned()),
            _ => Field::Absent,
        }
    }
}

impl Field<ParsedDate> {
    /// Wraps a mandatory date element. A missing date is present-but-empty.
    pub fn mandatory_date(value: Option<NaiveDate>) -> Self {
        Field::Present(ParsedDate(value))
    }

    /// Wraps an optional date element. A missing date is `Absent`.
    pub fn optional_date(value: Option<NaiveDate>) -> Self {
        match value {
            Some(date) => Field::Present(ParsedDate(Some(date))),
            None => Field::Absent,
        }
    }
}

/// A date element after parsing: either a calendar date or empty.
///
/// Dates are never range-checked; validation only cares whether a value was supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParsedDate(pub Option<NaiveDate>);

impl ParsedDate {
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.0
    }
}

/// Returns `true` when the text is empty or whitespace only.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Returns `true` when the optional text is missing, empty, or whitespace only.
pub fn is_blank_opt(text: Option<&str>) -> bool {
    text.map_or(true, is_blank)
}

/// Trims an optional text value, keeping `None` as an empty string.
pub fn trimmed(text: Option<&str>) -> &str {
    text.map(str::trim).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mandatory_text_is_always_present() {
        assert_eq!(
            Field::mandatory_text(Some("Smith")),
            Field::Present("Smith".to_string())
        );
        assert_eq!(Field::mandatory_text(None), Field::Present(String::new()));
        assert_eq!(Field::mandatory_text(Some("  ")), Field::Present("  ".to_string()));
    }

    #[test]
    fn optional_text_drops_missing_and_blank_values() {
        assert_eq!(Field::optional_text(None), Field::Absent);
        assert_eq!(Field::optional_text(Some("")), Field::Absent);
        assert_eq!(Field::optional_text(Some(" \t")), Field::Absent);
        assert_eq!(
            Field::optional_text(Some("Jane")),
            Field::Present("Jane".to_string())
        );
    }

    #[test]
    fn mandatory_date_keeps_empty_dates_present() {
        let field = Field::mandatory_date(None);
        let parsed = field.as_present().expect("mandatory dates are present");
        assert!(parsed.is_empty());
    }

    #[test]
    fn optional_date_skips_missing_dates() {
        assert_eq!(Field::optional_date(None), Field::Absent);

        let date = NaiveDate::from_ymd_opt(2016, 3, 1).expect("valid date");
        let field = Field::optional_date(Some(date));
        assert_eq!(field.as_present().and_then(ParsedDate::date), Some(date));
    }

    #[test]
    fn blank_helpers() {
        assert!(is_blank(""));
        assert!(is_blank(" \n"));
        assert!(!is_blank(" a "));
        assert!(is_blank_opt(None));
        assert!(!is_blank_opt(Some("x")));
        assert_eq!(trimmed(Some("  100-16C00000  ")), "100-16C00000");
        assert_eq!(trimmed(None), "");
    }

    #[test]
    fn field_map_and_from_option() {
        let field: Field<u32> = Some(3).into();
        assert_eq!(field.map(|v| v * 2), Field::Present(6));

        let absent: Field<u32> = None.into();
        assert!(!absent.is_present());
    }
}
