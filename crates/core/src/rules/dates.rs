//! Date presence checks. Dates are never range checked.

use rrf_types::{Field, ParsedDate};

use crate::identity::Identity;
use crate::{IssueKind, ValidationResult};

/// Report a date that must be supplied but is empty.
pub fn validate_date(
    identity: &Identity,
    field: &str,
    date: &Field<ParsedDate>,
    result: &mut ValidationResult,
) {
    if let Field::Present(date) = date {
        if date.is_empty() {
            result.add_error(
                IssueKind::MissingField,
                format!("Empty (or missing) '{field}' value for individual {identity}"),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn empty_mandatory_date_is_reported() {
        let mut result = ValidationResult::new();
        let identity = Identity::of_guid(Some("g-1"));
        validate_date(&identity, "DateofBirth", &Field::mandatory_date(None), &mut result);
        assert_eq!(
            result.error_messages(),
            vec!["Empty (or missing) 'DateofBirth' value for individual g-1"]
        );
    }

    #[test]
    fn supplied_or_optional_dates_pass() {
        let mut result = ValidationResult::new();
        let identity = Identity::of_guid(Some("g-1"));
        let date = NaiveDate::from_ymd_opt(1890, 1, 1);
        validate_date(&identity, "ArrivalDate", &Field::mandatory_date(date), &mut result);
        validate_date(&identity, "ArrivalDate", &Field::optional_date(None), &mut result);
        assert!(result.is_success());
    }
}
