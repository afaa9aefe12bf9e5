//! Primary applicant checks.

use rrf_types::ParsedDate;

use crate::constants::ADDRESS_TYPE_COA;
use crate::identity::Identity;
use crate::{IssueKind, ValidationResult};

/// Check that a case has exactly one primary applicant.
///
/// # Returns
///
/// The first primary applicant, used by the checks that depend on one.
pub fn validate_primary_applicants(
    applicants: &[Identity],
    result: &mut ValidationResult,
) -> Option<Identity> {
    if applicants.is_empty() {
        result.add_error(IssueKind::CardinalityViolation, "Missing Primary Applicant");
    }

    if applicants.len() > 1 {
        let ids = applicants
            .iter()
            .map(|identity| identity.to_string())
            .collect::<Vec<_>>()
            .join(",");
        result.add_error(
            IssueKind::CardinalityViolation,
            format!("More than one Primary Applicants: {ids}"),
        );
    }

    applicants.first().cloned()
}

/// The primary applicant must have a registration date and an arrival date.
pub fn validate_primary_applicant_dates(
    identity: &Identity,
    registration_date: ParsedDate,
    arrival_date: ParsedDate,
    result: &mut ValidationResult,
) {
    if registration_date.is_empty() {
        result.add_error(
            IssueKind::MissingField,
            format!("Empty (or missing) 'RegistrationDate' value for Primary Applicant {identity}"),
        );
    }
    if arrival_date.is_empty() {
        result.add_error(
            IssueKind::MissingField,
            format!("Empty (or missing) 'ArrivalDate' value for Primary Applicant {identity}"),
        );
    }
}

/// The primary applicant must have exactly one `COA` address.
///
/// `addresses` yields the owner and `AddressType` of every mapped address.
pub fn validate_coa_address<'a>(
    applicant: &Identity,
    addresses: impl IntoIterator<Item = (&'a Identity, Option<&'a str>)>,
    result: &mut ValidationResult,
) {
    let coa_count = addresses
        .into_iter()
        .filter(|(owner, address_type)| {
            *owner == applicant
                && address_type.is_some_and(|kind| kind.eq_ignore_ascii_case(ADDRESS_TYPE_COA))
        })
        .count();

    match coa_count {
        0 => result.add_error(
            IssueKind::CardinalityViolation,
            format!("No 'COA' addresses for Primary Applicant {applicant}"),
        ),
        1 => {}
        _ => result.add_error(
            IssueKind::CardinalityViolation,
            format!("Multiple 'COA' addresses for Primary Applicant {applicant}"),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn id(value: &str) -> Identity {
        Identity::of_id(Some(value))
    }

    #[test]
    fn single_applicant_is_returned() {
        let mut result = ValidationResult::new();
        let applicant = validate_primary_applicants(&[id("1")], &mut result);
        assert!(result.is_success());
        assert_eq!(applicant, Some(id("1")));
    }

    #[test]
    fn missing_applicant_is_reported() {
        let mut result = ValidationResult::new();
        assert_eq!(validate_primary_applicants(&[], &mut result), None);
        assert_eq!(result.error_messages(), vec!["Missing Primary Applicant"]);
    }

    #[test]
    fn several_applicants_are_listed_and_the_first_wins() {
        let mut result = ValidationResult::new();
        let applicant = validate_primary_applicants(&[id("4"), id("2")], &mut result);
        assert_eq!(applicant, Some(id("4")));
        assert_eq!(result.error_messages(), vec!["More than one Primary Applicants: 4,2"]);
    }

    #[test]
    fn applicant_dates_are_required() {
        let mut result = ValidationResult::new();
        let date = ParsedDate(NaiveDate::from_ymd_opt(2020, 5, 1));
        validate_primary_applicant_dates(&id("1"), date, ParsedDate(None), &mut result);
        assert_eq!(
            result.error_messages(),
            vec!["Empty (or missing) 'ArrivalDate' value for Primary Applicant 1"]
        );
    }

    #[test]
    fn coa_address_count_is_case_insensitive() {
        let applicant = id("1");
        let other = id("2");

        let mut result = ValidationResult::new();
        validate_coa_address(
            &applicant,
            [(&applicant, Some("coa")), (&other, Some("COA")), (&applicant, Some("TEL"))],
            &mut result,
        );
        assert!(result.is_success());

        validate_coa_address(&applicant, [(&other, Some("COA"))], &mut result);
        validate_coa_address(
            &applicant,
            [(&applicant, Some("COA")), (&applicant, Some("Coa"))],
            &mut result,
        );
        assert_eq!(
            result.error_messages(),
            vec![
                "No 'COA' addresses for Primary Applicant 1",
                "Multiple 'COA' addresses for Primary Applicant 1",
            ]
        );
    }
}
