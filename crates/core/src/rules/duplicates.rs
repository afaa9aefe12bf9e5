//! Uniqueness checks.
//!
//! Repeated values are reported once, in sorted order, so that messages are stable between
//! runs. Absent values take no part in the comparison; callers decide whether values are
//! compared raw or trimmed.

use std::collections::BTreeMap;

use crate::identity::Identity;
use crate::{IssueKind, ValidationResult};

/// Values that occur more than once, sorted and without repeats.
pub fn find_duplicates<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|&(_, count)| count > 1)
        .map(|(value, _)| value)
        .collect()
}

/// Record `Duplicated '{object}'(s): {values}` when any value repeats.
pub fn validate_no_duplicates<'a>(
    object: &str,
    values: impl IntoIterator<Item = Option<&'a str>>,
    result: &mut ValidationResult,
) {
    let duplicates = find_duplicates(values.into_iter().flatten());
    if !duplicates.is_empty() {
        result.add_error(
            IssueKind::DuplicateValue,
            format!("Duplicated '{object}'(s): {}", duplicates.join(",")),
        );
    }
}

/// Uniqueness per person: values are grouped by identity (in order of first appearance)
/// and each group is checked on its own.
pub fn validate_no_duplicates_per_individual<'a>(
    object: &str,
    values: impl IntoIterator<Item = (&'a Identity, Option<&'a str>)>,
    result: &mut ValidationResult,
) {
    let mut groups: Vec<(&Identity, Vec<&str>)> = Vec::new();
    for (identity, value) in values {
        let Some(value) = value else { continue };
        match groups.iter_mut().find(|(key, _)| *key == identity) {
            Some((_, group)) => group.push(value),
            None => groups.push((identity, vec![value])),
        }
    }

    for (identity, group) in groups {
        let duplicates = find_duplicates(group);
        if !duplicates.is_empty() {
            result.add_error(
                IssueKind::DuplicateValue,
                format!(
                    "Duplicated '{object}'(s) for individual {identity}: {}",
                    duplicates.join(",")
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_duplicates_is_sorted_and_distinct() {
        assert_eq!(find_duplicates(["z", "a", "z", "a", "z", "m"]), vec!["a", "z"]);
        assert!(find_duplicates(["a", "b"]).is_empty());
        assert!(find_duplicates(Vec::<&str>::new()).is_empty());
    }

    #[test]
    fn global_duplicates_produce_one_error() {
        let mut result = ValidationResult::new();
        validate_no_duplicates(
            "DataAlias.AliasGUID",
            [Some("g1"), Some("g2"), Some("g1"), None, None],
            &mut result,
        );
        assert_eq!(result.error_messages(), vec!["Duplicated 'DataAlias.AliasGUID'(s): g1"]);
    }

    #[test]
    fn absent_values_are_not_duplicates() {
        let mut result = ValidationResult::new();
        validate_no_duplicates("DataEducation.EducationGUID", [None, None, Some("x")], &mut result);
        assert!(result.is_success());
    }

    #[test]
    fn per_individual_duplicates_are_grouped() {
        let first = Identity::of_guid(Some("p1"));
        let second = Identity::of_guid(Some("p2"));
        let mut result = ValidationResult::new();

        validate_no_duplicates_per_individual(
            "DataVulnerability.VulnerabilityCode",
            [
                (&first, Some("SM")),
                (&second, Some("SM")),
                (&first, Some("SM")),
                (&second, Some("DS")),
            ],
            &mut result,
        );

        assert_eq!(
            result.error_messages(),
            vec!["Duplicated 'DataVulnerability.VulnerabilityCode'(s) for individual p1: SM"]
        );
    }
}
