//! Relational mapping of case sections to people.
//!
//! Every dependent section (addresses, documents, languages, ...) references people by
//! identity. The mapper resolves those references against the people of the case and
//! enforces the cardinality of the section:
//! - *full coverage*: every person has at least one record;
//! - *one-to-one*: no person has more than one record.
//!
//! Records that fail to resolve, and people that violate one-to-one, are left out of the
//! returned [`Mapping`] so that later rules only see trustworthy pairs. A person left out
//! for breaking one-to-one still counts as covered.

use std::collections::HashSet;

use crate::identity::{validate_identity, Identity};
use crate::{CaseResult, IssueKind, ValidationResult};

/// Cardinality rules of one case section.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SectionRules {
    /// Section name used in messages (`DataAddress`).
    pub name: &'static str,
    pub require_full_coverage: bool,
    pub require_one_to_one: bool,
}

impl SectionRules {
    pub const fn new(
        name: &'static str,
        require_full_coverage: bool,
        require_one_to_one: bool,
    ) -> Self {
        Self {
            name,
            require_full_coverage,
            require_one_to_one,
        }
    }
}

/// Records of a section grouped by the person they belong to.
///
/// People appear in the order their first record appears in the document; each person's
/// records keep document order.
#[derive(Debug)]
pub struct Mapping<'a, T> {
    groups: Vec<(Identity, Vec<&'a T>)>,
}

impl<'a, T> Mapping<'a, T> {
    fn push(&mut self, identity: Identity, record: &'a T) {
        match self.groups.iter_mut().find(|(key, _)| *key == identity) {
            Some((_, records)) => records.push(record),
            None => self.groups.push((identity, vec![record])),
        }
    }

    /// `(identity, record)` pairs, grouped by person.
    pub fn iter(&self) -> impl Iterator<Item = (&Identity, &'a T)> + '_ {
        self.groups
            .iter()
            .flat_map(|(identity, records)| records.iter().map(move |record| (identity, *record)))
    }

    /// Mapped records, grouped by person.
    pub fn records(&self) -> impl Iterator<Item = &'a T> + '_ {
        self.iter().map(|(_, record)| record)
    }

    /// Records belonging to `identity`.
    pub fn records_for(&self, identity: &Identity) -> &[&'a T] {
        self.groups
            .iter()
            .find(|(key, _)| key == identity)
            .map(|(_, records)| records.as_slice())
            .unwrap_or_default()
    }

    pub fn contains(&self, identity: &Identity) -> bool {
        self.groups.iter().any(|(key, _)| key == identity)
    }

    /// Number of mapped records.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|(_, records)| records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Map the records of a section to the people of a case.
///
/// # Arguments
///
/// * `rules` - Name and cardinality of the section.
/// * `allowed` - Identities of the people in the case.
/// * `records` - The section's records, in document order.
/// * `identity_of` - Extracts the identity a record references.
/// * `result` - Receives one error per violation.
///
/// # Returns
///
/// The records that reference a known person, without the people that broke one-to-one.
///
/// # Errors
///
/// Returns a fatal error when a record carries a blank identity.
pub fn map_records_to_identities<'a, T>(
    rules: &SectionRules,
    allowed: &[Identity],
    records: &'a [T],
    identity_of: impl Fn(&T) -> Identity,
    result: &mut ValidationResult,
) -> CaseResult<Mapping<'a, T>> {
    let allowed_set: HashSet<&Identity> = allowed.iter().collect();
    let mut mapping = Mapping { groups: Vec::new() };

    for record in records {
        let identity = identity_of(record);
        validate_identity(rules.name, &identity)?;

        if !allowed_set.contains(&identity) {
            result.add_error(
                IssueKind::UnknownReference,
                format!(
                    "Object '{}' relates to non-existing individual {}",
                    rules.name, identity
                ),
            );
            continue;
        }
        mapping.push(identity, record);
    }

    let mapped: HashSet<Identity> = mapping
        .groups
        .iter()
        .map(|(identity, _)| identity.clone())
        .collect();

    if rules.require_one_to_one {
        for (identity, records) in &mapping.groups {
            if records.len() > 1 {
                result.add_error(
                    IssueKind::CardinalityViolation,
                    format!(
                        "More than one {} objects maps to the same individual {}",
                        rules.name, identity
                    ),
                );
            }
        }
        mapping.groups.retain(|(_, records)| records.len() == 1);
    }

    if rules.require_full_coverage {
        let mut missing: Vec<&Identity> = Vec::new();
        for identity in allowed {
            if !mapped.contains(identity) && !missing.contains(&identity) {
                missing.push(identity);
            }
        }

        if !missing.is_empty() {
            let names = missing
                .iter()
                .map(|identity| identity.to_string())
                .collect::<Vec<_>>()
                .join(",");
            result.add_error(
                IssueKind::CardinalityViolation,
                format!("None of {} objects maps to individual(s) {}", rules.name, names),
            );
        }
    }

    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FatalCaseError;

    #[derive(Debug)]
    struct Record {
        owner: &'static str,
        label: &'static str,
    }

    fn record(owner: &'static str, label: &'static str) -> Record {
        Record { owner, label }
    }

    fn people(values: &[&str]) -> Vec<Identity> {
        values.iter().map(|v| Identity::of_id(Some(*v))).collect()
    }

    fn owner(record: &Record) -> Identity {
        Identity::of_id(Some(record.owner))
    }

    #[test]
    fn unconstrained_section_keeps_every_known_record_grouped_by_person() {
        let allowed = people(&["1", "2"]);
        let records = vec![record("1", "a"), record("2", "c"), record("1", "b")];
        let mut result = ValidationResult::new();

        let rules = SectionRules::new("DataLanguage", false, false);
        let mapping = map_records_to_identities(&rules, &allowed, &records, owner, &mut result)
            .expect("no fatal error");

        assert!(result.is_success());
        let labels: Vec<_> = mapping.records().map(|r| r.label).collect();
        assert_eq!(labels, vec!["a", "b", "c"]);
        assert_eq!(mapping.records_for(&allowed[0]).len(), 2);
        assert!(mapping.records_for(&Identity::of_id(Some("9"))).is_empty());
    }

    #[test]
    fn unknown_person_is_reported_and_dropped() {
        let allowed = people(&["1"]);
        let records = vec![record("9", "x"), record("1", "a")];
        let mut result = ValidationResult::new();

        let rules = SectionRules::new("DataAlias", false, false);
        let mapping = map_records_to_identities(&rules, &allowed, &records, owner, &mut result)
            .expect("no fatal error");

        assert_eq!(
            result.error_messages(),
            vec!["Object 'DataAlias' relates to non-existing individual 9"]
        );
        assert_eq!(mapping.len(), 1);
    }

    #[test]
    fn one_to_one_violation_is_reported_once_and_excluded() {
        let allowed = people(&["1", "2"]);
        let records = vec![record("1", "a"), record("2", "b"), record("1", "c")];
        let mut result = ValidationResult::new();

        let rules = SectionRules::new("DataEducation", false, true);
        let mapping = map_records_to_identities(&rules, &allowed, &records, owner, &mut result)
            .expect("no fatal error");

        assert_eq!(
            result.error_messages(),
            vec!["More than one DataEducation objects maps to the same individual 1"]
        );
        assert!(!mapping.contains(&allowed[0]));
        assert!(mapping.contains(&allowed[1]));
    }

    #[test]
    fn multi_mapped_person_is_not_reported_as_uncovered() {
        let allowed = people(&["1", "2"]);
        let records = vec![record("1", "a"), record("1", "b"), record("2", "c")];
        let mut result = ValidationResult::new();

        let rules = SectionRules::new("DataIndividualProcessGroup", true, true);
        let mapping = map_records_to_identities(&rules, &allowed, &records, owner, &mut result)
            .expect("no fatal error");

        assert_eq!(
            result.error_messages(),
            vec!["More than one DataIndividualProcessGroup objects maps to the same individual 1"]
        );
        assert!(!mapping.contains(&allowed[0]));
        assert_eq!(mapping.records_for(&allowed[1]).len(), 1);
    }

    #[test]
    fn full_coverage_lists_uncovered_people() {
        let allowed = people(&["1", "2", "3"]);
        let records = vec![record("2", "a")];
        let mut result = ValidationResult::new();

        let rules = SectionRules::new("DataIndividual", true, false);
        map_records_to_identities(&rules, &allowed, &records, owner, &mut result)
            .expect("no fatal error");

        assert_eq!(
            result.error_messages(),
            vec!["None of DataIndividual objects maps to individual(s) 1,3"]
        );
    }

    #[test]
    fn full_coverage_with_one_uncovered_person_is_one_error() {
        let allowed = people(&["1", "2"]);
        let records = vec![record("1", "a")];
        let mut result = ValidationResult::new();

        let rules = SectionRules::new("DataIndividualProcessGroup", true, true);
        map_records_to_identities(&rules, &allowed, &records, owner, &mut result)
            .expect("no fatal error");

        assert_eq!(result.errors().len(), 1);
        assert!(result.error_messages()[0].ends_with("individual(s) 2"));
    }

    #[test]
    fn blank_record_identity_is_fatal() {
        let allowed = people(&["1"]);
        let records = vec![record(" ", "a")];
        let mut result = ValidationResult::new();

        let rules = SectionRules::new("DataAddress", false, false);
        let err = map_records_to_identities(&rules, &allowed, &records, owner, &mut result)
            .expect_err("blank identity should be fatal");
        assert!(matches!(err, FatalCaseError::BlankIdentity { ref section, .. } if section == "DataAddress"));
    }
}
