//! Person identity within a case.
//!
//! Version 3 files key people by `IndividualID`, version 4 by `IndividualGUID`. Every
//! dependent record carries the key of the person it belongs to, and the mapper compares
//! those keys by exact string equality.

use std::fmt;

use crate::constants::BLANK_IDENTITY;
use crate::rules::duplicates::find_duplicates;
use crate::{CaseResult, FatalCaseError, IssueKind, ValidationResult};

/// Canonical key of a person.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Identity {
    /// `IndividualID` (version 3).
    Id(String),
    /// `IndividualGUID` (version 4).
    Guid(String),
}

impl Identity {
    /// Identity from an `IndividualID` element. A missing element is an empty id.
    pub fn of_id(value: Option<&str>) -> Self {
        Identity::Id(value.unwrap_or_default().to_owned())
    }

    /// Identity from an `IndividualGUID` element. A missing element is an empty guid.
    pub fn of_guid(value: Option<&str>) -> Self {
        Identity::Guid(value.unwrap_or_default().to_owned())
    }

    /// The raw key.
    pub fn value(&self) -> &str {
        match self {
            Identity::Id(value) | Identity::Guid(value) => value,
        }
    }

    /// The key as shown in messages, or `[BLANK]` when there is none.
    pub fn identity(&self) -> &str {
        let value = self.value();
        if value.is_empty() {
            BLANK_IDENTITY
        } else {
            value
        }
    }

    pub fn is_blank(&self) -> bool {
        rrf_types::is_blank(self.value())
    }

    fn field_name(&self) -> &'static str {
        match self {
            Identity::Id(_) => "IndividualID",
            Identity::Guid(_) => "IndividualGUID",
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identity())
    }
}

/// Reject a blank identity on a record of `section`.
///
/// # Errors
///
/// Returns [`FatalCaseError::BlankIdentity`] naming the section and the key field.
pub fn validate_identity(section: &str, identity: &Identity) -> CaseResult<()> {
    if identity.is_blank() {
        return Err(FatalCaseError::BlankIdentity {
            section: section.to_string(),
            field: identity.field_name(),
        });
    }
    Ok(())
}

/// Validate the identities of the people in a case.
///
/// Each identity must be non-blank (fatal). Repeated keys are recorded as one error per
/// kind naming every repeated value in sorted order, and evaluation continues.
pub fn validate_identity_set(
    section: &str,
    identities: &[Identity],
    result: &mut ValidationResult,
) -> CaseResult<()> {
    for identity in identities {
        validate_identity(section, identity)?;
    }

    let ids = identities.iter().filter_map(|identity| match identity {
        Identity::Id(value) => Some(value.as_str()),
        Identity::Guid(_) => None,
    });
    let duplicated_ids = find_duplicates(ids);
    if !duplicated_ids.is_empty() {
        result.add_error(
            IssueKind::DuplicateValue,
            format!("Duplicated 'IndividualId'(s): {}", duplicated_ids.join(",")),
        );
    }

    let guids = identities.iter().filter_map(|identity| match identity {
        Identity::Guid(value) => Some(value.as_str()),
        Identity::Id(_) => None,
    });
    let duplicated_guids = find_duplicates(guids);
    if !duplicated_guids.is_empty() {
        result.add_error(
            IssueKind::DuplicateValue,
            format!("Duplicated 'IndividualGUID'(s): {}", duplicated_guids.join(",")),
        );
    }

    Ok(())
}
