//! Case-level checks: batch envelope, process group and cross references.

use rrf_reference::Table;
use rrf_types::{is_blank, is_blank_opt, trimmed, Field};

use super::codes::validate_reference_code;
use super::duplicates::validate_no_duplicates;
use super::RuleContext;
use crate::constants::{BATCH_TYPE_GROUP_SUBMISSION, BATCH_TYPE_SINGLE_SUBMISSION};
use crate::identity::Identity;
use crate::{CaseResult, FatalCaseError, IssueKind, ValidationResult};

/// Check the batch indicator against the number of cases in the file.
///
/// # Errors
///
/// Returns [`FatalCaseError::NoCases`] for a file without cases.
pub fn validate_batch_type(
    group_individual_indicator: Option<&str>,
    case_count: usize,
    result: &mut ValidationResult,
) -> CaseResult<()> {
    let (expected, label) = match case_count {
        0 => return Err(FatalCaseError::NoCases),
        1 => (BATCH_TYPE_SINGLE_SUBMISSION, "one-case"),
        _ => (BATCH_TYPE_GROUP_SUBMISSION, "multi-case"),
    };

    if group_individual_indicator != Some(expected) {
        result.add_error(
            IssueKind::InvalidValue,
            format!("For {label} file, 'GroupIndividualIndicator' must be {expected}"),
        );
    }
    Ok(())
}

/// Values of a `DataProcessGroup` record.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessGroup<'a> {
    pub number: Option<&'a str>,
    /// Group GUID; `None` for schema versions without one.
    pub guid: Option<Option<&'a str>>,
    pub size: u32,
}

/// Check a case's process group against the number of people in the case.
///
/// # Errors
///
/// Returns [`FatalCaseError::BlankProcessGroupGuid`] when the schema carries a group GUID
/// and it is blank.
pub fn validate_process_group(
    group: &ProcessGroup<'_>,
    individual_count: usize,
    result: &mut ValidationResult,
) -> CaseResult<()> {
    let number = trimmed(group.number);
    if number.is_empty() {
        result.add_error(
            IssueKind::MissingField,
            "Empty (or missing) 'ProcessingGroupNumber' in DataProcessGroup section",
        );
    } else if number.chars().count() <= 3 {
        result.add_error(
            IssueKind::InvalidValue,
            "Short (three characters or shorter) 'ProcessingGroupNumber' in DataProcessGroup section",
        );
    }

    if let Some(guid) = group.guid {
        if is_blank_opt(guid) {
            return Err(FatalCaseError::BlankProcessGroupGuid);
        }
    }

    if individual_count != group.size as usize {
        result.add_error(
            IssueKind::CardinalityViolation,
            format!(
                "Number of individuals [{individual_count}] is not equal to 'ProcessingGroupSize' value [{}] in DataProcessGroup section",
                group.size
            ),
        );
    }
    Ok(())
}

/// Check the link between a person and the case's process group (version 4).
pub fn validate_individual_process_group(
    ctx: &RuleContext<'_>,
    identity: &Identity,
    case_group_guid: &str,
    group_guid: Option<&str>,
    relationship: Option<&str>,
    result: &mut ValidationResult,
) {
    match group_guid {
        Some(guid) if !is_blank(guid) => {
            if guid != case_group_guid {
                result.add_error(
                    IssueKind::InvalidValue,
                    format!(
                        "'ProcessingGroupGUID' in DataIndividualProcessGroup section for individual {identity} is different from case ProcessingGroupGUID {case_group_guid}: {guid}"
                    ),
                );
            }
        }
        _ => result.add_error(
            IssueKind::MissingField,
            format!(
                "Empty (or missing) 'ProcessingGroupGUID' in DataIndividualProcessGroup section for individual {identity}"
            ),
        ),
    }

    validate_reference_code(
        ctx,
        identity,
        "RelationshipToPrincipalRepresentative",
        &Field::mandatory_text(relationship),
        Table::Relationship,
        result,
    );
}

/// Check process group cross references.
///
/// Both ends of every pair must be filled in, and no pair may repeat once its ends are
/// trimmed.
pub fn validate_cross_references<'a>(
    pairs: impl IntoIterator<Item = (Option<&'a str>, Option<&'a str>)>,
    result: &mut ValidationResult,
) {
    let mut keys = Vec::new();
    for (from, to) in pairs {
        if is_blank_opt(from) {
            result.add_error(
                IssueKind::MissingField,
                "Empty (or missing) 'ProcessingGroupNumberFrom' in ProcessGroupCrossReference",
            );
        }
        if is_blank_opt(to) {
            result.add_error(
                IssueKind::MissingField,
                "Empty (or missing) 'ProcessingGroupNumberTo' in ProcessGroupCrossReference",
            );
        }
        keys.push(format!("{} to {}", trimmed(from), trimmed(to)));
    }

    validate_no_duplicates(
        "DataProcessGroupCrossReference",
        keys.iter().map(|key| Some(key.as_str())),
        result,
    );
}
