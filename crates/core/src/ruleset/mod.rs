//! Schema-version rule-sets.
//!
//! A [`RuleSet`] owns everything needed to validate one schema version: a cheap content
//! sniff, the wire model to parse into and the order in which the rule catalogue is run
//! over each case.

mod v3;
mod v4;

pub use v3::V3RuleSet;
pub use v4::V4RuleSet;

use serde::de::DeserializeOwned;

use crate::{CaseResult, FatalCaseError, IssueKind, ValidationResult};

/// Root element shared by every schema version.
const ROOT_ELEMENT_MARKER: &[u8] = b"<UNHCR_RRF";

/// Element only version 4 documents carry.
const GUID_ELEMENT_MARKER: &[u8] = b"<IndividualGUID";

/// A schema-version specific validator.
pub trait RuleSet: Send + Sync {
    /// Identifier used to select the rule-set (`v3`, `v4`).
    fn id(&self) -> &str;

    /// Cheap check on raw content, run before any parsing.
    fn is_applicable(&self, bytes: &[u8]) -> bool;

    /// Parse and validate a document.
    fn validate(&self, bytes: &[u8]) -> ValidationResult;
}

pub(crate) fn is_case_file(bytes: &[u8]) -> bool {
    contains(bytes, ROOT_ELEMENT_MARKER)
}

pub(crate) fn mentions_individual_guid(bytes: &[u8]) -> bool {
    contains(bytes, GUID_ELEMENT_MARKER)
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

/// Parse `bytes` as `D` and hand the document to `evaluate`.
///
/// Parse failures and fatal case errors end up as the only error of the returned result.
pub(crate) fn run<D: DeserializeOwned>(
    rule_set: &dyn RuleSet,
    bytes: &[u8],
    evaluate: impl FnOnce(D, &mut ValidationResult) -> CaseResult<()>,
) -> ValidationResult {
    let mut result = ValidationResult::new();
    result.set_validator_id(rule_set.id());

    if !rule_set.is_applicable(bytes) {
        result.add_error(
            IssueKind::Internal,
            format!("Validator {} is not applicable to this document", rule_set.id()),
        );
        return result;
    }

    let outcome = rrf_model::parse::<D>(bytes)
        .map_err(|err| FatalCaseError::Unparseable(err.to_string()))
        .and_then(|document| evaluate(document, &mut result));

    if let Err(fatal) = outcome {
        tracing::warn!("validator {} stopped: {}", rule_set.id(), fatal);
        result.set_fatal(&fatal);
    }
    result
}
