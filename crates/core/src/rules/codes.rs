//! Reference code checks.

use rrf_reference::Table;
use rrf_types::{is_blank, Field};

use super::RuleContext;
use crate::identity::Identity;
use crate::{IssueKind, ValidationResult};

/// Check a code against its reference table.
///
/// A blank code is reported as missing. An unknown code is reported with the value as
/// written and, when suggestions are enabled, a sample of the table's codes.
pub fn validate_reference_code(
    ctx: &RuleContext<'_>,
    identity: &Identity,
    field: &str,
    code: &Field<String>,
    table: Table,
    result: &mut ValidationResult,
) {
    let Some(code) = code.as_present() else {
        return;
    };

    if is_blank(code) {
        result.add_error(
            IssueKind::MissingField,
            format!("Empty (or missing) '{field}' value for individual {identity}"),
        );
        return;
    }

    let data = ctx.table(table);
    if !data.contains_code(code) {
        let mut message = format!("Invalid value '{field}' value for individual {identity}: {code}");
        if ctx.show_suggested_values() {
            message.push_str(&format!("  [allowed values: {}]", data.sample_values()));
        }
        result.add_error(IssueKind::InvalidReferenceCode, message);
    }
}
