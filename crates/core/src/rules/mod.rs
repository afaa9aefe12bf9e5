//! Rule catalogue.
//!
//! Free functions shared by the v3 and v4 rule-sets. Each takes values already pulled out
//! of the wire model plus the identity of the person they belong to, and appends zero or
//! more issues to a [`ValidationResult`](crate::ValidationResult). Ordinary invalid data
//! never makes a rule fail; only the group and batch checks can return a
//! [`FatalCaseError`](crate::FatalCaseError).

pub mod applicant;
pub mod codes;
pub mod dates;
pub mod duplicates;
pub mod group;
pub mod names;
pub mod person;
pub mod photo;
pub mod records;

use rrf_reference::{ReferenceData, ReferenceRegistry, Table};

use crate::ValidatorConfig;

/// Read-only state every rule can consult.
#[derive(Clone, Copy, Debug)]
pub struct RuleContext<'a> {
    registry: &'a ReferenceRegistry,
    config: &'a ValidatorConfig,
}

impl<'a> RuleContext<'a> {
    pub fn new(registry: &'a ReferenceRegistry, config: &'a ValidatorConfig) -> Self {
        Self { registry, config }
    }

    pub fn table(&self, table: Table) -> &'a ReferenceData {
        self.registry.table(table)
    }

    pub fn show_suggested_values(&self) -> bool {
        self.config.show_suggested_values()
    }
}
