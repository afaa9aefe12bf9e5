//! Rule-set selection and the validation entry point.
//!
//! [`CaseFileValidator`] holds the registered rule-sets in a fixed order (v4, then v3).
//! For a document it keeps the candidates whose content sniff accepts it and runs them in
//! order: the first passing result wins, and when none pass the first result is returned.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;

use regex::Regex;
use rrf_reference::ReferenceRegistry;

use crate::ruleset::{RuleSet, V3RuleSet, V4RuleSet};
use crate::{CoreError, CoreResult, IssueKind, ValidationResult, ValidatorConfig};

/// Validates case files with every registered rule-set that applies.
pub struct CaseFileValidator {
    rule_sets: Vec<Box<dyn RuleSet>>,
}

impl std::fmt::Debug for CaseFileValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaseFileValidator")
            .field("rule_sets", &self.rule_set_ids())
            .finish()
    }
}

impl CaseFileValidator {
    /// Create a validator with the built-in rule-sets.
    pub fn new(registry: Arc<ReferenceRegistry>, config: ValidatorConfig) -> Self {
        Self::with_rule_sets(vec![
            Box::new(V4RuleSet::new(Arc::clone(&registry), config.clone())),
            Box::new(V3RuleSet::new(registry, config)),
        ])
    }

    /// Create a validator from explicit rule-sets, tried in the given order.
    pub fn with_rule_sets(rule_sets: Vec<Box<dyn RuleSet>>) -> Self {
        Self { rule_sets }
    }

    /// Identifiers of the registered rule-sets, in registration order.
    pub fn rule_set_ids(&self) -> Vec<&str> {
        self.rule_sets.iter().map(|rule_set| rule_set.id()).collect()
    }

    /// Resolve glob patterns (`v4*`, `v?`) to rule-set identifiers.
    ///
    /// Patterns are trimmed and blank ones ignored. Identifiers come out in pattern order,
    /// then registration order, without repeats.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPattern`] for a pattern that cannot be compiled and
    /// [`CoreError::NoMatchingRuleSet`] when no identifier matches.
    pub fn select<S: AsRef<str>>(&self, patterns: &[S]) -> CoreResult<Vec<String>> {
        let mut selected: Vec<String> = Vec::new();

        for pattern in patterns {
            let pattern = pattern.as_ref().trim();
            if pattern.is_empty() {
                continue;
            }
            let regex = glob_to_regex(pattern)?;
            for id in self.rule_set_ids() {
                if regex.is_match(id) && !selected.iter().any(|known| known == id) {
                    selected.push(id.to_string());
                }
            }
        }

        if selected.is_empty() {
            return Err(CoreError::NoMatchingRuleSet {
                patterns: patterns
                    .iter()
                    .map(|pattern| pattern.as_ref().trim())
                    .collect::<Vec<_>>()
                    .join(" "),
                available: self.rule_set_ids().join(" "),
            });
        }
        Ok(selected)
    }

    /// Validate a document with every registered rule-set.
    pub fn validate(&self, bytes: &[u8]) -> ValidationResult {
        self.validate_with(bytes, &[] as &[&str])
    }

    /// Validate a document with the rule-sets named in `ids`; an empty list means all.
    pub fn validate_with<S: AsRef<str>>(&self, bytes: &[u8], ids: &[S]) -> ValidationResult {
        let candidates: Vec<&dyn RuleSet> = if ids.is_empty() {
            self.rule_sets.iter().map(|rule_set| &**rule_set).collect()
        } else {
            ids.iter()
                .flat_map(|id| {
                    self.rule_sets
                        .iter()
                        .filter(move |rule_set| rule_set.id() == id.as_ref())
                })
                .map(|rule_set| &**rule_set)
                .collect()
        };

        let applicable: Vec<&dyn RuleSet> = candidates
            .into_iter()
            .filter(|rule_set| rule_set.is_applicable(bytes))
            .collect();

        if applicable.is_empty() {
            tracing::info!("no applicable validator for document of {} bytes", bytes.len());
            return ValidationResult::failure(IssueKind::Fatal, "Could not find applicable validator");
        }

        let mut first_result: Option<ValidationResult> = None;
        for rule_set in applicable {
            tracing::debug!("trying validator {}", rule_set.id());
            let result = run_guarded(rule_set, bytes);

            if result.is_success() {
                tracing::info!("validator {} passed", rule_set.id());
                return result;
            }
            tracing::info!(
                "validator {} failed with {} error(s)",
                rule_set.id(),
                result.errors().len()
            );
            first_result.get_or_insert(result);
        }

        first_result.unwrap_or_else(|| {
            ValidationResult::failure(IssueKind::Fatal, "Could not find applicable validator")
        })
    }

    /// Read and validate a case file. Read failures are reported in the result.
    pub fn validate_file<S: AsRef<str>>(&self, path: &Path, ids: &[S]) -> ValidationResult {
        let mut result = match std::fs::read(path) {
            Ok(bytes) => self.validate_with(&bytes, ids),
            Err(source) => {
                let err = CoreError::FileRead {
                    path: path.to_path_buf(),
                    source,
                };
                tracing::error!("{err}");
                ValidationResult::failure(IssueKind::Internal, err.to_string())
            }
        };
        result.set_file_name(path.display().to_string());
        result
    }
}

fn run_guarded(rule_set: &dyn RuleSet, bytes: &[u8]) -> ValidationResult {
    match catch_unwind(AssertUnwindSafe(|| rule_set.validate(bytes))) {
        Ok(result) => result,
        Err(panic) => {
            let reason = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::error!("validator {} panicked: {reason}", rule_set.id());

            let mut result = ValidationResult::failure(
                IssueKind::Internal,
                format!("Validator {} failed unexpectedly: {reason}", rule_set.id()),
            );
            result.set_validator_id(rule_set.id());
            result
        }
    }
}

fn glob_to_regex(pattern: &str) -> CoreResult<Regex> {
    let mut regex = String::from("^");
    for character in pattern.chars() {
        match character {
            '*' => regex.push_str(".*"),
            '?' => regex.push('.'),
            other => regex.push_str(&regex::escape(&other.to_string())),
        }
    }
    regex.push('$');

    Regex::new(&regex).map_err(|source| CoreError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}
