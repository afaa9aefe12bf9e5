//! Validation results.
//!
//! A [`ValidationResult`] is an append-only list of issues. Rules push errors and carry on;
//! a document passes when no error was recorded.

use serde::Serialize;
use std::fmt;

use crate::FatalCaseError;

/// Category of a recorded issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum IssueKind {
    /// A required value is missing or blank.
    MissingField,
    /// A value is present but not acceptable (digits in a name, short group number, ...).
    InvalidValue,
    /// A code is not listed in its reference table.
    InvalidReferenceCode,
    /// A value that must be unique repeats.
    DuplicateValue,
    /// A section maps to people the wrong number of times.
    CardinalityViolation,
    /// A record refers to a person who is not in the case.
    UnknownReference,
    /// An embedded payload (photograph) cannot be decoded.
    MalformedPayload,
    /// The document could not be parsed.
    ParseFailure,
    /// Evaluation stopped early.
    Fatal,
    /// The validator itself failed.
    Internal,
}

/// One recorded issue.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub kind: IssueKind,
    pub message: String,
}

impl Issue {
    pub fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Outcome of validating one document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: Vec<Issue>,
    warnings: Vec<Issue>,
    file_name: Option<String>,
    validator_id: Option<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// A result holding a single error.
    pub fn failure(kind: IssueKind, message: impl Into<String>) -> Self {
        let mut result = Self::new();
        result.add_error(kind, message);
        result
    }

    pub fn add_error(&mut self, kind: IssueKind, message: impl Into<String>) {
        self.errors.push(Issue::new(kind, message));
    }

    pub fn add_warning(&mut self, kind: IssueKind, message: impl Into<String>) {
        self.warnings.push(Issue::new(kind, message));
    }

    /// Replace every recorded error with the fatal condition that stopped evaluation.
    pub fn set_fatal(&mut self, fatal: &FatalCaseError) {
        let kind = match fatal {
            FatalCaseError::Unparseable(_) => IssueKind::ParseFailure,
            _ => IssueKind::Fatal,
        };
        self.errors.clear();
        self.errors.push(Issue::new(kind, fatal.to_string()));
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    pub fn errors(&self) -> &[Issue] {
        &self.errors
    }

    pub fn warnings(&self) -> &[Issue] {
        &self.warnings
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(|issue| issue.message.clone()).collect()
    }

    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(|issue| issue.message.clone()).collect()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn set_file_name(&mut self, file_name: impl Into<String>) {
        self.file_name = Some(file_name.into());
    }

    pub fn validator_id(&self) -> Option<&str> {
        self.validator_id.as_deref()
    }

    pub fn set_validator_id(&mut self, validator_id: impl Into<String>) {
        self.validator_id = Some(validator_id.into());
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(file_name) = self.file_name.as_deref().filter(|n| !n.trim().is_empty()) {
            write!(f, "FILE: {file_name} ")?;
        }

        if self.errors.is_empty() {
            f.write_str("PASS")?;
        } else {
            f.write_str("VALIDATION FAILED\n")?;
            if let Some(validator_id) = self.validator_id.as_deref().filter(|v| !v.is_empty()) {
                writeln!(f, "VALIDATOR: {validator_id}")?;
            }
            f.write_str("ERRORS:\n")?;
            f.write_str(&join_messages(&self.errors))?;
        }

        if !self.warnings.is_empty() {
            f.write_str("WARNINGS:\n")?;
            f.write_str(&join_messages(&self.warnings))?;
        }
        Ok(())
    }
}

fn join_messages(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(|issue| issue.message.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Serialisable summary of a [`ValidationResult`], as printed by `--json` and returned over
/// HTTP.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub success: bool,
    pub validator_id: Option<String>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl From<&ValidationResult> for ValidationReport {
    fn from(result: &ValidationResult) -> Self {
        Self {
            file_name: result.file_name.clone(),
            success: result.is_success(),
            validator_id: result.validator_id.clone(),
            errors: result.error_messages(),
            warnings: result.warning_messages(),
        }
    }
}
