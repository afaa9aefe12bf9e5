use std::path::PathBuf;

/// Errors raised outside of rule evaluation: configuration, reference loading, rule-set
/// selection and file access.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to load reference data: {0}")]
    Reference(#[from] rrf_reference::ReferenceError),

    #[error("invalid parser pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("no parser matches {patterns} (available: {available})")]
    NoMatchingRuleSet { patterns: String, available: String },

    #[error("failed to read case file {path}: {source}", path = path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Conditions that stop evaluation of a document.
///
/// A rule-set returns these through `Err`; the message then becomes the only error of the
/// validation result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FatalCaseError {
    #[error("Cannot parse xml. Is is correct format? Error: {0}")]
    Unparseable(String),

    #[error("No cases in file")]
    NoCases,

    #[error("No 'DataProcessGroup' section")]
    MissingProcessGroup,

    #[error("One or more {section} objects have empty (or missing) '{field}' field")]
    BlankIdentity {
        section: String,
        field: &'static str,
    },

    #[error("Empty (or missing) 'ProcessingGroupGUID' in DataProcessGroup section")]
    BlankProcessGroupGuid,
}

pub type CaseResult<T> = std::result::Result<T, FatalCaseError>;
