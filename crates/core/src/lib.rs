//! # RRF Core
//!
//! Validation engine for UNHCR resettlement registration (RRF) case files.
//!
//! Given the raw bytes of a case file, the engine:
//! - picks the schema-version rule-set that applies (v3 or v4) by sniffing the content;
//! - parses the document with the matching wire model from `rrf-model`;
//! - resolves the identity of every person and maps each record section to those people,
//!   enforcing the section's cardinality;
//! - runs the rule catalogue over the mapping, collecting every violation.
//!
//! The outcome is a [`ValidationResult`]: ordered errors and warnings plus a verdict.
//!
//! **No I/O policy**: apart from [`CaseFileValidator::validate_file`], nothing here touches
//! the file system or the environment. Binaries resolve [`ValidatorConfig`] and the
//! [`ReferenceRegistry`](rrf_reference::ReferenceRegistry) once at startup and share them.

pub mod config;
pub mod constants;
pub mod dispatch;
pub mod error;
pub mod identity;
pub mod mapper;
pub mod result;
pub mod rules;
pub mod ruleset;

pub use config::ValidatorConfig;
pub use dispatch::CaseFileValidator;
pub use error::{CaseResult, CoreError, CoreResult, FatalCaseError};
pub use identity::Identity;
pub use result::{Issue, IssueKind, ValidationReport, ValidationResult};
pub use ruleset::{RuleSet, V3RuleSet, V4RuleSet};
