//! Constants used throughout the RRF core crate.
//!
//! Codes the rules compare against, limits applied to embedded payloads and the names of
//! the environment variables read by the binaries at startup.

/// Relationship code marking the primary applicant of a case.
pub const RELATIONSHIP_CODE_PRIMARY_APPLICANT: &str = "PA";

/// Address type whose `LocationLevel6` carries a phone number.
pub const ADDRESS_TYPE_TELEPHONE: &str = "TEL";

/// Country of asylum address type. The primary applicant needs exactly one.
pub const ADDRESS_TYPE_COA: &str = "COA";

/// Batch indicator required for a file holding one case.
pub const BATCH_TYPE_SINGLE_SUBMISSION: &str = "Single Submission";

/// Batch indicator required for a file holding several cases.
pub const BATCH_TYPE_GROUP_SUBMISSION: &str = "Group Submission";

/// Placeholder shown in messages for an identity with no value.
pub const BLANK_IDENTITY: &str = "[BLANK]";

/// Decoded photographs of this size or larger are rejected (50 MiB).
pub const MAX_PHOTO_BYTES: usize = 50 * 1024 * 1024;

/// Photographs must be wider and taller than this many pixels.
pub const MIN_PHOTO_DIMENSION: u32 = 10;

/// Upper bound on an uploaded case file (50 MiB).
pub const MAX_CASE_FILE_BYTES: usize = 50 * 1024 * 1024;

/// Rule-set identifier for version 3 case files.
pub const RULE_SET_V3: &str = "v3";

/// Rule-set identifier for version 4 case files.
pub const RULE_SET_V4: &str = "v4";

/// Environment variable toggling the "allowed values" hint on invalid codes.
pub const ENV_SHOW_SUGGESTED_VALUES: &str = "RRF_SHOW_SUGGESTED_VALUES";

/// Environment variable naming a directory of reference table overrides.
pub const ENV_REFERENCE_DIR: &str = "RRF_REFERENCE_DIR";
