//! Validator runtime configuration.
//!
//! Resolved once at process startup (binaries read the environment and command line) and
//! then passed into the rule-sets. Validation itself never reads environment variables.

use crate::constants::{ENV_REFERENCE_DIR, ENV_SHOW_SUGGESTED_VALUES};
use crate::{CoreError, CoreResult};
use rrf_reference::ReferenceRegistry;
use std::path::{Path, PathBuf};

/// Validator configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatorConfig {
    show_suggested_values: bool,
    reference_dir: Option<PathBuf>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            show_suggested_values: true,
            reference_dir: None,
        }
    }
}

impl ValidatorConfig {
    /// Create a new `ValidatorConfig`.
    pub fn new(show_suggested_values: bool, reference_dir: Option<PathBuf>) -> Self {
        Self {
            show_suggested_values,
            reference_dir,
        }
    }

    /// Build a configuration from raw environment values.
    ///
    /// # Arguments
    ///
    /// * `show_suggested_values` - Value of `RRF_SHOW_SUGGESTED_VALUES`, if set.
    /// * `reference_dir` - Value of `RRF_REFERENCE_DIR`, if set. Blank values are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidInput`] when the flag is not a recognised boolean.
    pub fn from_env_values(
        show_suggested_values: Option<&str>,
        reference_dir: Option<&str>,
    ) -> CoreResult<Self> {
        let show_suggested_values = match show_suggested_values {
            Some(value) => parse_flag(value)?,
            None => true,
        };

        let reference_dir = reference_dir
            .map(str::trim)
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from);

        Ok(Self::new(show_suggested_values, reference_dir))
    }

    /// Build a configuration from the process environment.
    ///
    /// Reads [`ENV_SHOW_SUGGESTED_VALUES`] and [`ENV_REFERENCE_DIR`]. Call once at startup.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidInput`] when the flag is not a recognised boolean.
    pub fn from_env() -> CoreResult<Self> {
        let show_suggested_values = std::env::var(ENV_SHOW_SUGGESTED_VALUES).ok();
        let reference_dir = std::env::var(ENV_REFERENCE_DIR).ok();
        Self::from_env_values(show_suggested_values.as_deref(), reference_dir.as_deref())
    }

    /// Returns a copy with the "allowed values" hint switched off.
    pub fn without_suggestions(mut self) -> Self {
        self.show_suggested_values = false;
        self
    }

    pub fn show_suggested_values(&self) -> bool {
        self.show_suggested_values
    }

    pub fn reference_dir(&self) -> Option<&Path> {
        self.reference_dir.as_deref()
    }

    /// Load the reference tables, honouring the override directory.
    pub fn load_registry(&self) -> CoreResult<ReferenceRegistry> {
        Ok(ReferenceRegistry::load(self.reference_dir())?)
    }
}

fn parse_flag(value: &str) -> CoreResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(CoreError::InvalidInput(format!(
            "expected a boolean flag, got '{other}'"
        ))),
    }
}
