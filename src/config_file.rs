//! Validation policy handling for saving and loading per-deployment limits.
//!
//! Path and alias rules are deployment configuration, not business logic, so
//! they live in a serializable `ValidationPolicy`. Every field has a default,
//! which lets a policy file override only the limits it cares about.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use strum::{Display, EnumIter, EnumString};

use crate::error::NestingError;

/// How to treat a portable command alias on a non-portable nested type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AliasPolicy {
    /// Accept silently; the alias is meaningless but harmless
    #[default]
    Allow,
    /// Accept, but log a warning
    Warn,
    /// Report `AliasOnNonPortable` for each offending file
    Reject,
}

/// Limits applied by the nested installer file validator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationPolicy {
    /// Maximum relative file path length, in characters
    pub max_path_length: usize,
    /// Characters that may never appear in a relative file path
    pub forbidden_path_chars: String,
    pub allow_absolute_paths: bool,
    pub allow_parent_traversal: bool,

    pub min_alias_length: usize,
    pub max_alias_length: usize,
    /// Characters allowed in an alias besides ASCII letters and digits
    pub alias_extra_chars: String,

    pub alias_on_non_portable: AliasPolicy,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            max_path_length: 512,
            forbidden_path_chars: "<>:\"|?*".to_string(),
            allow_absolute_paths: false,
            allow_parent_traversal: false,
            min_alias_length: 1,
            max_alias_length: 40,
            alias_extra_chars: "-_.".to_string(),
            alias_on_non_portable: AliasPolicy::Allow,
        }
    }
}

impl ValidationPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save policy to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize policy to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write policy to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load policy from a JSON file and check its bounds
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read policy from {:?}", path.as_ref()))?;

        let policy: Self = serde_json::from_str(&content).context("Failed to parse policy JSON")?;
        policy.validate()?;

        tracing::debug!(
            max_path_length = policy.max_path_length,
            max_alias_length = policy.max_alias_length,
            alias_on_non_portable = %policy.alias_on_non_portable,
            "Loaded validation policy"
        );

        Ok(policy)
    }

    /// Reject bounds that would make every path or alias invalid
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.max_path_length == 0 {
            return Err(NestingError::policy("max_path_length must be greater than zero"));
        }
        if self.max_alias_length == 0 {
            return Err(NestingError::policy("max_alias_length must be greater than zero"));
        }
        if self.min_alias_length > self.max_alias_length {
            return Err(NestingError::policy(format!(
                "min_alias_length ({}) exceeds max_alias_length ({})",
                self.min_alias_length, self.max_alias_length
            )));
        }
        if self
            .alias_extra_chars
            .chars()
            .any(|c| c.is_whitespace() || c.is_control())
        {
            return Err(NestingError::policy(
                "alias_extra_chars cannot contain whitespace or control characters",
            ));
        }

        Ok(())
    }

    /// Check if `c` may appear in a portable command alias
    pub fn is_alias_char(&self, c: char) -> bool {
        c.is_ascii_alphanumeric() || self.alias_extra_chars.contains(c)
    }

    /// Check if `c` is listed as forbidden in relative paths
    pub fn is_forbidden_path_char(&self, c: char) -> bool {
        self.forbidden_path_chars.contains(c)
    }
}
