//! Nested installer file descriptors and their field validation
//!
//! A `NestedInstallerFile` names one payload inside an archive. The
//! `NestedInstallerFileValidator` checks a single descriptor against the
//! deployment's `ValidationPolicy` and reports every violation it finds.

use serde::{Deserialize, Serialize};

use crate::config_file::ValidationPolicy;
use crate::validation::{
    AliasViolation, PathViolation, ValidationError, ValidationErrorList, ValidationResult,
};

/// One inner file of an archive installer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NestedInstallerFile {
    /// Path relative to the archive root
    #[serde(alias = "RelativeFilePath")]
    pub relative_file_path: String,

    /// Command exposed to the user when the payload is portable
    #[serde(default, alias = "PortableCommandAlias")]
    pub portable_command_alias: Option<String>,
}

impl NestedInstallerFile {
    pub fn new(relative_file_path: impl Into<String>) -> Self {
        Self {
            relative_file_path: relative_file_path.into(),
            portable_command_alias: None,
        }
    }

    /// Attach a portable command alias
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.portable_command_alias = Some(alias.into());
        self
    }

    pub fn alias(&self) -> Option<&str> {
        self.portable_command_alias.as_deref()
    }
}

/// Validates the fields of a single `NestedInstallerFile`
#[derive(Debug, Clone, Default)]
pub struct NestedInstallerFileValidator {
    policy: ValidationPolicy,
}

impl NestedInstallerFileValidator {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    /// Validate one descriptor, collecting every path and alias violation
    pub fn validate(&self, file: &NestedInstallerFile) -> ValidationResult {
        let mut errors = ValidationErrorList::new();

        for reason in self.path_violations(&file.relative_file_path) {
            errors.record(ValidationError::InvalidPath {
                path: file.relative_file_path.clone(),
                reason,
            });
        }

        if let Some(alias) = file.alias() {
            for reason in self.alias_violations(alias) {
                errors.record(ValidationError::InvalidAlias {
                    alias: alias.to_string(),
                    reason,
                });
            }
        }

        errors.into_result()
    }

    fn path_violations(&self, path: &str) -> Vec<PathViolation> {
        if path.trim().is_empty() {
            return vec![PathViolation::Empty];
        }

        let mut violations = Vec::new();

        let len = path.chars().count();
        if len > self.policy.max_path_length {
            violations.push(PathViolation::TooLong {
                len,
                max: self.policy.max_path_length,
            });
        }

        if !self.policy.allow_absolute_paths && is_absolute(path) {
            violations.push(PathViolation::Absolute);
        }

        if !self.policy.allow_parent_traversal && path.split(['/', '\\']).any(|seg| seg == "..") {
            violations.push(PathViolation::ParentTraversal);
        }

        if path.chars().any(char::is_control) {
            violations.push(PathViolation::ControlChar);
        }

        // A drive prefix is already reported as absolute
        let body = if is_drive_prefixed(path) { &path[2..] } else { path };
        if let Some(c) = body.chars().find(|c| self.policy.is_forbidden_path_char(*c)) {
            violations.push(PathViolation::ForbiddenChar(c));
        }

        violations
    }

    fn alias_violations(&self, alias: &str) -> Vec<AliasViolation> {
        let mut violations = Vec::new();

        let len = alias.chars().count();
        if len < self.policy.min_alias_length {
            violations.push(AliasViolation::TooShort {
                len,
                min: self.policy.min_alias_length,
            });
        }
        if len > self.policy.max_alias_length {
            violations.push(AliasViolation::TooLong {
                len,
                max: self.policy.max_alias_length,
            });
        }

        if let Some(c) = alias.chars().find(|c| !self.policy.is_alias_char(*c)) {
            violations.push(AliasViolation::InvalidChar(c));
        }

        violations
    }
}

fn is_drive_prefixed(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

fn is_absolute(path: &str) -> bool {
    path.starts_with('/') || path.starts_with('\\') || is_drive_prefixed(path)
}
