//! Bounded, de-duplicated, order-preserving nested installer file collection
//!
//! Uniqueness is over full structural equality: two entries with the same
//! path but different aliases are distinct. The size bound is checked by
//! `validate`, not by `add`, so an oversized collection can still be built
//! and reported in full.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::nested_file::{NestedInstallerFile, NestedInstallerFileValidator};
use crate::validation::{ValidationError, ValidationErrorList, ValidationResult};

/// Maximum number of nested installer files per installer
pub const MAX_NESTED_INSTALLER_FILES: usize = 1024;

/// Returned by `add` when a structurally equal file is already present
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("nested installer file '{}' is already present", .file.relative_file_path)]
pub struct DuplicateError {
    pub file: NestedInstallerFile,
}

impl From<DuplicateError> for ValidationError {
    fn from(err: DuplicateError) -> Self {
        ValidationError::DuplicateItem {
            path: err.file.relative_file_path,
            alias: err.file.portable_command_alias,
        }
    }
}

/// Ordered set of nested installer files
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NestedInstallerFileCollection {
    #[serde(deserialize_with = "deserialize_unique")]
    files: Vec<NestedInstallerFile>,
}

impl NestedInstallerFileCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from raw files, keeping the first of any duplicates.
    ///
    /// Every rejected duplicate is reported as `DuplicateItem`, tagged with
    /// its index in `files`.
    pub fn from_files(
        files: impl IntoIterator<Item = NestedInstallerFile>,
    ) -> (Self, ValidationErrorList) {
        let mut collection = Self::new();
        let mut errors = ValidationErrorList::new();

        for (index, file) in files.into_iter().enumerate() {
            if let Err(dup) = collection.add(file) {
                errors.record_at(index, dup.into());
            }
        }

        (collection, errors)
    }

    /// Append a file unless an equal one is already present
    pub fn add(&mut self, file: NestedInstallerFile) -> Result<(), DuplicateError> {
        if self.files.contains(&file) {
            return Err(DuplicateError { file });
        }
        self.files.push(file);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn contains(&self, file: &NestedInstallerFile) -> bool {
        self.files.contains(file)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NestedInstallerFile> {
        self.files.iter()
    }

    pub fn as_slice(&self) -> &[NestedInstallerFile] {
        &self.files
    }

    /// Validate the size bound and every member.
    ///
    /// Member failures are tagged with the member's index; nothing
    /// short-circuits.
    pub fn validate(&self, validator: &NestedInstallerFileValidator) -> ValidationResult {
        let mut errors = ValidationErrorList::new();

        if self.files.len() > MAX_NESTED_INSTALLER_FILES {
            errors.record(ValidationError::TooManyItems {
                count: self.files.len(),
                max: MAX_NESTED_INSTALLER_FILES,
            });
        }

        for (index, file) in self.files.iter().enumerate() {
            if let Err(file_errors) = validator.validate(file) {
                errors.extend(file_errors.tagged(index));
            }
        }

        errors.into_result()
    }
}

impl<'a> IntoIterator for &'a NestedInstallerFileCollection {
    type Item = &'a NestedInstallerFile;
    type IntoIter = std::slice::Iter<'a, NestedInstallerFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

impl IntoIterator for NestedInstallerFileCollection {
    type Item = NestedInstallerFile;
    type IntoIter = std::vec::IntoIter<NestedInstallerFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.into_iter()
    }
}

/// Persisted collections were validated on the way in, so duplicates or an
/// oversized list mean the stored record is corrupt
fn deserialize_unique<'de, D>(deserializer: D) -> Result<Vec<NestedInstallerFile>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    let files = Vec::<NestedInstallerFile>::deserialize(deserializer)?;
    if files.len() > MAX_NESTED_INSTALLER_FILES {
        return Err(D::Error::custom(format!(
            "too many nested installer files: {} (max {})",
            files.len(),
            MAX_NESTED_INSTALLER_FILES
        )));
    }

    let mut unique: Vec<NestedInstallerFile> = Vec::with_capacity(files.len());
    for file in files {
        if unique.contains(&file) {
            return Err(D::Error::custom(format!(
                "duplicate nested installer file '{}'",
                file.relative_file_path
            )));
        }
        unique.push(file);
    }
    Ok(unique)
}
