//! Validation error taxonomy and aggregated results
//!
//! Validation in this crate is exhaustive: every check runs and every failure
//! is collected, so a manifest author sees all problems in one pass. Each
//! failure may carry the index of the collection element it belongs to.

use std::fmt;
use thiserror::Error;

use crate::types::{InstallerType, NestedInstallerType};

/// Why a relative file path was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathViolation {
    Empty,
    TooLong { len: usize, max: usize },
    Absolute,
    ParentTraversal,
    ForbiddenChar(char),
    ControlChar,
}

impl fmt::Display for PathViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "path is empty"),
            Self::TooLong { len, max } => write!(f, "path is {} characters (max {})", len, max),
            Self::Absolute => write!(f, "path must be relative to the archive root"),
            Self::ParentTraversal => write!(f, "path must not contain '..' segments"),
            Self::ForbiddenChar(c) => write!(f, "path contains forbidden character {:?}", c),
            Self::ControlChar => write!(f, "path contains a control character"),
        }
    }
}

/// Why a portable command alias was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasViolation {
    TooShort { len: usize, min: usize },
    TooLong { len: usize, max: usize },
    InvalidChar(char),
}

impl fmt::Display for AliasViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { len, min } => write!(f, "alias is {} characters (min {})", len, min),
            Self::TooLong { len, max } => write!(f, "alias is {} characters (max {})", len, max),
            Self::InvalidChar(c) => write!(f, "alias contains invalid character {:?}", c),
        }
    }
}

/// A single nested-installer validation failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid relative file path '{path}': {reason}")]
    InvalidPath { path: String, reason: PathViolation },

    #[error("invalid portable command alias '{alias}': {reason}")]
    InvalidAlias { alias: String, reason: AliasViolation },

    #[error("duplicate nested installer file '{path}'{}", .alias.as_ref().map(|a| format!(" (alias '{}')", a)).unwrap_or_default())]
    DuplicateItem { path: String, alias: Option<String> },

    #[error("too many nested installer files: {count} (max {max})")]
    TooManyItems { count: usize, max: usize },

    #[error("{count} nested installer file(s) declared without a nested installer type")]
    OrphanedNestedFiles { count: usize },

    #[error("nested installer type '{nested_type}' declared on non-archive installer type '{installer_type}'")]
    NestedTypeWithoutContainer {
        nested_type: String,
        installer_type: InstallerType,
    },

    #[error("unknown nested installer type '{value}'")]
    UnknownNestedType { value: String },

    #[error("portable command alias '{alias}' is not allowed for nested installer type '{nested_type}'")]
    AliasOnNonPortable {
        alias: String,
        nested_type: NestedInstallerType,
    },
}

/// A validation failure, tagged with the offending element's index when it
/// belongs to a collection member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub index: Option<usize>,
    pub error: ValidationError,
}

impl ValidationFailure {
    pub fn new(error: ValidationError) -> Self {
        Self { index: None, error }
    }

    pub fn at(index: usize, error: ValidationError) -> Self {
        Self {
            index: Some(index),
            error,
        }
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "[{}] {}", index, self.error),
            None => write!(f, "{}", self.error),
        }
    }
}

/// Every failure found while validating one installer's nested metadata
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrorList {
    failures: Vec<ValidationFailure>,
}

impl ValidationErrorList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, failure: ValidationFailure) {
        self.failures.push(failure);
    }

    /// Record an error that is not tied to a collection element
    pub fn record(&mut self, error: ValidationError) {
        self.push(ValidationFailure::new(error));
    }

    /// Record an error for the element at `index`
    pub fn record_at(&mut self, index: usize, error: ValidationError) {
        self.push(ValidationFailure::at(index, error));
    }

    pub fn extend(&mut self, other: ValidationErrorList) {
        self.failures.extend(other.failures);
    }

    /// Re-tag every untagged failure with `index`
    pub fn tagged(mut self, index: usize) -> Self {
        for failure in &mut self.failures {
            failure.index.get_or_insert(index);
        }
        self
    }

    /// Rewrite every index tag through `f`
    pub fn map_indexes(mut self, f: impl Fn(usize) -> usize) -> Self {
        for failure in &mut self.failures {
            failure.index = failure.index.map(&f);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn failures(&self) -> &[ValidationFailure] {
        &self.failures
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationFailure> {
        self.failures.iter()
    }

    /// Iterate the bare errors, dropping index tags
    pub fn errors(&self) -> impl Iterator<Item = &ValidationError> {
        self.failures.iter().map(|f| &f.error)
    }

    /// Count failures matching a predicate
    pub fn count_where(&self, pred: impl Fn(&ValidationError) -> bool) -> usize {
        self.errors().filter(|e| pred(e)).count()
    }

    /// `Ok(())` when nothing was recorded, otherwise the whole list
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation error(s)", self.failures.len())?;
        for failure in &self.failures {
            write!(f, "\n  - {}", failure)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrorList {}

impl IntoIterator for ValidationErrorList {
    type Item = ValidationFailure;
    type IntoIter = std::vec::IntoIter<ValidationFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.into_iter()
    }
}

/// Outcome of validating a value: `Ok(())` or every failure found
pub type ValidationResult = Result<(), ValidationErrorList>;
