//! Nested Installer Metadata Library
//!
//! Resolves and validates nested installer metadata for package catalog
//! manifests: archives that contain inner installer payloads, declared at
//! manifest scope, installer scope, or both.

pub mod cli;
pub mod collection;
pub mod config_file;
pub mod error;
pub mod installer;
pub mod logic;
pub mod manifest;
pub mod nested_file;
pub mod nesting_state;
pub mod types;
pub mod validation;

// Re-export main types for convenience
pub use collection::{DuplicateError, MAX_NESTED_INSTALLER_FILES, NestedInstallerFileCollection};
pub use config_file::{AliasPolicy, ValidationPolicy};
pub use error::NestingError;
pub use installer::{Installer, RestInstaller, RestNestedInstallerFile};
pub use manifest::{InstallerEntry, Manifest, NestedInstallerDeclaration};
pub use nested_file::{NestedInstallerFile, NestedInstallerFileValidator};
pub use nesting_state::{LifecycleTransitionError, NestingLifecycle, NestingState};
pub use types::{InstallerType, NestedInstallerType};
pub use validation::{
    AliasViolation, PathViolation, ValidationError, ValidationErrorList, ValidationFailure,
    ValidationResult,
};

// Resolution and coordination
pub use logic::coordinator::{
    CUSTOM_INSTALLER_SCRIPT, InstallerOutcome, InstallerValidationCoordinator, ManifestReport,
};
pub use logic::resolver::{Resolved, ResolvedNesting, Scope, resolve, resolve_files, resolve_type};
