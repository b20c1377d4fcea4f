//! Installer Validation Coordinator
//!
//! Drives one installer's nested metadata through
//! `Unresolved → Resolved → Valid | Invalid`:
//!
//! 1. Pick the installer-scope declaration (custom wrappers get a synthesized one)
//! 2. Resolve it against the manifest scope
//! 3. Build the effective file collection, reporting duplicates
//! 4. Run every check and collect all failures
//! 5. Return the populated installer, or the full failure list
//!
//! There is no partial success: an installer with any failure yields no
//! record at all.

use std::collections::HashSet;

use crate::collection::NestedInstallerFileCollection;
use crate::config_file::{AliasPolicy, ValidationPolicy};
use crate::installer::Installer;
use crate::logic::resolver::{self, ResolvedNesting};
use crate::manifest::{InstallerEntry, Manifest, NestedInstallerDeclaration};
use crate::nested_file::{NestedInstallerFile, NestedInstallerFileValidator};
use crate::nesting_state::{LifecycleTransitionError, NestingLifecycle, NestingState};
use crate::types::{InstallerType, NestedInstallerType};
use crate::validation::{ValidationError, ValidationErrorList};

/// Entry point generated into every custom wrapper archive
pub const CUSTOM_INSTALLER_SCRIPT: &str = "install.bat";

/// Nested declaration published for custom wrapper installers
pub fn custom_wrapper_declaration() -> NestedInstallerDeclaration {
    NestedInstallerDeclaration::absent()
        .with_type(NestedInstallerType::Exe.to_string())
        .with_files(vec![NestedInstallerFile::new(CUSTOM_INSTALLER_SCRIPT)])
}

/// Outcome for one installer entry of a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallerOutcome {
    /// Position of the entry in the manifest's installer list
    pub index: usize,
    pub result: Result<Installer, ValidationErrorList>,
}

/// Outcomes for every installer of one manifest, in entry order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestReport {
    pub package_identifier: String,
    pub package_version: String,
    pub outcomes: Vec<InstallerOutcome>,
}

impl ManifestReport {
    pub fn valid_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn invalid_count(&self) -> usize {
        self.outcomes.len() - self.valid_count()
    }

    /// Check if every installer validated
    pub fn is_valid(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    pub fn valid_installers(&self) -> impl Iterator<Item = &Installer> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    /// `(entry index, failures)` for every rejected installer
    pub fn failures(&self) -> impl Iterator<Item = (usize, &ValidationErrorList)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.index, e)))
    }
}

/// Resolves, attaches, and validates nested installer metadata
#[derive(Debug, Clone, Default)]
pub struct InstallerValidationCoordinator {
    validator: NestedInstallerFileValidator,
}

impl InstallerValidationCoordinator {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self {
            validator: NestedInstallerFileValidator::new(policy),
        }
    }

    pub fn policy(&self) -> &ValidationPolicy {
        self.validator.policy()
    }

    /// Produce the validated installer for `entry`, or every failure found
    pub fn process(
        &self,
        entry: &InstallerEntry,
        manifest: &Manifest,
    ) -> Result<Installer, ValidationErrorList> {
        self.process_with_lifecycle(entry, manifest).1
    }

    /// Like `process`, also returning the lifecycle the attempt went through
    pub fn process_with_lifecycle(
        &self,
        entry: &InstallerEntry,
        manifest: &Manifest,
    ) -> (NestingLifecycle, Result<Installer, ValidationErrorList>) {
        let mut lifecycle = NestingLifecycle::new();

        let wrapper;
        let installer_scope = if entry.installer_type == InstallerType::Custom {
            if !entry.nested.is_absent() {
                tracing::debug!("Ignoring declared nested metadata on custom wrapper installer");
            }
            wrapper = custom_wrapper_declaration();
            &wrapper
        } else {
            &entry.nested
        };

        let resolved = resolver::resolve(installer_scope, &manifest.nested);
        advance(lifecycle.mark_resolved());

        let result = self.attach_and_validate(entry, resolved);
        advance(lifecycle.mark_validated(result.is_ok()));

        match &result {
            Ok(installer) => tracing::info!(
                package = %manifest.package_identifier,
                installer_type = %installer.installer_type,
                nested_type = ?installer.nested_installer_type.map(|t| t.to_string()),
                "Nested installer metadata valid"
            ),
            Err(errors) => tracing::info!(
                package = %manifest.package_identifier,
                installer_type = %entry.installer_type,
                errors = errors.len(),
                "Nested installer metadata invalid"
            ),
        }

        (lifecycle, result)
    }

    /// Run `process` for every installer of `manifest`, independently
    pub fn process_manifest(&self, manifest: &Manifest) -> ManifestReport {
        let outcomes = manifest
            .installers
            .iter()
            .enumerate()
            .map(|(index, entry)| InstallerOutcome {
                index,
                result: self.process(entry, manifest),
            })
            .collect();

        ManifestReport {
            package_identifier: manifest.package_identifier.clone(),
            package_version: manifest.package_version.clone(),
            outcomes,
        }
    }

    fn attach_and_validate(
        &self,
        entry: &InstallerEntry,
        resolved: ResolvedNesting,
    ) -> Result<Installer, ValidationErrorList> {
        let mut errors = ValidationErrorList::new();
        let mut installer = Installer::from_entry(entry);

        let declared_type = resolved.nested_type().map(str::to_string);
        let nested_type = match declared_type.as_deref() {
            Some(raw) => {
                let parsed = NestedInstallerType::parse_declared(raw);
                if parsed.is_none() {
                    errors.record(ValidationError::UnknownNestedType {
                        value: raw.to_string(),
                    });
                }
                parsed
            }
            None => None,
        };

        let files = resolved.nested_installer_files.map(|r| r.value);
        let collected = files.map(|files| self.collect_files(files, &mut errors));

        if let Some((collection, _)) = &collected {
            if declared_type.is_none() && !collection.is_empty() {
                errors.record(ValidationError::OrphanedNestedFiles {
                    count: collection.len(),
                });
            }
        }

        if let Some(raw) = &declared_type {
            if !entry.installer_type.is_archive() {
                errors.record(ValidationError::NestedTypeWithoutContainer {
                    nested_type: raw.clone(),
                    installer_type: entry.installer_type,
                });
            }
        }

        if let (Some(nested_type), Some((collection, source_indexes))) = (nested_type, &collected) {
            self.check_aliases(nested_type, collection, source_indexes, &mut errors);
        }

        errors.into_result()?;

        installer.nested_installer_type = nested_type;
        installer.nested_installer_files = collected.map(|(collection, _)| collection);
        Ok(installer)
    }

    /// Build the effective collection and validate it, with every failure
    /// tagged by its position in the declared list.
    ///
    /// Also returns, for each collection member, its declared position.
    fn collect_files(
        &self,
        files: Vec<NestedInstallerFile>,
        errors: &mut ValidationErrorList,
    ) -> (NestedInstallerFileCollection, Vec<usize>) {
        let declared = files.len();
        let (collection, duplicates) = NestedInstallerFileCollection::from_files(files);

        let dropped: HashSet<usize> = duplicates.iter().filter_map(|f| f.index).collect();
        let source_indexes: Vec<usize> = (0..declared).filter(|i| !dropped.contains(i)).collect();
        errors.extend(duplicates);

        if let Err(invalid) = collection.validate(&self.validator) {
            errors.extend(invalid.map_indexes(|i| source_indexes.get(i).copied().unwrap_or(i)));
        }

        (collection, source_indexes)
    }

    fn check_aliases(
        &self,
        nested_type: NestedInstallerType,
        collection: &NestedInstallerFileCollection,
        source_indexes: &[usize],
        errors: &mut ValidationErrorList,
    ) {
        if nested_type.is_portable() {
            return;
        }

        let policy = self.policy().alias_on_non_portable;
        for (index, file) in collection.iter().enumerate() {
            let Some(alias) = file.alias() else { continue };
            match policy {
                AliasPolicy::Allow => {}
                AliasPolicy::Warn => tracing::warn!(
                    path = %file.relative_file_path,
                    alias,
                    nested_type = %nested_type,
                    "Portable command alias has no effect for non-portable nested installer"
                ),
                AliasPolicy::Reject => errors.record_at(
                    source_indexes.get(index).copied().unwrap_or(index),
                    ValidationError::AliasOnNonPortable {
                        alias: alias.to_string(),
                        nested_type,
                    },
                ),
            }
        }
    }
}

/// Lifecycle steps here always follow the state flow; a refusal would be a
/// coordinator bug, so it is logged rather than surfaced to the submitter
fn advance(step: Result<NestingState, LifecycleTransitionError>) {
    if let Err(err) = step {
        tracing::error!(%err, "Nested metadata lifecycle out of order");
    }
}
