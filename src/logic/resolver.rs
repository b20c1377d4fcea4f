//! Nested Installer Resolver
//!
//! Computes the effective nested-installer fields for one installer from the
//! two scopes they can be declared at.
//!
//! # Precedence
//!
//! | Field                   | Installer scope wins when… | Otherwise          |
//! |-------------------------|----------------------------|--------------------|
//! | `NestedInstallerType`   | present and not blank      | manifest scope     |
//! | `NestedInstallerFiles`  | present (even if empty)    | manifest scope     |
//!
//! Each field is resolved on its own: the type may come from the manifest
//! while the files come from the installer, and vice versa. Resolution never
//! validates and never fails; an absent result just means "no nesting".

use std::fmt;

use crate::manifest::NestedInstallerDeclaration;
use crate::nested_file::NestedInstallerFile;

/// Where an effective value was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Installer,
    Manifest,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Installer => write!(f, "installer"),
            Self::Manifest => write!(f, "manifest"),
        }
    }
}

/// A resolved value together with the scope it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    pub value: T,
    pub scope: Scope,
}

/// Effective nested-installer fields for one installer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedNesting {
    pub nested_installer_type: Option<Resolved<String>>,
    pub nested_installer_files: Option<Resolved<Vec<NestedInstallerFile>>>,
}

impl ResolvedNesting {
    pub fn nested_type(&self) -> Option<&str> {
        self.nested_installer_type.as_ref().map(|r| r.value.as_str())
    }

    pub fn files(&self) -> Option<&[NestedInstallerFile]> {
        self.nested_installer_files.as_ref().map(|r| r.value.as_slice())
    }

    /// Drop scope information, yielding a plain declaration.
    ///
    /// Resolving this declaration again against any manifest scope yields
    /// the same values.
    pub fn into_declaration(self) -> NestedInstallerDeclaration {
        NestedInstallerDeclaration {
            nested_installer_type: self.nested_installer_type.map(|r| r.value),
            nested_installer_files: self.nested_installer_files.map(|r| r.value),
        }
    }
}

/// Pick the installer-scope value when `is_present` accepts it, else the
/// manifest-scope value
fn resolve_field<T: Clone>(
    installer: Option<&T>,
    manifest: Option<&T>,
    is_present: impl Fn(&T) -> bool,
) -> Option<Resolved<T>> {
    if let Some(value) = installer.filter(|v| is_present(*v)) {
        return Some(Resolved {
            value: value.clone(),
            scope: Scope::Installer,
        });
    }
    manifest.filter(|v| is_present(*v)).map(|value| Resolved {
        value: value.clone(),
        scope: Scope::Manifest,
    })
}

/// Resolve the effective nested installer type.
///
/// Blank strings count as not declared at either scope.
pub fn resolve_type(
    installer: Option<&String>,
    manifest: Option<&String>,
) -> Option<Resolved<String>> {
    resolve_field(installer, manifest, |t| !t.trim().is_empty())
}

/// Resolve the effective nested installer files.
///
/// Presence, not emptiness, decides: an empty installer-scope list wins.
pub fn resolve_files(
    installer: Option<&Vec<NestedInstallerFile>>,
    manifest: Option<&Vec<NestedInstallerFile>>,
) -> Option<Resolved<Vec<NestedInstallerFile>>> {
    resolve_field(installer, manifest, |_| true)
}

/// Resolve both fields independently.
///
/// Neither input is modified; the result owns fresh copies.
pub fn resolve(
    installer: &NestedInstallerDeclaration,
    manifest: &NestedInstallerDeclaration,
) -> ResolvedNesting {
    let resolved = ResolvedNesting {
        nested_installer_type: resolve_type(
            installer.nested_installer_type.as_ref(),
            manifest.nested_installer_type.as_ref(),
        ),
        nested_installer_files: resolve_files(
            installer.nested_installer_files.as_ref(),
            manifest.nested_installer_files.as_ref(),
        ),
    };

    tracing::debug!(
        type_scope = ?resolved.nested_installer_type.as_ref().map(|r| r.scope),
        files_scope = ?resolved.nested_installer_files.as_ref().map(|r| r.scope),
        "Resolved nested installer fields"
    );

    resolved
}
