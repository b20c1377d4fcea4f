//! Manifest-side input model
//!
//! These types are what the (external) manifest parser hands over: raw
//! nested-installer declarations at manifest scope and at installer scope.
//! Field names follow the WinGet manifest layout.
//!
//! ```json
//! {
//!   "PackageIdentifier": "Contoso.Tool",
//!   "PackageVersion": "1.2.0",
//!   "NestedInstallerType": "portable",
//!   "NestedInstallerFiles": [
//!     { "RelativeFilePath": "tool.exe", "PortableCommandAlias": "tool" }
//!   ],
//!   "Installers": [
//!     { "InstallerType": "zip", "Architecture": "x64" }
//!   ]
//! }
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{NestingError, Result};
use crate::nested_file::NestedInstallerFile;
use crate::types::InstallerType;

/// Raw nested-installer fields as declared at one scope.
///
/// `None` means the field was not declared. `Some(vec![])` for the files
/// means it was declared empty, which is a distinct, meaningful state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NestedInstallerDeclaration {
    #[serde(default)]
    pub nested_installer_type: Option<String>,

    #[serde(default)]
    pub nested_installer_files: Option<Vec<NestedInstallerFile>>,
}

impl NestedInstallerDeclaration {
    /// A declaration with neither field present
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, nested_type: impl Into<String>) -> Self {
        self.nested_installer_type = Some(nested_type.into());
        self
    }

    pub fn with_files(mut self, files: Vec<NestedInstallerFile>) -> Self {
        self.nested_installer_files = Some(files);
        self
    }

    /// Check if neither field was declared
    pub fn is_absent(&self) -> bool {
        self.nested_installer_type.is_none() && self.nested_installer_files.is_none()
    }
}

/// One installer entry of a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstallerEntry {
    pub installer_type: InstallerType,

    #[serde(default)]
    pub architecture: Option<String>,

    #[serde(default)]
    pub installer_url: Option<String>,

    #[serde(flatten)]
    pub nested: NestedInstallerDeclaration,
}

impl InstallerEntry {
    pub fn new(installer_type: InstallerType) -> Self {
        Self {
            installer_type,
            architecture: None,
            installer_url: None,
            nested: NestedInstallerDeclaration::absent(),
        }
    }

    pub fn with_nested(mut self, nested: NestedInstallerDeclaration) -> Self {
        self.nested = nested;
        self
    }

    pub fn with_architecture(mut self, architecture: impl Into<String>) -> Self {
        self.architecture = Some(architecture.into());
        self
    }
}

/// A parsed package manifest (relevant subset)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Manifest {
    pub package_identifier: String,
    pub package_version: String,

    /// Manifest-level defaults, read but never modified during resolution
    #[serde(flatten)]
    pub nested: NestedInstallerDeclaration,

    #[serde(default)]
    pub installers: Vec<InstallerEntry>,
}

impl Manifest {
    pub fn new(package_identifier: impl Into<String>, package_version: impl Into<String>) -> Self {
        Self {
            package_identifier: package_identifier.into(),
            package_version: package_version.into(),
            nested: NestedInstallerDeclaration::absent(),
            installers: Vec::new(),
        }
    }

    pub fn with_nested(mut self, nested: NestedInstallerDeclaration) -> Self {
        self.nested = nested;
        self
    }

    pub fn with_installer(mut self, installer: InstallerEntry) -> Self {
        self.installers.push(installer);
        self
    }

    /// Load a manifest from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let manifest: Self = serde_json::from_str(json)?;
        manifest.validate_structure()?;
        Ok(manifest)
    }

    /// Load a manifest from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest from {:?}", path))?;
        Self::from_json(&content).with_context(|| format!("Invalid manifest {:?}", path))
    }

    /// Identity fields must be present for results to be attributable
    fn validate_structure(&self) -> Result<()> {
        if self.package_identifier.trim().is_empty() {
            return Err(NestingError::manifest("PackageIdentifier must be specified"));
        }
        if self.package_version.trim().is_empty() {
            return Err(NestingError::manifest("PackageVersion must be specified"));
        }
        Ok(())
    }
}
