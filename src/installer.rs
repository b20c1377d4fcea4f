//! Installer records produced by ingestion
//!
//! `Installer` is the persisted form (snake_case), owning its effective
//! nested-installer fields outright. `RestInstaller` is the published form
//! served to package-manager clients, using WinGet's PascalCase names. Both
//! carry the validated values unchanged.

use serde::{Deserialize, Serialize};

use crate::collection::NestedInstallerFileCollection;
use crate::manifest::InstallerEntry;
use crate::nested_file::NestedInstallerFile;
use crate::types::{InstallerType, NestedInstallerType};

/// Validated installer record (relevant subset)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installer {
    pub installer_type: InstallerType,

    #[serde(default)]
    pub architecture: Option<String>,

    #[serde(default)]
    pub installer_url: Option<String>,

    #[serde(default)]
    pub nested_installer_type: Option<NestedInstallerType>,

    #[serde(default)]
    pub nested_installer_files: Option<NestedInstallerFileCollection>,
}

impl Installer {
    /// Copy the non-nesting fields of a manifest entry; nested fields start
    /// absent until resolution assigns them
    pub fn from_entry(entry: &InstallerEntry) -> Self {
        Self {
            installer_type: entry.installer_type,
            architecture: entry.architecture.clone(),
            installer_url: entry.installer_url.clone(),
            nested_installer_type: None,
            nested_installer_files: None,
        }
    }

    /// Check if this installer carries any nested metadata
    pub fn has_nesting(&self) -> bool {
        self.nested_installer_type.is_some() || self.nested_installer_files.is_some()
    }

    /// Build the form served to clients
    pub fn to_rest(&self) -> RestInstaller {
        RestInstaller {
            installer_type: self.installer_type.published(),
            architecture: self.architecture.clone(),
            installer_url: self.installer_url.clone(),
            nested_installer_type: self.nested_installer_type,
            nested_installer_files: self
                .nested_installer_files
                .as_ref()
                .map(|files| files.iter().map(RestNestedInstallerFile::from).collect()),
        }
    }
}

/// Published nested installer file entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RestNestedInstallerFile {
    pub relative_file_path: String,
    pub portable_command_alias: Option<String>,
}

impl From<&NestedInstallerFile> for RestNestedInstallerFile {
    fn from(file: &NestedInstallerFile) -> Self {
        Self {
            relative_file_path: file.relative_file_path.clone(),
            portable_command_alias: file.portable_command_alias.clone(),
        }
    }
}

/// Published installer (relevant subset)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RestInstaller {
    pub installer_type: InstallerType,
    pub architecture: Option<String>,
    pub installer_url: Option<String>,
    pub nested_installer_type: Option<NestedInstallerType>,
    pub nested_installer_files: Option<Vec<RestNestedInstallerFile>>,
}
