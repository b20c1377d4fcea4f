//! Type-safe installer type enumerations
//!
//! Manifests carry installer types as free-form strings. These enums pin them
//! to the values the catalog accepts, with lowercase wire names on both the
//! serde and `Display`/`FromStr` paths.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Outer installer type: the artifact the client downloads directly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum InstallerType {
    Msix,
    Msi,
    Appx,
    #[default]
    Exe,
    Zip,
    Inno,
    Nullsoft,
    Wix,
    Burn,
    Pwa,
    Portable,
    Font,
    /// Server-generated wrapper: published as a zip holding `install.bat`
    Custom,
}

impl InstallerType {
    /// Check if this type is a container that may hold nested installers
    pub fn is_archive(&self) -> bool {
        matches!(self, Self::Zip | Self::Custom)
    }

    /// The type clients see once the record is published.
    ///
    /// Custom wrappers are delivered as plain zips.
    pub fn published(&self) -> Self {
        match self {
            Self::Custom => Self::Zip,
            other => *other,
        }
    }
}

/// Type of the installer payload located inside an archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NestedInstallerType {
    Msix,
    Msi,
    Appx,
    Exe,
    Inno,
    Nullsoft,
    Wix,
    Burn,
    Portable,
}

impl NestedInstallerType {
    /// Portable payloads are exposed through a command alias
    pub fn is_portable(&self) -> bool {
        matches!(self, Self::Portable)
    }

    /// Parse a raw manifest value.
    ///
    /// Only the exact lowercase wire names are accepted, so a value that
    /// parses is published exactly as it was declared.
    pub fn parse_declared(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}
