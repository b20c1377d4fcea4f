// Integration tests for nested installer resolution and validation
//
// These tests drive whole manifests through the public API:
// - Installer scope overrides manifest scope, per field
// - Collection bounds and duplicate handling
// - Orphaned files and container mismatches
// - Published output of a validated installer
// - Policy files loaded from disk

use std::io::Write;

use nested_installer::{
    AliasPolicy, InstallerEntry, InstallerType, InstallerValidationCoordinator,
    MAX_NESTED_INSTALLER_FILES, Manifest, NestedInstallerDeclaration, NestedInstallerFile,
    NestedInstallerFileCollection, NestedInstallerType, NestingState, ValidationError,
    ValidationPolicy,
};
use tempfile::NamedTempFile;

fn coordinator() -> InstallerValidationCoordinator {
    InstallerValidationCoordinator::default()
}

fn decl() -> NestedInstallerDeclaration {
    NestedInstallerDeclaration::absent()
}

fn numbered_files(count: usize) -> Vec<NestedInstallerFile> {
    (0..count)
        .map(|i| NestedInstallerFile::new(format!("bin/tool{}.exe", i)))
        .collect()
}

// =============================================================================
// Precedence
// =============================================================================

#[test]
fn test_installer_type_overrides_manifest_type() {
    let manifest = Manifest::new("Contoso.Tool", "1.0.0").with_nested(decl().with_type("msi"));
    let entry = InstallerEntry::new(InstallerType::Zip).with_nested(decl().with_type("portable"));

    let installer = coordinator().process(&entry, &manifest).unwrap();
    assert_eq!(installer.nested_installer_type, Some(NestedInstallerType::Portable));
}

#[test]
fn test_empty_installer_files_override_manifest_files() {
    let manifest = Manifest::new("Contoso.Tool", "1.0.0").with_nested(
        decl()
            .with_type("exe")
            .with_files(vec![NestedInstallerFile::new("a.exe")]),
    );
    let entry = InstallerEntry::new(InstallerType::Zip).with_nested(decl().with_files(vec![]));

    let installer = coordinator().process(&entry, &manifest).unwrap();
    assert_eq!(installer.nested_installer_type, Some(NestedInstallerType::Exe));
    assert_eq!(installer.nested_installer_files, Some(NestedInstallerFileCollection::new()));
}

#[test]
fn test_fields_resolve_independently() {
    let manifest = Manifest::new("Contoso.Tool", "1.0.0")
        .with_nested(decl().with_files(vec![NestedInstallerFile::new("setup.msi")]));
    let entry = InstallerEntry::new(InstallerType::Zip).with_nested(decl().with_type("msi"));

    let installer = coordinator().process(&entry, &manifest).unwrap();
    assert_eq!(installer.nested_installer_type, Some(NestedInstallerType::Msi));
    let files: Vec<_> = installer.nested_installer_files.unwrap().into_iter().collect();
    assert_eq!(files, vec![NestedInstallerFile::new("setup.msi")]);
}

// =============================================================================
// Collection bounds and duplicates
// =============================================================================

#[test]
fn test_duplicate_add_keeps_single_element() {
    let mut collection = NestedInstallerFileCollection::new();
    let file = NestedInstallerFile::new("a.exe").with_alias("a");

    assert!(collection.add(file.clone()).is_ok());
    let err = collection.add(file.clone()).unwrap_err();
    assert_eq!(err.file, file);
    assert_eq!(collection.len(), 1);

    // Same path, different alias is a distinct element
    assert!(collection.add(NestedInstallerFile::new("a.exe")).is_ok());
    assert_eq!(collection.len(), 2);
}

#[test]
fn test_declared_duplicates_are_reported() {
    let entry = InstallerEntry::new(InstallerType::Zip).with_nested(decl().with_type("exe").with_files(vec![
        NestedInstallerFile::new("a.exe"),
        NestedInstallerFile::new("a.exe"),
    ]));
    let manifest = Manifest::new("Contoso.Tool", "1.0.0");

    let errors = coordinator().process(&entry, &manifest).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.failures()[0].index, Some(1));
    assert_eq!(
        errors.failures()[0].error,
        ValidationError::DuplicateItem {
            path: "a.exe".to_string(),
            alias: None,
        }
    );
}

#[test]
fn test_max_files_accepted() {
    let entry = InstallerEntry::new(InstallerType::Zip).with_nested(
        decl()
            .with_type("exe")
            .with_files(numbered_files(MAX_NESTED_INSTALLER_FILES)),
    );
    let manifest = Manifest::new("Contoso.Tool", "1.0.0");

    let installer = coordinator().process(&entry, &manifest).unwrap();
    assert_eq!(
        installer.nested_installer_files.map(|f| f.len()),
        Some(MAX_NESTED_INSTALLER_FILES)
    );
}

#[test]
fn test_one_past_max_files_rejected() {
    let entry = InstallerEntry::new(InstallerType::Zip).with_nested(
        decl()
            .with_type("exe")
            .with_files(numbered_files(MAX_NESTED_INSTALLER_FILES + 1)),
    );
    let manifest = Manifest::new("Contoso.Tool", "1.0.0");

    let errors = coordinator().process(&entry, &manifest).unwrap_err();
    assert_eq!(
        errors.errors().collect::<Vec<_>>(),
        vec![&ValidationError::TooManyItems {
            count: MAX_NESTED_INSTALLER_FILES + 1,
            max: MAX_NESTED_INSTALLER_FILES,
        }]
    );
}

// =============================================================================
// Structural checks
// =============================================================================

#[test]
fn test_orphaned_files_from_manifest_scope() {
    let manifest = Manifest::new("Contoso.Tool", "1.0.0")
        .with_nested(decl().with_files(vec![NestedInstallerFile::new("a.exe")]));
    let entry = InstallerEntry::new(InstallerType::Zip);

    let errors = coordinator().process(&entry, &manifest).unwrap_err();
    assert_eq!(
        errors.errors().collect::<Vec<_>>(),
        vec![&ValidationError::OrphanedNestedFiles { count: 1 }]
    );
}

#[test]
fn test_portable_inside_exe_is_rejected() {
    let manifest = Manifest::new("Contoso.Tool", "1.0.0");
    let entry = InstallerEntry::new(InstallerType::Exe).with_nested(decl().with_type("portable"));

    let (lifecycle, result) = coordinator().process_with_lifecycle(&entry, &manifest);
    let errors = result.unwrap_err();
    assert_eq!(
        errors.errors().collect::<Vec<_>>(),
        vec![&ValidationError::NestedTypeWithoutContainer {
            nested_type: "portable".to_string(),
            installer_type: InstallerType::Exe,
        }]
    );
    assert_eq!(lifecycle.current(), NestingState::Invalid);
}

// =============================================================================
// End to end
// =============================================================================

const PORTABLE_ZIP_MANIFEST: &str = r#"{
    "PackageIdentifier": "Contoso.Tool",
    "PackageVersion": "2.4.1",
    "NestedInstallerType": "portable",
    "NestedInstallerFiles": [
        { "RelativeFilePath": "tool.exe", "PortableCommandAlias": "tool" }
    ],
    "Installers": [
        {
            "InstallerType": "zip",
            "Architecture": "x64",
            "InstallerUrl": "https://example.com/tool-x64.zip"
        }
    ]
}"#;

#[test]
fn test_portable_zip_end_to_end() {
    let manifest = Manifest::from_json(PORTABLE_ZIP_MANIFEST).unwrap();
    let report = coordinator().process_manifest(&manifest);

    assert!(report.is_valid());
    assert_eq!(report.valid_count(), 1);

    let installer = report.valid_installers().next().unwrap();
    assert_eq!(installer.installer_type, InstallerType::Zip);
    assert_eq!(installer.nested_installer_type, Some(NestedInstallerType::Portable));
    let files: Vec<_> = installer.nested_installer_files.iter().flatten().cloned().collect();
    assert_eq!(files, vec![NestedInstallerFile::new("tool.exe").with_alias("tool")]);

    let json = serde_json::to_value(installer.to_rest()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "InstallerType": "zip",
            "Architecture": "x64",
            "InstallerUrl": "https://example.com/tool-x64.zip",
            "NestedInstallerType": "portable",
            "NestedInstallerFiles": [
                { "RelativeFilePath": "tool.exe", "PortableCommandAlias": "tool" }
            ]
        })
    );
}

#[test]
fn test_manifest_from_file_with_mixed_installers() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "PackageIdentifier": "Contoso.Suite",
            "PackageVersion": "1.0.0",
            "NestedInstallerType": "msi",
            "NestedInstallerFiles": [{{ "RelativeFilePath": "setup.msi" }}],
            "Installers": [
                {{ "InstallerType": "zip" }},
                {{ "InstallerType": "msi" }},
                {{ "InstallerType": "custom" }}
            ]
        }}"#
    )
    .unwrap();

    let manifest = Manifest::from_file(file.path()).unwrap();
    let report = coordinator().process_manifest(&manifest);

    // The msi entry inherits a nested type it cannot carry
    assert_eq!(report.failures().map(|(i, _)| i).collect::<Vec<_>>(), vec![1]);

    let published: Vec<_> = report.valid_installers().map(|i| i.to_rest()).collect();
    assert_eq!(published.len(), 2);
    assert_eq!(published[0].nested_installer_type, Some(NestedInstallerType::Msi));
    assert_eq!(published[1].installer_type, InstallerType::Zip);
    assert_eq!(published[1].nested_installer_type, Some(NestedInstallerType::Exe));
}

#[test]
fn test_declared_type_spelling_is_published_unchanged() {
    let manifest = Manifest::new("Contoso.Tool", "1.0.0").with_nested(decl().with_type("Portable"));
    let entry = InstallerEntry::new(InstallerType::Zip);

    let errors = coordinator().process(&entry, &manifest).unwrap_err();
    assert_eq!(
        errors.errors().collect::<Vec<_>>(),
        vec![&ValidationError::UnknownNestedType {
            value: "Portable".to_string()
        }]
    );

    let manifest = Manifest::new("Contoso.Tool", "1.0.0").with_nested(decl().with_type("portable"));
    let installer = coordinator().process(&entry, &manifest).unwrap();
    let json = serde_json::to_value(installer.to_rest()).unwrap();
    assert_eq!(json["NestedInstallerType"], "portable");
}

#[test]
fn test_manifest_without_identifier_is_rejected() {
    let json = r#"{ "PackageIdentifier": " ", "PackageVersion": "1.0.0" }"#;
    assert!(Manifest::from_json(json).is_err());
}

// =============================================================================
// Policy
// =============================================================================

#[test]
fn test_policy_file_tightens_limits() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{ "max_alias_length": 4, "alias_on_non_portable": "reject" }}"#).unwrap();

    let policy = ValidationPolicy::load_from_file(file.path()).unwrap();
    assert_eq!(policy.max_alias_length, 4);
    assert_eq!(policy.alias_on_non_portable, AliasPolicy::Reject);
    assert_eq!(policy.max_path_length, ValidationPolicy::default().max_path_length);

    let coordinator = InstallerValidationCoordinator::new(policy);
    let manifest = Manifest::new("Contoso.Tool", "1.0.0");

    let entry = InstallerEntry::new(InstallerType::Zip).with_nested(
        decl()
            .with_type("portable")
            .with_files(vec![NestedInstallerFile::new("tool.exe").with_alias("toolbox")]),
    );
    let errors = coordinator.process(&entry, &manifest).unwrap_err();
    assert_eq!(
        errors.count_where(|e| matches!(e, ValidationError::InvalidAlias { .. })),
        1
    );

    let entry = InstallerEntry::new(InstallerType::Zip).with_nested(
        decl()
            .with_type("msi")
            .with_files(vec![NestedInstallerFile::new("setup.msi").with_alias("s")]),
    );
    let errors = coordinator.process(&entry, &manifest).unwrap_err();
    assert_eq!(
        errors.count_where(|e| matches!(e, ValidationError::AliasOnNonPortable { .. })),
        1
    );
}

#[test]
fn test_invalid_policy_file_is_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{ "min_alias_length": 10, "max_alias_length": 5 }}"#).unwrap();
    assert!(ValidationPolicy::load_from_file(file.path()).is_err());
}
