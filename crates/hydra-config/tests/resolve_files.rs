//! Defaults resolution against real files.

use hydra_config::{ConfigValue, DefaultsResolver, FileSystem, ResolveError, ResolveIssue};
use hydra_yaml::KeyPath;

fn write(dir: &std::path::Path, name: &str, text: &str) {
    std::fs::write(dir.join(name), text).unwrap();
}

#[test]
fn resolves_a_tree_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "config.yaml", "defaults:\n  - model\n  - _self_\nmodel:\n  depth: 50\n");
    write(dir.path(), "model.yaml", "model:\n  depth: 18\n  width: 64\n");

    let mut issues: Vec<ResolveIssue> = Vec::new();
    let tree = DefaultsResolver::new(FileSystem)
        .resolve(&dir.path().join("config.yaml"), &mut issues)
        .unwrap();

    assert!(issues.is_empty());
    assert_eq!(
        tree.get_path(&KeyPath::parse("model.depth")),
        Some(&ConfigValue::Integer(50))
    );
    assert_eq!(
        tree.get_path(&KeyPath::parse("model.width")),
        Some(&ConfigValue::Integer(64))
    );
}

#[test]
fn missing_files_are_issues_not_errors() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "config.yaml", "defaults:\n  - absent\nkept: 1\n");

    let mut issues: Vec<ResolveIssue> = Vec::new();
    let tree = DefaultsResolver::new(FileSystem)
        .resolve(&dir.path().join("config.yaml"), &mut issues)
        .unwrap();

    assert_eq!(tree.get_path(&KeyPath::parse("kept")), Some(&ConfigValue::Integer(1)));
    assert_eq!(issues.len(), 1);
    assert!(matches!(
        &issues[0].error,
        ResolveError::MissingDefaultFile { name, .. } if name == "absent"
    ));
}

#[test]
fn missing_entry_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut issues: Vec<ResolveIssue> = Vec::new();
    let err = DefaultsResolver::new(FileSystem)
        .resolve(&dir.path().join("nope.yaml"), &mut issues)
        .unwrap_err();
    assert!(matches!(err, ResolveError::Unreadable { .. }));
}
