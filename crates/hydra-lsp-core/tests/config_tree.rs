//! End-to-end tests over config trees on disk.

use hydra_config::ConfigValue;
use hydra_lsp_core::{
    DocumentStore, Position, Settings, SymbolTable, diagnose, load, path_to_uri,
};
use hydra_yaml::KeyPath;
use std::path::Path;
use tempfile::TempDir;

const LOCAL_PATH: &str = "local_path: /my/mnt/disk\n";

const MATERIALS: &str = "\
defaults:
  - local_path
  - _self_

trainer:
  accelerator: gpu
  devices: 1
data:
  root: ${local_path}/materials
  loader:
    batch_size: 16
    pin_memory: true
";

const PRECOMPUTE: &str = "\
defaults:
  - config_materials
  - _self_

data:
  original_image_size: [1024, 1024]
  nb_chn: 10
  dataset:
    train:
      data_len: -1
      path: ${data.root}/train
    val:
      data_len: ${..train.data_len}
";

fn artifacts() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("local_path.yaml"), LOCAL_PATH).unwrap();
    std::fs::write(dir.path().join("config_materials.yaml"), MATERIALS).unwrap();
    std::fs::write(
        dir.path().join("config_ldm_precompute_dataset.yaml"),
        PRECOMPUTE,
    )
    .unwrap();
    dir
}

fn uri(dir: &Path, name: &str) -> String {
    path_to_uri(&dir.join(name))
}

fn load_tree(dir: &Path, name: &str) -> SymbolTable {
    load(&uri(dir, name), &DocumentStore::new(), &Settings::default()).unwrap()
}

fn get<'a>(table: &'a SymbolTable, key: &str) -> Option<&'a ConfigValue> {
    table.get(key, &KeyPath::root())
}

#[test]
fn load_single_document() {
    let dir = artifacts();
    let table = load_tree(dir.path(), "local_path.yaml");
    assert_eq!(
        get(&table, "local_path").and_then(ConfigValue::as_str),
        Some("/my/mnt/disk")
    );
}

#[test]
fn dot_access() {
    let dir = artifacts();
    let table = load_tree(dir.path(), "config_materials.yaml");

    assert_eq!(
        get(&table, "local_path").and_then(ConfigValue::as_str),
        Some("/my/mnt/disk")
    );
    assert_eq!(
        get(&table, "defaults"),
        Some(&ConfigValue::Array(vec![
            ConfigValue::String("local_path".into()),
            ConfigValue::String("_self_".into()),
        ]))
    );
    assert_eq!(
        get(&table, "trainer.accelerator").and_then(ConfigValue::as_str),
        Some("gpu")
    );
    assert_eq!(
        get(&table, "data.loader.pin_memory"),
        Some(&ConfigValue::Bool(true))
    );
}

#[test]
fn inheritance() {
    let dir = artifacts();
    let table = load_tree(dir.path(), "config_ldm_precompute_dataset.yaml");

    assert_eq!(
        get(&table, "data.original_image_size"),
        Some(&ConfigValue::Array(vec![
            ConfigValue::Integer(1024),
            ConfigValue::Integer(1024),
        ]))
    );
    assert_eq!(get(&table, "data.nb_chn"), Some(&ConfigValue::Integer(10)));
    assert_eq!(
        get(&table, "data.dataset.train.data_len"),
        Some(&ConfigValue::Integer(-1))
    );
    assert_eq!(
        get(&table, "data.loader.batch_size"),
        Some(&ConfigValue::Integer(16))
    );
    assert_eq!(
        get(&table, "trainer.accelerator").and_then(ConfigValue::as_str),
        Some("gpu")
    );
}

#[test]
fn definitions_point_at_the_winning_document() {
    let dir = artifacts();
    let table = load_tree(dir.path(), "config_ldm_precompute_dataset.yaml");
    let definitions = table.definitions();

    assert_eq!(
        definitions.lookup("local_path").unwrap().uri,
        uri(dir.path(), "local_path.yaml")
    );
    assert_eq!(
        definitions.lookup("data.loader.batch_size").unwrap().uri,
        uri(dir.path(), "config_materials.yaml")
    );

    let data = definitions.lookup("data").unwrap();
    assert_eq!(data.uri, uri(dir.path(), "config_ldm_precompute_dataset.yaml"));
    assert_eq!(data.range.start, Position::new(4, 0));
}

#[test]
fn every_reference_resolves() {
    let dir = artifacts();
    let store = DocumentStore::new();
    let settings = Settings::default();
    let table = load(
        &uri(dir.path(), "config_ldm_precompute_dataset.yaml"),
        &store,
        &settings,
    )
    .unwrap();

    assert_eq!(table.references().lookup("local_path").len(), 1);
    assert_eq!(table.references().lookup("..train.data_len").len(), 1);
    assert!(diagnose(&table, &store, None, &settings).is_empty());
    assert!(table.issues().is_empty());
}

#[test]
fn definition_positions_round_trip() {
    let dir = artifacts();
    let table = load_tree(dir.path(), "config_ldm_precompute_dataset.yaml");

    for (key, location) in table.definitions().iter() {
        assert_eq!(
            table.locate(&location.uri, location.range.start),
            Some(key),
            "{key} at {location:?}"
        );
    }
}

#[test]
fn reloads_are_idempotent() {
    let dir = artifacts();
    let first = load_tree(dir.path(), "config_ldm_precompute_dataset.yaml");
    let second = load_tree(dir.path(), "config_ldm_precompute_dataset.yaml");

    assert_eq!(first.tree(), second.tree());
    let defs = |t: &SymbolTable| -> Vec<String> {
        t.definitions()
            .iter()
            .map(|(k, l)| format!("{k} {} {:?}", l.uri, l.range))
            .collect()
    };
    assert_eq!(defs(&first), defs(&second));
    let refs = |t: &SymbolTable| -> Vec<String> {
        t.references().all().map(|r| format!("{} {:?}", r.name, r.location)).collect()
    };
    assert_eq!(refs(&first), refs(&second));
}

#[test]
fn definition_and_reference_extraction() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.yaml"),
        "# experiment\n# settings\n\nfoo: 1\nbaz: \"${bar}/x\"\n",
    )
    .unwrap();
    let table = load_tree(dir.path(), "config.yaml");

    assert_eq!(table.definitions().lookup("foo").unwrap().range.start.line, 3);
    let bar = table.references().occurrences("bar");
    assert_eq!(bar.len(), 1);
    assert!(bar[0].enclosing.is_empty());
}

#[test]
fn list_item_keys_are_not_definitions() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.yaml"),
        "callbacks:\n  - name: checkpoint\n    every: 5\nafter: 1\n",
    )
    .unwrap();
    let table = load_tree(dir.path(), "config.yaml");

    let keys: Vec<String> = table.definitions().iter().map(|(k, _)| k.to_string()).collect();
    assert_eq!(keys, vec!["callbacks", "after"]);
    assert_eq!(
        get(&table, "callbacks.0.name").and_then(ConfigValue::as_str),
        Some("checkpoint")
    );
}
