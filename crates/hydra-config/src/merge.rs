//! Deep merging of config maps.

use crate::types::{ConfigMap, ConfigValue};

/// Merge `overlay` into `base`, key by key.
///
/// A key whose overlay value is a non-empty map is merged recursively into
/// the base value at that key (a non-map base value is discarded first).
/// Every other overlay value, including an empty map, replaces the base
/// value wholesale. New keys are appended in overlay order.
pub fn deep_merge(base: &mut ConfigMap, overlay: ConfigMap) {
    for (key, value) in overlay {
        match value {
            ConfigValue::Map(entries) if !entries.is_empty() => {
                let slot = base.entry(key).or_insert_with(ConfigValue::empty_map);
                if !slot.is_map() {
                    *slot = ConfigValue::empty_map();
                }
                if let ConfigValue::Map(existing) = slot {
                    deep_merge(existing, entries);
                }
            }
            other => {
                base.insert(key, other);
            }
        }
    }
}
