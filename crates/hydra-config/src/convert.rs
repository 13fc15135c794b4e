//! Conversion from YAML values to `ConfigValue`.

use crate::types::{ConfigMap, ConfigValue};
use yaml_rust2::Yaml;

/// Convert a `yaml-rust2` value to a `ConfigValue`.
///
/// Scalar mapping keys are stringified (`1: x` gets the key `"1"`); entries
/// with collection keys are dropped. Aliases are not resolved and become null.
pub fn config_value_from_yaml(yaml: &Yaml) -> ConfigValue {
    match yaml {
        Yaml::Null | Yaml::BadValue | Yaml::Alias(_) => ConfigValue::Null,
        Yaml::Boolean(b) => ConfigValue::Bool(*b),
        Yaml::Integer(i) => ConfigValue::Integer(*i),
        Yaml::Real(raw) => match yaml.as_f64() {
            Some(f) => ConfigValue::Real(f),
            None => ConfigValue::String(raw.clone()),
        },
        Yaml::String(s) => ConfigValue::String(s.clone()),
        Yaml::Array(items) => ConfigValue::Array(items.iter().map(config_value_from_yaml).collect()),
        Yaml::Hash(entries) => {
            let map: ConfigMap = entries
                .iter()
                .filter_map(|(key, value)| {
                    scalar_key(key).map(|key| (key, config_value_from_yaml(value)))
                })
                .collect();
            ConfigValue::Map(map)
        }
    }
}

fn scalar_key(key: &Yaml) -> Option<String> {
    match key {
        Yaml::String(s) | Yaml::Real(s) => Some(s.clone()),
        Yaml::Integer(i) => Some(i.to_string()),
        Yaml::Boolean(b) => Some(b.to_string()),
        Yaml::Null => Some("null".to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yaml_rust2::YamlLoader;

    fn convert(text: &str) -> ConfigValue {
        let docs = YamlLoader::load_from_str(text).unwrap();
        config_value_from_yaml(&docs[0])
    }

    #[test]
    fn test_scalars() {
        let value = convert("s: text\ni: -1\nf: 0.5\nb: true\nn: ~\n");
        let map = value.as_map().unwrap();
        assert_eq!(map["s"], ConfigValue::String("text".into()));
        assert_eq!(map["i"], ConfigValue::Integer(-1));
        assert_eq!(map["f"], ConfigValue::Real(0.5));
        assert_eq!(map["b"], ConfigValue::Bool(true));
        assert_eq!(map["n"], ConfigValue::Null);
    }

    #[test]
    fn test_key_order_is_preserved() {
        let value = convert("zeta: 1\nalpha: 2\nmid: 3\n");
        let keys: Vec<&str> = value.as_map().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_non_string_keys_are_stringified() {
        let value = convert("1: one\ntrue: yes\n[a]: dropped\n");
        let map = value.as_map().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["1"], ConfigValue::String("one".into()));
        assert!(map.contains_key("true"));
    }

    #[test]
    fn test_serializes_as_plain_json() {
        let value = convert("size: [1024, 1024]\nloader:\n  pin_memory: true\n");
        insta::assert_snapshot!(
            serde_json::to_string(&value).unwrap(),
            @r#"{"size":[1024,1024],"loader":{"pin_memory":true}}"#
        );
    }
}
