//! Workspace settings.
//!
//! Settings are read from an optional `.hydra-lsp.yaml` at the workspace
//! root. Every field is optional:
//!
//! ```yaml
//! defaults_key: defaults
//! self_marker: _self_
//! extension: yaml
//! suppression_marker: "# hydra: skip"
//! diagnostic_source: hydra-lsp
//! unresolved_diagnostics: true
//! ```

use hydra_config::ResolveOptions;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the settings file at the workspace root.
pub const SETTINGS_FILE: &str = ".hydra-lsp.yaml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Top-level key holding the defaults list.
    pub defaults_key: String,
    /// Defaults entry that stands for the document itself.
    pub self_marker: String,
    /// Extension of config documents, without the dot.
    pub extension: String,
    /// Text that silences unresolved-reference diagnostics on its line.
    pub suppression_marker: String,
    /// Source string attached to diagnostics.
    pub diagnostic_source: String,
    /// Report references that resolve to nothing.
    pub unresolved_diagnostics: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let options = ResolveOptions::default();
        Self {
            defaults_key: options.defaults_key,
            self_marker: options.self_marker,
            extension: options.extension,
            suppression_marker: "# hydra: skip".to_string(),
            diagnostic_source: "hydra-lsp".to_string(),
            unresolved_diagnostics: true,
        }
    }
}

/// Errors that can occur while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("invalid settings in {}: {source}", path.display())]
    Invalid {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

impl Settings {
    /// Parse settings from YAML text. Empty text yields the defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    /// Load `.hydra-lsp.yaml` from `dir`, or the defaults if it does not exist.
    pub fn load_from_dir(dir: &Path) -> Result<Self, SettingsError> {
        let path = dir.join(SETTINGS_FILE);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(dir = %dir.display(), "no settings file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => return Err(SettingsError::Io { path, source }),
        };

        let settings =
            Self::from_yaml_str(&text).map_err(|source| SettingsError::Invalid {
                path: path.clone(),
                source,
            })?;
        tracing::info!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// The subset of settings the defaults resolver uses.
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            defaults_key: self.defaults_key.clone(),
            self_marker: self.self_marker.clone(),
            extension: self.extension.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.defaults_key, "defaults");
        assert_eq!(settings.self_marker, "_self_");
        assert_eq!(settings.extension, "yaml");
        assert_eq!(settings.suppression_marker, "# hydra: skip");
        assert_eq!(settings.diagnostic_source, "hydra-lsp");
        assert!(settings.unresolved_diagnostics);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let settings =
            Settings::from_yaml_str("extension: yml\nunresolved_diagnostics: false\n").unwrap();
        assert_eq!(settings.extension, "yml");
        assert!(!settings.unresolved_diagnostics);
        assert_eq!(settings.self_marker, "_self_");
    }

    #[test]
    fn empty_text_is_default() {
        assert_eq!(Settings::from_yaml_str("\n").unwrap(), Settings::default());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(Settings::from_yaml_str("extention: yml\n").is_err());
    }

    #[test]
    fn load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Settings::load_from_dir(dir.path()).unwrap(), Settings::default());

        std::fs::write(dir.path().join(SETTINGS_FILE), "diagnostic_source: hydra\n").unwrap();
        let settings = Settings::load_from_dir(dir.path()).unwrap();
        assert_eq!(settings.diagnostic_source, "hydra");
        assert_eq!(settings.resolve_options(), ResolveOptions::default());

        std::fs::write(dir.path().join(SETTINGS_FILE), "extension: [1\n").unwrap();
        let err = Settings::load_from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { .. }));
    }
}
