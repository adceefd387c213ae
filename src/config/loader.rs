// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::validation::validate_config;
use crate::errors::ConfigurationError;
use crate::key::{KeyField, KeySpec};

/// Configuration for a file-backed merge run.
///
/// Loaded from YAML (`.yaml`/`.yml`) or TOML (`.toml`). Input paths that are
/// relative are resolved against the directory holding the configuration file.
///
/// # Example
/// ```yaml
/// fail_on_missing: true
/// inputs:
///   - path: data/people.jsonl
///     name: people
///     key: id
///   - path: data/scores.jsonl
///     name: scores
///     key: 0
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MergeConfig {
    pub inputs: Vec<InputConfig>,
    /// Treat keys that never aligned as a failure of the run.
    #[serde(default)]
    pub fail_on_missing: bool,
}

/// One JSON Lines input of a [`MergeConfig`].
///
/// # Fields
/// * `path` - JSON Lines file, one item per line
/// * `name` - optional identity; naming any input switches output to mappings
/// * `key` - optional field name or array index; the default key chain applies when absent
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct InputConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub key: Option<KeyField>,
}

impl InputConfig {
    pub fn key_spec(&self) -> KeySpec {
        match &self.key {
            Some(field) => KeySpec::Field(field.clone()),
            None => KeySpec::Default,
        }
    }
}

/// Supported configuration file formats, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Result<Self, ConfigurationError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("toml") => Ok(ConfigFormat::Toml),
            _ => Err(ConfigurationError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Parse configuration text in the given format.
pub fn parse_config(content: &str, format: ConfigFormat) -> Result<MergeConfig, ConfigurationError> {
    let cfg: MergeConfig = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(content)?,
        ConfigFormat::Toml => toml::from_str(content)?,
    };
    Ok(cfg)
}

/// Load a config file and resolve its input paths.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<MergeConfig, ConfigurationError> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path)?;
    let content = fs::read_to_string(path).map_err(|source| ConfigurationError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut cfg = parse_config(&content, format)?;
    if cfg.inputs.is_empty() {
        return Err(ConfigurationError::NoInputs {
            path: path.to_path_buf(),
        });
    }

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    for input in &mut cfg.inputs {
        if input.path.is_relative() {
            input.path = base.join(&input.path);
        }
    }

    Ok(cfg)
}

/// Load a config file and reject input identities the merge would refuse.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<MergeConfig, ConfigurationError> {
    let cfg = load_config(path)?;
    validate_config(&cfg)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn parse_basic_yaml() {
        let yaml = r#"
inputs:
  - path: people.jsonl
    name: people
    key: c
  - path: scores.jsonl
    key: 1
"#;
        let cfg = parse_config(yaml, ConfigFormat::Yaml).unwrap();
        assert_eq!(cfg.inputs.len(), 2);
        assert!(!cfg.fail_on_missing);
        assert_eq!(cfg.inputs[0].name.as_deref(), Some("people"));
        assert_eq!(cfg.inputs[0].key, Some(KeyField::Name("c".to_string())));
        assert_eq!(cfg.inputs[1].name, None);
        assert_eq!(cfg.inputs[1].key, Some(KeyField::Index(1)));
    }

    #[test]
    fn parse_basic_toml() {
        let toml = r#"
fail_on_missing = true

[[inputs]]
path = "a.jsonl"

[[inputs]]
path = "b.jsonl"
key = "id"
"#;
        let cfg = parse_config(toml, ConfigFormat::Toml).unwrap();
        assert!(cfg.fail_on_missing);
        assert_eq!(cfg.inputs[0].key, None);
        assert!(matches!(cfg.inputs[0].key_spec(), KeySpec::Default));
        assert!(matches!(cfg.inputs[1].key_spec(), KeySpec::Field(KeyField::Name(_))));
    }

    #[test]
    fn format_is_chosen_by_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("a.yml")).unwrap(), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.YAML")).unwrap(), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.toml")).unwrap(), ConfigFormat::Toml);
        assert!(matches!(
            ConfigFormat::from_path(Path::new("a.json")),
            Err(ConfigurationError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn relative_paths_resolve_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = Builder::new().suffix(".yaml").tempfile_in(dir.path()).unwrap();
        writeln!(file, "inputs:\n  - path: left.jsonl\n  - path: /abs/right.jsonl").unwrap();

        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.inputs[0].path, dir.path().join("left.jsonl"));
        assert_eq!(cfg.inputs[1].path, PathBuf::from("/abs/right.jsonl"));
    }

    #[test]
    fn empty_inputs_are_rejected() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "inputs = []").unwrap();

        assert!(matches!(
            load_config(file.path()),
            Err(ConfigurationError::NoInputs { .. })
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            load_config("/definitely/not/here.yaml"),
            Err(ConfigurationError::Io { .. })
        ));
    }

    #[test]
    fn duplicate_names_fail_validation() {
        let mut file = Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "inputs:\n  - path: a.jsonl\n    name: x\n  - path: b.jsonl\n    name: x"
        )
        .unwrap();

        assert!(load_config(file.path()).is_ok());
        assert!(matches!(
            load_and_validate_config(file.path()),
            Err(ConfigurationError::DuplicateSourceName { .. })
        ));
    }
}
