//! Layered configuration for the scan pipeline (§6, §10): defaults, then
//! an optional YAML config file, then `SCANARCH_*` environment variables.
//! A missing or malformed config file is a logged warning, never an
//! error — [`Config::load`] always returns a usable value, equivalent to
//! "all groups enabled, no excludes" (§6).

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannersConfig {
    #[serde(default = "default_groups")]
    pub groups: Vec<String>,
    #[serde(default)]
    pub enabled: Vec<String>,
    #[serde(default)]
    pub disabled: Vec<String>,
}

impl Default for ScannersConfig {
    fn default() -> Self {
        Self {
            groups: default_groups(),
            enabled: Vec::new(),
            disabled: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default = "default_root")]
    pub root: PathBuf,
    #[serde(default)]
    pub excludes: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            excludes: Vec::new(),
        }
    }
}

/// Opaque key/value map passed through to renderers untouched (§6);
/// the core never reads it.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RendererConfig {
    #[serde(default)]
    pub settings: HashMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub scanners: ScannersConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub renderer: RendererConfig,
}

fn default_groups() -> Vec<String> {
    ["java", "python", "dotnet", "go", "ruby", "javascript", "messaging", "schema"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

impl Config {
    /// Load the layered configuration from `path`. Never fails: a
    /// missing or malformed file falls back to [`Config::default`] with a
    /// `WARN` log (§6, §7 `configuration-warning`).
    pub fn load(path: impl AsRef<Path>) -> Self {
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("SCANARCH_").map(|key| key.as_str().to_lowercase().replace("__", ".").into()));

        match figment.extract() {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("configuration file '{}' missing or malformed, using defaults: {err}", path.as_ref().display());
                Config::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_file_falls_back_to_defaults() {
        let config = Config::load("/nonexistent/scanarch.yaml");
        assert_eq!(config.scanners.groups.len(), 8);
        assert!(config.scanners.enabled.is_empty());
        assert!(config.scanners.disabled.is_empty());
    }

    #[test]
    fn malformed_config_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scanarch.yaml");
        std::fs::write(&path, "not: [valid, yaml structure for this schema: {{{").unwrap();
        let config = Config::load(&path);
        assert_eq!(config.scan.root, default_root());
    }

    #[test]
    fn config_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scanarch.yaml");
        std::fs::write(&path, "scanners:\n  groups: [ruby, messaging]\n  disabled: [sidekiq-workers]\nscan:\n  root: src\n").unwrap();
        let config = Config::load(&path);
        assert_eq!(config.scanners.groups, vec!["ruby".to_string(), "messaging".to_string()]);
        assert_eq!(config.scanners.disabled, vec!["sidekiq-workers".to_string()]);
        assert_eq!(config.scan.root, PathBuf::from("src"));
    }
}
