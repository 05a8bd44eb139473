use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use crate::value::{Options, Value};

/// Registry-wide switches and the base defaults for the `use*`/`validate` options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Treat array-valued keys named after a mode as nested groups pinned to that mode.
    pub use_mode_groups: bool,
    /// Treat array-valued keys named after a preset as nested loads under that preset.
    pub use_sets_groups: bool,
    /// Default for the `validate` option.
    pub validate: bool,
    /// Default for the `usePromise` option.
    pub use_promise: bool,
    /// Default for the `useReadyState` option.
    pub use_ready_state: bool,
    /// Default for the `useOnLoad` option.
    pub use_on_load: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            use_mode_groups: false,
            use_sets_groups: true,
            validate: true,
            use_promise: true,
            use_ready_state: false,
            use_on_load: true,
        }
    }
}

/// Network settings for [`CurlFetch`](crate::fetch::CurlFetch).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
    pub max_redirections: u32,
    /// Optional `User-Agent` header.
    pub user_agent: Option<String>,
    /// Relative URLs are resolved against this, when set.
    pub base_url: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            timeout_secs: 30,
            max_redirections: 10,
            user_agent: None,
            base_url: None,
        }
    }
}

/// Global configuration loaded from `~/.config/sload/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SloadConfig {
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    /// Option overrides applied to the default settings document
    /// (e.g. `dataPrefix = "https://cdn.example.com/"`). Validated like any `set`.
    #[serde(default)]
    pub options: BTreeMap<String, serde_json::Value>,
}

impl SloadConfig {
    pub fn from_toml_str(data: &str) -> Result<Self> {
        Ok(toml::from_str(data)?)
    }

    /// The `[options]` table as loader option values.
    pub fn option_overrides(&self) -> Options {
        self.options
            .iter()
            .map(|(k, v)| (k.clone(), Value::from(v.clone())))
            .collect()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("sload")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SloadConfig> {
    let path = config_path()?;
    load_or_init_at(&path)
}

/// Like [`load_or_init`] with an explicit path.
pub fn load_or_init_at(path: &std::path::Path) -> Result<SloadConfig> {
    if !path.exists() {
        let default_cfg = SloadConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)?;
    SloadConfig::from_toml_str(&data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = SloadConfig::default();
        assert!(!cfg.registry.use_mode_groups);
        assert!(cfg.registry.use_sets_groups);
        assert!(cfg.registry.validate);
        assert!(cfg.registry.use_on_load);
        assert!(!cfg.registry.use_ready_state);
        assert_eq!(cfg.fetch.connect_timeout_secs, 15);
        assert_eq!(cfg.fetch.timeout_secs, 30);
        assert_eq!(cfg.fetch.max_redirections, 10);
        assert!(cfg.options.is_empty());
    }

    #[test]
    fn config_toml_partial_sections() {
        let toml = r#"
            [registry]
            use_mode_groups = true

            [fetch]
            timeout_secs = 5
            base_url = "https://cdn.example.com/"
        "#;
        let cfg = SloadConfig::from_toml_str(toml).unwrap();
        assert!(cfg.registry.use_mode_groups);
        assert!(cfg.registry.use_sets_groups);
        assert_eq!(cfg.fetch.timeout_secs, 5);
        assert_eq!(cfg.fetch.connect_timeout_secs, 15);
        assert_eq!(cfg.fetch.base_url.as_deref(), Some("https://cdn.example.com/"));
    }

    #[test]
    fn config_toml_option_overrides() {
        let toml = r#"
            [options]
            dataPrefix = "https://api.example.com/"
            validate = false
        "#;
        let cfg = SloadConfig::from_toml_str(toml).unwrap();
        let opts = cfg.option_overrides();
        assert_eq!(
            opts.get("dataPrefix"),
            Some(&Value::from("https://api.example.com/"))
        );
        assert_eq!(opts.get("validate"), Some(&Value::Bool(false)));
    }

    #[test]
    fn load_or_init_creates_then_reads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let created = load_or_init_at(&path).unwrap();
        assert!(path.exists());
        assert_eq!(created.fetch.timeout_secs, 30);

        fs::write(&path, "[fetch]\ntimeout_secs = 7\n").unwrap();
        let read = load_or_init_at(&path).unwrap();
        assert_eq!(read.fetch.timeout_secs, 7);
    }
}
