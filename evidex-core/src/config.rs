//! Configuration system for evidex.
//!
//! Uses `figment` for layered configuration: defaults -> user config file ->
//! workspace config file -> explicit config file -> environment. CLI flags are
//! applied on top by the binary. Configuration is loaded from
//! `~/.config/evidex/config.toml` and/or `.evidex/config.toml` in the working
//! directory.

use crate::error::ConfigError;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvidexConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Which evidence service implementation to talk to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceBackend {
    /// JSON-over-HTTP evidence service.
    #[default]
    Http,
    /// A search result read from a local JSON file.
    Fixture,
    /// In-process canned responses.
    Mock,
}

impl std::fmt::Display for ServiceBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceBackend::Http => write!(f, "http"),
            ServiceBackend::Fixture => write!(f, "fixture"),
            ServiceBackend::Mock => write!(f, "mock"),
        }
    }
}

/// Evidence service connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub backend: ServiceBackend,
    /// Base URL of the evidence service (`/search` and `/suggest` are appended).
    pub base_url: String,
    /// Environment variable holding the service API key.
    pub api_key_env: String,
    /// API key set directly. Never written back out.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Whole-request timeout for search calls, in seconds.
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// JSON file served by the fixture backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixture_path: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            backend: ServiceBackend::Http,
            base_url: "http://127.0.0.1:8787".to_string(),
            api_key_env: "EVIDEX_API_KEY".to_string(),
            api_key: None,
            timeout_secs: 120,
            connect_timeout_secs: 10,
            fixture_path: None,
        }
    }
}

/// Search session behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Number of recent queries kept, newest first.
    pub history_limit: usize,
    /// Suggestions are requested once the query is longer than this many
    /// characters.
    pub suggest_min_chars: usize,
    /// Drop search/suggestion responses that arrive after a newer request was
    /// issued. Off by default: responses are applied in arrival order.
    pub discard_stale_responses: bool,
    /// Queries shown in the history list before the first search.
    pub seed_history: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_limit: 5,
            suggest_min_chars: 5,
            discard_stale_responses: false,
            seed_history: Vec::new(),
        }
    }
}

/// UI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Color theme name.
    pub theme: String,
    /// Whether the history sidebar starts open.
    pub show_sidebar: bool,
    /// Redraw interval for the loading animation, in milliseconds.
    pub tick_rate_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            show_sidebar: true,
            tick_rate_ms: 100,
        }
    }
}

impl EvidexConfig {
    /// Reject settings the session cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session.history_limit == 0 {
            return Err(ConfigError::Invalid {
                message: "session.history_limit must be at least 1".into(),
            });
        }
        if self.service.backend == ServiceBackend::Http && self.service.base_url.trim().is_empty()
        {
            return Err(ConfigError::Invalid {
                message: "service.base_url is required for the http backend".into(),
            });
        }
        if self.service.backend == ServiceBackend::Fixture && self.service.fixture_path.is_none() {
            return Err(ConfigError::Invalid {
                message: "service.fixture_path is required for the fixture backend".into(),
            });
        }
        if self.ui.tick_rate_ms == 0 {
            return Err(ConfigError::Invalid {
                message: "ui.tick_rate_ms must be greater than 0".into(),
            });
        }
        Ok(())
    }

    /// Render the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })
    }
}

/// Platform directories for evidex.
pub fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("dev", "evidex", "evidex")
}

/// Load configuration from layered sources.
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with `EVIDEX_`, `__` between sections)
/// 2. Explicit config file (`--config`)
/// 3. Workspace-local config (`.evidex/config.toml`)
/// 4. User config (`~/.config/evidex/config.toml`)
/// 5. Built-in defaults
///
/// The merged result is not validated here, so command-line overrides can
/// still repair it. Call [`EvidexConfig::validate`] once they are applied.
pub fn load_config(
    workspace: Option<&Path>,
    config_file: Option<&Path>,
) -> Result<EvidexConfig, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(EvidexConfig::default()));

    if let Some(dirs) = project_dirs() {
        let user_config = dirs.config_dir().join("config.toml");
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    if let Some(ws) = workspace {
        let ws_config = ws.join(".evidex").join("config.toml");
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    if let Some(path) = config_file {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        figment = figment.merge(Toml::file(path));
    }

    // EVIDEX_SERVICE__BASE_URL, EVIDEX_SESSION__HISTORY_LIMIT, ...
    figment = figment.merge(Env::prefixed("EVIDEX_").split("__"));

    let config: EvidexConfig = figment.extract().map_err(|e| ConfigError::ParseError {
        message: e.to_string(),
    })?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = EvidexConfig::default();
        assert_eq!(config.service.backend, ServiceBackend::Http);
        assert_eq!(config.session.history_limit, 5);
        assert_eq!(config.session.suggest_min_chars, 5);
        assert!(!config.session.discard_stale_responses);
        assert_eq!(config.ui.theme, "dark");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_backend_display() {
        assert_eq!(ServiceBackend::Http.to_string(), "http");
        assert_eq!(ServiceBackend::Fixture.to_string(), "fixture");
        assert_eq!(ServiceBackend::Mock.to_string(), "mock");
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = EvidexConfig::default();
        let toml_str = config.to_toml().unwrap();
        let deserialized: EvidexConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(deserialized, config);
    }

    #[test]
    fn test_api_key_is_not_serialized() {
        let mut config = EvidexConfig::default();
        config.service.api_key = Some("secret-key".into());
        let toml_str = config.to_toml().unwrap();
        assert!(!toml_str.contains("secret-key"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: EvidexConfig = toml::from_str(
            r#"
[session]
history_limit = 8
"#,
        )
        .unwrap();
        assert_eq!(config.session.history_limit, 8);
        assert_eq!(config.session.suggest_min_chars, 5);
        assert_eq!(config.ui, UiConfig::default());
    }

    #[test]
    fn test_validate_rejects_zero_history() {
        let mut config = EvidexConfig::default();
        config.session.history_limit = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_validate_fixture_requires_path() {
        let mut config = EvidexConfig::default();
        config.service.backend = ServiceBackend::Fixture;
        assert!(config.validate().is_err());
        config.service.fixture_path = Some(PathBuf::from("result.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_config_from_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let evidex_dir = dir.path().join(".evidex");
        std::fs::create_dir_all(&evidex_dir).unwrap();
        std::fs::write(
            evidex_dir.join("config.toml"),
            r#"
[service]
base_url = "https://evidence.example.org/api"
timeout_secs = 30

[session]
seed_history = ["Effect of Metformin on longevity", "GLP-1 agonists side effects"]

[ui]
theme = "light"
"#,
        )
        .unwrap();

        let config = load_config(Some(dir.path()), None).unwrap();
        assert_eq!(config.service.base_url, "https://evidence.example.org/api");
        assert_eq!(config.service.timeout_secs, 30);
        assert_eq!(config.session.seed_history.len(), 2);
        assert_eq!(config.ui.theme, "light");
    }

    #[test]
    fn test_explicit_config_file_overrides_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let evidex_dir = dir.path().join(".evidex");
        std::fs::create_dir_all(&evidex_dir).unwrap();
        std::fs::write(evidex_dir.join("config.toml"), "[ui]\ntheme = \"light\"\n").unwrap();
        let explicit = dir.path().join("custom.toml");
        std::fs::write(&explicit, "[ui]\ntheme = \"dark\"\nshow_sidebar = false\n").unwrap();

        let config = load_config(Some(dir.path()), Some(&explicit)).unwrap();
        assert_eq!(config.ui.theme, "dark");
        assert!(!config.ui.show_sidebar);
    }

    #[test]
    fn test_missing_explicit_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let err = load_config(None, Some(&missing)).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_invalid_workspace_config_loads_but_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let evidex_dir = dir.path().join(".evidex");
        std::fs::create_dir_all(&evidex_dir).unwrap();
        std::fs::write(
            evidex_dir.join("config.toml"),
            "[session]\nhistory_limit = 0\n",
        )
        .unwrap();
        let config = load_config(Some(dir.path()), None).unwrap();
        assert_eq!(config.session.history_limit, 0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { .. })
        ));
    }
}
