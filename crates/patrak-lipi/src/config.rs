//! # Lipi Configuration
//!
//! Configuration for the transliteration engine and its optional external
//! backend.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     PATRAK_BACKEND_URL=http://127.0.0.1:7700                           │
//! │     PATRAK_BACKEND_ENABLED=true                                        │
//! │     PATRAK_LOAD_TIMEOUT_MS=800                                         │
//! │     PATRAK_CALL_TIMEOUT_MS=1500                                        │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/patrak/lipi.toml (Linux)                                 │
//! │     ~/Library/Application Support/com.patrak.patrak/lipi.toml (macOS)  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     backend disabled, built-in dictionary only                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # lipi.toml
//! [backend]
//! enabled = true
//! url = "http://127.0.0.1:7700"
//! load_timeout_ms = 800
//! call_timeout_ms = 1500
//! schemes = ["itrans", "optitrans", "hk"]
//! try_nativize = true
//!
//! [dictionary.entries]
//! "Prabhat" = "प्रभात"
//! "Chitra Mandir" = "चित्र मंदिर"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{LipiError, LipiResult};

// =============================================================================
// Backend Settings
// =============================================================================

/// Settings for the external transliteration backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Whether to consult the backend at all.
    #[serde(default)]
    pub enabled: bool,

    /// Base URL of the backend service (`http://` or `https://`).
    #[serde(default)]
    pub url: Option<String>,

    /// How long a caller waits for the shared backend load (milliseconds).
    /// The load itself keeps running after a caller gives up.
    #[serde(default = "default_load_timeout")]
    pub load_timeout_ms: u64,

    /// Upper bound for one transliteration call (milliseconds).
    #[serde(default = "default_call_timeout")]
    pub call_timeout_ms: u64,

    /// Input-format hypotheses, in order of preference.
    #[serde(default = "default_schemes")]
    pub schemes: Vec<String>,

    /// Also try each scheme with script normalization on.
    #[serde(default = "default_true")]
    pub try_nativize: bool,

    /// Target script name understood by the backend.
    #[serde(default = "default_target")]
    pub target: String,
}

fn default_load_timeout() -> u64 {
    800
}

fn default_call_timeout() -> u64 {
    1500
}

fn default_schemes() -> Vec<String> {
    vec!["itrans".to_string(), "optitrans".to_string(), "hk".to_string()]
}

fn default_true() -> bool {
    true
}

fn default_target() -> String {
    "devanagari".to_string()
}

impl Default for BackendSettings {
    fn default() -> Self {
        BackendSettings {
            enabled: false,
            url: None,
            load_timeout_ms: default_load_timeout(),
            call_timeout_ms: default_call_timeout(),
            schemes: default_schemes(),
            try_nativize: default_true(),
            target: default_target(),
        }
    }
}

impl BackendSettings {
    /// Bounded wait for the shared load.
    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }

    /// Bound for a single call.
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    /// Nativize options to try for every scheme.
    pub fn nativize_options(&self) -> &'static [bool] {
        if self.try_nativize {
            &[false, true]
        } else {
            &[false]
        }
    }
}

// =============================================================================
// Dictionary Settings
// =============================================================================

/// Extra proper-noun entries merged over the built-in dictionary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DictionarySettings {
    #[serde(default)]
    pub entries: BTreeMap<String, String>,
}

// =============================================================================
// Main Lipi Configuration
// =============================================================================

/// Complete transliteration configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LipiConfig {
    /// External backend settings.
    #[serde(default)]
    pub backend: BackendSettings,

    /// Dictionary additions.
    #[serde(default)]
    pub dictionary: DictionarySettings,
}

impl LipiConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (lipi.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> LipiResult<Self> {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    /// Same as [`LipiConfig::load`], reading overrides from `var` instead of
    /// the process environment.
    pub fn load_with(
        config_path: Option<PathBuf>,
        var: impl Fn(&str) -> Option<String>,
    ) -> LipiResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading lipi config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(var);
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load lipi config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> LipiResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| LipiError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| LipiError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| LipiError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Lipi config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> LipiResult<()> {
        let backend = &self.backend;

        if backend.load_timeout_ms == 0 || backend.call_timeout_ms == 0 {
            return Err(LipiError::InvalidConfig(
                "backend timeouts must be greater than 0".into(),
            ));
        }

        if let Some(ref url) = backend.url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(LipiError::InvalidUrl(format!(
                    "Backend URL must start with http:// or https://, got: {}",
                    url
                )));
            }
        }

        if backend.enabled {
            if backend.url.is_none() {
                return Err(LipiError::InvalidConfig(
                    "backend is enabled but no url is set".into(),
                ));
            }
            if backend.schemes.is_empty() {
                return Err(LipiError::InvalidConfig(
                    "backend is enabled but no input schemes are listed".into(),
                ));
            }
        }

        Ok(())
    }

    /// Applies `PATRAK_*` overrides looked up through `var`.
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("PATRAK_BACKEND_URL") {
            debug!(url = %url, "Overriding backend URL from environment");
            self.backend.url = Some(url);
        }

        if let Some(enabled) = var("PATRAK_BACKEND_ENABLED") {
            match enabled.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.backend.enabled = true,
                "0" | "false" | "no" | "off" => self.backend.enabled = false,
                _ => warn!(value = %enabled, "Unknown PATRAK_BACKEND_ENABLED value"),
            }
        }

        if let Some(ms) = var("PATRAK_LOAD_TIMEOUT_MS") {
            if let Ok(ms) = ms.parse::<u64>() {
                debug!(ms, "Overriding load timeout from environment");
                self.backend.load_timeout_ms = ms;
            }
        }

        if let Some(ms) = var("PATRAK_CALL_TIMEOUT_MS") {
            if let Ok(ms) = ms.parse::<u64>() {
                self.backend.call_timeout_ms = ms;
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "patrak", "patrak")
            .map(|dirs| dirs.config_dir().join("lipi.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Returns true if the backend should be consulted.
    pub fn backend_enabled(&self) -> bool {
        self.backend.enabled && self.backend.url.is_some()
    }

    /// Returns the backend URL if configured.
    pub fn backend_url(&self) -> Option<&str> {
        self.backend.url.as_deref()
    }
}
