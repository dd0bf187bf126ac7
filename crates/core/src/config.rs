use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized},
};
use serde::{Deserialize, Serialize};

pub const CONFIG_DIRECTORY_NAME: &str = "parley";
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const ENV_PREFIX: &str = "PARLEY_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryConfig {
    #[serde(default = "default_sent_after_ms")]
    pub sent_after_ms: u64,
    #[serde(default = "default_delivered_after_ms")]
    pub delivered_after_ms: u64,
    #[serde(default = "default_seen_after_ms")]
    pub seen_after_ms: u64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            sent_after_ms: default_sent_after_ms(),
            delivered_after_ms: default_delivered_after_ms(),
            seen_after_ms: default_seen_after_ms(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub delivery: DeliveryConfig,
    /// Overrides where the theme preference is persisted.
    #[serde(default)]
    pub preferences_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|path| path.join(CONFIG_DIRECTORY_NAME))
            .unwrap_or_else(|| PathBuf::from(".parley"))
    }

    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join(CONFIG_FILE_NAME)
    }

    pub fn load() -> Self {
        Self::load_from(&Self::default_config_path())
    }

    /// Layers defaults, the JSON file at `path` and `PARLEY_` environment variables.
    ///
    /// A missing file is not an error; an unreadable one falls back to defaults.
    pub fn load_from(path: &Path) -> Self {
        let figment = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Json::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        match figment.extract::<AppConfig>() {
            Ok(config) => config,
            Err(error) => {
                tracing::warn!(
                    "failed to parse config from {:?}: {}. using defaults",
                    path,
                    error
                );
                AppConfig::default()
            }
        }
    }
}

fn default_sent_after_ms() -> u64 {
    500
}

fn default_delivered_after_ms() -> u64 {
    1_000
}

fn default_seen_after_ms() -> u64 {
    2_000
}
