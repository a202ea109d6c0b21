use std::path::PathBuf;

use serde::Deserialize;
use tally_core::DEFAULT_ITEMS_KEY;
use tracing::warn;

use crate::store::{StoreType, default_store_path};

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct StoreConfig {
    #[serde(default)]
    pub r#type: StoreType,
    pub path: Option<PathBuf>,
    pub key: Option<String>,
}

/// Where and how to open the item store, after merging flags and config.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSettings {
    pub store_type: StoreType,
    pub path: PathBuf,
    pub key: String,
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tally").join("config.toml"))
}

pub fn load_config() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };

    let Ok(content) = std::fs::read_to_string(&path) else {
        return Config::default();
    };

    toml::from_str(&content).unwrap_or_else(|err| {
        warn!(path = %path.display(), %err, "ignoring unreadable config");
        Config::default()
    })
}

impl Config {
    /// Fills in anything not given on the command line from this config,
    /// then from defaults.
    pub fn resolve(
        self,
        cli_type: Option<StoreType>,
        cli_path: Option<PathBuf>,
        cli_key: Option<String>,
    ) -> StoreSettings {
        StoreSettings {
            store_type: cli_type.unwrap_or(self.store.r#type),
            path: cli_path
                .or(self.store.path)
                .unwrap_or_else(default_store_path),
            key: cli_key
                .or(self.store.key)
                .unwrap_or_else(|| DEFAULT_ITEMS_KEY.to_string()),
        }
    }
}

pub fn resolve_store_config(
    cli_type: Option<StoreType>,
    cli_path: Option<PathBuf>,
    cli_key: Option<String>,
) -> StoreSettings {
    load_config().resolve(cli_type, cli_path, cli_key)
}
