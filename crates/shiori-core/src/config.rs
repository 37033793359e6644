use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};
use shiori_api::{ClientConfig, RetryPolicy};
use url::Url;

use crate::error::ShioriError;
use crate::render::{DocumentVariant, RenderOptions};

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub output: OutputConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub url: String,
    pub page_size: u32,
    pub max_attempts: u32,
    pub retry_delay_secs: u64,
    pub staff_limit: u32,
    pub character_limit: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Vault folder. Empty means the default under the home directory.
    pub root: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub variant: DocumentVariant,
    pub wrap_width: usize,
}

impl AppConfig {
    /// Load config: user file (if exists) merged over built-in defaults.
    pub fn load() -> Result<Self, ShioriError> {
        let user_path = Self::config_path();
        if user_path.exists() {
            Self::load_from(&user_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load a specific config file, merged over built-in defaults.
    pub fn load_from(path: &Path) -> Result<Self, ShioriError> {
        let user_str = std::fs::read_to_string(path)
            .map_err(|e| ShioriError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&user_str)
    }

    /// Parse a (possibly partial) TOML document over the built-in defaults.
    pub fn from_toml(user_str: &str) -> Result<Self, ShioriError> {
        let mut merged: toml::Table =
            toml::from_str(DEFAULT_CONFIG).map_err(|e| ShioriError::Config(e.to_string()))?;
        let user: toml::Table =
            toml::from_str(user_str).map_err(|e| ShioriError::Config(e.to_string()))?;
        merge_tables(&mut merged, user);

        toml::Value::Table(merged)
            .try_into()
            .map_err(|e: toml::de::Error| ShioriError::Config(e.to_string()))
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", "shiori")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Resolved vault root.
    pub fn output_root(&self) -> PathBuf {
        if !self.output.root.as_os_str().is_empty() {
            return self.output.root.clone();
        }
        UserDirs::new()
            .map(|d| d.home_dir().join("Notes").join("Logs").join("AniList"))
            .unwrap_or_else(|| PathBuf::from("AniList"))
    }

    /// Settings for the AniList client.
    pub fn client_config(&self) -> Result<ClientConfig, ShioriError> {
        let api_url = Url::parse(&self.api.url)
            .map_err(|e| ShioriError::Config(format!("api.url {:?}: {e}", self.api.url)))?;
        if self.api.page_size == 0 {
            return Err(ShioriError::Config("api.page_size must be at least 1".into()));
        }

        Ok(ClientConfig {
            api_url,
            page_size: self.api.page_size,
            staff_limit: self.api.staff_limit,
            character_limit: self.api.character_limit,
            retry: RetryPolicy::new(
                self.api.max_attempts,
                Duration::from_secs(self.api.retry_delay_secs),
            ),
        })
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            variant: self.render.variant,
            wrap_width: self.render.wrap_width,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}

/// Recursively overlay `overlay` onto `base`. Tables merge; everything else replaces.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(base_child)), toml::Value::Table(overlay_child)) => {
                merge_tables(base_child, overlay_child);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}
