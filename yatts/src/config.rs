//! YAML configuration for both clients.
//!
//! ```yaml
//! api_key: AQVN...
//! folder_id: b1g...
//! v1:
//!   defaults:
//!     - language: ru-RU
//!     - voice: alena
//! v3:
//!   endpoint: https://tts.api.cloud.yandex.net:443
//!   defaults:
//!     - voice: alena
//!     - output_format: oggopus
//! ```
//!
//! Environment variables override file values, see [`Config::with_env_overrides`].

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::auth::ApiKeyAuth;
use crate::error::{Error, Result};
use crate::{v1, v3};

/// Overrides [`Config::api_key`].
pub const ENV_API_KEY: &str = "YATTS_API_KEY";
/// Overrides [`Config::folder_id`].
pub const ENV_FOLDER_ID: &str = "YATTS_FOLDER_ID";
/// Overrides [`V1Config::endpoint`].
pub const ENV_V1_ENDPOINT: &str = "YATTS_V1_ENDPOINT";
/// Overrides [`V3Config::endpoint`].
pub const ENV_V3_ENDPOINT: &str = "YATTS_V3_ENDPOINT";

/// Client configuration.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_key: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub folder_id: String,

    #[serde(default)]
    pub v1: V1Config,

    #[serde(default)]
    pub v3: V3Config,
}

/// Settings for the v1 REST client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct V1Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        with = "serde_yaml::with::singleton_map_recursive"
    )]
    pub defaults: Vec<v1::SpeechOption>,
}

/// Settings for the v3 gRPC client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct V3Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        with = "serde_yaml::with::singleton_map_recursive"
    )]
    pub defaults: Vec<v3::SpeechOption>,
}

impl Config {
    /// Parses a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Reads and parses a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Serializes the configuration as YAML.
    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Applies the `YATTS_*` environment variables on top of this configuration.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`, keyed by the `ENV_*` names.
    ///
    /// Empty values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(api_key) = get(ENV_API_KEY) {
            self.api_key = api_key;
        }
        if let Some(folder_id) = get(ENV_FOLDER_ID) {
            self.folder_id = folder_id;
        }
        if let Some(endpoint) = get(ENV_V1_ENDPOINT) {
            self.v1.endpoint = Some(endpoint);
        }
        if let Some(endpoint) = get(ENV_V3_ENDPOINT) {
            self.v3.endpoint = Some(endpoint);
        }
        self
    }

    /// Returns an API key authenticator for the configured key and folder.
    pub fn authenticator(&self) -> Result<ApiKeyAuth> {
        if self.api_key.is_empty() {
            return Err(Error::Config("api_key must be non-empty".to_string()));
        }
        Ok(ApiKeyAuth::new(self.api_key.clone()).with_folder_id(self.folder_id.clone()))
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let api_key = if self.api_key.is_empty() { "" } else { "<redacted>" };
        f.debug_struct("Config")
            .field("api_key", &api_key)
            .field("folder_id", &self.folder_id)
            .field("v1", &self.v1)
            .field("v3", &self.v3)
            .finish()
    }
}
