//! Client configuration

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Local development endpoint. Certificate verification is relaxed for
/// this exact value and no other.
pub const LOCAL_SECURE_ENDPOINT: &str = "https://localhost:8443";

/// Prefix for client environment overrides, e.g. `CLOUDOPS_AUTH_TOKEN`
pub const ENV_PREFIX: &str = "CLOUDOPS";

/// Settings for the control plane client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Control plane base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Sent verbatim as the `Authorization` header
    #[serde(default)]
    pub auth_token: String,

    /// Connect timeout, and the deadline for buffered calls, in seconds.
    /// Log streams run until they end or are cancelled.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            auth_token: String::new(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_endpoint() -> String {
    LOCAL_SECURE_ENDPOINT.to_string()
}

fn default_timeout() -> u64 {
    30
}

impl ClientConfig {
    /// Load defaults, then the config file, then `CLOUDOPS_*` variables.
    ///
    /// Without an explicit path the file is looked up under the user's
    /// config directory; a missing file is not an error.
    pub fn load(path: Option<&str>) -> ConfigResult<Self> {
        Self::load_with_env(path, config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Same as [`ClientConfig::load`] with a caller-supplied environment source
    pub fn load_with_env(path: Option<&str>, env: config::Environment) -> ConfigResult<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&ClientConfig::default())?);

        let path = match path {
            Some(p) => Some(PathBuf::from(p)),
            None => Self::default_config_path().ok(),
        };
        if let Some(path) = path {
            tracing::debug!(path = %path.display(), "loading client config file");
            builder = builder.add_source(config::File::from(path.as_path()).required(false));
        }

        let config: ClientConfig = builder.add_source(env).build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> ConfigResult<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::MissingConfigDir)?;
        Ok(config_dir.join("cloudops").join("config.toml"))
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid("endpoint cannot be empty".into()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be > 0".into()));
        }
        Ok(())
    }

    /// Load a client config from an explicit file with no environment layer
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let path = path
            .to_str()
            .ok_or_else(|| ConfigError::Invalid(format!("non-utf8 path: {}", path.display())))?;
        let empty = config::Environment::with_prefix(ENV_PREFIX).source(Some(config::Map::new()));
        Self::load_with_env(Some(path), empty)
    }
}
