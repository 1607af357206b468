//! Control plane service environment
//!
//! Read once at process start from `ARGO_CLOUDOPS_*` variables and handed
//! to whatever needs it. There is no process-wide cached copy.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// Prefix for service variables, e.g. `ARGO_CLOUDOPS_VAULT_ADDR`
pub const ENV_PREFIX: &str = "ARGO_CLOUDOPS";

/// Minimum admin secret length
pub const MIN_ADMIN_SECRET_LEN: usize = 16;

/// Service environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEnv {
    pub admin_secret: String,
    pub vault_role: String,
    pub vault_secret: String,
    #[serde(rename = "vault_addr")]
    pub vault_address: String,
    #[serde(rename = "argo_addr")]
    pub argo_address: String,

    /// Namespace workflows are executed in
    #[serde(rename = "workflow_execution_namespace", default = "default_namespace")]
    pub argo_namespace: String,

    #[serde(rename = "config", default = "default_config_file")]
    pub config_file_path: String,

    pub ssh_pem_file: String,

    #[serde(default)]
    pub log_level: Option<String>,

    #[serde(default = "default_port")]
    pub port: u16,

    pub db_host: String,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
}

fn default_namespace() -> String {
    "argo".to_string()
}

fn default_config_file() -> String {
    "argo-cloudops.yaml".to_string()
}

fn default_port() -> u16 {
    8443
}

impl ServiceEnv {
    /// Load from the process environment and validate
    pub fn load() -> ConfigResult<Self> {
        Self::from_source(config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Load from an explicit environment source and validate.
    ///
    /// Values stay strings until deserialized, so secrets made of digits
    /// keep their exact text.
    pub fn from_source(env: config::Environment) -> ConfigResult<Self> {
        let vars: ServiceEnv = config::Config::builder()
            .add_source(env)
            .build()?
            .try_deserialize()?;
        vars.validate()?;
        tracing::debug!(
            argo_namespace = %vars.argo_namespace,
            port = vars.port,
            "service environment loaded"
        );
        Ok(vars)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.admin_secret.chars().count() < MIN_ADMIN_SECRET_LEN {
            return Err(ConfigError::Invalid(format!(
                "admin secret must be at least {MIN_ADMIN_SECRET_LEN} characters long"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: [(&str, &str); 10] = [
        ("ARGO_CLOUDOPS_ADMIN_SECRET", "0123456789abcdef"),
        ("ARGO_CLOUDOPS_VAULT_ROLE", "role-id"),
        ("ARGO_CLOUDOPS_VAULT_SECRET", "secret-id"),
        ("ARGO_CLOUDOPS_VAULT_ADDR", "http://vault:8200"),
        ("ARGO_CLOUDOPS_ARGO_ADDR", "https://argo:2746"),
        ("ARGO_CLOUDOPS_SSH_PEM_FILE", "/secrets/ssh.pem"),
        ("ARGO_CLOUDOPS_DB_HOST", "postgres"),
        ("ARGO_CLOUDOPS_DB_USER", "cloudops"),
        ("ARGO_CLOUDOPS_DB_PASSWORD", "password"),
        ("ARGO_CLOUDOPS_DB_NAME", "cloudops"),
    ];

    fn env(overrides: &[(&str, &str)], skip: Option<&str>) -> config::Environment {
        let mut map: config::Map<String, String> = REQUIRED
            .iter()
            .filter(|(k, _)| Some(*k) != skip)
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        for (k, v) in overrides {
            map.insert(k.to_string(), v.to_string());
        }
        config::Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    #[test]
    fn test_defaults_applied() {
        let vars = ServiceEnv::from_source(env(&[], None)).unwrap();
        assert_eq!(vars.argo_namespace, "argo");
        assert_eq!(vars.config_file_path, "argo-cloudops.yaml");
        assert_eq!(vars.port, 8443);
        assert_eq!(vars.vault_address, "http://vault:8200");
        assert!(vars.log_level.is_none());
    }

    #[test]
    fn test_overrides() {
        let vars = ServiceEnv::from_source(env(
            &[
                ("ARGO_CLOUDOPS_WORKFLOW_EXECUTION_NAMESPACE", "workflows"),
                ("ARGO_CLOUDOPS_PORT", "9443"),
                ("ARGO_CLOUDOPS_LOG_LEVEL", "debug"),
            ],
            None,
        ))
        .unwrap();
        assert_eq!(vars.argo_namespace, "workflows");
        assert_eq!(vars.port, 9443);
        assert_eq!(vars.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_missing_required_variable() {
        let result = ServiceEnv::from_source(env(&[], Some("ARGO_CLOUDOPS_DB_HOST")));
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn test_short_admin_secret_rejected() {
        let result =
            ServiceEnv::from_source(env(&[("ARGO_CLOUDOPS_ADMIN_SECRET", "too-short")], None));
        match result {
            Err(ConfigError::Invalid(msg)) => {
                assert_eq!(msg, "admin secret must be at least 16 characters long")
            }
            other => panic!("expected invalid config, got {other:?}"),
        }
    }

    #[test]
    fn test_numeric_secrets_kept_verbatim() {
        let vars = ServiceEnv::from_source(env(
            &[
                ("ARGO_CLOUDOPS_ADMIN_SECRET", "0012345678901234"),
                ("ARGO_CLOUDOPS_DB_PASSWORD", "007"),
                ("ARGO_CLOUDOPS_VAULT_SECRET", "1e5"),
            ],
            None,
        ))
        .unwrap();
        assert_eq!(vars.admin_secret, "0012345678901234");
        assert_eq!(vars.db_password, "007");
        assert_eq!(vars.vault_secret, "1e5");
    }
}
