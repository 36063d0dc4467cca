use crate::core::ConfigProvider;
use crate::utils::error::{ClientError, Result};
use crate::utils::validation::{
    validate_positive_number, validate_required_field, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub backend: Option<BackendConfig>,
    pub gateway: Option<GatewayConfig>,
    pub session: Option<SessionConfig>,
    pub cache: Option<CacheConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Falls back to `backend.base_url` when unset.
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub include_credentials: Option<bool>,
    pub cookie: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub stale_seconds: Option<u64>,
}

pub const DEFAULT_GATEWAY_TIMEOUT_SECS: u64 = 30;

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ClientError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value. Unset variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| ClientError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn validate_config(&self) -> Result<()> {
        let backend = validate_required_field("backend", &self.backend)?;
        validate_url("backend.base_url", &backend.base_url)?;

        if let Some(gateway) = &self.gateway {
            if let Some(base_url) = &gateway.base_url {
                validate_url("gateway.base_url", base_url)?;
            }
            if let Some(timeout) = gateway.timeout_seconds {
                validate_positive_number("gateway.timeout_seconds", timeout, 1)?;
            }
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn backend_url(&self) -> &str {
        self.backend
            .as_ref()
            .map(|b| b.base_url.as_str())
            .unwrap_or_default()
    }

    fn gateway_url(&self) -> &str {
        self.gateway
            .as_ref()
            .and_then(|g| g.base_url.as_deref())
            .unwrap_or_else(|| self.backend_url())
    }

    fn gateway_timeout(&self) -> Option<Duration> {
        let secs = self
            .gateway
            .as_ref()
            .and_then(|g| g.timeout_seconds)
            .unwrap_or(DEFAULT_GATEWAY_TIMEOUT_SECS);
        Some(Duration::from_secs(secs))
    }

    fn include_credentials(&self) -> bool {
        self.session
            .as_ref()
            .and_then(|s| s.include_credentials)
            .unwrap_or(true)
    }

    fn session_cookie(&self) -> Option<&str> {
        self.session.as_ref().and_then(|s| s.cookie.as_deref())
    }

    fn cache_stale_after(&self) -> Option<Duration> {
        self.cache
            .as_ref()
            .and_then(|c| c.stale_seconds)
            .map(Duration::from_secs)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
