//! Server configuration.
//!
//! Loaded from environment variables at startup:
//! - `STRIMZI_MCP_NAMESPACE`: namespace used when a tool call names none (default: `kafka`)
//! - `STRIMZI_MCP_KUBE_CONTEXT`: kubeconfig context; the ambient configuration when unset
//! - `STRIMZI_MCP_LOG_FORMAT`: `compact` (default) or `json`

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

pub const NAMESPACE_VAR: &str = "STRIMZI_MCP_NAMESPACE";
pub const KUBE_CONTEXT_VAR: &str = "STRIMZI_MCP_KUBE_CONTEXT";
pub const LOG_FORMAT_VAR: &str = "STRIMZI_MCP_LOG_FORMAT";

pub const DEFAULT_NAMESPACE: &str = "kafka";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

/// Log output format on stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" | "text" | "" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::InvalidValue {
                key: LOG_FORMAT_VAR.to_string(),
                message: format!("expected 'compact' or 'json', got '{}'", other),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Namespace used when a tool call does not name one.
    pub default_namespace: String,

    /// Kubeconfig context to connect with.
    pub kube_context: Option<String>,

    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            default_namespace: DEFAULT_NAMESPACE.to_string(),
            kube_context: None,
            log_format: LogFormat::Compact,
        }
    }
}

impl ServerConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let default = Self::default();

        Ok(Self {
            default_namespace: non_empty(NAMESPACE_VAR).unwrap_or(default.default_namespace),
            kube_context: non_empty(KUBE_CONTEXT_VAR),
            log_format: match non_empty(LOG_FORMAT_VAR) {
                Some(raw) => raw.parse()?,
                None => default.log_format,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.default_namespace, "kafka");
        assert!(config.kube_context.is_none());
    }

    #[test]
    fn test_config_from_variables() {
        let config = ServerConfig::from_lookup(lookup(&[
            (NAMESPACE_VAR, "streaming"),
            (KUBE_CONTEXT_VAR, "prod"),
            (LOG_FORMAT_VAR, "JSON"),
        ]))
        .unwrap();

        assert_eq!(config.default_namespace, "streaming");
        assert_eq!(config.kube_context.as_deref(), Some("prod"));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_blank_namespace_uses_default() {
        let config = ServerConfig::from_lookup(lookup(&[(NAMESPACE_VAR, "  ")])).unwrap();
        assert_eq!(config.default_namespace, "kafka");
    }

    #[test]
    fn test_invalid_log_format() {
        let err = ServerConfig::from_lookup(lookup(&[(LOG_FORMAT_VAR, "xml")])).unwrap_err();
        assert!(err.to_string().contains(LOG_FORMAT_VAR));
    }
}
