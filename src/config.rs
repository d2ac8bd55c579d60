use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::AdapterError;
use crate::translation::DEFAULT_PREFIX_PLACEHOLDER;
use crate::types::ErrorPolicy;
use crate::vendor::{ConnectOptions, Credentials};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 1433;
pub const DEFAULT_PREFIX: &str = "jos_";

/// Connection and behaviour settings for [`SqlSrvAdapter`](crate::adapter::SqlSrvAdapter).
///
/// Deserializes from a mapping where every key is optional:
/// ```rust
/// use mssql_adapter::prelude::*;
///
/// let config = AdapterConfig::from_json_str(r#"{"user": "sa", "database": "site"}"#).unwrap();
/// assert_eq!(config.host, "localhost");
/// assert!(config.auto_select);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub database: String,
    /// Issue `USE <database>` right after connecting.
    #[serde(alias = "select", alias = "autoSelect")]
    pub auto_select: bool,
    pub port: u16,
    pub instance_name: Option<String>,
    /// Table prefix substituted for the prefix placeholder.
    pub prefix: String,
    pub prefix_placeholder: String,
    /// Count executed statements and hand their text to the query log.
    pub debug: bool,
    pub error_policy: ErrorPolicy,
    pub trust_cert: bool,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            user: String::new(),
            password: String::new(),
            database: String::new(),
            auto_select: true,
            port: DEFAULT_PORT,
            instance_name: None,
            prefix: DEFAULT_PREFIX.to_string(),
            prefix_placeholder: DEFAULT_PREFIX_PLACEHOLDER.to_string(),
            debug: false,
            error_policy: ErrorPolicy::default(),
            trust_cert: true,
        }
    }
}

impl AdapterConfig {
    #[must_use]
    pub fn builder() -> AdapterConfigBuilder {
        AdapterConfigBuilder::default()
    }

    /// Build a config from a JSON mapping.
    ///
    /// # Errors
    ///
    /// Returns `AdapterError::ConfigError` if the value is not an object or a key has the
    /// wrong type.
    pub fn from_value(value: JsonValue) -> Result<Self, AdapterError> {
        if !value.is_object() {
            return Err(AdapterError::ConfigError(
                "configuration must be a mapping".to_string(),
            ));
        }
        serde_json::from_value(value)
            .map_err(|e| AdapterError::ConfigError(format!("invalid configuration: {e}")))
    }

    /// Parse a config from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `AdapterError::ConfigError` on malformed JSON or mistyped keys.
    pub fn from_json_str(json: &str) -> Result<Self, AdapterError> {
        let value: JsonValue = serde_json::from_str(json)
            .map_err(|e| AdapterError::ConfigError(format!("invalid configuration: {e}")))?;
        Self::from_value(value)
    }

    /// Read a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns `AdapterError::IoError` if the file cannot be read, or
    /// `AdapterError::ConfigError` if it does not hold a valid configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AdapterError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub(crate) fn credentials(&self) -> Credentials {
        Credentials {
            user: self.user.clone(),
            password: self.password.clone(),
        }
    }

    pub(crate) fn connect_options(&self) -> ConnectOptions {
        ConnectOptions {
            database: if self.auto_select {
                self.database.clone()
            } else {
                String::new()
            },
            port: self.port,
            instance_name: self.instance_name.clone(),
            trust_cert: self.trust_cert,
        }
    }
}

/// Fluent builder for [`AdapterConfig`].
#[derive(Debug, Clone, Default)]
pub struct AdapterConfigBuilder {
    config: AdapterConfig,
}

impl AdapterConfigBuilder {
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    #[must_use]
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.config.user = user.into();
        self
    }

    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.password = password.into();
        self
    }

    #[must_use]
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.config.database = database.into();
        self
    }

    #[must_use]
    pub fn auto_select(mut self, auto_select: bool) -> Self {
        self.config.auto_select = auto_select;
        self
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    #[must_use]
    pub fn instance_name(mut self, instance_name: Option<String>) -> Self {
        self.config.instance_name = instance_name;
        self
    }

    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    #[must_use]
    pub fn error_policy(mut self, error_policy: ErrorPolicy) -> Self {
        self.config.error_policy = error_policy;
        self
    }

    #[must_use]
    pub fn trust_cert(mut self, trust_cert: bool) -> Self {
        self.config.trust_cert = trust_cert;
        self
    }

    #[must_use]
    pub fn finish(self) -> AdapterConfig {
        self.config
    }
}
