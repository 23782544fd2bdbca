//! Driven port for host configuration lookups.

use super::define_port_error;

/// Configuration key holding the host backend base URL.
pub const BACKEND_BASE_URL_KEY: &str = "backend.baseUrl";

define_port_error! {
    /// Errors surfaced while reading host configuration.
    pub enum ConfigError {
        /// The key is not configured.
        Missing { key: String } => "missing required config value at '{key}'",
        /// The key is configured with an unusable value.
        Invalid { key: String, message: String } =>
            "invalid config value at '{key}': {message}",
    }
}

/// Port for reading string values from the host configuration.
#[cfg_attr(test, mockall::automock)]
pub trait ConfigApi: Send + Sync {
    /// Return the string stored at `key`, or [`ConfigError::Missing`].
    fn get_string(&self, key: &str) -> Result<String, ConfigError>;
}
