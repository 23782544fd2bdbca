//! In-memory host configuration.

use std::collections::BTreeMap;

use crate::domain::ports::{BACKEND_BASE_URL_KEY, ConfigApi, ConfigError};

/// [`ConfigApi`] over a fixed key/value map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapConfig {
    values: BTreeMap<String, String>,
}

impl MapConfig {
    /// Configuration holding only the backend base URL.
    pub fn with_backend_base_url(url: impl Into<String>) -> Self {
        Self::default().with(BACKEND_BASE_URL_KEY, url)
    }

    /// Add or replace `key`.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl ConfigApi for MapConfig {
    fn get_string(&self, key: &str) -> Result<String, ConfigError> {
        let value = self
            .values
            .get(key)
            .ok_or_else(|| ConfigError::missing(key))?;
        if value.trim().is_empty() {
            return Err(ConfigError::invalid(key, "value must not be blank"));
        }
        Ok(value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn returns_configured_values() {
        let config = MapConfig::with_backend_base_url("http://localhost:7007");
        assert_eq!(
            config.get_string(BACKEND_BASE_URL_KEY).as_deref(),
            Ok("http://localhost:7007")
        );
    }

    #[rstest]
    fn missing_keys_are_reported() {
        let config = MapConfig::default();
        assert!(matches!(
            config.get_string("app.title"),
            Err(ConfigError::Missing { .. })
        ));
    }

    #[rstest]
    fn blank_values_are_invalid() {
        let config = MapConfig::default().with("app.title", " ");
        assert!(matches!(
            config.get_string("app.title"),
            Err(ConfigError::Invalid { .. })
        ));
    }
}
