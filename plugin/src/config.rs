//! Dev harness configuration loaded via OrthoConfig.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::{ClientOptions, MapConfig, StaticIdentity};

const DEFAULT_BACKEND_BASE_URL: &str = "http://localhost:7007";

/// Settings for talking to a running InfraKitchen proxy outside a host.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "INFRAKITCHEN")]
pub struct DevSettings {
    /// Host backend base URL; the proxy prefix is appended to it.
    pub backend_base_url: Option<String>,
    /// Bearer token sent with every request.
    pub token: Option<String>,
    /// Per-request timeout in seconds; zero disables it.
    pub timeout_seconds: Option<u64>,
}

impl DevSettings {
    /// Return the configured base URL, falling back to a local host backend.
    pub fn backend_base_url(&self) -> &str {
        self.backend_base_url
            .as_deref()
            .unwrap_or(DEFAULT_BACKEND_BASE_URL)
    }

    /// Return the request timeout, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds
            .filter(|seconds| *seconds > 0)
            .map(Duration::from_secs)
    }

    /// Host configuration view of these settings.
    pub fn host_config(&self) -> MapConfig {
        MapConfig::with_backend_base_url(self.backend_base_url())
    }

    /// Identity provider handing out the configured token.
    pub fn identity(&self) -> StaticIdentity {
        StaticIdentity::from_optional(self.token.clone())
    }

    /// Transport options for the API client.
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            timeout: self.timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for dev harness configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use crate::domain::ports::{BACKEND_BASE_URL_KEY, ConfigApi};
    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> DevSettings {
        DevSettings::load_from_iter([OsString::from("infrakitchen-dev")])
            .expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env([
            ("INFRAKITCHEN_BACKEND_BASE_URL", None::<String>),
            ("INFRAKITCHEN_TOKEN", None::<String>),
            ("INFRAKITCHEN_TIMEOUT_SECONDS", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.backend_base_url(), DEFAULT_BACKEND_BASE_URL);
        assert_eq!(settings.identity(), StaticIdentity::anonymous());
        assert_eq!(settings.timeout(), None);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            (
                "INFRAKITCHEN_BACKEND_BASE_URL",
                Some("https://backstage.example".to_owned()),
            ),
            ("INFRAKITCHEN_TOKEN", Some("s3cret".to_owned())),
            ("INFRAKITCHEN_TIMEOUT_SECONDS", Some("15".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.host_config().get_string(BACKEND_BASE_URL_KEY).as_deref(),
            Ok("https://backstage.example")
        );
        assert_eq!(settings.identity(), StaticIdentity::bearer("s3cret"));
        assert_eq!(
            settings.client_options().timeout,
            Some(Duration::from_secs(15))
        );
    }

    #[rstest]
    fn zero_timeout_disables_the_limit() {
        let _guard = lock_env([
            ("INFRAKITCHEN_BACKEND_BASE_URL", None::<String>),
            ("INFRAKITCHEN_TOKEN", None::<String>),
            ("INFRAKITCHEN_TIMEOUT_SECONDS", Some("0".to_owned())),
        ]);

        assert_eq!(load_from_empty_args().timeout(), None);
    }
}
