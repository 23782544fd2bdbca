//! Driven port for the host identity provider.
//!
//! Tokens are requested at call time for every backend request. Nothing here
//! caches or refreshes them.

use async_trait::async_trait;

use super::define_port_error;

/// Credentials handed out by the host identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Credentials {
    /// Opaque bearer token, absent for guest sessions.
    pub token: Option<String>,
}

impl Credentials {
    /// Credentials carrying `token`.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// Credentials without a token.
    pub const fn anonymous() -> Self {
        Self { token: None }
    }
}

define_port_error! {
    /// Errors surfaced by the identity provider.
    pub enum IdentityError {
        /// The provider could not produce credentials.
        Unavailable { message: String } =>
            "identity provider unavailable: {message}",
    }
}

/// Port for fetching the signed-in user's credentials.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityApi: Send + Sync {
    /// Return fresh credentials for the current user.
    async fn get_credentials(&self) -> Result<Credentials, IdentityError>;
}
