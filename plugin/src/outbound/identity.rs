//! Identity provider handing out one fixed token.

use async_trait::async_trait;

use crate::domain::ports::{Credentials, IdentityApi, IdentityError};

/// [`IdentityApi`] that always returns the same credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticIdentity {
    token: Option<String>,
}

impl StaticIdentity {
    /// Identity that sends `token` as a bearer token.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// Identity without a token.
    pub const fn anonymous() -> Self {
        Self { token: None }
    }

    /// Identity built from an optional token; blank tokens count as absent.
    pub fn from_optional(token: Option<String>) -> Self {
        Self {
            token: token.filter(|value| !value.trim().is_empty()),
        }
    }
}

#[async_trait]
impl IdentityApi for StaticIdentity {
    async fn get_credentials(&self) -> Result<Credentials, IdentityError> {
        Ok(Credentials {
            token: self.token.clone(),
        })
    }
}
