//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod config_api;
mod document_body;
mod identity_api;
mod infrakitchen_api;

#[cfg(test)]
pub use config_api::MockConfigApi;
pub use config_api::{BACKEND_BASE_URL_KEY, ConfigApi, ConfigError};
pub use document_body::DocumentBody;
#[cfg(test)]
pub use identity_api::MockIdentityApi;
pub use identity_api::{Credentials, IdentityApi, IdentityError};
#[cfg(test)]
pub use infrakitchen_api::MockInfraKitchenApi;
pub use infrakitchen_api::{InfraKitchenApi, ListQuery, ListResult, TreeDirection};
