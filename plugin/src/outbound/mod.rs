//! Outbound adapters implementing domain ports.
//!
//! - **http**: reqwest client for the InfraKitchen backend proxy
//! - **identity**: fixed-token identity provider for the dev harness and tests
//! - **config**: in-memory host configuration
//! - **document**: in-memory document body for the theme layer
//!
//! Adapters are thin translators with no business logic of their own.

pub mod config;
pub mod document;
pub mod http;
pub mod identity;

pub use config::MapConfig;
pub use document::InMemoryDocumentBody;
pub use http::{ClientBuildError, ClientOptions, InfraKitchenApiClient};
pub use identity::StaticIdentity;
