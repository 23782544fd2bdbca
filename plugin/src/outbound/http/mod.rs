//! InfraKitchen HTTP adapter.
//!
//! This module provides the reqwest implementation of the `InfraKitchenApi`
//! port.

mod client;
mod dto;

pub use client::{BACKEND_API_PREFIX, ClientBuildError, ClientOptions, InfraKitchenApiClient};
