//! InfraKitchen plugin core.
//!
//! Three layers live here: a typed REST adapter for the InfraKitchen backend,
//! a permission-filtered navigation shell, and dark-mode theme overrides.
//! Host integration goes through the ports in [`domain::ports`] and the
//! registration surface in [`plugin`].

pub mod config;
pub mod domain;
pub mod outbound;
pub mod plugin;
