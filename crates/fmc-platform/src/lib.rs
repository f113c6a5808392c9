//! Platform endpoints of the FMC REST API.
//!
//! Read-only information about the controller itself: the domains it hosts
//! and the software versions it runs.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::PlatformService;
pub use models::{DomainInfo, ServerVersion};

/// Convenient result alias that reuses the shared FMC error type.
pub type Result<T> = fmc_core::Result<T>;
