//! Shared objects of the FMC REST API.
//!
//! Network and host objects, network groups, security zones and variable
//! sets. These are the building blocks referenced by routes, interfaces and
//! access rules.

#![deny(missing_docs)]

pub mod client;
pub mod groups;
pub mod models;
pub mod zones;

pub use client::ObjectService;
pub use groups::{CreateNetworkGroupRequest, GroupLiteral, NetworkGroup, UpdateNetworkGroupRequest};
pub use models::{AddressKind, AddressObject, CreateAddressRequest, UpdateAddressRequest, VariableSet};
pub use zones::{CreateSecurityZoneRequest, SecurityZone, UpdateSecurityZoneRequest};

/// Convenient result alias that reuses the shared FMC error type.
pub type Result<T> = fmc_core::Result<T>;
