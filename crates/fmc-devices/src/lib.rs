//! Device-level configuration of the FMC REST API.
//!
//! Device records and managed chassis, the interfaces of each device and its
//! IPv4 static routes. All endpoints live under the selected domain.

#![deny(missing_docs)]

pub mod client;
pub mod interfaces;
pub mod models;
pub mod routes;

pub use client::DeviceService;
pub use interfaces::{
    CreateSubInterfaceRequest, InterfaceIpv4, PhysicalInterface, StaticIpv4, SubInterface,
    UpdatePhysicalInterfaceRequest, UpdateSubInterfaceRequest, VlanInterface,
};
pub use models::{Chassis, CreateDeviceRequest, Device, UpdateDeviceRequest};
pub use routes::{
    CreateIpv4StaticRouteRequest, Gateway, Ipv4StaticRoute, LiteralAddress,
    UpdateIpv4StaticRouteRequest,
};

/// Convenient result alias that reuses the shared FMC error type.
pub type Result<T> = fmc_core::Result<T>;
