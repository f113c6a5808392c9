//! # fmc-core
//!
//! Core client for the firewall management center (FMC) REST API.
//!
//! The resource crates (`fmc-platform`, `fmc-devices`, `fmc-objects`,
//! `fmc-policy`) are thin wrappers over the [`FmcClient`] defined here. It
//! handles the token exchange, domain scoping, response classification and
//! pagination.
//!
//! ## Modules
//!
//! - [`classify`] - Turns raw HTTP responses into typed outcomes
//! - [`paging`] - List envelopes and the page accumulator
//! - [`client`] - The authenticated client
//! - [`transport`] - The HTTP seam and its reqwest implementation
//! - [`session`] - Tokens and domains obtained at login
//! - [`config`] - Connection settings, HTTP knobs and retry policy
//! - [`error`] - Error taxonomy
//! - [`ids`] - Typed object identifiers
//! - [`query`] - Query parameter helpers
//! - [`types`] - References and metadata shared by all records
//!
//! ## Example
//!
//! ```no_run
//! use fmc_core::{Credentials, FmcClient, ListParams};
//! use serde_json::Value;
//!
//! # async fn run() -> fmc_core::Result<()> {
//! let client = FmcClient::new("https://fmc.example.com", Credentials::new("api", "secret"))?;
//! client.login().await?;
//! client.select_domain("Global")?;
//!
//! let path = client.config_path("object/hosts")?;
//! let hosts: Vec<Value> = client.list_all(&path, &ListParams::expanded()).await?;
//! println!("{} hosts", hosts.len());
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod ids;
pub mod paging;
pub mod query;
pub mod session;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use classify::{classify, Outcome, Payload};
pub use client::{FmcClient, FmcClientBuilder};
pub use config::{ClientConfig, Credentials, FmcConfig, RetryPolicy};
pub use error::{Error, Result};
pub use paging::{accumulate_pages, Envelope, PageRequest, Paging};
pub use query::ListParams;
pub use session::{Domain, SessionInfo};
pub use transport::{HttpTransport, RawRequest, RawResponse, Transport};
pub use types::{Metadata, Reference};
