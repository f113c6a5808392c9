//! Access control policies of the FMC REST API.
//!
//! Policies are containers of ordered access rules. Rules are created at a
//! position given by [`RulePlacement`].

#![deny(missing_docs)]

pub mod client;
pub mod models;
pub mod rules;

pub use client::PolicyService;
pub use models::{AccessPolicy, CreateAccessPolicyRequest, DefaultAction, UpdateAccessPolicyRequest};
pub use rules::{
    AccessRule, CreateAccessRuleRequest, ObjectSelection, RuleAction, RulePlacement,
    UpdateAccessRuleRequest,
};

/// Convenient result alias that reuses the shared FMC error type.
pub type Result<T> = fmc_core::Result<T>;
