//! Query parameter helpers.
//!
//! [`QueryParams`] assembles URL query pairs from optional values;
//! [`ListParams`] is the common parameter set of every list endpoint.

use crate::paging::PageRequest;
use std::fmt::Display;

/// Builder for assembling query parameter pairs.
#[derive(Debug, Default, Clone)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// Create a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a key/value pair when the value is present.
    pub fn push_opt<T>(&mut self, key: &'static str, value: Option<T>)
    where
        T: ToString,
    {
        if let Some(value) = value {
            self.pairs.push((key, value.to_string()));
        }
    }

    /// Append a required key/value pair.
    pub fn push<T>(&mut self, key: &'static str, value: T)
    where
        T: Display,
    {
        self.pairs.push((key, value.to_string()));
    }

    /// Return the collected key/value pairs.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(&'static str, String)> {
        self.pairs
    }

    /// Returns true if no parameters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Parameters shared by list endpoints.
///
/// Unset fields are left off the query string and the controller applies its
/// own defaults.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ListParams {
    /// Index of the first record to return.
    pub offset: Option<u64>,
    /// Page size.
    pub limit: Option<u64>,
    /// Return every attribute instead of the summary view.
    pub expanded: Option<bool>,
    /// Filter expression, e.g. `nameOrValue:web` or `unusedOnly:true`.
    pub filter: Option<String>,
    /// Exact-name filter, honoured by policy endpoints.
    pub name: Option<String>,
}

impl ListParams {
    /// Parameters with `expanded=true`.
    #[must_use]
    pub fn expanded() -> Self {
        Self {
            expanded: Some(true),
            ..Self::default()
        }
    }

    /// Set the page size.
    #[must_use]
    pub const fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the starting offset.
    #[must_use]
    pub const fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Set the filter expression.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Set the exact-name filter.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns these parameters with the paging fields of a `next` link
    /// substituted in.
    #[must_use]
    pub fn for_page(&self, page: &PageRequest) -> Self {
        Self {
            offset: Some(page.offset),
            limit: page.limit.or(self.limit),
            expanded: page.expanded.or(self.expanded),
            filter: page.filter.clone().or_else(|| self.filter.clone()),
            name: self.name.clone(),
        }
    }

    /// Convert to URL query pairs.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut params = QueryParams::new();
        params.push_opt("name", self.name.as_deref());
        params.push_opt("offset", self.offset);
        params.push_opt("limit", self.limit);
        params.push_opt("expanded", self.expanded);
        params.push_opt("filter", self.filter.as_deref());
        params.into_pairs()
    }
}
