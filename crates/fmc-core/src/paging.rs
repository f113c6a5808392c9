//! List envelopes and the pagination accumulator.
//!
//! Every list endpoint answers with an [`Envelope`]: one page of `items` plus
//! a `paging` block whose `next` field holds absolute URLs of further pages.
//! [`accumulate_pages`] walks those links and concatenates the pages in order.

use crate::error::{Error, Result};
use crate::query::QueryParams;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::future::Future;
use tracing::debug;
use url::Url;

/// One page returned by a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Records on this page. Absent when the collection is empty.
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    /// Paging block.
    #[serde(default)]
    pub paging: Paging,
    /// Self link of the collection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

impl<T> Envelope<T> {
    /// Returns true when the server reports more than one page.
    #[must_use]
    pub const fn has_more_pages(&self) -> bool {
        self.paging.pages > 1
    }
}

/// Paging metadata of a list response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    /// Offset of the first item on this page.
    #[serde(default)]
    pub offset: u64,
    /// Page size.
    #[serde(default)]
    pub limit: u64,
    /// Total number of items across all pages.
    #[serde(default)]
    pub count: u64,
    /// Total number of pages.
    #[serde(default)]
    pub pages: u64,
    /// Absolute URLs of further pages.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub next: Vec<String>,
}

/// Hypermedia links attached to records and collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    /// Canonical URL of the resource.
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    /// Parent resource URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

/// The list parameters carried by a `next` link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    /// Offset of the requested page.
    pub offset: u64,
    /// Page size.
    pub limit: Option<u64>,
    /// Whether records should be returned with full detail.
    pub expanded: Option<bool>,
    /// Server-side filter expression, e.g. `nameOrValue:web`.
    pub filter: Option<String>,
}

impl PageRequest {
    /// Parses the query of a `next` link.
    ///
    /// Optional parameters that are missing stay `None`. Unknown parameters
    /// are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] when the link is not an absolute URL, has
    /// no `offset`, or a numeric parameter does not parse.
    pub fn from_next_link(link: &str) -> Result<Self> {
        let url = Url::parse(link)
            .map_err(|err| Error::Transport(format!("malformed next-page link `{link}`: {err}")))?;

        let mut offset = None;
        let mut request = Self::default();
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "offset" => offset = Some(parse_number(link, "offset", &value)?),
                "limit" => request.limit = Some(parse_number(link, "limit", &value)?),
                "expanded" => request.expanded = Some(value.eq_ignore_ascii_case("true")),
                "filter" => request.filter = Some(value.into_owned()),
                _ => {}
            }
        }

        request.offset = offset.ok_or_else(|| {
            Error::Transport(format!("malformed next-page link `{link}`: no offset"))
        })?;
        Ok(request)
    }

    /// Converts to URL query pairs.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut params = QueryParams::new();
        params.push("offset", self.offset);
        params.push_opt("limit", self.limit);
        params.push_opt("expanded", self.expanded);
        params.push_opt("filter", self.filter.as_deref());
        params.into_pairs()
    }
}

fn parse_number(link: &str, key: &str, value: &str) -> Result<u64> {
    value.parse().map_err(|_| {
        Error::Transport(format!(
            "malformed next-page link `{link}`: `{key}={value}` is not a number"
        ))
    })
}

/// Collects every item of a paged collection.
///
/// `first` is the envelope of the initial list call. While the server reports
/// more than one page, each `next` link is turned into a [`PageRequest`] and
/// handed to `refetch`, and the returned items are appended in link order.
/// Links announced by followed pages are queued when not seen before.
///
/// At most `pages - 1` extra requests are issued, and never more than the
/// number of distinct links announced.
///
/// # Errors
///
/// Fails as a whole when a link is malformed or any page request fails. No
/// partial list is returned.
pub async fn accumulate_pages<T, F, Fut>(first: Envelope<T>, mut refetch: F) -> Result<Vec<T>>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<Envelope<T>>>,
{
    let Envelope {
        items: mut collected,
        paging,
        ..
    } = first;

    if paging.pages <= 1 {
        return Ok(collected);
    }

    let budget = usize::try_from(paging.pages - 1).unwrap_or(usize::MAX);
    let mut seen: HashSet<String> = paging.next.iter().cloned().collect();
    let mut queue = paging.next;
    let mut fetched = 0;

    while fetched < budget && fetched < queue.len() {
        let link = queue[fetched].clone();
        let request = PageRequest::from_next_link(&link)?;
        debug!(
            page = fetched + 2,
            pages = paging.pages,
            offset = request.offset,
            "fetching next page"
        );

        let page = refetch(request).await?;
        fetched += 1;

        for next in page.paging.next {
            if seen.insert(next.clone()) {
                queue.push(next);
            }
        }
        collected.extend(page.items);
    }

    Ok(collected)
}
