//! List query contract.
//!
//! The backend reads paging, ordering and filtering from query parameters
//! named `take`, `skip`, `orderBy`, `order`, `filterBy` and `filter`. Ordering
//! and filtering are pairs: half a pair is never sent.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Paging, ordering and filtering for a list request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListQuery {
    pub take: Option<u32>,
    pub skip: Option<u32>,
    pub order_by: Option<String>,
    pub order: Option<SortOrder>,
    pub filter_by: Option<String>,
    pub filter: Option<String>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(mut self, take: u32) -> Self {
        self.take = Some(take);
        self
    }

    pub fn skip(mut self, skip: u32) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Orders by `field` in the given direction.
    pub fn order_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.order_by = Some(field.into());
        self.order = Some(order);
        self
    }

    /// Filters `field` by `value`.
    pub fn filter_by(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filter_by = Some(field.into());
        self.filter = Some(value.into());
        self
    }

    /// Page `page` (zero-based) of `size` items.
    pub fn page(self, page: u32, size: u32) -> Self {
        self.take(size).skip(page.saturating_mul(size))
    }
}

/// Ordered `(name, value)` pairs ready for a query string.
pub type ListParameters = Vec<(&'static str, String)>;

/// Builds the query parameters for `query`.
///
/// `take` and `skip` are included when set. The order pair is included only
/// when both a non-blank `orderBy` and an `order` are set; the filter pair only
/// when both a non-blank `filterBy` and a non-empty `filter` are set.
pub fn build_list_parameters(query: &ListQuery) -> ListParameters {
    let mut params = ListParameters::new();

    if let Some(take) = query.take {
        params.push(("take", take.to_string()));
    }
    if let Some(skip) = query.skip {
        params.push(("skip", skip.to_string()));
    }
    if let (Some(order_by), Some(order)) = (non_blank(&query.order_by), query.order) {
        params.push(("orderBy", order_by.to_string()));
        params.push(("order", order.as_str().to_string()));
    }
    if let (Some(filter_by), Some(filter)) = (non_blank(&query.filter_by), query.filter.as_deref())
        && !filter.is_empty()
    {
        params.push(("filterBy", filter_by.to_string()));
        params.push(("filter", filter.to_string()));
    }

    params
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
