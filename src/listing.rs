//! Paged, sorted, substring-searched views shared by every collection.
//!
//! Raw query parameters are normalized once into a [`ListQuery`]; the
//! repositories only ever see whitelisted sort columns and clamped paging.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

/// Column every listing falls back to for unknown sort keys
pub const ID_COLUMN: &str = "id";

/// Query string as sent by the client
///
/// Numbers are kept as text so a non-numeric `page` or `limit` is treated as
/// absent instead of failing the whole request.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// `desc` (any case) is descending, anything else ascending
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("desc") {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Sort whitelist and defaults for one collection
#[derive(Debug, Clone, Copy)]
pub struct SortSpec {
    pub columns: &'static [&'static str],
    pub default_column: &'static str,
    pub default_order: SortOrder,
}

impl SortSpec {
    /// Resolve a client sort key to a whitelisted column
    pub fn resolve(&self, raw: &str) -> &'static str {
        let key = raw.trim().to_ascii_lowercase();
        self.columns
            .iter()
            .copied()
            .find(|column| *column == key)
            .unwrap_or(ID_COLUMN)
    }
}

/// Normalized listing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    pub sort_by: &'static str,
    pub order: SortOrder,
    pub search: Option<String>,
}

impl ListQuery {
    pub fn from_params(params: &ListParams, spec: &SortSpec) -> Self {
        let page = params
            .page
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .map(|p| if p < 1 { DEFAULT_PAGE } else { p.min(u32::MAX as i64) as u32 })
            .unwrap_or(DEFAULT_PAGE);

        let limit = params
            .limit
            .as_deref()
            .and_then(|l| l.trim().parse::<i64>().ok())
            .map(|l| {
                if l < 1 {
                    DEFAULT_LIMIT
                } else if l > MAX_LIMIT as i64 {
                    MAX_LIMIT
                } else {
                    l as u32
                }
            })
            .unwrap_or(DEFAULT_LIMIT);

        let sort_by = match params.sort_by.as_deref() {
            None => spec.default_column,
            Some(raw) => spec.resolve(raw),
        };

        let order = match params.order.as_deref() {
            None => spec.default_order,
            Some(raw) => SortOrder::parse(raw),
        };

        Self {
            page,
            limit,
            sort_by,
            order,
            search: normalize_search(params.search.as_deref()),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }

    pub fn meta(&self, total: i64) -> Meta {
        let limit = self.limit as i64;
        Meta {
            page: self.page,
            limit: self.limit,
            total,
            pages: (total + limit - 1) / limit,
            sort_by: self.sort_by.to_string(),
            order: self.order,
            search: self.search.clone().unwrap_or_default(),
        }
    }
}

/// Whitespace-only search is no search
pub fn normalize_search(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Page metadata echoing the effective (post-normalization) query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Meta {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub pages: i64,
    #[serde(rename = "sortBy")]
    pub sort_by: String,
    pub order: SortOrder,
    pub search: String,
}

#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: Meta,
}
