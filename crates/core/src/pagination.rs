//! Page-number pagination contract.
//!
//! Callers speak 1-based page numbers; offsets are computed 0-based. The
//! translation is fixed: `page > 0 ? page - 1 : 0`. The `size` a [`Page`]
//! reports is the effective size, after defaulting and the `max_page_size` cap.

use serde::Serialize;

use crate::config::QueryConfig;

/// Raw pagination input as supplied by a caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

/// Normalised pagination: never invalid, whatever the request contained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 0-based page index.
    pub index: i64,
    pub size: i64,
}

impl Pagination {
    /// Normalise a request. The resulting `size` is the effective page size
    /// after the default and the `max_page_size` cap are applied; it is what
    /// [`Page::size`] reports and what `total_pages` is computed from.
    pub fn resolve(request: PageRequest, config: &QueryConfig) -> Self {
        Self {
            index: page_index(request.page),
            size: clamp_size(
                request.size,
                config.default_page_size,
                config.max_page_size,
            ),
        }
    }

    /// 1-based page number, as exposed to callers.
    pub fn page(&self) -> i64 {
        self.index + 1
    }

    pub fn offset(&self) -> i64 {
        self.index.saturating_mul(self.size)
    }
}

/// Convert a 1-based page number into a 0-based index.
pub fn page_index(page: Option<i64>) -> i64 {
    match page {
        Some(page) if page > 0 => page - 1,
        _ => 0,
    }
}

/// Apply the default to absent or non-positive sizes, then cap at `max`.
pub fn clamp_size(size: Option<i64>, default: i64, max: i64) -> i64 {
    size.filter(|s| *s > 0).unwrap_or(default).min(max)
}

/// One page of results plus the totals needed to render pagination controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    /// 1-based.
    pub page: i64,
    pub size: i64,
    pub total_elements: i64,
    pub total_pages: i64,
    pub content: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, pagination: Pagination, total_elements: i64) -> Self {
        Self {
            page: pagination.page(),
            size: pagination.size,
            total_elements,
            total_pages: total_pages(total_elements, pagination.size),
            content,
        }
    }

    /// Transform each element while keeping the page metadata.
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            content: self.content.into_iter().map(f).collect(),
        }
    }
}

/// `ceil(total / size)`; zero when there is nothing to show.
pub fn total_pages(total: i64, size: i64) -> i64 {
    if total <= 0 || size <= 0 {
        return 0;
    }
    (total + size - 1) / size
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Ordering applied to a filtered query.
///
/// Columns are `'static` so they always come from an entity's field map,
/// never from raw caller input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub column: &'static str,
    pub direction: SortDirection,
    /// Secondary key that makes the order total; sorted in `direction`.
    pub tie_breaker: Option<&'static str>,
}

impl Sort {
    /// Parse `column` or `column,asc|desc`.
    ///
    /// Returns `None` when the column is not in `allowed` or the direction is
    /// unrecognised. A missing direction means ascending.
    pub fn parse(raw: &str, allowed: &[&'static str], tie_breaker: &'static str) -> Option<Self> {
        let mut parts = raw.splitn(2, ',');
        let requested = parts.next()?.trim();
        let column = allowed.iter().copied().find(|c| *c == requested)?;

        let direction = match parts.next().map(|d| d.trim().to_ascii_lowercase()) {
            None => SortDirection::Asc,
            Some(d) if d == "asc" => SortDirection::Asc,
            Some(d) if d == "desc" => SortDirection::Desc,
            Some(_) => return None,
        };

        Some(Self {
            column,
            direction,
            tie_breaker: (column != tie_breaker).then_some(tie_breaker),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
