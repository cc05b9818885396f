//! Executing a composed predicate against a persistence collaborator.

use async_trait::async_trait;

use crate::config::QueryConfig;
use crate::filter::{build_predicate, FieldMap, FilterCriteria, Predicate};
use crate::pagination::{Page, Pagination, Sort};

/// A store that can answer one filtered, sorted, offset-addressed query.
///
/// Implementations return the requested slice together with the total
/// number of records matching `predicate`, ignoring `offset` and `limit`.
#[async_trait]
pub trait RecordSource: Send + Sync {
    type Record: Send;
    type Error: Send;

    async fn query(
        &self,
        predicate: &Predicate,
        offset: i64,
        limit: i64,
        sort: &Sort,
    ) -> Result<(Vec<Self::Record>, i64), Self::Error>;
}

/// Run `predicate` with pagination and return one page.
///
/// Read-only. Errors from the source are returned unchanged.
pub async fn execute<S>(
    source: &S,
    predicate: &Predicate,
    pagination: Pagination,
    sort: &Sort,
) -> Result<Page<S::Record>, S::Error>
where
    S: RecordSource + ?Sized,
{
    let (content, total) = source
        .query(predicate, pagination.offset(), pagination.size, sort)
        .await?;

    tracing::debug!(
        page = pagination.page(),
        size = pagination.size,
        total,
        returned = content.len(),
        "Executed filtered query"
    );

    Ok(Page::new(content, pagination, total))
}

/// Build the predicate for `criteria`, resolve its pagination and sort, and
/// execute it against `source`.
pub async fn search<S>(
    source: &S,
    criteria: &FilterCriteria,
    fields: &FieldMap,
    config: &QueryConfig,
) -> Result<Page<S::Record>, S::Error>
where
    S: RecordSource + ?Sized,
{
    let predicate = build_predicate(criteria, fields);
    let pagination = Pagination::resolve(criteria.page_request(), config);
    let sort = fields.resolve_sort(criteria.sort.as_deref());
    execute(source, &predicate, pagination, &sort).await
}
