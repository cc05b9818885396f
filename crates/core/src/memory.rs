//! In-memory [`RecordSource`] for fixtures and tooling without a database.

use std::cmp::Ordering;
use std::convert::Infallible;

use async_trait::async_trait;

use crate::filter::{FieldValue, Filterable, Predicate};
use crate::pagination::{Sort, SortDirection};
use crate::query::RecordSource;

/// Holds records in a `Vec` and evaluates predicates directly against them.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore<R> {
    records: Vec<R>,
}

impl<R> MemoryStore<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self { records }
    }

    pub fn insert(&mut self, record: R) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl<R> RecordSource for MemoryStore<R>
where
    R: Filterable + Clone + Send + Sync,
{
    type Record = R;
    type Error = Infallible;

    async fn query(
        &self,
        predicate: &Predicate,
        offset: i64,
        limit: i64,
        sort: &Sort,
    ) -> Result<(Vec<R>, i64), Infallible> {
        let mut matched: Vec<&R> = self
            .records
            .iter()
            .filter(|r| predicate.matches(*r))
            .collect();
        matched.sort_by(|a, b| compare(*a, *b, sort));

        let total = matched.len() as i64;
        let page = matched
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect();
        Ok((page, total))
    }
}

/// Order two records the way PostgreSQL would: NULL sorts above every value,
/// so it comes last under `ASC` and first under `DESC`.
fn compare<R: Filterable>(a: &R, b: &R, sort: &Sort) -> Ordering {
    let by = |column: &str| {
        let ord = compare_values(&a.field(column), &b.field(column));
        match sort.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    };
    let primary = by(sort.column);
    match sort.tie_breaker {
        Some(column) => primary.then_with(|| by(column)),
        None => primary,
    }
}

fn compare_values(a: &FieldValue, b: &FieldValue) -> Ordering {
    match (a, b) {
        (FieldValue::Null, FieldValue::Null) => Ordering::Equal,
        (FieldValue::Null, _) => Ordering::Greater,
        (_, FieldValue::Null) => Ordering::Less,
        _ => a.partial_cmp(b).unwrap_or(Ordering::Equal),
    }
}
