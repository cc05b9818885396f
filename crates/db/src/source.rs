//! sqlx-backed [`RecordSource`].

use std::marker::PhantomData;

use async_trait::async_trait;
use sift_core::filter::Predicate;
use sift_core::pagination::Sort;
use sift_core::query::RecordSource;
use sqlx::postgres::PgRow;
use sqlx::FromRow;

use crate::sql::{bind_values, bind_values_scalar, build_where, order_by};
use crate::DbPool;

/// Answers filtered queries against one table.
pub struct PgSource<T> {
    pool: DbPool,
    table: &'static str,
    columns: &'static str,
    _row: PhantomData<fn() -> T>,
}

impl<T> PgSource<T> {
    pub fn new(pool: DbPool, table: &'static str, columns: &'static str) -> Self {
        Self {
            pool,
            table,
            columns,
            _row: PhantomData,
        }
    }
}

#[async_trait]
impl<T> RecordSource for PgSource<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    type Record = T;
    type Error = sqlx::Error;

    async fn query(
        &self,
        predicate: &Predicate,
        offset: i64,
        limit: i64,
        sort: &Sort,
    ) -> Result<(Vec<T>, i64), sqlx::Error> {
        let (where_clause, binds, bind_idx) = build_where(predicate);

        let count_sql = format!(
            "SELECT COUNT(*)::BIGINT FROM {} {where_clause}",
            self.table
        );
        let total = bind_values_scalar(sqlx::query_scalar::<_, i64>(&count_sql), &binds)
            .fetch_one(&self.pool)
            .await?;

        let select_sql = format!(
            "SELECT {} FROM {} {where_clause} {} LIMIT ${bind_idx} OFFSET ${}",
            self.columns,
            self.table,
            order_by(sort),
            bind_idx + 1
        );
        tracing::debug!(table = self.table, sql = %select_sql, total, "Filtered select");

        let rows = bind_values(sqlx::query_as::<_, T>(&select_sql), &binds)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((rows, total))
    }
}
