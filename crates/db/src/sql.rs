//! Compiling a [`Predicate`] into PostgreSQL.
//!
//! Column names come from `'static` field maps; every caller-supplied value
//! travels as a numbered bind parameter.

use sift_core::filter::{Condition, FieldValue, Predicate};
use sift_core::pagination::Sort;
use sift_core::types::Timestamp;
use sqlx::postgres::PgArguments;
use sqlx::query::{QueryAs, QueryScalar};
use sqlx::Postgres;

/// Typed bind value for dynamically-built filter queries.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    BigInt(i64),
    BigIntList(Vec<i64>),
    Text(String),
    Bool(bool),
    Timestamp(Timestamp),
}

/// Build a WHERE clause and bind values from a predicate.
///
/// Returns `(where_clause, bind_values, next_bind_index)`. A predicate always
/// carries the not-deleted condition, so the clause is never empty.
pub fn build_where(predicate: &Predicate) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    for condition in predicate.conditions() {
        match condition {
            Condition::IsNull { column } => {
                conditions.push(format!("{column} IS NULL"));
            }
            Condition::In { column, values } => {
                conditions.push(format!("{column} = ANY(${bind_idx})"));
                bind_idx += 1;
                bind_values.push(BindValue::BigIntList(values.clone()));
            }
            Condition::ContainsIgnoreCase { column, needle } => {
                conditions.push(format!("{column} ILIKE ${bind_idx} ESCAPE '\\'"));
                bind_idx += 1;
                bind_values.push(BindValue::Text(format!("%{}%", escape_like(needle))));
            }
            Condition::Eq { column, value } => match to_bind(value) {
                Some(bind) => {
                    conditions.push(format!("{column} = ${bind_idx}"));
                    bind_idx += 1;
                    bind_values.push(bind);
                }
                None => conditions.push(format!("{column} IS NULL")),
            },
            Condition::Range { column, from, to } => {
                if let Some(from) = from {
                    conditions.push(format!("{column} >= ${bind_idx}"));
                    bind_idx += 1;
                    bind_values.push(BindValue::Timestamp(*from));
                }
                if let Some(to) = to {
                    conditions.push(format!("{column} <= ${bind_idx}"));
                    bind_idx += 1;
                    bind_values.push(BindValue::Timestamp(*to));
                }
            }
        }
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values, bind_idx)
}

/// `ORDER BY` clause for a sort, including the tie-breaker.
pub fn order_by(sort: &Sort) -> String {
    let direction = sort.direction.as_sql();
    match sort.tie_breaker {
        Some(tie) => format!("ORDER BY {} {direction}, {tie} {direction}", sort.column),
        None => format!("ORDER BY {} {direction}", sort.column),
    }
}

/// Escape `%`, `_` and `\` so user text matches literally inside `ILIKE`.
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn to_bind(value: &FieldValue) -> Option<BindValue> {
    match value {
        FieldValue::Null => None,
        FieldValue::Id(v) => Some(BindValue::BigInt(*v)),
        FieldValue::Text(v) => Some(BindValue::Text(v.clone())),
        FieldValue::Bool(v) => Some(BindValue::Bool(*v)),
        FieldValue::Timestamp(v) => Some(BindValue::Timestamp(*v)),
    }
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
pub fn bind_values<'q, O>(
    mut q: QueryAs<'q, Postgres, O, PgArguments>,
    values: &'q [BindValue],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for val in values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::BigIntList(v) => q = q.bind(v.as_slice()),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Bool(v) => q = q.bind(*v),
            BindValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
pub fn bind_values_scalar<'q>(
    mut q: QueryScalar<'q, Postgres, i64, PgArguments>,
    values: &'q [BindValue],
) -> QueryScalar<'q, Postgres, i64, PgArguments> {
    for val in values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::BigIntList(v) => q = q.bind(v.as_slice()),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Bool(v) => q = q.bind(*v),
            BindValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
