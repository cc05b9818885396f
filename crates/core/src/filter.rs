//! Dynamic filter composition.
//!
//! A [`FilterCriteria`] is a sparse set of optional constraints taken from a
//! request. [`build_predicate`] turns it into a [`Predicate`]: the logical AND
//! of the mandatory not-deleted condition and one [`Condition`] per field the
//! caller actually supplied. Absent, blank, or empty values contribute
//! nothing, so they never exclude records.
//!
//! Which column each criteria field targets is described per entity by a
//! [`FieldMap`]. The comparison used for each field is fixed by its kind:
//!
//! | Criteria field                    | Comparison                      |
//! |-----------------------------------|---------------------------------|
//! | `ids`, `parent_ids`               | set membership                  |
//! | `name`                            | case-insensitive substring      |
//! | `code`, `status`, `parent_id`     | equality                        |
//! | `created_after`, `created_before` | inclusive, possibly one-sided   |
//! | `flag`                            | boolean equality                |

use serde::Deserialize;

use crate::pagination::{PageRequest, Sort, SortDirection};
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Criteria
// ---------------------------------------------------------------------------

/// Optional search constraints supplied by a caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterCriteria {
    pub ids: Option<Vec<DbId>>,
    /// Partial, case-insensitive match on the entity's display text.
    pub name: Option<String>,
    pub code: Option<String>,
    pub status: Option<String>,
    pub parent_id: Option<DbId>,
    pub parent_ids: Option<Vec<DbId>>,
    /// Tri-state: unset means "either".
    pub flag: Option<bool>,
    pub created_after: Option<Timestamp>,
    pub created_before: Option<Timestamp>,
    /// 1-based page number.
    pub page: Option<i64>,
    pub size: Option<i64>,
    /// `column` or `column,asc|desc`.
    pub sort: Option<String>,
}

impl FilterCriteria {
    /// The pagination part of the criteria.
    pub fn page_request(&self) -> PageRequest {
        PageRequest {
            page: self.page,
            size: self.size,
        }
    }
}

// ---------------------------------------------------------------------------
// Field mapping
// ---------------------------------------------------------------------------

/// Binds each criteria field to a column of one entity.
///
/// `None` means the entity has no such field, and the matching criteria
/// value is ignored. The soft-delete column is not optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMap {
    pub id: &'static str,
    pub created_at: &'static str,
    pub deleted_at: &'static str,
    pub text: Option<&'static str>,
    pub code: Option<&'static str>,
    pub status: Option<&'static str>,
    pub parent: Option<&'static str>,
    pub flag: Option<&'static str>,
    /// Columns a caller may sort by.
    pub sortable: &'static [&'static str],
}

impl FieldMap {
    pub const fn new(
        id: &'static str,
        created_at: &'static str,
        deleted_at: &'static str,
    ) -> Self {
        Self {
            id,
            created_at,
            deleted_at,
            text: None,
            code: None,
            status: None,
            parent: None,
            flag: None,
            sortable: &[],
        }
    }

    pub const fn text(self, column: &'static str) -> Self {
        Self {
            text: Some(column),
            ..self
        }
    }

    pub const fn code(self, column: &'static str) -> Self {
        Self {
            code: Some(column),
            ..self
        }
    }

    pub const fn status(self, column: &'static str) -> Self {
        Self {
            status: Some(column),
            ..self
        }
    }

    pub const fn parent(self, column: &'static str) -> Self {
        Self {
            parent: Some(column),
            ..self
        }
    }

    pub const fn flag(self, column: &'static str) -> Self {
        Self {
            flag: Some(column),
            ..self
        }
    }

    pub const fn sortable(self, columns: &'static [&'static str]) -> Self {
        Self {
            sortable: columns,
            ..self
        }
    }

    /// Newest first, ties broken by descending id.
    pub fn default_sort(&self) -> Sort {
        Sort {
            column: self.created_at,
            direction: SortDirection::Desc,
            tie_breaker: Some(self.id),
        }
    }

    /// Resolve a caller-provided sort expression against [`FieldMap::sortable`].
    pub fn resolve_sort(&self, raw: Option<&str>) -> Sort {
        raw.and_then(|raw| Sort::parse(raw, self.sortable, self.id))
            .unwrap_or_else(|| self.default_sort())
    }
}

// ---------------------------------------------------------------------------
// Values and conditions
// ---------------------------------------------------------------------------

/// A column value as seen by an in-memory record.
#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub enum FieldValue {
    Null,
    Id(DbId),
    Text(String),
    Bool(bool),
    Timestamp(Timestamp),
}

/// A record that can be evaluated against a [`Predicate`] without a database.
pub trait Filterable {
    /// Return the value stored under `column`, or [`FieldValue::Null`].
    fn field(&self, column: &str) -> FieldValue;
}

/// One comparison against one column.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    IsNull {
        column: &'static str,
    },
    In {
        column: &'static str,
        values: Vec<DbId>,
    },
    ContainsIgnoreCase {
        column: &'static str,
        needle: String,
    },
    Eq {
        column: &'static str,
        value: FieldValue,
    },
    /// At least one bound is always set.
    Range {
        column: &'static str,
        from: Option<Timestamp>,
        to: Option<Timestamp>,
    },
}

impl Condition {
    pub fn column(&self) -> &'static str {
        match self {
            Condition::IsNull { column }
            | Condition::In { column, .. }
            | Condition::ContainsIgnoreCase { column, .. }
            | Condition::Eq { column, .. }
            | Condition::Range { column, .. } => *column,
        }
    }

    pub fn matches<R: Filterable + ?Sized>(&self, record: &R) -> bool {
        let value = record.field(self.column());
        match self {
            Condition::IsNull { .. } => value == FieldValue::Null,
            Condition::In { values, .. } => {
                matches!(value, FieldValue::Id(id) if values.contains(&id))
            }
            Condition::ContainsIgnoreCase { needle, .. } => match value {
                FieldValue::Text(text) => text.to_lowercase().contains(&needle.to_lowercase()),
                _ => false,
            },
            Condition::Eq { value: expected, .. } => value == *expected,
            Condition::Range { from, to, .. } => match value {
                FieldValue::Timestamp(ts) => {
                    from.map_or(true, |from| ts >= from) && to.map_or(true, |to| ts <= to)
                }
                _ => false,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Predicate
// ---------------------------------------------------------------------------

/// Logical AND of [`Condition`]s, always including the not-deleted check.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    conditions: Vec<Condition>,
}

impl Predicate {
    /// The base of every predicate: `deleted_column IS NULL`.
    pub fn not_deleted(deleted_column: &'static str) -> Self {
        Self {
            conditions: vec![Condition::IsNull {
                column: deleted_column,
            }],
        }
    }

    /// Add a condition. `None` is the identity and leaves the predicate as is.
    pub fn with(mut self, condition: Option<Condition>) -> Self {
        if let Some(condition) = condition {
            if !self.conditions.contains(&condition) {
                self.conditions.push(condition);
            }
        }
        self
    }

    /// Combine two predicates with AND.
    pub fn and(self, other: Predicate) -> Self {
        other
            .conditions
            .into_iter()
            .fold(self, |acc, condition| acc.with(Some(condition)))
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn matches<R: Filterable + ?Sized>(&self, record: &R) -> bool {
        self.conditions.iter().all(|c| c.matches(record))
    }
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

/// Translate criteria into a predicate for the entity described by `fields`.
pub fn build_predicate(criteria: &FilterCriteria, fields: &FieldMap) -> Predicate {
    let predicate = Predicate::not_deleted(fields.deleted_at)
        .with(membership(Some(fields.id), criteria.ids.as_deref()))
        .with(contains(fields.text, criteria.name.as_deref()))
        .with(text_equals(fields.code, criteria.code.as_deref()))
        .with(text_equals(fields.status, criteria.status.as_deref()))
        .with(
            fields
                .parent
                .zip(criteria.parent_id)
                .map(|(column, id)| Condition::Eq {
                    column,
                    value: FieldValue::Id(id),
                }),
        )
        .with(membership(fields.parent, criteria.parent_ids.as_deref()))
        .with(
            fields
                .flag
                .zip(criteria.flag)
                .map(|(column, flag)| Condition::Eq {
                    column,
                    value: FieldValue::Bool(flag),
                }),
        )
        .with(date_range(
            fields.created_at,
            criteria.created_after,
            criteria.created_before,
        ));

    tracing::debug!(
        conditions = predicate.conditions.len(),
        "Composed filter predicate"
    );
    predicate
}

fn membership(column: Option<&'static str>, ids: Option<&[DbId]>) -> Option<Condition> {
    match (column, ids) {
        (Some(column), Some(ids)) if !ids.is_empty() => Some(Condition::In {
            column,
            values: ids.to_vec(),
        }),
        _ => None,
    }
}

fn contains(column: Option<&'static str>, text: Option<&str>) -> Option<Condition> {
    let column = column?;
    let needle = non_blank(text)?;
    Some(Condition::ContainsIgnoreCase {
        column,
        needle: needle.to_string(),
    })
}

fn text_equals(column: Option<&'static str>, text: Option<&str>) -> Option<Condition> {
    let column = column?;
    let value = non_blank(text)?;
    Some(Condition::Eq {
        column,
        value: FieldValue::Text(value.to_string()),
    })
}

fn date_range(
    column: &'static str,
    from: Option<Timestamp>,
    to: Option<Timestamp>,
) -> Option<Condition> {
    if from.is_none() && to.is_none() {
        return None;
    }
    Some(Condition::Range { column, from, to })
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
