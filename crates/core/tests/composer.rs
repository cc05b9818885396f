//! End-to-end composer behaviour against the in-memory store.
//!
//! Covers:
//! - Status filter with pagination metadata
//! - Blank/empty criteria behaving like no criteria
//! - Page 0 and page N offsets
//! - Soft-deleted records never appearing
//! - Collaborator errors passing through unchanged

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use sift_core::config::QueryConfig;
use sift_core::filter::{build_predicate, FieldMap, FieldValue, FilterCriteria, Filterable, Predicate};
use sift_core::memory::MemoryStore;
use sift_core::pagination::{Page, PageRequest, Pagination, Sort};
use sift_core::query::{execute, search, RecordSource};
use sift_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const ITEM_FIELDS: FieldMap = FieldMap::new("id", "created_at", "deleted_at")
    .text("name")
    .code("sku")
    .status("status")
    .parent("category_id")
    .flag("is_featured")
    .sortable(&["id", "name", "created_at"]);

#[derive(Debug, Clone)]
struct Item {
    id: DbId,
    category_id: Option<DbId>,
    name: String,
    sku: String,
    status: &'static str,
    is_featured: bool,
    created_at: Timestamp,
    deleted_at: Option<Timestamp>,
}

impl Filterable for Item {
    fn field(&self, column: &str) -> FieldValue {
        match column {
            "id" => FieldValue::Id(self.id),
            "category_id" => self.category_id.map_or(FieldValue::Null, FieldValue::Id),
            "name" => FieldValue::Text(self.name.clone()),
            "sku" => FieldValue::Text(self.sku.clone()),
            "status" => FieldValue::Text(self.status.to_string()),
            "is_featured" => FieldValue::Bool(self.is_featured),
            "created_at" => FieldValue::Timestamp(self.created_at),
            "deleted_at" => self.deleted_at.map_or(FieldValue::Null, FieldValue::Timestamp),
            _ => FieldValue::Null,
        }
    }
}

fn base_time() -> Timestamp {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
}

/// Items are created one hour apart in id order.
fn item(id: DbId, name: &str, status: &'static str) -> Item {
    Item {
        id,
        category_id: None,
        name: name.to_string(),
        sku: format!("SKU-{id}"),
        status,
        is_featured: false,
        created_at: base_time() + Duration::hours(id),
        deleted_at: None,
    }
}

fn ids<T: Filterable>(page: &Page<T>) -> Vec<DbId> {
    page.content
        .iter()
        .map(|r| match r.field("id") {
            FieldValue::Id(id) => id,
            other => panic!("unexpected id value {other:?}"),
        })
        .collect()
}

fn catalog() -> MemoryStore<Item> {
    let mut deleted = item(5, "Deleted widget", "ACTIVE");
    deleted.deleted_at = Some(base_time());
    MemoryStore::new(vec![
        item(1, "Red widget", "ACTIVE"),
        item(2, "Blue gadget", "INACTIVE"),
        item(3, "Green widget", "ACTIVE"),
        item(4, "Yellow gizmo", "ACTIVE"),
        deleted,
    ])
}

async fn run(store: &MemoryStore<Item>, criteria: FilterCriteria) -> Page<Item> {
    search(store, &criteria, &ITEM_FIELDS, &QueryConfig::default())
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn status_filter_with_paging_reports_totals() {
    let page = run(
        &catalog(),
        FilterCriteria {
            status: Some("ACTIVE".into()),
            page: Some(1),
            size: Some(2),
            ..Default::default()
        },
    )
    .await;

    // Newest ACTIVE first; the soft-deleted ACTIVE item is not counted.
    assert_eq!(ids(&page), vec![4, 3]);
    assert_eq!(page.total_elements, 3);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.page, 1);
    assert_eq!(page.size, 2);
}

#[tokio::test]
async fn second_page_starts_at_offset() {
    let page = run(
        &catalog(),
        FilterCriteria {
            status: Some("ACTIVE".into()),
            page: Some(2),
            size: Some(2),
            ..Default::default()
        },
    )
    .await;

    assert_eq!(ids(&page), vec![1]);
    assert_eq!(page.page, 2);
}

#[tokio::test]
async fn empty_ids_and_blank_name_equal_no_criteria() {
    let store = catalog();
    let blank = run(
        &store,
        FilterCriteria {
            ids: Some(vec![]),
            name: Some(String::new()),
            ..Default::default()
        },
    )
    .await;
    let none = run(&store, FilterCriteria::default()).await;

    assert_eq!(ids(&blank), ids(&none));
    assert_eq!(blank.total_elements, 4);
}

#[tokio::test]
async fn page_zero_is_treated_as_page_one() {
    let page = run(
        &catalog(),
        FilterCriteria {
            page: Some(0),
            ..Default::default()
        },
    )
    .await;

    assert_eq!(page.page, 1);
    assert_eq!(page.size, 15);
    assert_eq!(ids(&page), vec![4, 3, 2, 1]);
}

#[tokio::test]
async fn soft_deleted_never_returned() {
    let page = run(
        &catalog(),
        FilterCriteria {
            ids: Some(vec![5]),
            name: Some("widget".into()),
            status: Some("ACTIVE".into()),
            ..Default::default()
        },
    )
    .await;

    assert!(page.content.is_empty());
    assert_eq!(page.total_elements, 0);
    assert_eq!(page.total_pages, 0);
}

#[tokio::test]
async fn combined_filters_compose_with_and() {
    let mut store = catalog();
    let mut featured = item(6, "Featured widget", "ACTIVE");
    featured.is_featured = true;
    featured.category_id = Some(10);
    store.insert(featured);

    let page = run(
        &store,
        FilterCriteria {
            name: Some("WIDGET".into()),
            flag: Some(true),
            parent_ids: Some(vec![10, 11]),
            created_after: Some(base_time() + Duration::hours(2)),
            ..Default::default()
        },
    )
    .await;

    assert_eq!(ids(&page), vec![6]);
}

#[tokio::test]
async fn caller_sort_is_honoured_and_unknown_sort_falls_back() {
    let store = catalog();
    let by_name = run(
        &store,
        FilterCriteria {
            sort: Some("name,asc".into()),
            ..Default::default()
        },
    )
    .await;
    assert_eq!(ids(&by_name), vec![2, 3, 1, 4]);

    let fallback = run(
        &store,
        FilterCriteria {
            sort: Some("sku,asc".into()),
            ..Default::default()
        },
    )
    .await;
    assert_eq!(ids(&fallback), vec![4, 3, 2, 1]);
}

#[tokio::test]
async fn equal_timestamps_are_ordered_by_id() {
    let mut a = item(1, "a", "ACTIVE");
    let mut b = item(2, "b", "ACTIVE");
    a.created_at = base_time();
    b.created_at = base_time();
    let store = MemoryStore::new(vec![a, b]);

    let page = run(&store, FilterCriteria::default()).await;
    assert_eq!(ids(&page), vec![2, 1]);
}

// ---------------------------------------------------------------------------
// Error propagation
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
struct Timeout;

struct FailingSource;

#[async_trait]
impl RecordSource for FailingSource {
    type Record = Item;
    type Error = Timeout;

    async fn query(
        &self,
        _predicate: &Predicate,
        _offset: i64,
        _limit: i64,
        _sort: &Sort,
    ) -> Result<(Vec<Item>, i64), Timeout> {
        Err(Timeout)
    }
}

#[tokio::test]
async fn source_errors_propagate_unchanged() {
    let predicate = build_predicate(&FilterCriteria::default(), &ITEM_FIELDS);
    let pagination = Pagination::resolve(PageRequest::default(), &QueryConfig::default());
    let result = execute(
        &FailingSource,
        &predicate,
        pagination,
        &ITEM_FIELDS.default_sort(),
    )
    .await;

    assert_eq!(result.unwrap_err(), Timeout);
}
