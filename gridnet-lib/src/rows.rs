//! Row-store collaborator interface.
//!
//! The orchestrator never owns row data; it triggers refreshes and asks for
//! modification sets through [`RowStore`]. [`MemoryRowStore`] is a
//! batteries-included implementation for hosts without their own store and
//! for tests.

use std::sync::Mutex;
use std::sync::MutexGuard;

use serde_json::Value;

/// One grid row, as a JSON object.
pub type Row = serde_json::Map<String, Value>;

/// User-supplied query parameters captured from the grid's form.
pub type FormData = serde_json::Map<String, Value>;

/// The three disjoint modification sets of a row store.
#[derive(Debug, Clone, Default)]
pub struct ModifiedRows {
    /// Rows created since the last fetch.
    pub created: Vec<Row>,
    /// Rows updated since the last fetch.
    pub updated: Vec<Row>,
    /// Rows deleted since the last fetch.
    pub deleted: Vec<Row>,
}

impl ModifiedRows {
    /// Total number of rows across all three sets.
    pub fn total(&self) -> usize {
        self.created.len() + self.updated.len() + self.deleted.len()
    }

    /// Returns `true` when no set contains a row.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// The grid's row store, as seen by the orchestrator.
///
/// Implementations use interior mutability; the orchestrator only holds a
/// shared reference and calls through this narrow interface.
pub trait RowStore: Send + Sync {
    /// Clears transient render-side state ahead of a fresh read.
    fn reset_transient_state(&self);

    /// Replaces the row list with a freshly fetched one and resets
    /// modification tracking.
    fn apply_fetched_rows(&self, rows: Vec<Row>);

    /// Returns the created/updated/deleted sets, optionally filtered to
    /// checked rows only.
    fn modified_row_sets(&self, only_checked: bool) -> ModifiedRows;

    /// Returns the entire row list, optionally filtered to checked rows only.
    fn all_rows(&self, only_checked: bool) -> Vec<Row>;

    /// Captures the current form parameters.
    fn capture_form_snapshot(&self) -> FormData;

    /// Writes parameters back into the form.
    fn apply_form_snapshot(&self, form: FormData);
}

impl<S: RowStore + ?Sized> RowStore for std::sync::Arc<S> {
    fn reset_transient_state(&self) {
        (**self).reset_transient_state();
    }

    fn apply_fetched_rows(&self, rows: Vec<Row>) {
        (**self).apply_fetched_rows(rows);
    }

    fn modified_row_sets(&self, only_checked: bool) -> ModifiedRows {
        (**self).modified_row_sets(only_checked)
    }

    fn all_rows(&self, only_checked: bool) -> Vec<Row> {
        (**self).all_rows(only_checked)
    }

    fn capture_form_snapshot(&self) -> FormData {
        (**self).capture_form_snapshot()
    }

    fn apply_form_snapshot(&self, form: FormData) {
        (**self).apply_form_snapshot(form);
    }
}

/// In-memory [`RowStore`].
///
/// Rows with a boolean `checked` field set to `true` count as checked; all
/// other rows are excluded by `only_checked` filtering.
///
/// # Example
///
/// ```
/// use gridnet_lib::rows::{MemoryRowStore, Row, RowStore};
/// use serde_json::json;
///
/// let store = MemoryRowStore::new();
/// let row: Row = json!({"id": 1, "checked": true}).as_object().unwrap().clone();
/// store.mark_created(row);
///
/// assert_eq!(store.modified_row_sets(true).created.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryRowStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    rows: Vec<Row>,
    created: Vec<Row>,
    updated: Vec<Row>,
    deleted: Vec<Row>,
    form: FormData,
    resets: usize,
}

impl MemoryRowStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with an initial form snapshot.
    pub fn with_form(form: FormData) -> Self {
        let store = Self::new();
        store.inner().form = form;
        store
    }

    /// Replaces the form parameters.
    pub fn set_form(&self, form: FormData) {
        self.inner().form = form;
    }

    /// Replaces the row list without touching modification tracking.
    pub fn set_rows(&self, rows: Vec<Row>) {
        self.inner().rows = rows;
    }

    /// Records a row as newly created.
    pub fn mark_created(&self, row: Row) {
        self.inner().created.push(row);
    }

    /// Records a row as updated.
    pub fn mark_updated(&self, row: Row) {
        self.inner().updated.push(row);
    }

    /// Records a row as deleted.
    pub fn mark_deleted(&self, row: Row) {
        self.inner().deleted.push(row);
    }

    /// Returns a copy of the current row list.
    pub fn rows(&self) -> Vec<Row> {
        self.inner().rows.clone()
    }

    /// How many times [`RowStore::reset_transient_state`] has been called.
    pub fn reset_count(&self) -> usize {
        self.inner().resets
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("row store lock poisoned")
    }
}

fn is_checked(row: &Row) -> bool {
    matches!(row.get("checked"), Some(Value::Bool(true)))
}

fn filtered(rows: &[Row], only_checked: bool) -> Vec<Row> {
    rows.iter()
        .filter(|row| !only_checked || is_checked(row))
        .cloned()
        .collect()
}

impl RowStore for MemoryRowStore {
    fn reset_transient_state(&self) {
        self.inner().resets += 1;
    }

    fn apply_fetched_rows(&self, rows: Vec<Row>) {
        let mut inner = self.inner();
        inner.rows = rows;
        inner.created.clear();
        inner.updated.clear();
        inner.deleted.clear();
    }

    fn modified_row_sets(&self, only_checked: bool) -> ModifiedRows {
        let inner = self.inner();
        ModifiedRows {
            created: filtered(&inner.created, only_checked),
            updated: filtered(&inner.updated, only_checked),
            deleted: filtered(&inner.deleted, only_checked),
        }
    }

    fn all_rows(&self, only_checked: bool) -> Vec<Row> {
        filtered(&self.inner().rows, only_checked)
    }

    fn capture_form_snapshot(&self) -> FormData {
        self.inner().form.clone()
    }

    fn apply_form_snapshot(&self, form: FormData) {
        self.inner().form = form;
    }
}
