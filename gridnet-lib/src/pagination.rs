//! Pagination bridge between read responses and the page widget.

use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

/// Pagination data carried by a successful read response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationSnapshot {
    /// The page the response belongs to.
    pub page: u64,
    /// Total number of items on the server.
    #[serde(rename = "totalCount")]
    pub total_count: u64,
}

/// The page widget's display state, as written by the orchestrator.
///
/// The bridge is the sole writer of this state; the widget reports page-change
/// requests back through the orchestrator's `page_requested` entry point.
pub trait PageDisplay: Send + Sync {
    /// Sets how many items one page holds.
    fn set_items_per_page(&self, per_page: u64);

    /// Sets the total item count shown by the widget.
    fn set_item_count(&self, count: u64);

    /// Moves the widget's current-page indicator.
    fn move_to_page(&self, page: u64);
}

impl<P: PageDisplay + ?Sized> PageDisplay for Arc<P> {
    fn set_items_per_page(&self, per_page: u64) {
        (**self).set_items_per_page(per_page);
    }

    fn set_item_count(&self, count: u64) {
        (**self).set_item_count(count);
    }

    fn move_to_page(&self, page: u64) {
        (**self).move_to_page(page);
    }
}

/// Pushes response pagination into an injected [`PageDisplay`].
pub(crate) struct PaginationBridge {
    display: Arc<dyn PageDisplay>,
}

impl PaginationBridge {
    pub(crate) fn new(display: Arc<dyn PageDisplay>) -> Self {
        Self { display }
    }

    /// Seeds the widget before any read has completed.
    pub(crate) fn initialize(&self, per_page: u64) {
        self.display.set_items_per_page(per_page);
        self.display.set_item_count(1);
    }

    /// Applies a response snapshot to the widget.
    pub(crate) fn apply_snapshot(&self, snapshot: PaginationSnapshot, per_page: u64) {
        self.display.set_items_per_page(per_page);
        self.display.set_item_count(snapshot.total_count);
        self.display.move_to_page(snapshot.page);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_deserializes_wire_names() {
        let snapshot: PaginationSnapshot =
            serde_json::from_value(serde_json::json!({"page": 3, "totalCount": 42})).unwrap();
        assert_eq!(snapshot.page, 3);
        assert_eq!(snapshot.total_count, 42);
    }
}
