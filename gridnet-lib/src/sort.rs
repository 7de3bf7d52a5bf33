//! Sort specifications and sort-change notifications.

/// A requested sort order for the next read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    /// Column to sort by.
    pub column: String,
    /// Ascending when `true`.
    pub ascending: bool,
}

impl SortSpec {
    /// Ascending sort on a column.
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: true,
        }
    }

    /// Descending sort on a column.
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: false,
        }
    }
}

/// Sort-change notification from the row store.
///
/// Only changes with `requires_fetch` set trigger a refetch; local-only
/// resorts are the row store's business.
#[derive(Debug, Clone)]
pub struct SortChange {
    pub column: String,
    pub ascending: bool,
    pub requires_fetch: bool,
}

impl SortChange {
    /// The sort order this change requests.
    pub fn spec(&self) -> SortSpec {
        SortSpec {
            column: self.column.clone(),
            ascending: self.ascending,
        }
    }
}
