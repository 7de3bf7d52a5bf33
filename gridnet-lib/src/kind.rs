//! Request kinds and their per-kind behavior tables.

use std::fmt;

/// The kind of request sent to the remote data service.
///
/// The kind decides which endpoint is used, which modified-row sets are
/// serialized into the payload, and which confirmation text is shown.
///
/// # Example
///
/// ```
/// use gridnet_lib::kind::RequestKind;
///
/// assert_eq!(RequestKind::Modify.row_set_keys().len(), 3);
/// assert!(RequestKind::Delete.is_mutation());
/// assert!(!RequestKind::Read.is_mutation());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// Fetch a page of rows.
    Read,
    /// Persist newly created rows.
    Create,
    /// Persist updated rows.
    Update,
    /// Persist deleted rows.
    Delete,
    /// Persist created, updated and deleted rows in one request.
    Modify,
}

/// One of the three modified-row sets a payload may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowSetKey {
    Created,
    Updated,
    Deleted,
}

impl RowSetKey {
    /// The payload key this set is serialized under.
    pub fn payload_key(&self) -> &'static str {
        match self {
            Self::Created => "createList",
            Self::Updated => "updateList",
            Self::Deleted => "deleteList",
        }
    }
}

impl RequestKind {
    /// All request kinds, in endpoint-configuration order.
    pub const ALL: [RequestKind; 5] = [
        RequestKind::Read,
        RequestKind::Create,
        RequestKind::Update,
        RequestKind::Delete,
        RequestKind::Modify,
    ];

    /// The wire name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "readData",
            Self::Create => "createData",
            Self::Update => "updateData",
            Self::Delete => "deleteData",
            Self::Modify => "modifyData",
        }
    }

    /// The modified-row sets serialized for this kind.
    ///
    /// `Read` carries no row data; `Modify` carries all three sets, each
    /// still keyed separately.
    pub fn row_set_keys(&self) -> &'static [RowSetKey] {
        match self {
            Self::Read => &[],
            Self::Create => &[RowSetKey::Created],
            Self::Update => &[RowSetKey::Updated],
            Self::Delete => &[RowSetKey::Deleted],
            Self::Modify => &[RowSetKey::Created, RowSetKey::Updated, RowSetKey::Deleted],
        }
    }

    /// The action verb used in "nothing to ..." notices.
    pub fn action_verb(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Modify => "apply",
        }
    }

    /// The past-participle form used in confirmation prompts.
    pub fn action_done(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Create => "created",
            Self::Update => "updated",
            Self::Delete => "deleted",
            Self::Modify => "applied",
        }
    }

    /// Returns `true` for every kind except `Read`.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::Read)
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_set_keys() {
        assert!(RequestKind::Read.row_set_keys().is_empty());
        assert_eq!(RequestKind::Create.row_set_keys(), &[RowSetKey::Created]);
        assert_eq!(
            RequestKind::Modify.row_set_keys(),
            &[RowSetKey::Created, RowSetKey::Updated, RowSetKey::Deleted]
        );
    }

    #[test]
    fn test_payload_keys() {
        assert_eq!(RowSetKey::Created.payload_key(), "createList");
        assert_eq!(RowSetKey::Updated.payload_key(), "updateList");
        assert_eq!(RowSetKey::Deleted.payload_key(), "deleteList");
    }

    #[test]
    fn test_display_uses_wire_name() {
        assert_eq!(RequestKind::Modify.to_string(), "modifyData");
    }
}
