//! Outbound payload shaping.
//!
//! A mutation payload starts from a copy of the last submitted form snapshot
//! and carries either the kind-specific modified-row sets or the whole row
//! list, per the options. The affected-row count drives the confirmation
//! gate.

use serde_json::Value;

use crate::kind::RequestKind;
use crate::kind::RowSetKey;
use crate::rows::FormData;
use crate::rows::Row;
use crate::rows::RowStore;

/// Options controlling which row data a payload carries.
#[derive(Debug, Clone, Copy)]
pub struct PayloadOptions {
    /// Include row data at all. When `false` the payload is the bare form
    /// snapshot and the affected count is zero.
    pub include_row_data: bool,
    /// Serialize only the modified-row sets rather than the whole list.
    pub only_modified: bool,
    /// Restrict row data to checked rows.
    pub only_checked: bool,
}

impl Default for PayloadOptions {
    fn default() -> Self {
        Self {
            include_row_data: true,
            only_modified: true,
            only_checked: true,
        }
    }
}

/// A built payload and its affected-row count.
#[derive(Debug, Clone)]
pub struct Payload {
    pub body: FormData,
    pub affected_count: usize,
}

fn rows_value(rows: &[Row]) -> Value {
    Value::Array(rows.iter().cloned().map(Value::Object).collect())
}

/// Builds the outbound body for `kind` from the row store's current state.
///
/// Deterministic: identical store state and options always produce the same
/// body and count.
pub fn build(
    kind: RequestKind,
    options: &PayloadOptions,
    base: &FormData,
    store: &dyn RowStore,
) -> Payload {
    let mut body = base.clone();
    let mut affected_count = 0;

    if options.include_row_data {
        if options.only_modified {
            let sets = store.modified_row_sets(options.only_checked);
            for key in kind.row_set_keys() {
                let rows = match key {
                    RowSetKey::Created => &sets.created,
                    RowSetKey::Updated => &sets.updated,
                    RowSetKey::Deleted => &sets.deleted,
                };
                // Empty sets are omitted, not sent as empty arrays.
                if !rows.is_empty() {
                    affected_count += rows.len();
                    body.insert(key.payload_key().to_string(), rows_value(rows));
                }
            }
        } else {
            let rows = store.all_rows(options.only_checked);
            affected_count = rows.len();
            body.insert("rowList".to_string(), rows_value(&rows));
        }
    }

    Payload {
        body,
        affected_count,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::rows::MemoryRowStore;

    fn row(value: serde_json::Value) -> Row {
        value.as_object().expect("row literal").clone()
    }

    fn form(value: serde_json::Value) -> FormData {
        value.as_object().expect("form literal").clone()
    }

    fn store_with_mods() -> MemoryRowStore {
        let store = MemoryRowStore::new();
        store.mark_created(row(json!({"id": "a"})));
        store.mark_updated(row(json!({"id": "b"})));
        store
    }

    #[test]
    fn test_modify_unions_nonempty_sets() {
        let store = store_with_mods();
        let options = PayloadOptions {
            only_checked: false,
            ..PayloadOptions::default()
        };
        let payload = build(RequestKind::Modify, &options, &FormData::new(), &store);

        assert_eq!(payload.affected_count, 2);
        assert!(payload.body.contains_key("createList"));
        assert!(payload.body.contains_key("updateList"));
        assert!(!payload.body.contains_key("deleteList"));
    }

    #[test]
    fn test_kind_selects_its_own_set() {
        let store = store_with_mods();
        let options = PayloadOptions {
            only_checked: false,
            ..PayloadOptions::default()
        };
        let payload = build(RequestKind::Create, &options, &FormData::new(), &store);

        assert_eq!(payload.affected_count, 1);
        assert!(payload.body.contains_key("createList"));
        assert!(!payload.body.contains_key("updateList"));
    }

    #[test]
    fn test_no_row_data_means_zero_count() {
        let store = store_with_mods();
        let options = PayloadOptions {
            include_row_data: false,
            ..PayloadOptions::default()
        };
        let base = form(json!({"query": "alpha"}));
        let payload = build(RequestKind::Create, &options, &base, &store);

        assert_eq!(payload.affected_count, 0);
        assert_eq!(payload.body, base);
    }

    #[test]
    fn test_full_list_under_single_key() {
        let store = MemoryRowStore::new();
        store.set_rows(vec![
            row(json!({"id": 1, "checked": true})),
            row(json!({"id": 2})),
        ]);
        let options = PayloadOptions {
            only_modified: false,
            only_checked: true,
            ..PayloadOptions::default()
        };
        let payload = build(RequestKind::Update, &options, &FormData::new(), &store);

        assert_eq!(payload.affected_count, 1);
        let list = payload.body.get("rowList").and_then(Value::as_array).unwrap();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_build_is_deterministic() {
        let store = store_with_mods();
        let options = PayloadOptions {
            only_checked: false,
            ..PayloadOptions::default()
        };
        let base = form(json!({"query": "alpha", "page": 2}));

        let first = build(RequestKind::Modify, &options, &base, &store);
        let second = build(RequestKind::Modify, &options, &base, &store);

        assert_eq!(first.body, second.body);
        assert_eq!(first.affected_count, second.affected_count);
    }
}
