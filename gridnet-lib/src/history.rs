//! History bridge: mirrors read parameters into navigable state.

use std::sync::Arc;

use serde_json::Value;

use crate::rows::FormData;

/// Browser-history (or equivalent) collaborator.
///
/// Entries are informational and bookmarkable only; recording one must not
/// re-issue the read, and back/forward navigation must not trigger requests
/// automatically.
pub trait HistorySink: Send + Sync {
    /// Pushes a navigable entry for the given query form.
    fn record(&self, query: &str);
}

impl<H: HistorySink + ?Sized> HistorySink for Arc<H> {
    fn record(&self, query: &str) {
        (**self).record(query);
    }
}

/// Serializes read parameters into a deterministic URL-safe query string.
///
/// Keys are emitted in sorted order so identical parameters always produce
/// identical entries.
///
/// # Example
///
/// ```
/// use gridnet_lib::history::to_query_string;
/// use serde_json::json;
///
/// let params = json!({"query": "a b", "page": 2}).as_object().unwrap().clone();
/// assert_eq!(to_query_string(&params), "page=2&query=a%20b");
/// ```
pub fn to_query_string(params: &FormData) -> String {
    let mut pairs: Vec<(&str, String)> = params
        .iter()
        .map(|(key, value)| {
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.as_str(), rendered)
        })
        .collect();
    pairs.sort();

    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Records successful read parameters through an injected [`HistorySink`].
pub(crate) struct HistoryBridge {
    sink: Arc<dyn HistorySink>,
}

impl HistoryBridge {
    pub(crate) fn new(sink: Arc<dyn HistorySink>) -> Self {
        Self { sink }
    }

    /// Records one read's parameters as a non-triggering entry.
    pub(crate) fn record(&self, params: &FormData) {
        self.sink.record(&format!("read/{}", to_query_string(params)));
    }
}
