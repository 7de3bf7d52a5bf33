//! Orchestrator configuration.

use crate::kind::RequestKind;

/// Endpoint URLs per request kind.
///
/// The download endpoints are passthrough configuration for host toolbars;
/// the request pipeline itself never calls them.
#[derive(Debug, Clone, Default)]
pub struct ApiEndpoints {
    pub read_data: Option<String>,
    pub create_data: Option<String>,
    pub update_data: Option<String>,
    pub delete_data: Option<String>,
    pub modify_data: Option<String>,
    pub download_data: Option<String>,
    pub download_all_data: Option<String>,
}

impl ApiEndpoints {
    /// Creates an empty endpoint table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the read endpoint.
    pub fn read_data(mut self, url: impl Into<String>) -> Self {
        self.read_data = Some(url.into());
        self
    }

    /// Sets the create endpoint.
    pub fn create_data(mut self, url: impl Into<String>) -> Self {
        self.create_data = Some(url.into());
        self
    }

    /// Sets the update endpoint.
    pub fn update_data(mut self, url: impl Into<String>) -> Self {
        self.update_data = Some(url.into());
        self
    }

    /// Sets the delete endpoint.
    pub fn delete_data(mut self, url: impl Into<String>) -> Self {
        self.delete_data = Some(url.into());
        self
    }

    /// Sets the combined create/update/delete endpoint.
    pub fn modify_data(mut self, url: impl Into<String>) -> Self {
        self.modify_data = Some(url.into());
        self
    }

    /// Sets the download endpoint (passthrough).
    pub fn download_data(mut self, url: impl Into<String>) -> Self {
        self.download_data = Some(url.into());
        self
    }

    /// Sets the download-all endpoint (passthrough).
    pub fn download_all_data(mut self, url: impl Into<String>) -> Self {
        self.download_all_data = Some(url.into());
        self
    }

    /// Looks up the configured endpoint for a kind.
    pub fn for_kind(&self, kind: RequestKind) -> Option<&str> {
        match kind {
            RequestKind::Read => self.read_data.as_deref(),
            RequestKind::Create => self.create_data.as_deref(),
            RequestKind::Update => self.update_data.as_deref(),
            RequestKind::Delete => self.delete_data.as_deref(),
            RequestKind::Modify => self.modify_data.as_deref(),
        }
    }
}

/// Configuration for one grid's orchestrator.
///
/// # Example
///
/// ```
/// use gridnet_lib::config::{ApiEndpoints, NetConfig};
///
/// let config = NetConfig::new()
///     .api(ApiEndpoints::new()
///         .read_data("https://example.com/api/read")
///         .modify_data("https://example.com/api/modify"))
///     .items_per_page(100)
///     .issue_initial_read(false);
///
/// assert_eq!(config.items_per_page, 100);
/// ```
#[derive(Debug, Clone)]
pub struct NetConfig {
    /// Endpoint table.
    pub api: ApiEndpoints,
    /// Page size sent with every read. Default 500.
    pub items_per_page: u64,
    /// Issue a read at page 1 during [`init`](crate::Net::init). Default true.
    pub issue_initial_read: bool,
    /// Record read parameters through the history sink. Default true.
    pub enable_history: bool,
    /// The identity column; sorting by it drops sort parameters from the
    /// outgoing payload so server defaults apply. Default `rowKey`.
    pub key_column: String,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            api: ApiEndpoints::default(),
            items_per_page: 500,
            issue_initial_read: true,
            enable_history: true,
            key_column: "rowKey".to_string(),
        }
    }
}

impl NetConfig {
    /// Creates a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the endpoint table.
    pub fn api(mut self, api: ApiEndpoints) -> Self {
        self.api = api;
        self
    }

    /// Sets the page size.
    pub fn items_per_page(mut self, per_page: u64) -> Self {
        self.items_per_page = per_page;
        self
    }

    /// Enables or disables the initial read.
    pub fn issue_initial_read(mut self, initial: bool) -> Self {
        self.issue_initial_read = initial;
        self
    }

    /// Enables or disables history recording.
    pub fn enable_history(mut self, enable: bool) -> Self {
        self.enable_history = enable;
        self
    }

    /// Overrides the identity column name.
    pub fn key_column(mut self, column: impl Into<String>) -> Self {
        self.key_column = column.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NetConfig::default();
        assert_eq!(config.items_per_page, 500);
        assert!(config.issue_initial_read);
        assert!(config.enable_history);
        assert_eq!(config.key_column, "rowKey");
    }

    #[test]
    fn test_endpoint_lookup() {
        let api = ApiEndpoints::new()
            .read_data("/api/read")
            .modify_data("/api/modify");

        assert_eq!(api.for_kind(RequestKind::Read), Some("/api/read"));
        assert_eq!(api.for_kind(RequestKind::Modify), Some("/api/modify"));
        assert_eq!(api.for_kind(RequestKind::Delete), None);
    }
}
