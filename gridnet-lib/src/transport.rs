//! Transport capability and the service response envelope.
//!
//! The orchestrator never talks HTTP directly; every request goes through an
//! injected [`Transport`]. [`ReqwestTransport`] is the production
//! implementation.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::error::TransportError;
use crate::kind::RequestKind;
use crate::pagination::PaginationSnapshot;
use crate::rows::FormData;
use crate::rows::Row;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    /// The method name on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// One outbound request, built per call and consumed exactly once.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// The request kind, carried through to response dispatch.
    pub kind: RequestKind,
    pub url: String,
    pub method: Method,
    pub body: FormData,
}

/// A settled transport call.
#[derive(Debug, Clone)]
pub struct TransportReply {
    /// HTTP status of the response.
    pub status: u16,
    /// The parsed service envelope.
    pub body: ServiceResponse,
}

/// The service's response envelope.
///
/// `result` distinguishes business-level success from failure; transport
/// failures never produce an envelope at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceResponse {
    pub result: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ServiceResponse {
    /// A successful envelope carrying `data`.
    pub fn ok(data: impl Into<Option<Value>>) -> Self {
        Self {
            result: true,
            message: None,
            data: data.into(),
        }
    }

    /// A failed envelope carrying a service message.
    pub fn fail(message: impl Into<Option<String>>) -> Self {
        Self {
            result: false,
            message: message.into(),
            data: None,
        }
    }

    /// Interprets `data` as a read response, tolerating missing fields.
    pub fn read_data(&self) -> Option<ReadData> {
        let data = self.data.clone()?;
        serde_json::from_value(data).ok()
    }
}

/// The `data` payload of a successful read response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReadData {
    /// The fetched row collection.
    #[serde(default)]
    pub contents: Vec<Row>,
    /// Pagination state, when the service paginates.
    #[serde(default)]
    pub pagination: Option<PaginationSnapshot>,
}

/// Asynchronous transport capability.
///
/// Timeout semantics live entirely here; the orchestrator stays locked until
/// the call settles or errors.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues the request and yields the settled reply.
    async fn send(&self, request: TransportRequest) -> Result<TransportReply, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn send(&self, request: TransportRequest) -> Result<TransportReply, TransportError> {
        (**self).send(request).await
    }
}

/// [`Transport`] backed by `reqwest`.
///
/// # Example
///
/// ```ignore
/// let transport = ReqwestTransport::new().with_timeout(Duration::from_secs(30));
/// let net = Net::builder().transport(transport).row_store(store).build();
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout: Option<Duration>,
}

impl ReqwestTransport {
    /// Creates a transport with a default HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport around an existing HTTP client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            timeout: None,
        }
    }

    /// Sets a per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportReply, TransportError> {
        let url = url::Url::parse(&request.url)
            .map_err(|err| TransportError::InvalidUrl(format!("{}: {err}", request.url)))?;

        let mut builder = match request.method {
            Method::Get => self.client.get(url).query(&request.body),
            Method::Post => self.client.post(url).json(&request.body),
        };
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(TransportError::from_reqwest)?;
        let status = response.status().as_u16();

        if !response.status().is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TransportError::http(status, message));
        }

        let text = response.text().await.map_err(TransportError::from_reqwest)?;
        let body: ServiceResponse = serde_json::from_str(&text)
            .map_err(|err| TransportError::parse_with_body(err.to_string(), text))?;

        Ok(TransportReply { status, body })
    }
}
