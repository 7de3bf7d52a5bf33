//! Orchestrator-level error types

use crate::kind::RequestKind;

/// Errors that abort a request before any transport call is made.
///
/// Transport-level and service-level failures are not errors in this sense;
/// they are reported through the event pipeline and the request outcome.
#[derive(Debug, thiserror::Error)]
pub enum NetError {
    /// No endpoint is configured for the given request kind.
    #[error("no endpoint configured for request kind `{0}`")]
    InvalidRequestKind(RequestKind),
}
