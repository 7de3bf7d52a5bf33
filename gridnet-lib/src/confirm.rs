//! Confirmation gate and user-notice capabilities.

use async_trait::async_trait;

use crate::kind::RequestKind;

/// Generic one-shot notice shown after a transport-level failure.
pub(crate) const TRANSPORT_FAILURE_NOTICE: &str =
    "An error occurred while requesting data.\n\nPlease try again.";

/// Builds the user-facing text for a mutation of `count` rows.
///
/// A positive count yields a yes/no prompt; a zero count yields the
/// informational "nothing to do" notice.
pub fn confirm_message(kind: RequestKind, count: usize) -> String {
    if count > 0 {
        format!(
            "{count} record(s) will be {}. Proceed?",
            kind.action_done()
        )
    } else {
        format!("There is no data to {}.", kind.action_verb())
    }
}

/// Yes/no decision point consulted before every mutating request.
///
/// Implementations may be interactive (modal dialog) or policy-driven; either
/// way `submit_mutation` suspends until the decision resolves and issues no
/// transport call before it does. A zero count must never confirm: the gate
/// shows an informational notice and declines.
#[async_trait]
pub trait ConfirmationGate: Send + Sync {
    /// Returns whether the mutation may proceed.
    async fn confirm(&self, kind: RequestKind, count: usize) -> bool;
}

#[async_trait]
impl<G: ConfirmationGate + ?Sized> ConfirmationGate for std::sync::Arc<G> {
    async fn confirm(&self, kind: RequestKind, count: usize) -> bool {
        (**self).confirm(kind, count).await
    }
}

/// Non-interactive gate: proceeds whenever at least one row is affected.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoGate;

#[async_trait]
impl ConfirmationGate for AutoGate {
    async fn confirm(&self, _kind: RequestKind, count: usize) -> bool {
        count > 0
    }
}

/// Sink for one-shot user-visible notices (transport failures, service
/// failure messages).
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

impl<N: Notifier + ?Sized> Notifier for std::sync::Arc<N> {
    fn notify(&self, message: &str) {
        (**self).notify(message);
    }
}

/// Discards all notices. The default when the host injects nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _message: &str) {}
}
