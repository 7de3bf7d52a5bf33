//! Stoppable event pipeline for request lifecycles.
//!
//! Every request dispatches through a fixed sequence of stages. All observers
//! registered for a stage share one [`EventContext`]; any observer can set its
//! `stopped` latch, which skips the remaining observers of that stage and the
//! dispatching call's downstream side effects.
//!
//! # Example
//!
//! ```ignore
//! net.on(EventStage::BeforeRequest, |ctx| {
//!     if should_block(&ctx.data) {
//!         ctx.stop(); // the transport call is never issued
//!     }
//! });
//! ```

use std::collections::HashMap;

use serde_json::Value;

use crate::kind::RequestKind;
use crate::rows::FormData;

/// A stage in the request lifecycle.
///
/// Per dispatch the order is fixed: `BeforeRequest` (before the transport call
/// is issued), `Response` (after transport settles, success or failure), then
/// exactly one of `SuccessResponse` / `FailResponse` (business-level result)
/// or `ErrorResponse` (transport-level failure).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventStage {
    BeforeRequest,
    Response,
    SuccessResponse,
    FailResponse,
    ErrorResponse,
}

impl EventStage {
    /// The subscription name of this stage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BeforeRequest => "beforeRequest",
            Self::Response => "response",
            Self::SuccessResponse => "successResponse",
            Self::FailResponse => "failResponse",
            Self::ErrorResponse => "errorResponse",
        }
    }
}

/// The payload observers see for one dispatch.
#[derive(Debug, Clone)]
pub enum EventData {
    /// An outbound request, seen by `BeforeRequest` observers.
    Request {
        kind: RequestKind,
        url: String,
        body: FormData,
    },
    /// A settled transport call, seen by all post-transport stages.
    Response {
        /// HTTP status, when the transport produced one.
        http_status: Option<u16>,
        kind: RequestKind,
        request_params: FormData,
        /// The service response envelope; `None` on transport failure.
        response_body: Option<Value>,
    },
}

/// Mutable context shared by every observer of one stage dispatch.
///
/// `stopped` is a one-way latch: once set, no later observer of that dispatch
/// runs and the triggering call skips its remaining stage-specific effects.
/// This latch is the only mutable channel between observers; observers must
/// not mutate other shared state.
#[derive(Debug)]
pub struct EventContext {
    /// The dispatch payload.
    pub data: EventData,
    stopped: bool,
}

impl EventContext {
    /// Creates a fresh context for one stage dispatch.
    pub fn new(data: EventData) -> Self {
        Self {
            data,
            stopped: false,
        }
    }

    /// Sets the stop latch. Cannot be unset.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    /// Returns `true` once any observer has stopped this dispatch.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

/// A registered stage observer.
///
/// Observer panics are not isolated: a faulting observer takes the dispatching
/// call down with it.
pub type Observer = Box<dyn FnMut(&mut EventContext) + Send>;

/// Observer registry for the five lifecycle stages.
#[derive(Default)]
pub struct EventHub {
    observers: HashMap<EventStage, Vec<Observer>>,
}

impl EventHub {
    /// Creates an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer for a stage. Observers run in registration order.
    pub fn on<F>(&mut self, stage: EventStage, observer: F)
    where
        F: FnMut(&mut EventContext) + Send + 'static,
    {
        self.observers
            .entry(stage)
            .or_default()
            .push(Box::new(observer));
    }

    /// Invokes the stage's observers until one stops the dispatch.
    pub fn dispatch(&mut self, stage: EventStage, ctx: &mut EventContext) {
        let Some(observers) = self.observers.get_mut(&stage) else {
            return;
        };
        for observer in observers.iter_mut() {
            if ctx.is_stopped() {
                break;
            }
            observer(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;

    use super::*;

    fn request_ctx() -> EventContext {
        EventContext::new(EventData::Request {
            kind: RequestKind::Read,
            url: "/api/read".into(),
            body: FormData::new(),
        })
    }

    #[test]
    fn test_observers_run_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut hub = EventHub::new();
        for label in ["first", "second", "third"] {
            let seen = Arc::clone(&seen);
            hub.on(EventStage::Response, move |_| {
                seen.lock().unwrap().push(label);
            });
        }

        let mut ctx = request_ctx();
        hub.dispatch(EventStage::Response, &mut ctx);

        assert_eq!(*seen.lock().unwrap(), vec!["first", "second", "third"]);
        assert!(!ctx.is_stopped());
    }

    #[test]
    fn test_stop_skips_later_observers() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut hub = EventHub::new();
        {
            let seen = Arc::clone(&seen);
            hub.on(EventStage::BeforeRequest, move |ctx| {
                seen.lock().unwrap().push("stopper");
                ctx.stop();
            });
        }
        {
            let seen = Arc::clone(&seen);
            hub.on(EventStage::BeforeRequest, move |_| {
                seen.lock().unwrap().push("unreached");
            });
        }

        let mut ctx = request_ctx();
        hub.dispatch(EventStage::BeforeRequest, &mut ctx);

        assert!(ctx.is_stopped());
        assert_eq!(*seen.lock().unwrap(), vec!["stopper"]);
    }

    #[test]
    fn test_stages_are_independent() {
        let mut hub = EventHub::new();
        hub.on(EventStage::FailResponse, |ctx| ctx.stop());

        let mut ctx = request_ctx();
        hub.dispatch(EventStage::SuccessResponse, &mut ctx);
        assert!(!ctx.is_stopped());
    }
}
