//! The request orchestrator.
//!
//! [`Net`] mediates every read and write between the grid's row store and the
//! remote data service: it owns the lock and page state, shapes payloads,
//! consults the confirmation gate, issues transport calls and dispatches the
//! event pipeline when they settle.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use serde_json::Value;
use tracing::debug;
use tracing::warn;

use crate::config::NetConfig;
use crate::confirm::AutoGate;
use crate::confirm::ConfirmationGate;
use crate::confirm::Notifier;
use crate::confirm::NullNotifier;
use crate::confirm::TRANSPORT_FAILURE_NOTICE;
use crate::error::NetError;
use crate::error::TransportError;
use crate::event::EventContext;
use crate::event::EventData;
use crate::event::EventHub;
use crate::event::EventStage;
use crate::history::HistoryBridge;
use crate::history::HistorySink;
use crate::kind::RequestKind;
use crate::pagination::PageDisplay;
use crate::pagination::PaginationBridge;
use crate::payload;
use crate::payload::PayloadOptions;
use crate::rows::FormData;
use crate::rows::RowStore;
use crate::sort::SortChange;
use crate::sort::SortSpec;
use crate::transport::Method;
use crate::transport::Transport;
use crate::transport::TransportReply;
use crate::transport::TransportRequest;

/// Mutable request state for one grid instance.
///
/// Owned and mutated exclusively by [`Net`]; collaborators only see it
/// through the orchestrator's accessors.
#[derive(Debug, Clone)]
pub struct OrchestratorState {
    /// Current page, 1-based.
    pub current_page: u64,
    /// Page size sent with every read.
    pub items_per_page: u64,
    /// Whether a read cycle is outstanding. Reads are single-flight;
    /// mutations are never gated by this flag.
    pub locked: bool,
    /// Parameters of the most recently issued read, for replay.
    pub last_read_params: Option<FormData>,
    /// The last submitted form snapshot, reused across pagination and sort
    /// changes without recapturing the form.
    pub requested_form_data: Option<FormData>,
}

/// Options for [`Net::submit_mutation`].
#[derive(Debug, Clone)]
pub struct SubmitOptions {
    /// Transport target; defaults to the endpoint configured for the kind.
    pub url: Option<String>,
    /// HTTP method. Default POST.
    pub method: Method,
    /// Include row data in the payload. Default true.
    pub include_row_data: bool,
    /// Send only modified-row sets rather than the whole list. Default true.
    pub only_modified: bool,
    /// Restrict row data to checked rows. Default true.
    pub only_checked: bool,
    /// Bypass the confirmation gate entirely. Default false.
    pub skip_confirmation: bool,
}

impl Default for SubmitOptions {
    fn default() -> Self {
        Self {
            url: None,
            method: Method::Post,
            include_row_data: true,
            only_modified: true,
            only_checked: true,
            skip_confirmation: false,
        }
    }
}

impl SubmitOptions {
    /// Creates options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the transport target.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Overrides the HTTP method.
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Includes or omits row data.
    pub fn include_row_data(mut self, include: bool) -> Self {
        self.include_row_data = include;
        self
    }

    /// Sends only modified-row sets, or the whole list.
    pub fn only_modified(mut self, only: bool) -> Self {
        self.only_modified = only;
        self
    }

    /// Restricts row data to checked rows.
    pub fn only_checked(mut self, only: bool) -> Self {
        self.only_checked = only;
        self
    }

    /// Bypasses the confirmation gate.
    pub fn skip_confirmation(mut self, skip: bool) -> Self {
        self.skip_confirmation = skip;
        self
    }

    fn payload_options(&self) -> PayloadOptions {
        PayloadOptions {
            include_row_data: self.include_row_data,
            only_modified: self.only_modified,
            only_checked: self.only_checked,
        }
    }
}

/// How one request attempt ended.
#[derive(Debug)]
pub enum RequestOutcome {
    /// Service-level success; carries the response `data` payload.
    Success(Option<Value>),
    /// The service reported `result = false`; carries its message.
    Failed(Option<String>),
    /// The transport call itself failed.
    TransportFailed(TransportError),
    /// An observer stopped the pipeline at the given stage. For stages after
    /// `BeforeRequest` the transport call was already issued and the lock
    /// already released.
    Stopped(EventStage),
    /// Nothing was issued: a read arrived while one was outstanding, a reload
    /// had no prior read to replay, or the trigger required no fetch.
    Skipped,
    /// The confirmation gate declined the mutation. Silent by design.
    Declined,
}

impl RequestOutcome {
    /// Returns `true` for service-level success.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns `true` when a transport call was actually issued.
    pub fn was_issued(&self) -> bool {
        match self {
            Self::Success(_) | Self::Failed(_) | Self::TransportFailed(_) => true,
            Self::Stopped(stage) => *stage != EventStage::BeforeRequest,
            Self::Skipped | Self::Declined => false,
        }
    }
}

/// The network request orchestrator for one grid instance.
///
/// # Example
///
/// ```ignore
/// let net = Net::builder()
///     .transport(ReqwestTransport::new())
///     .row_store(MemoryRowStore::new())
///     .config(NetConfig::new().api(ApiEndpoints::new().read_data("https://example.com/api/read")))
///     .build();
///
/// net.on(EventStage::SuccessResponse, |ctx| { /* ... */ });
/// net.init().await?;
/// net.submit_mutation(RequestKind::Modify, SubmitOptions::default()).await?;
/// ```
pub struct Net {
    config: NetConfig,
    transport: Arc<dyn Transport>,
    rows: Arc<dyn RowStore>,
    gate: Arc<dyn ConfirmationGate>,
    notifier: Arc<dyn Notifier>,
    history: Option<HistoryBridge>,
    pagination: Option<PaginationBridge>,
    hub: Mutex<EventHub>,
    state: Mutex<OrchestratorState>,
    // Mutations are not read-gated, but overlapping mutations touching the
    // same row sets would interleave on the server; serialize them.
    mutation_gate: tokio::sync::Mutex<()>,
}

impl Net {
    /// Creates a new builder.
    pub fn builder() -> NetBuilder<Missing, Missing> {
        NetBuilder::new()
    }

    /// Registers an observer for a lifecycle stage.
    pub fn on<F>(&self, stage: EventStage, observer: F)
    where
        F: FnMut(&mut EventContext) + Send + 'static,
    {
        self.hub().on(stage, observer);
    }

    /// Seeds the pagination display and issues the initial read when
    /// configured.
    pub async fn init(&self) -> Result<RequestOutcome, NetError> {
        if let Some(bridge) = &self.pagination {
            bridge.initialize(self.config.items_per_page);
        }
        if self.config.issue_initial_read {
            self.initiate_read(Some(1), false, None).await
        } else {
            Ok(RequestOutcome::Skipped)
        }
    }

    /// The configuration this orchestrator was built with.
    pub fn config(&self) -> &NetConfig {
        &self.config
    }

    /// Whether a read cycle is currently outstanding.
    pub fn is_locked(&self) -> bool {
        self.state().locked
    }

    /// The current page, 1-based.
    pub fn current_page(&self) -> u64 {
        self.state().current_page
    }

    /// Parameters of the most recently issued read, if any.
    pub fn last_read_params(&self) -> Option<FormData> {
        self.state().last_read_params.clone()
    }

    /// Writes parameters into the form-snapshot collaborator.
    pub fn set_form_data(&self, form: FormData) {
        self.rows.apply_form_snapshot(form);
    }

    /// Form-submit entry point: reads page 1 with a freshly captured form.
    pub async fn submit(&self) -> Result<RequestOutcome, NetError> {
        self.initiate_read(Some(1), false, None).await
    }

    /// Issues a read.
    ///
    /// Silently skips when a read is already outstanding. The page defaults
    /// to the current one; source parameters come from the stored form
    /// snapshot when `reuse_last_form_data` is set, otherwise from a fresh
    /// capture. `page`/`perPage` and sort parameters are merged in before the
    /// request is issued.
    pub async fn initiate_read(
        &self,
        page_override: Option<u64>,
        reuse_last_form_data: bool,
        sort_override: Option<SortSpec>,
    ) -> Result<RequestOutcome, NetError> {
        let (page, per_page, stored) = {
            let state = self.state();
            if state.locked {
                debug!("read skipped: another read is outstanding");
                return Ok(RequestOutcome::Skipped);
            }
            (
                page_override.unwrap_or(state.current_page),
                state.items_per_page,
                state.requested_form_data.clone(),
            )
        };

        let mut params = if reuse_last_form_data {
            stored.unwrap_or_else(|| self.rows.capture_form_snapshot())
        } else {
            self.rows.capture_form_snapshot()
        };
        params.insert("page".to_string(), Value::from(page));
        params.insert("perPage".to_string(), Value::from(per_page));
        self.apply_sort(&mut params, sort_override.as_ref());

        self.read_with(params, self.config.enable_history).await
    }

    /// Replays the most recently issued read without recapturing the form.
    ///
    /// No-op when no prior read occurred.
    pub async fn reload(&self) -> Result<RequestOutcome, NetError> {
        let Some(params) = self.state().last_read_params.clone() else {
            debug!("reload skipped: no prior read");
            return Ok(RequestOutcome::Skipped);
        };
        self.read_with(params, false).await
    }

    /// Sort-change entry point.
    ///
    /// Changes without the refetch flag are ignored; the rest re-read page 1
    /// with the stored form snapshot and the new sort order.
    pub async fn sort_changed(&self, change: SortChange) -> Result<RequestOutcome, NetError> {
        if !change.requires_fetch {
            return Ok(RequestOutcome::Skipped);
        }
        self.initiate_read(Some(1), true, Some(change.spec())).await
    }

    /// Page-change entry point, invoked when the widget requests a page.
    pub async fn page_requested(&self, page: u64) -> Result<RequestOutcome, NetError> {
        if self.state().current_page == page {
            return Ok(RequestOutcome::Skipped);
        }
        self.initiate_read(Some(page), true, None).await
    }

    /// Submits a mutating request.
    ///
    /// Builds the payload, consults the confirmation gate unless skipped, and
    /// issues the transport call. Errors with
    /// [`NetError::InvalidRequestKind`] when no endpoint is configured for
    /// `kind` and no URL override is given. A declined confirmation is a
    /// silent no-op.
    pub async fn submit_mutation(
        &self,
        kind: RequestKind,
        options: SubmitOptions,
    ) -> Result<RequestOutcome, NetError> {
        let url = match &options.url {
            Some(url) => url.clone(),
            None => self
                .config
                .api
                .for_kind(kind)
                .ok_or(NetError::InvalidRequestKind(kind))?
                .to_string(),
        };

        let base = self.state().requested_form_data.clone().unwrap_or_default();
        let payload = payload::build(kind, &options.payload_options(), &base, self.rows.as_ref());

        if !options.skip_confirmation
            && !self.gate.confirm(kind, payload.affected_count).await
        {
            debug!(kind = %kind, count = payload.affected_count, "mutation declined");
            return Ok(RequestOutcome::Declined);
        }

        let mut ctx = EventContext::new(EventData::Request {
            kind,
            url: url.clone(),
            body: payload.body.clone(),
        });
        self.hub().dispatch(EventStage::BeforeRequest, &mut ctx);
        if ctx.is_stopped() {
            return Ok(RequestOutcome::Stopped(EventStage::BeforeRequest));
        }

        let request = TransportRequest {
            kind,
            url,
            method: options.method,
            body: payload.body,
        };

        let _serialized = self.mutation_gate.lock().await;
        Ok(self.issue(request).await)
    }

    /// The read path shared by `initiate_read` and `reload`.
    async fn read_with(
        &self,
        params: FormData,
        record_history: bool,
    ) -> Result<RequestOutcome, NetError> {
        let url = self
            .config
            .api
            .for_kind(RequestKind::Read)
            .ok_or(NetError::InvalidRequestKind(RequestKind::Read))?
            .to_string();

        // beforeRequest runs before any state transition: a stop here leaves
        // the lock untouched and issues no transport call.
        let mut ctx = EventContext::new(EventData::Request {
            kind: RequestKind::Read,
            url: url.clone(),
            body: params.clone(),
        });
        self.hub().dispatch(EventStage::BeforeRequest, &mut ctx);
        if ctx.is_stopped() {
            return Ok(RequestOutcome::Stopped(EventStage::BeforeRequest));
        }

        {
            let mut state = self.state();
            if state.locked {
                return Ok(RequestOutcome::Skipped);
            }
            state.locked = true;
            if let Some(page) = params.get("page").and_then(Value::as_u64) {
                state.current_page = page;
            }
            state.requested_form_data = Some(params.clone());
            state.last_read_params = Some(params.clone());
        }

        self.rows.reset_transient_state();

        if record_history {
            if let Some(history) = &self.history {
                history.record(&params);
            }
        }

        let request = TransportRequest {
            kind: RequestKind::Read,
            url,
            method: Method::Post,
            body: params,
        };
        Ok(self.issue(request).await)
    }

    /// Merges a sort override into outgoing parameters.
    ///
    /// Sorting by the identity column removes the sort parameters so server
    /// defaults apply, even when a previous read carried them.
    fn apply_sort(&self, params: &mut FormData, sort: Option<&SortSpec>) {
        let Some(sort) = sort else {
            return;
        };
        if sort.column == self.config.key_column {
            params.remove("sortColumn");
            params.remove("sortAscending");
        } else {
            params.insert(
                "sortColumn".to_string(),
                Value::String(sort.column.clone()),
            );
            params.insert("sortAscending".to_string(), Value::Bool(sort.ascending));
        }
    }

    /// Issues a transport call and runs completion when it settles.
    async fn issue(&self, request: TransportRequest) -> RequestOutcome {
        debug!(kind = %request.kind, url = %request.url, "issuing request");
        let result = self.transport.send(request.clone()).await;
        self.complete_request(request, result)
    }

    /// Completion: runs whenever transport settles, success or failure.
    ///
    /// The lock is cleared first, unconditionally, so a failed cycle can
    /// never wedge the grid.
    fn complete_request(
        &self,
        request: TransportRequest,
        result: Result<TransportReply, TransportError>,
    ) -> RequestOutcome {
        self.state().locked = false;

        let http_status = match &result {
            Ok(reply) => Some(reply.status),
            Err(err) => err.status_code(),
        };
        let response_body = result
            .as_ref()
            .ok()
            .and_then(|reply| serde_json::to_value(&reply.body).ok());
        let data = EventData::Response {
            http_status,
            kind: request.kind,
            request_params: request.body.clone(),
            response_body,
        };

        let mut ctx = EventContext::new(data.clone());
        self.hub().dispatch(EventStage::Response, &mut ctx);
        if ctx.is_stopped() {
            return RequestOutcome::Stopped(EventStage::Response);
        }

        match result {
            Err(err) => {
                let mut ctx = EventContext::new(data);
                self.hub().dispatch(EventStage::ErrorResponse, &mut ctx);
                if ctx.is_stopped() {
                    return RequestOutcome::Stopped(EventStage::ErrorResponse);
                }
                if !err.is_abort() {
                    warn!(kind = %request.kind, error = %err, "transport failure");
                    self.notifier.notify(TRANSPORT_FAILURE_NOTICE);
                }
                RequestOutcome::TransportFailed(err)
            }
            Ok(reply) if reply.body.result => {
                let mut ctx = EventContext::new(data);
                self.hub().dispatch(EventStage::SuccessResponse, &mut ctx);
                if ctx.is_stopped() {
                    return RequestOutcome::Stopped(EventStage::SuccessResponse);
                }
                if request.kind == RequestKind::Read {
                    self.apply_read_success(&reply);
                }
                RequestOutcome::Success(reply.body.data)
            }
            Ok(reply) => {
                let mut ctx = EventContext::new(data);
                self.hub().dispatch(EventStage::FailResponse, &mut ctx);
                if ctx.is_stopped() {
                    return RequestOutcome::Stopped(EventStage::FailResponse);
                }
                if let Some(message) = &reply.body.message {
                    self.notifier.notify(message);
                }
                RequestOutcome::Failed(reply.body.message)
            }
        }
    }

    /// Post-success effects for reads: refresh the row store and the page
    /// widget.
    fn apply_read_success(&self, reply: &TransportReply) {
        let Some(read) = reply.body.read_data() else {
            return;
        };
        self.rows.apply_fetched_rows(read.contents);
        if let Some(snapshot) = read.pagination {
            if let Some(bridge) = &self.pagination {
                bridge.apply_snapshot(snapshot, self.config.items_per_page);
            }
            self.state().current_page = snapshot.page;
        }
    }

    fn state(&self) -> MutexGuard<'_, OrchestratorState> {
        self.state.lock().expect("orchestrator state lock poisoned")
    }

    fn hub(&self) -> MutexGuard<'_, EventHub> {
        self.hub.lock().expect("event hub lock poisoned")
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`Net`].
///
/// Uses the typestate pattern: `build()` only exists once both the transport
/// and the row store have been provided.
pub struct NetBuilder<T, R> {
    transport: T,
    rows: R,
    config: NetConfig,
    gate: Option<Arc<dyn ConfirmationGate>>,
    notifier: Option<Arc<dyn Notifier>>,
    history: Option<Arc<dyn HistorySink>>,
    pagination: Option<Arc<dyn PageDisplay>>,
}

impl NetBuilder<Missing, Missing> {
    /// Creates a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            transport: Missing,
            rows: Missing,
            config: NetConfig::default(),
            gate: None,
            notifier: None,
            history: None,
            pagination: None,
        }
    }
}

impl Default for NetBuilder<Missing, Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> NetBuilder<Missing, R> {
    /// Sets the transport capability.
    pub fn transport<T: Transport + 'static>(
        self,
        transport: T,
    ) -> NetBuilder<Set<Arc<dyn Transport>>, R> {
        NetBuilder {
            transport: Set(Arc::new(transport) as Arc<dyn Transport>),
            rows: self.rows,
            config: self.config,
            gate: self.gate,
            notifier: self.notifier,
            history: self.history,
            pagination: self.pagination,
        }
    }
}

impl<T> NetBuilder<T, Missing> {
    /// Sets the row-store collaborator.
    pub fn row_store<S: RowStore + 'static>(
        self,
        rows: S,
    ) -> NetBuilder<T, Set<Arc<dyn RowStore>>> {
        NetBuilder {
            transport: self.transport,
            rows: Set(Arc::new(rows) as Arc<dyn RowStore>),
            config: self.config,
            gate: self.gate,
            notifier: self.notifier,
            history: self.history,
            pagination: self.pagination,
        }
    }
}

impl<T, R> NetBuilder<T, R> {
    /// Sets the configuration.
    pub fn config(mut self, config: NetConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the confirmation gate. Defaults to [`AutoGate`].
    pub fn confirmation_gate<G: ConfirmationGate + 'static>(mut self, gate: G) -> Self {
        self.gate = Some(Arc::new(gate));
        self
    }

    /// Sets the user-notice sink. Defaults to [`NullNotifier`].
    pub fn notifier<N: Notifier + 'static>(mut self, notifier: N) -> Self {
        self.notifier = Some(Arc::new(notifier));
        self
    }

    /// Sets the history sink. Without one (or with history disabled in the
    /// configuration) no navigable state is recorded.
    pub fn history_sink<H: HistorySink + 'static>(mut self, sink: H) -> Self {
        self.history = Some(Arc::new(sink));
        self
    }

    /// Sets the page widget's display state.
    pub fn page_display<P: PageDisplay + 'static>(mut self, display: P) -> Self {
        self.pagination = Some(Arc::new(display));
        self
    }
}

impl NetBuilder<Set<Arc<dyn Transport>>, Set<Arc<dyn RowStore>>> {
    /// Builds the orchestrator.
    ///
    /// Only available once both required collaborators are set.
    pub fn build(self) -> Net {
        let config = self.config;
        let history = if config.enable_history {
            self.history.map(HistoryBridge::new)
        } else {
            None
        };

        Net {
            state: Mutex::new(OrchestratorState {
                current_page: 1,
                items_per_page: config.items_per_page,
                locked: false,
                last_read_params: None,
                requested_form_data: None,
            }),
            transport: self.transport.0,
            rows: self.rows.0,
            gate: self.gate.unwrap_or_else(|| Arc::new(AutoGate)),
            notifier: self.notifier.unwrap_or_else(|| Arc::new(NullNotifier)),
            history,
            pagination: self.pagination.map(PaginationBridge::new),
            hub: Mutex::new(EventHub::new()),
            mutation_gate: tokio::sync::Mutex::new(()),
            config,
        }
    }
}
