// File: dashboard/src/flows/controller.rs
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};

use super::forms::{FlowForm, FlowKind};
use crate::errors::{ErrorClass, FlowError, ValidationError};
use crate::http::{cancel_pair, CancelHandle, CancelSignal};
use crate::lnurl::{LnurlClient, LnurlRequest};

/// Error as shown next to the step that failed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowFailure {
    pub class: ErrorClass,
    pub message: String,
    pub status: Option<u16>,
    pub details: String,
}

impl From<&FlowError> for FlowFailure {
    fn from(err: &FlowError) -> Self {
        Self {
            class: err.class(),
            message: err.to_string(),
            status: err.status(),
            details: err.details(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CreateState {
    #[default]
    Idle,
    Requesting {
        started_at: DateTime<Utc>,
    },
    Requested {
        request: LnurlRequest,
        received_at: DateTime<Utc>,
    },
    RequestFailed {
        error: FlowFailure,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InvokeState {
    #[default]
    Idle,
    Invoking {
        started_at: DateTime<Utc>,
    },
    Invoked {
        response: Value,
        received_at: DateTime<Utc>,
    },
    InvokeFailed {
        error: FlowFailure,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct FlowSnapshot {
    pub flow: FlowKind,
    pub endpoint: String,
    pub create: CreateState,
    pub invoke: InvokeState,
}

#[derive(Default)]
struct FlowInner {
    create: CreateState,
    invoke: InvokeState,
    create_generation: u64,
    invoke_generation: u64,
    create_cancel: Option<CancelHandle>,
    invoke_cancel: Option<CancelHandle>,
    /// Set once the endpoint this controller talks to was replaced
    retired: bool,
}

impl FlowInner {
    /// Start a new create attempt, cancelling whatever it replaces
    fn begin_create(&mut self) -> (u64, CancelSignal) {
        self.create_generation += 1;
        if let Some(handle) = self.create_cancel.take() {
            handle.cancel();
        }
        self.abandon_invoke();
        self.invoke = InvokeState::Idle;

        let (handle, signal) = cancel_pair();
        self.create_cancel = Some(handle);
        self.create = CreateState::Requesting {
            started_at: Utc::now(),
        };
        (self.create_generation, signal)
    }

    fn abandon_create(&mut self) {
        self.create_generation += 1;
        if let Some(handle) = self.create_cancel.take() {
            handle.cancel();
        }
        if matches!(self.create, CreateState::Requesting { .. }) {
            self.create = CreateState::Idle;
        }
    }

    fn abandon_invoke(&mut self) {
        self.invoke_generation += 1;
        if let Some(handle) = self.invoke_cancel.take() {
            handle.cancel();
        }
        if matches!(self.invoke, InvokeState::Invoking { .. }) {
            self.invoke = InvokeState::Idle;
        }
    }
}

fn lock(inner: &Mutex<FlowInner>) -> MutexGuard<'_, FlowInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Create,
    Invoke,
}

/// Pending create or invoke. If the future driving it is dropped before the
/// outcome is recorded, the phase goes back to idle and its request is cancelled.
struct PendingAttempt<'a> {
    inner: &'a Mutex<FlowInner>,
    phase: Phase,
    generation: u64,
    settled: bool,
}

impl<'a> PendingAttempt<'a> {
    fn new(inner: &'a Mutex<FlowInner>, phase: Phase, generation: u64) -> Self {
        Self {
            inner,
            phase,
            generation,
            settled: false,
        }
    }

    fn settle(&mut self) {
        self.settled = true;
    }
}

impl Drop for PendingAttempt<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut inner = lock(self.inner);
        match self.phase {
            Phase::Create if inner.create_generation == self.generation => {
                debug!("Create attempt {} dropped before settling", self.generation);
                inner.abandon_create();
            }
            Phase::Invoke if inner.invoke_generation == self.generation => {
                debug!("Invoke attempt {} dropped before settling", self.generation);
                inner.abandon_invoke();
            }
            _ => {}
        }
    }
}

/// Two-step state machine for one LNURL flow against one endpoint.
///
/// Attempts are numbered; when an attempt finishes after a newer one has
/// started (or after [`FlowController::cancel`]) its result is dropped and the
/// caller gets [`FlowError::Superseded`]. The state lock is never held across
/// a network call.
pub struct FlowController {
    kind: FlowKind,
    client: LnurlClient,
    inner: Mutex<FlowInner>,
}

impl FlowController {
    pub fn new(kind: FlowKind, client: LnurlClient) -> Self {
        Self {
            kind,
            client,
            inner: Mutex::new(FlowInner::default()),
        }
    }

    pub fn kind(&self) -> FlowKind {
        self.kind
    }

    pub fn endpoint(&self) -> &str {
        self.client.endpoint()
    }

    pub fn snapshot(&self) -> FlowSnapshot {
        let inner = lock(&self.inner);
        FlowSnapshot {
            flow: self.kind,
            endpoint: self.client.endpoint().to_string(),
            create: inner.create.clone(),
            invoke: inner.invoke.clone(),
        }
    }

    pub fn is_creating(&self) -> bool {
        matches!(lock(&self.inner).create, CreateState::Requesting { .. })
    }

    pub fn is_invoking(&self) -> bool {
        matches!(lock(&self.inner).invoke, InvokeState::Invoking { .. })
    }

    fn retired_error(&self) -> FlowError {
        FlowError::Retired {
            endpoint: self.client.endpoint().to_string(),
        }
    }

    /// Fetch a fresh request; `action` is only meaningful for auth
    #[instrument(skip(self), fields(flow = %self.kind, endpoint = %self.client.endpoint()))]
    pub async fn create_request(&self, action: Option<String>) -> Result<LnurlRequest, FlowError> {
        let (generation, signal) = {
            let mut inner = lock(&self.inner);
            if inner.retired {
                return Err(self.retired_error());
            }
            inner.begin_create()
        };
        let mut attempt = PendingAttempt::new(&self.inner, Phase::Create, generation);
        debug!("Create attempt {} started", generation);

        let result = match self.kind {
            FlowKind::Withdraw => self.client.create_withdraw_request(Some(&signal)).await,
            FlowKind::Channel => self.client.create_channel_request(Some(&signal)).await,
            FlowKind::Auth => {
                self.client
                    .create_auth_request(action.as_deref(), Some(&signal))
                    .await
            }
        };

        attempt.settle();
        let mut inner = lock(&self.inner);
        if inner.create_generation != generation {
            debug!("Create attempt {} superseded, result dropped", generation);
            return Err(FlowError::Superseded);
        }
        inner.create_cancel = None;

        match result {
            Ok(request) => {
                info!("Received {} request k1={}", self.kind, request.k1);
                inner.create = CreateState::Requested {
                    request: request.clone(),
                    received_at: Utc::now(),
                };
                Ok(request)
            }
            Err(e) => {
                let err = FlowError::from(e);
                warn!("Create {} request failed: {}", self.kind, err);
                inner.create = CreateState::RequestFailed {
                    error: FlowFailure::from(&err),
                };
                Err(err)
            }
        }
    }

    /// Validate `form` against the held request and call its callback
    #[instrument(skip(self, form), fields(flow = %self.kind, endpoint = %self.client.endpoint()))]
    pub async fn invoke_callback(&self, form: FlowForm) -> Result<Value, FlowError> {
        let (generation, signal, callback, params) = {
            let mut inner = lock(&self.inner);
            if inner.retired {
                return Err(self.retired_error());
            }
            inner.abandon_invoke();
            let generation = inner.invoke_generation;

            let prepared = self.prepare_invoke(&inner.create, &form);
            let (callback, params) = match prepared {
                Ok(prepared) => prepared,
                Err(e) => {
                    let err = FlowError::from(e);
                    debug!("Callback rejected before sending: {}", err);
                    inner.invoke = InvokeState::InvokeFailed {
                        error: FlowFailure::from(&err),
                    };
                    return Err(err);
                }
            };

            let (handle, signal) = cancel_pair();
            inner.invoke_cancel = Some(handle);
            inner.invoke = InvokeState::Invoking {
                started_at: Utc::now(),
            };
            (generation, signal, callback, params)
        };
        let mut attempt = PendingAttempt::new(&self.inner, Phase::Invoke, generation);

        let result = self
            .client
            .invoke_callback(&callback, params, Some(&signal))
            .await;

        attempt.settle();
        let mut inner = lock(&self.inner);
        if inner.invoke_generation != generation {
            debug!("Invoke attempt {} superseded, result dropped", generation);
            return Err(FlowError::Superseded);
        }
        inner.invoke_cancel = None;

        match result {
            Ok(response) => {
                info!("{} callback answered", self.kind);
                inner.invoke = InvokeState::Invoked {
                    response: response.clone(),
                    received_at: Utc::now(),
                };
                Ok(response)
            }
            Err(e) => {
                let err = FlowError::from(e);
                warn!("{} callback failed: {}", self.kind, err);
                inner.invoke = InvokeState::InvokeFailed {
                    error: FlowFailure::from(&err),
                };
                Err(err)
            }
        }
    }

    /// Abort in-flight attempts; pending steps go back to idle
    #[instrument(skip(self), fields(flow = %self.kind))]
    pub fn cancel(&self) {
        let mut inner = lock(&self.inner);
        inner.abandon_create();
        inner.abandon_invoke();
    }

    /// Cancel everything and refuse new attempts from now on
    pub fn retire(&self) {
        let mut inner = lock(&self.inner);
        inner.retired = true;
        inner.abandon_create();
        inner.abandon_invoke();
    }

    fn prepare_invoke(
        &self,
        create: &CreateState,
        form: &FlowForm,
    ) -> Result<(String, crate::http::QueryParams), ValidationError> {
        if form.kind() != self.kind {
            return Err(ValidationError::FormMismatch {
                expected: self.kind.as_str(),
                got: form.kind().as_str(),
            });
        }
        let CreateState::Requested { request, .. } = create else {
            return Err(ValidationError::NoRequest {
                create_path: self.kind.create_path(),
            });
        };
        let params = form.to_query(request)?;
        Ok((request.callback.clone(), params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::forms::WithdrawForm;
    use crate::http::HttpFetcher;
    use std::sync::Arc;

    fn controller(kind: FlowKind) -> FlowController {
        let fetcher = Arc::new(HttpFetcher::new(None).unwrap());
        FlowController::new(kind, LnurlClient::new("http://127.0.0.1:9", fetcher))
    }

    #[tokio::test]
    async fn test_invoke_without_request_is_validation_error() {
        let c = controller(FlowKind::Withdraw);
        let err = c
            .invoke_callback(FlowForm::Withdraw(WithdrawForm {
                destination: "bc1q".to_string(),
                amount: String::new(),
            }))
            .await
            .unwrap_err();

        assert_eq!(err.class(), ErrorClass::Validation);
        assert_eq!(err.to_string(), "Call /withdraw-request first");
        assert!(matches!(
            c.snapshot().invoke,
            InvokeState::InvokeFailed { .. }
        ));
    }

    #[tokio::test]
    async fn test_form_for_other_flow_rejected() {
        let c = controller(FlowKind::Auth);
        let err = c
            .invoke_callback(FlowForm::Withdraw(WithdrawForm::default()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FlowError::Validation(ValidationError::FormMismatch {
                expected: "auth",
                got: "withdraw"
            })
        ));
    }

    #[tokio::test]
    async fn test_cancel_when_idle_is_noop() {
        let c = controller(FlowKind::Channel);
        c.cancel();
        let snapshot = c.snapshot();
        assert_eq!(snapshot.create, CreateState::Idle);
        assert_eq!(snapshot.invoke, InvokeState::Idle);
        assert!(!c.is_creating());
        assert!(!c.is_invoking());
    }

    #[test]
    fn test_state_serialization() {
        let value = serde_json::to_value(CreateState::Idle).unwrap();
        assert_eq!(value, serde_json::json!({"status": "idle"}));

        let failed = InvokeState::InvokeFailed {
            error: FlowFailure::from(&FlowError::from(ValidationError::MissingField {
                field: "key",
            })),
        };
        let value = serde_json::to_value(failed).unwrap();
        assert_eq!(value["status"], "invoke_failed");
        assert_eq!(value["error"]["class"], "validation");
        assert_eq!(value["error"]["message"], "key is required");
    }
}
