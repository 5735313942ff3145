//! Transaction lifecycle orchestration.
//!
//! # Responsibilities
//! - Drive one request through Preparing → Signing → Broadcasting →
//!   Confirming → Confirmed/Failed, in order, without skipping
//! - Poll for finality with a bounded budget
//! - Cancel stale work on `reset`, on a newer `execute`, or when the session
//!   it started on goes away
//!
//! # Data Flow
//! ```text
//! execute(request)
//!     → validate (CallRegistry) ─────────────────────────┐
//!     → session.request_transaction → tx id              │ any error
//!     → demo: fixed delay                                ├──────────▶ Failed
//!       real: poll status every interval, max N attempts │
//!     → Confirmed ───────────────────────────────────────┘
//! ```
//!
//! # Design Decisions
//! - Each run captures the orchestrator generation and the session epoch;
//!   both are checked before every commit and every poll tick
//! - A run superseded by `reset` or a newer `execute` returns `Cancelled`
//!   and never touches observed state
//! - A run whose session went away returns `Cancelled` and its lifecycle is
//!   discarded back to a fresh `Idle`
//! - Running out of polls is reported as `Confirmed` with
//!   `ConfirmationOutcome::AssumedAfterBudget`, because the wallet has
//!   already accepted the transaction

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch, Notify};
use uuid::Uuid;

use crate::config::{OrchestratorConfig, ProgramsConfig};
use crate::observability::metrics;
use crate::transaction::request::{CallRegistry, TransactionRequest};
use crate::transaction::types::{
    ConfirmationOutcome, ExecutionReport, LifecycleEvent, LifecycleStatus, TransactionError,
    TransactionLifecycle, TransactionResult,
};
use crate::wallet::{WalletError, WalletSession};

/// Called once with the transaction id when a lifecycle confirms.
pub type SuccessCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Called once when a lifecycle fails.
pub type ErrorCallback = Box<dyn Fn(&TransactionError) + Send + Sync>;

const EVENT_CAPACITY: usize = 64;

/// Identity of one `execute` call.
#[derive(Debug, Clone, Copy)]
struct Run {
    lifecycle_id: Uuid,
    generation: u64,
    epoch: u64,
}

pub struct TransactionOrchestrator {
    session: Arc<WalletSession>,
    registry: CallRegistry,
    config: OrchestratorConfig,
    generation: AtomicU64,
    cancel: Notify,
    lifecycle: watch::Sender<TransactionLifecycle>,
    events: broadcast::Sender<LifecycleEvent>,
    on_success: Option<SuccessCallback>,
    on_error: Option<ErrorCallback>,
}

impl TransactionOrchestrator {
    /// Create a new orchestrator bound to a session.
    pub fn new(
        session: Arc<WalletSession>,
        programs: &ProgramsConfig,
        config: OrchestratorConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            session,
            registry: CallRegistry::new(programs),
            config,
            generation: AtomicU64::new(0),
            cancel: Notify::new(),
            lifecycle: watch::Sender::new(TransactionLifecycle::new()),
            events,
            on_success: None,
            on_error: None,
        }
    }

    pub fn with_on_success(mut self, callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    pub fn with_on_error(
        mut self,
        callback: impl Fn(&TransactionError) + Send + Sync + 'static,
    ) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }

    /// Run a request through a fresh lifecycle.
    ///
    /// Any lifecycle still in flight on this orchestrator is superseded and
    /// resolves to `Cancelled`.
    pub async fn execute(&self, request: TransactionRequest) -> TransactionResult<ExecutionReport> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.cancel.notify_waiters();

        let lifecycle = TransactionLifecycle::new();
        let run = Run {
            lifecycle_id: lifecycle.id,
            generation,
            epoch: self.session.epoch(),
        };
        self.publish_fresh(lifecycle);

        tracing::info!(
            lifecycle_id = %run.lifecycle_id,
            program = request.program(),
            function = request.function(),
            "Executing transaction"
        );

        match self.drive(&run, &request).await {
            Ok(report) => {
                if let Some(callback) = &self.on_success {
                    callback(&report.transaction_id);
                }
                Ok(report)
            }
            Err(TransactionError::Cancelled) => Err(self.cancelled(&run)),
            Err(e) => {
                if self.commit(&run, LifecycleStatus::Failed, None, Some(e.to_string())).is_err() {
                    return Err(self.cancelled(&run));
                }
                tracing::warn!(lifecycle_id = %run.lifecycle_id, error = %e, "Transaction failed");
                if let Some(callback) = &self.on_error {
                    callback(&e);
                }
                Err(e)
            }
        }
    }

    /// Force `Idle` and cancel whatever is in flight.
    pub fn reset(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.cancel.notify_waiters();
        self.publish_fresh(TransactionLifecycle::new());
    }

    /// Watch the current lifecycle.
    pub fn subscribe(&self) -> watch::Receiver<TransactionLifecycle> {
        self.lifecycle.subscribe()
    }

    /// Every transition, in order.
    pub fn events(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.events.subscribe()
    }

    /// Current lifecycle snapshot.
    pub fn lifecycle(&self) -> TransactionLifecycle {
        self.lifecycle.borrow().clone()
    }

    async fn drive(&self, run: &Run, request: &TransactionRequest) -> TransactionResult<ExecutionReport> {
        self.commit(run, LifecycleStatus::Preparing, None, None)?;
        self.registry.validate(request)?;
        if !self.session.is_connected() {
            return Err(WalletError::NotConnected.into());
        }

        self.commit(run, LifecycleStatus::Signing, None, None)?;
        let transaction_id = self
            .guard(run, self.session.request_transaction(request))
            .await??;

        self.commit(run, LifecycleStatus::Broadcasting, Some(transaction_id.clone()), None)?;
        tracing::info!(lifecycle_id = %run.lifecycle_id, transaction_id = %transaction_id, "Transaction broadcast");

        self.commit(run, LifecycleStatus::Confirming, None, None)?;
        let outcome = if self.session.is_demo() {
            self.pause(run, Duration::from_millis(self.config.demo_confirm_delay_ms))
                .await?;
            ConfirmationOutcome::Simulated
        } else {
            self.poll_confirmation(run, &transaction_id).await?
        };

        self.commit(run, LifecycleStatus::Confirmed, None, None)?;
        tracing::info!(
            lifecycle_id = %run.lifecycle_id,
            transaction_id = %transaction_id,
            outcome = ?outcome,
            "Transaction confirmed"
        );

        Ok(ExecutionReport {
            lifecycle_id: run.lifecycle_id,
            transaction_id,
            outcome,
        })
    }

    async fn poll_confirmation(&self, run: &Run, transaction_id: &str) -> TransactionResult<ConfirmationOutcome> {
        let max_attempts = self.config.max_poll_attempts;
        let interval = Duration::from_millis(self.config.poll_interval_ms);

        for attempt in 1..=max_attempts {
            self.ensure_current(run)?;

            match self.guard(run, self.session.transaction_status(transaction_id)).await? {
                Ok(status) if status.is_success() => {
                    metrics::record_poll_attempt("finalized");
                    return Ok(ConfirmationOutcome::Finalized { attempts: attempt });
                }
                Ok(status) if status.is_failure() => {
                    metrics::record_poll_attempt("failed");
                    return Err(TransactionError::RejectedOnChain {
                        status: status.as_str().to_string(),
                    });
                }
                Ok(status) => {
                    metrics::record_poll_attempt("pending");
                    tracing::debug!(attempt, status = status.as_str(), "Transaction still pending");
                }
                Err(e) => {
                    metrics::record_poll_attempt("error");
                    tracing::debug!(attempt, error = %e, "Status poll failed");
                }
            }

            if attempt < max_attempts {
                self.pause(run, interval).await?;
            }
        }

        metrics::record_assumed_confirmation();
        tracing::warn!(
            lifecycle_id = %run.lifecycle_id,
            transaction_id,
            attempts = max_attempts,
            "Poll budget exhausted without a terminal status, assuming confirmed"
        );
        Ok(ConfirmationOutcome::AssumedAfterBudget {
            attempts: max_attempts,
        })
    }

    fn is_current(&self, run: &Run) -> bool {
        self.generation.load(Ordering::SeqCst) == run.generation
            && self.session.epoch() == run.epoch
    }

    fn ensure_current(&self, run: &Run) -> TransactionResult<()> {
        if self.is_current(run) {
            Ok(())
        } else {
            Err(TransactionError::Cancelled)
        }
    }

    /// Apply one transition if the run is still current and the move is legal.
    fn commit(
        &self,
        run: &Run,
        status: LifecycleStatus,
        transaction_id: Option<String>,
        error: Option<String>,
    ) -> TransactionResult<()> {
        self.ensure_current(run)?;

        let mut result = Ok(());
        let mut event = None;
        self.lifecycle.send_if_modified(|lifecycle| {
            if lifecycle.id != run.lifecycle_id {
                result = Err(TransactionError::Cancelled);
                return false;
            }
            if !lifecycle.status.can_advance_to(status) {
                result = Err(TransactionError::InvalidTransition {
                    from: lifecycle.status,
                    to: status,
                });
                return false;
            }
            lifecycle.status = status;
            if transaction_id.is_some() {
                lifecycle.transaction_id = transaction_id;
            }
            if error.is_some() {
                lifecycle.error = error;
            }
            event = Some(LifecycleEvent::from(&*lifecycle));
            true
        });
        result?;

        if let Some(event) = event {
            metrics::record_lifecycle_transition(status.as_str());
            tracing::debug!(lifecycle_id = %run.lifecycle_id, status = %status, "Lifecycle transition");
            let _ = self.events.send(event);
        }
        Ok(())
    }

    /// Only a run whose session went away still owns the published lifecycle.
    fn cancelled(&self, run: &Run) -> TransactionError {
        tracing::debug!(lifecycle_id = %run.lifecycle_id, "Lifecycle cancelled");
        if self.generation.load(Ordering::SeqCst) == run.generation {
            self.discard(run);
        }
        TransactionError::Cancelled
    }

    /// Replace the run's lifecycle with a fresh `Idle` one, unless something
    /// newer has already been published.
    fn discard(&self, run: &Run) {
        let fresh = TransactionLifecycle::new();
        let event = LifecycleEvent::from(&fresh);
        let replaced = self.lifecycle.send_if_modified(|lifecycle| {
            if lifecycle.id != run.lifecycle_id {
                return false;
            }
            *lifecycle = fresh;
            true
        });
        if replaced {
            metrics::record_lifecycle_transition(LifecycleStatus::Idle.as_str());
            tracing::debug!(lifecycle_id = %run.lifecycle_id, "Lifecycle discarded");
            let _ = self.events.send(event);
        }
    }

    fn publish_fresh(&self, lifecycle: TransactionLifecycle) {
        let event = LifecycleEvent::from(&lifecycle);
        self.lifecycle.send_replace(lifecycle);
        metrics::record_lifecycle_transition(LifecycleStatus::Idle.as_str());
        let _ = self.events.send(event);
    }

    async fn pause(&self, run: &Run, duration: Duration) -> TransactionResult<()> {
        self.guard(run, tokio::time::sleep(duration)).await
    }

    /// Race `fut` against the run going stale.
    async fn guard<F: Future>(&self, run: &Run, fut: F) -> TransactionResult<F::Output> {
        tokio::select! {
            output = fut => Ok(output),
            _ = self.stale(run) => Err(TransactionError::Cancelled),
        }
    }

    /// Resolves once the run is no longer current.
    async fn stale(&self, run: &Run) {
        let mut session = self.session.subscribe();
        loop {
            let notified = self.cancel.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if !self.is_current(run) {
                return;
            }

            tokio::select! {
                _ = &mut notified => {}
                changed = session.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
            }
        }
    }
}
