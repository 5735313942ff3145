//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use anonex_client::config::{OrchestratorConfig, ProgramsConfig, WalletConfig};
use anonex_client::wallet::{
    ConnectRequest, ReadyState, WalletAdapter, WalletError, WalletResult, WalletSession,
    WalletTransaction,
};

pub const MOCK_ADDRESS: &str =
    "aleo1mockmockmockmockmockmockmockmockmockmockmockmockmockmock00";

/// A wallet backend whose every answer is scripted by the test.
pub struct MockAdapter {
    name: String,
    ready: ReadyState,
    connect_error: Mutex<Option<WalletError>>,
    connect_delay: Duration,
    transaction_result: Mutex<WalletResult<String>>,
    statuses: Mutex<VecDeque<WalletResult<String>>>,
    fallback_status: String,
    records: Mutex<WalletResult<Vec<Value>>>,
    last_connect: Mutex<Option<ConnectRequest>>,
    last_transaction: Mutex<Option<WalletTransaction>>,
    pub connects: AtomicUsize,
    pub disconnects: AtomicUsize,
    pub transactions: AtomicUsize,
    pub status_polls: AtomicUsize,
}

impl MockAdapter {
    /// An installed wallet that connects, accepts transactions and reports `Finalized`.
    pub fn installed(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ready: ReadyState::Installed,
            connect_error: Mutex::new(None),
            connect_delay: Duration::ZERO,
            transaction_result: Mutex::new(Ok("at1mocktransaction".to_string())),
            statuses: Mutex::new(VecDeque::new()),
            fallback_status: "Finalized".to_string(),
            records: Mutex::new(Ok(Vec::new())),
            last_connect: Mutex::new(None),
            last_transaction: Mutex::new(None),
            connects: AtomicUsize::new(0),
            disconnects: AtomicUsize::new(0),
            transactions: AtomicUsize::new(0),
            status_polls: AtomicUsize::new(0),
        }
    }

    pub fn with_ready_state(mut self, ready: ReadyState) -> Self {
        self.ready = ready;
        self
    }

    pub fn with_connect_error(self, error: WalletError) -> Self {
        *self.connect_error.lock().unwrap() = Some(error);
        self
    }

    /// Hold every connect open for `delay` before answering.
    pub fn with_connect_delay(mut self, delay: Duration) -> Self {
        self.connect_delay = delay;
        self
    }

    pub fn with_transaction_result(self, result: WalletResult<String>) -> Self {
        *self.transaction_result.lock().unwrap() = result;
        self
    }

    /// Statuses returned in order; `fallback` once the script runs out.
    pub fn with_statuses(mut self, script: Vec<WalletResult<&str>>, fallback: &str) -> Self {
        *self.statuses.lock().unwrap() = script
            .into_iter()
            .map(|r| r.map(str::to_string))
            .collect();
        self.fallback_status = fallback.to_string();
        self
    }

    pub fn with_records(self, records: WalletResult<Vec<Value>>) -> Self {
        *self.records.lock().unwrap() = records;
        self
    }

    pub fn last_connect(&self) -> Option<ConnectRequest> {
        self.last_connect.lock().unwrap().clone()
    }

    pub fn last_transaction(&self) -> Option<WalletTransaction> {
        self.last_transaction.lock().unwrap().clone()
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletAdapter for MockAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn ready_state(&self) -> ReadyState {
        self.ready
    }

    async fn connect(&self, request: &ConnectRequest) -> WalletResult<String> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        *self.last_connect.lock().unwrap() = Some(request.clone());
        if !self.connect_delay.is_zero() {
            tokio::time::sleep(self.connect_delay).await;
        }
        match self.connect_error.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(MOCK_ADDRESS.to_string()),
        }
    }

    async fn disconnect(&self) -> WalletResult<()> {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn request_transaction(&self, transaction: &WalletTransaction) -> WalletResult<String> {
        self.transactions.fetch_add(1, Ordering::SeqCst);
        *self.last_transaction.lock().unwrap() = Some(transaction.clone());
        self.transaction_result.lock().unwrap().clone()
    }

    async fn request_records(&self, _program: &str) -> WalletResult<Vec<Value>> {
        self.records.lock().unwrap().clone()
    }

    async fn transaction_status(&self, _transaction_id: &str) -> WalletResult<String> {
        self.status_polls.fetch_add(1, Ordering::SeqCst);
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(self.fallback_status.clone()))
    }
}

pub fn fast_wallet_config() -> WalletConfig {
    WalletConfig {
        select_delay_ms: 0,
        demo_connect_delay_ms: 1,
        demo_transaction_delay_ms: 1,
        demo_status_delay_ms: 1,
        ..WalletConfig::default()
    }
}

pub fn fast_orchestrator_config() -> OrchestratorConfig {
    OrchestratorConfig {
        poll_interval_ms: 1,
        demo_confirm_delay_ms: 1,
        ..OrchestratorConfig::default()
    }
}

/// A session over the given adapters, not yet connected.
pub fn session_with(adapters: Vec<Arc<dyn WalletAdapter>>) -> Arc<WalletSession> {
    Arc::new(WalletSession::new(
        fast_wallet_config(),
        &ProgramsConfig::default(),
        adapters,
    ))
}

/// A session connected to `adapter`.
pub async fn connected_session(adapter: Arc<MockAdapter>) -> Arc<WalletSession> {
    let session = session_with(vec![adapter as Arc<dyn WalletAdapter>]);
    session.connect(None).await.unwrap();
    assert!(!session.is_demo());
    session
}

/// A session connected to the simulated wallet.
pub async fn demo_session() -> Arc<WalletSession> {
    let session = session_with(Vec::new());
    session.connect(None).await.unwrap();
    assert!(session.is_demo());
    session
}
