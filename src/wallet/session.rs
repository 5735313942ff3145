//! Wallet session management.
//!
//! # Responsibilities
//! - Select and connect a wallet backend, falling back to a simulated one
//! - Own the observable session state and publish every change
//! - Expose one capability surface regardless of the active backend
//!
//! # Data Flow
//! ```text
//! connect(preferred)
//!     → pick Installed adapter → select delay → adapter.connect
//!         ├─ Ok(address)  → Real session, marker saved
//!         └─ Err / none   → last_error recorded
//!                              ├─ fallback on  → DemoWallet, Demo session
//!                              └─ fallback off → Disconnected, Err
//! ```
//!
//! # Design Decisions
//! - State lives in a `watch` channel; only methods here write it
//! - The active backend sits in an `ArcSwapOption` so capability calls never lock
//! - `epoch` bumps on connect and disconnect; in-flight work compares it to
//!   detect that its session is gone

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use tokio::sync::watch;

use crate::config::{ProgramsConfig, WalletConfig};
use crate::observability::metrics;
use crate::transaction::{TransactionRequest, TransactionStatus};
use crate::wallet::adapter::WalletAdapter;
use crate::wallet::alias::generate_pseudonym;
use crate::wallet::bridge::BridgeWallet;
use crate::wallet::demo::DemoWallet;
use crate::wallet::persistence::LastWalletStore;
use crate::wallet::types::{
    ConnectRequest, ConnectionState, DecryptPermission, ReadyState, SessionState, Transition,
    WalletError, WalletInfo, WalletMode, WalletResult, WalletTransaction,
};

/// Name under which the configured bridge adapter is registered.
pub const BRIDGE_WALLET_NAME: &str = "Bridge Wallet";

enum ActiveBackend {
    Real(Arc<dyn WalletAdapter>),
    Demo(DemoWallet),
}

pub struct WalletSession {
    adapters: Vec<Arc<dyn WalletAdapter>>,
    config: WalletConfig,
    programs: Vec<String>,
    demo: DemoWallet,
    active: ArcSwapOption<ActiveBackend>,
    state: watch::Sender<SessionState>,
    last_wallet: LastWalletStore,
}

impl WalletSession {
    /// Create a new session over the given adapters. Nothing connects yet.
    pub fn new(
        config: WalletConfig,
        programs: &ProgramsConfig,
        adapters: Vec<Arc<dyn WalletAdapter>>,
    ) -> Self {
        let last_wallet = LastWalletStore::new(config.last_wallet_path.clone());
        Self {
            adapters,
            demo: DemoWallet::new(&config),
            programs: programs.all(),
            active: ArcSwapOption::empty(),
            state: watch::Sender::new(SessionState::default()),
            last_wallet,
            config,
        }
    }

    /// Build a session from config, registering the bridge adapter when configured.
    pub fn from_config(config: WalletConfig, programs: &ProgramsConfig) -> WalletResult<Self> {
        let mut adapters: Vec<Arc<dyn WalletAdapter>> = Vec::new();
        if !config.bridge_url.is_empty() {
            adapters.push(Arc::new(BridgeWallet::new(
                BRIDGE_WALLET_NAME,
                config.bridge_url.clone(),
                config.bridge_timeout_secs,
            )?));
        }
        Ok(Self::new(config, programs, adapters))
    }

    /// Connect to the preferred backend, else any installed one, else (if
    /// allowed) a simulated wallet.
    pub async fn connect(&self, preferred: Option<&str>) -> WalletResult<()> {
        let epoch = self.begin_connect().await;

        let failure = match self.select_adapter(preferred) {
            Some(adapter) => match self.connect_real(adapter, epoch).await {
                Ok(()) => return Ok(()),
                Err(e) => e,
            },
            None => WalletError::WalletUnavailable("No wallet detected".to_string()),
        };

        tracing::warn!(error = %failure, "Real wallet connection failed");
        self.ensure_current(epoch)?;
        self.state.send_modify(|s| s.last_error = Some(failure.to_string()));

        if !self.config.allow_simulated_fallback {
            metrics::record_wallet_connect("real", "failed");
            self.state.send_modify(|s| s.connection = ConnectionState::Disconnected);
            return Err(failure);
        }

        self.connect_demo(epoch).await
    }

    /// Reconnect to the remembered backend without demo fallback.
    ///
    /// Returns `Ok(true)` when a session was restored. A failed attempt
    /// clears the marker.
    pub async fn auto_connect(&self) -> WalletResult<bool> {
        let Some(name) = self.last_wallet.load() else {
            return Ok(false);
        };
        let Some(adapter) = self
            .adapters
            .iter()
            .find(|a| a.name() == name && a.ready_state() == ReadyState::Installed)
            .cloned()
        else {
            tracing::debug!(backend = %name, "Remembered wallet not installed");
            return Ok(false);
        };

        let epoch = self.begin_connect().await;
        match self.connect_real(adapter, epoch).await {
            Ok(()) => Ok(true),
            Err(e) => {
                tracing::info!(backend = %name, error = %e, "Auto-connect failed");
                self.last_wallet.clear();
                if self.state.borrow().epoch == epoch {
                    self.state.send_modify(|s| {
                        s.connection = ConnectionState::Disconnected;
                        s.last_error = Some(e.to_string());
                    });
                }
                Err(e)
            }
        }
    }

    /// Tear the session down. Calling it again is harmless.
    pub async fn disconnect(&self) {
        self.release_active().await;
        self.last_wallet.clear();
        self.state.send_modify(|s| {
            let epoch = s.epoch + 1;
            *s = SessionState {
                epoch,
                ..SessionState::default()
            };
        });
        tracing::info!("Wallet disconnected");
    }

    /// Sign and broadcast a request, returning the transaction id.
    pub async fn request_transaction(&self, request: &TransactionRequest) -> WalletResult<String> {
        match self.active()?.as_ref() {
            ActiveBackend::Real(adapter) => {
                let address = self
                    .state
                    .borrow()
                    .address
                    .clone()
                    .ok_or(WalletError::NotConnected)?;
                let transaction = self.build_transaction(address, request);
                adapter.request_transaction(&transaction).await
            }
            ActiveBackend::Demo(demo) => Ok(demo.request_transaction().await),
        }
    }

    pub async fn sign_message(&self, message: &[u8]) -> WalletResult<Vec<u8>> {
        match self.active()?.as_ref() {
            ActiveBackend::Real(adapter) => adapter.sign_message(message).await,
            ActiveBackend::Demo(demo) => Ok(demo.sign_message(message)),
        }
    }

    pub async fn decrypt(&self, ciphertext: &str) -> WalletResult<String> {
        match self.active()?.as_ref() {
            ActiveBackend::Real(adapter) => adapter.decrypt(ciphertext).await,
            ActiveBackend::Demo(demo) => Ok(demo.decrypt(ciphertext)),
        }
    }

    /// Raw records owned by the account for one program.
    pub async fn get_records(&self, program: &str) -> WalletResult<Vec<serde_json::Value>> {
        match self.active()?.as_ref() {
            ActiveBackend::Real(adapter) => adapter.request_records(program).await,
            ActiveBackend::Demo(demo) => Ok(demo.records()),
        }
    }

    pub async fn transaction_status(&self, transaction_id: &str) -> WalletResult<TransactionStatus> {
        match self.active()?.as_ref() {
            ActiveBackend::Real(adapter) => adapter
                .transaction_status(transaction_id)
                .await
                .map(|raw| TransactionStatus::parse(&raw)),
            ActiveBackend::Demo(demo) => Ok(demo.transaction_status(transaction_id).await),
        }
    }

    /// Every registered backend with its current readiness.
    pub fn available_wallets(&self) -> Vec<WalletInfo> {
        self.adapters
            .iter()
            .map(|a| WalletInfo {
                name: a.name().to_string(),
                ready: a.ready_state(),
            })
            .collect()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Current state snapshot.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn epoch(&self) -> u64 {
        self.state.borrow().epoch
    }

    pub fn is_connected(&self) -> bool {
        self.state.borrow().is_connected()
    }

    pub fn is_demo(&self) -> bool {
        self.state.borrow().is_demo()
    }

    pub fn network(&self) -> &str {
        &self.config.network
    }

    fn active(&self) -> WalletResult<Arc<ActiveBackend>> {
        self.active.load_full().ok_or(WalletError::NotConnected)
    }

    fn select_adapter(&self, preferred: Option<&str>) -> Option<Arc<dyn WalletAdapter>> {
        let usable = |a: &&Arc<dyn WalletAdapter>| {
            matches!(a.ready_state(), ReadyState::Installed | ReadyState::Loadable)
        };

        if let Some(name) = preferred {
            if let Some(adapter) = self.adapters.iter().filter(usable).find(|a| a.name() == name) {
                return Some(adapter.clone());
            }
            tracing::debug!(backend = name, "Preferred wallet not usable");
        }

        self.adapters
            .iter()
            .find(|a| a.ready_state() == ReadyState::Installed)
            .cloned()
    }

    /// Take the active backend out and disconnect it if it is a real wallet.
    async fn release_active(&self) {
        if let Some(active) = self.active.swap(None) {
            if let ActiveBackend::Real(adapter) = active.as_ref() {
                Self::disconnect_adapter(adapter.as_ref()).await;
            }
        }
    }

    async fn disconnect_adapter(adapter: &dyn WalletAdapter) {
        if let Err(e) = adapter.disconnect().await {
            tracing::warn!(backend = adapter.name(), error = %e, "Wallet disconnect failed");
        }
    }

    /// Release any active backend, bump the epoch and enter `Connecting`.
    async fn begin_connect(&self) -> u64 {
        self.release_active().await;
        let mut epoch = 0;
        self.state.send_modify(|s| {
            epoch = s.epoch + 1;
            *s = SessionState {
                epoch,
                connection: ConnectionState::Connecting,
                ..SessionState::default()
            };
        });
        epoch
    }

    fn ensure_current(&self, epoch: u64) -> WalletResult<()> {
        if self.state.borrow().epoch == epoch {
            Ok(())
        } else {
            Err(WalletError::WalletUnavailable(
                "Connection superseded by a newer session".to_string(),
            ))
        }
    }

    async fn connect_real(&self, adapter: Arc<dyn WalletAdapter>, epoch: u64) -> WalletResult<()> {
        tokio::time::sleep(Duration::from_millis(self.config.select_delay_ms)).await;
        self.ensure_current(epoch)?;

        let request = ConnectRequest {
            decrypt_permission: DecryptPermission::UponRequest,
            network: self.config.network.clone(),
            programs: self.programs.clone(),
        };
        let address = adapter.connect(&request).await?;
        if let Err(e) = self.ensure_current(epoch) {
            tracing::debug!(backend = adapter.name(), "Connection superseded, releasing wallet");
            Self::disconnect_adapter(adapter.as_ref()).await;
            return Err(e);
        }

        let name = adapter.name().to_string();
        self.last_wallet.save(&name);
        self.active.store(Some(Arc::new(ActiveBackend::Real(adapter))));
        self.publish_connected(WalletMode::Real, address.clone(), Some(name.clone()));

        metrics::record_wallet_connect("real", "connected");
        tracing::info!(backend = %name, address = %address, "Wallet connected");
        Ok(())
    }

    async fn connect_demo(&self, epoch: u64) -> WalletResult<()> {
        let address = self.demo.connect().await;
        self.ensure_current(epoch)?;

        self.active
            .store(Some(Arc::new(ActiveBackend::Demo(self.demo.clone()))));
        self.publish_connected(WalletMode::Demo, address.clone(), None);

        metrics::record_wallet_connect("demo", "connected");
        tracing::info!(address = %address, "Demo wallet connected");
        Ok(())
    }

    fn publish_connected(&self, mode: WalletMode, address: String, backend_name: Option<String>) {
        let alias = generate_pseudonym(&address);
        self.state.send_modify(|s| {
            s.mode = mode;
            s.display_alias = Some(alias);
            s.address = Some(address);
            s.connection = ConnectionState::Connected;
            s.backend_name = backend_name;
        });
    }

    fn build_transaction(&self, address: String, request: &TransactionRequest) -> WalletTransaction {
        WalletTransaction {
            address,
            chain_id: self.config.network.clone(),
            transitions: vec![Transition {
                program: request.program().to_string(),
                function_name: request.function().to_string(),
                inputs: request.inputs(),
            }],
            fee: request.fee(),
            private_fee: request.private_fee(),
        }
    }
}
