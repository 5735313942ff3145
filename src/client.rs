//! Application facade.
//!
//! # Responsibilities
//! - Wire config into a session, a content pipeline and ledger queries
//! - Run the common flows (publish, react, follow, groups, identity)
//!   through a fresh orchestrator per call
//! - Upload post bodies and profile fields before referencing them on-chain
//!
//! # Data Flow
//! ```text
//! publish(text)
//!     → ContentPipeline::prepare → ContentReference
//!     → ProgramCall::publish_post → TransactionRequest
//!     → TransactionOrchestrator::execute → ExecutionReport
//! ```

use std::sync::Arc;

use thiserror::Error;

use crate::config::{AppConfig, ConfigError};
use crate::content::{
    ContentError, ContentPipeline, ContentStore, EncryptionMaterial, IpfsClient, PreparedContent,
    Visibility,
};
use crate::network::{LedgerClient, NetworkError, ProgramQueries};
use crate::records::RecordQuery;
use crate::transaction::{
    ExecutionReport, FieldElement, ProgramCall, Reaction, TransactionError,
    TransactionOrchestrator, TransactionRequest,
};
use crate::wallet::{WalletError, WalletSession};

/// Top-level error for facade operations.
#[derive(Debug, Error)]
pub enum AnonexError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error(transparent)]
    Transaction(#[from] TransactionError),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Network(#[from] NetworkError),
}

pub type AnonexResult<T> = Result<T, AnonexError>;

/// A published post: where its content lives and how its transaction ended.
#[derive(Debug, Clone)]
pub struct PublishOutcome {
    pub content: PreparedContent,
    pub report: ExecutionReport,
}

/// A created identity: the uploaded profile fields and the transaction.
#[derive(Debug, Clone)]
pub struct IdentityOutcome {
    pub display_name: PreparedContent,
    pub avatar: Option<PreparedContent>,
    pub bio: Option<PreparedContent>,
    pub report: ExecutionReport,
}

pub struct AnonexClient {
    config: AppConfig,
    session: Arc<WalletSession>,
    pipeline: ContentPipeline,
    calls: ProgramCall,
    queries: ProgramQueries,
}

impl AnonexClient {
    /// Create a new client backed by IPFS and the configured wallet bridge.
    pub fn from_config(config: AppConfig) -> AnonexResult<Self> {
        let session = Arc::new(WalletSession::from_config(
            config.wallet.clone(),
            &config.programs,
        )?);
        let store = Arc::new(IpfsClient::new(&config.storage)?);
        Self::with_parts(config, session, store)
    }

    /// Create a new client over an existing session and store.
    pub fn with_parts(
        config: AppConfig,
        session: Arc<WalletSession>,
        store: Arc<dyn ContentStore>,
    ) -> AnonexResult<Self> {
        let pipeline = ContentPipeline::new(store, config.storage.pin_after_upload);
        let calls = ProgramCall::new(
            config.programs.clone(),
            config.orchestrator.default_fee,
            config.orchestrator.private_fee,
        );
        let queries = ProgramQueries::new(LedgerClient::new(&config.network)?, config.programs.clone());

        Ok(Self {
            config,
            session,
            pipeline,
            calls,
            queries,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<WalletSession> {
        &self.session
    }

    pub fn pipeline(&self) -> &ContentPipeline {
        &self.pipeline
    }

    pub fn calls(&self) -> &ProgramCall {
        &self.calls
    }

    pub fn queries(&self) -> &ProgramQueries {
        &self.queries
    }

    /// A fresh orchestrator bound to this client's session.
    pub fn orchestrator(&self) -> TransactionOrchestrator {
        TransactionOrchestrator::new(
            self.session.clone(),
            &self.config.programs,
            self.config.orchestrator.clone(),
        )
    }

    /// A record query for one program.
    pub fn records(&self, program: impl Into<String>) -> RecordQuery {
        RecordQuery::new(self.session.clone(), program)
    }

    pub async fn execute(&self, request: TransactionRequest) -> AnonexResult<ExecutionReport> {
        Ok(self.orchestrator().execute(request).await?)
    }

    /// Prepare content and publish its reference on-chain.
    ///
    /// Nothing is submitted when the upload fails.
    pub async fn publish(
        &self,
        text: &str,
        visibility: Visibility,
        material: Option<&EncryptionMaterial>,
    ) -> AnonexResult<PublishOutcome> {
        let content = self.pipeline.prepare(text, visibility, material).await?;
        let request = self.calls.publish_post(&content.reference);
        let report = self.execute(request).await?;
        Ok(PublishOutcome { content, report })
    }

    pub async fn react(&self, post_id: FieldElement, reaction: Reaction) -> AnonexResult<ExecutionReport> {
        self.execute(self.calls.add_reaction(post_id, reaction)).await
    }

    pub async fn follow(&self, target_address: &str) -> AnonexResult<ExecutionReport> {
        self.execute(self.calls.follow_user(target_address)).await
    }

    /// Create a group. The returned secret is needed to admit members.
    pub async fn create_group(&self, name: &str) -> AnonexResult<(ExecutionReport, FieldElement)> {
        let (request, secret) = self.calls.create_group(name);
        let report = self.execute(request).await?;
        Ok((report, secret))
    }

    /// Upload the profile fields as public content, then register their
    /// digests. Empty avatar or bio is left unset.
    pub async fn create_identity(
        &self,
        display_name: &str,
        avatar: &str,
        bio: &str,
    ) -> AnonexResult<IdentityOutcome> {
        let display_name = self.pipeline.prepare(display_name, Visibility::Public, None).await?;
        let avatar = self.prepare_profile_field(avatar).await?;
        let bio = self.prepare_profile_field(bio).await?;

        let request = self.calls.create_identity(
            &display_name.reference,
            avatar.as_ref().map(|c| &c.reference),
            bio.as_ref().map(|c| &c.reference),
        );
        let report = self.execute(request).await?;
        Ok(IdentityOutcome {
            display_name,
            avatar,
            bio,
            report,
        })
    }

    async fn prepare_profile_field(&self, value: &str) -> AnonexResult<Option<PreparedContent>> {
        if value.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.pipeline.prepare(value, Visibility::Public, None).await?))
    }
}
