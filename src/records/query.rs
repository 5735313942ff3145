//! Record fetching for one program.
//!
//! Each `fetch` replaces the previous result wholesale. A disconnected
//! session yields an empty set; a failed fetch yields an empty set with the
//! error kept for inspection.

use std::sync::Arc;

use crate::records::shapes::classify;
use crate::records::types::{ClassifiedRecord, RecordKind, WalletRecord};
use crate::wallet::WalletSession;

pub struct RecordQuery {
    session: Arc<WalletSession>,
    program: String,
    records: Vec<ClassifiedRecord>,
    error: Option<String>,
}

impl RecordQuery {
    /// Create a new query for `program`. Nothing is fetched yet.
    pub fn new(session: Arc<WalletSession>, program: impl Into<String>) -> Self {
        Self {
            session,
            program: program.into(),
            records: Vec::new(),
            error: None,
        }
    }

    pub async fn fetch(&mut self) -> &[ClassifiedRecord] {
        self.error = None;
        self.records.clear();

        if !self.session.is_connected() {
            return &self.records;
        }

        match self.session.get_records(&self.program).await {
            Ok(raw) => {
                self.records = raw
                    .into_iter()
                    .filter_map(|value| match serde_json::from_value::<WalletRecord>(value) {
                        Ok(record) => Some(record),
                        Err(e) => {
                            tracing::warn!(program = %self.program, error = %e, "Skipping malformed record");
                            None
                        }
                    })
                    .map(|record| ClassifiedRecord {
                        kind: classify(&record),
                        record,
                    })
                    .collect();
                tracing::debug!(program = %self.program, count = self.records.len(), "Records fetched");
            }
            Err(e) => {
                tracing::warn!(program = %self.program, error = %e, "Record fetch failed");
                self.error = Some(e.to_string());
            }
        }

        &self.records
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn records(&self) -> &[ClassifiedRecord] {
        &self.records
    }

    /// Error from the last fetch, if it failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn of_kind(&self, kind: RecordKind) -> impl Iterator<Item = &WalletRecord> {
        self.records
            .iter()
            .filter(move |r| r.kind == kind)
            .map(|r| &r.record)
    }

    pub fn posts(&self) -> Vec<&WalletRecord> {
        self.of_kind(RecordKind::Post).collect()
    }

    pub fn reactions(&self) -> Vec<&WalletRecord> {
        self.of_kind(RecordKind::Reaction).collect()
    }

    pub fn follows(&self) -> Vec<&WalletRecord> {
        self.of_kind(RecordKind::Follow).collect()
    }

    pub fn memberships(&self) -> Vec<&WalletRecord> {
        self.of_kind(RecordKind::GroupMembership).collect()
    }

    pub fn owned_groups(&self) -> Vec<&WalletRecord> {
        self.of_kind(RecordKind::OwnedGroup).collect()
    }

    /// The account's identity record, if it has one.
    pub fn identity(&self) -> Option<&WalletRecord> {
        self.of_kind(RecordKind::Identity).next()
    }

    pub fn verified_attributes(&self) -> Vec<&WalletRecord> {
        self.of_kind(RecordKind::VerifiedAttribute).collect()
    }
}
