//! Typed queries over the programs' public mappings.

use serde_json::Value;

use crate::config::ProgramsConfig;
use crate::network::client::LedgerClient;
use crate::network::types::NetworkResult;

#[derive(Clone)]
pub struct ProgramQueries {
    client: LedgerClient,
    programs: ProgramsConfig,
}

impl ProgramQueries {
    /// Create a new query helper over a ledger client.
    pub fn new(client: LedgerClient, programs: ProgramsConfig) -> Self {
        Self { client, programs }
    }

    pub fn ledger(&self) -> &LedgerClient {
        &self.client
    }

    pub async fn post(&self, post_id: &str) -> NetworkResult<Option<Value>> {
        self.client.mapping_value(&self.programs.post, "posts", post_id).await
    }

    pub async fn post_count(&self) -> NetworkResult<u64> {
        self.count(&self.programs.post, "post_counter", "0u8").await
    }

    pub async fn reaction_count(&self, post_id: &str) -> NetworkResult<u64> {
        self.count(&self.programs.reaction, "reaction_counts", post_id).await
    }

    pub async fn like_count(&self, post_id: &str) -> NetworkResult<u64> {
        self.count(&self.programs.reaction, "like_counts", post_id).await
    }

    pub async fn follower_count(&self, user_hash: &str) -> NetworkResult<u64> {
        self.count(&self.programs.follow, "follower_counts", user_hash).await
    }

    pub async fn following_count(&self, user_hash: &str) -> NetworkResult<u64> {
        self.count(&self.programs.follow, "following_counts", user_hash).await
    }

    pub async fn group(&self, group_id: &str) -> NetworkResult<Option<Value>> {
        self.client.mapping_value(&self.programs.group, "groups", group_id).await
    }

    pub async fn member_count(&self, group_id: &str) -> NetworkResult<u64> {
        self.count(&self.programs.group, "group_members", group_id).await
    }

    pub async fn profile(&self, pseudonym_hash: &str) -> NetworkResult<Option<Value>> {
        self.client
            .mapping_value(&self.programs.identity, "profiles", pseudonym_hash)
            .await
    }

    pub async fn is_verified(&self, pseudonym_hash: &str) -> NetworkResult<bool> {
        let value = self
            .client
            .mapping_value(&self.programs.identity, "verified_users", pseudonym_hash)
            .await?;
        Ok(matches!(value, Some(Value::Bool(true)))
            || matches!(value, Some(Value::String(ref s)) if s == "true"))
    }

    async fn count(&self, program: &str, mapping: &str, key: &str) -> NetworkResult<u64> {
        let value = self.client.mapping_value(program, mapping, key).await?;
        Ok(value.as_ref().and_then(parse_count).unwrap_or(0))
    }
}

/// Parse a count that may be a number or a suffixed literal like `"12u64"`.
pub fn parse_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => {
            let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
            s[..end].parse().ok()
        }
        _ => None,
    }
}
