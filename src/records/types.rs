//! Wallet record types.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A record owned by the connected account, as reported by the wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletRecord {
    #[serde(default)]
    pub id: String,

    #[serde(default, alias = "programId", alias = "program_id")]
    pub owning_program: String,

    #[serde(default, alias = "owner")]
    pub owner_address: String,

    /// Decrypted record fields, by name.
    #[serde(default, alias = "data")]
    pub fields: BTreeMap<String, Value>,

    #[serde(default)]
    pub nonce: String,
}

impl WalletRecord {
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// A field as a string, stripping any `.private` / `.public` visibility tag.
    pub fn field_str(&self, name: &str) -> Option<&str> {
        let raw = self.fields.get(name)?.as_str()?;
        Some(
            raw.strip_suffix(".private")
                .or_else(|| raw.strip_suffix(".public"))
                .unwrap_or(raw),
        )
    }
}

/// Structural kind of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Post,
    Reaction,
    Follow,
    GroupMembership,
    OwnedGroup,
    Identity,
    VerifiedAttribute,
    Unknown,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RecordKind::Post => "post",
            RecordKind::Reaction => "reaction",
            RecordKind::Follow => "follow",
            RecordKind::GroupMembership => "group_membership",
            RecordKind::OwnedGroup => "owned_group",
            RecordKind::Identity => "identity",
            RecordKind::VerifiedAttribute => "verified_attribute",
            RecordKind::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// A record tagged with its kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedRecord {
    pub kind: RecordKind,
    pub record: WalletRecord,
}
