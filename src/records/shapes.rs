//! Structural record classification.
//!
//! A record's kind is decided by which fields it carries. Shapes are tried
//! in [`PRECEDENCE`] order and the first match wins, so a record carrying
//! both `post_id` and `reaction_type` is a `Post`.

use crate::records::types::{RecordKind, WalletRecord};

/// One recognizable record shape.
pub struct Shape {
    pub kind: RecordKind,
    pub matches: fn(&WalletRecord) -> bool,
}

fn is_post(r: &WalletRecord) -> bool {
    r.has_field("post_id")
}

fn is_reaction(r: &WalletRecord) -> bool {
    r.has_field("reaction_type")
}

fn is_follow(r: &WalletRecord) -> bool {
    r.has_field("following_hash")
}

fn is_membership(r: &WalletRecord) -> bool {
    r.has_field("encryption_key")
}

fn is_owned_group(r: &WalletRecord) -> bool {
    r.has_field("created_at") && !r.has_field("joined_at")
}

fn is_identity(r: &WalletRecord) -> bool {
    r.has_field("pseudonym_hash")
}

fn is_verified_attribute(r: &WalletRecord) -> bool {
    r.has_field("attribute_type")
}

pub const PRECEDENCE: [Shape; 7] = [
    Shape { kind: RecordKind::Post, matches: is_post },
    Shape { kind: RecordKind::Reaction, matches: is_reaction },
    Shape { kind: RecordKind::Follow, matches: is_follow },
    Shape { kind: RecordKind::GroupMembership, matches: is_membership },
    Shape { kind: RecordKind::OwnedGroup, matches: is_owned_group },
    Shape { kind: RecordKind::Identity, matches: is_identity },
    Shape { kind: RecordKind::VerifiedAttribute, matches: is_verified_attribute },
];

pub fn classify(record: &WalletRecord) -> RecordKind {
    PRECEDENCE
        .iter()
        .find(|shape| (shape.matches)(record))
        .map(|shape| shape.kind)
        .unwrap_or(RecordKind::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(fields: &[&str]) -> WalletRecord {
        let data: serde_json::Map<_, _> = fields
            .iter()
            .map(|f| (f.to_string(), json!("1field")))
            .collect();
        serde_json::from_value(json!({ "id": "r", "data": data })).unwrap()
    }

    #[test]
    fn test_each_shape() {
        assert_eq!(classify(&record(&["post_id"])), RecordKind::Post);
        assert_eq!(classify(&record(&["reaction_type"])), RecordKind::Reaction);
        assert_eq!(classify(&record(&["following_hash"])), RecordKind::Follow);
        assert_eq!(classify(&record(&["encryption_key"])), RecordKind::GroupMembership);
        assert_eq!(classify(&record(&["created_at"])), RecordKind::OwnedGroup);
        assert_eq!(classify(&record(&["pseudonym_hash"])), RecordKind::Identity);
        assert_eq!(classify(&record(&["attribute_type"])), RecordKind::VerifiedAttribute);
        assert_eq!(classify(&record(&["something_else"])), RecordKind::Unknown);
    }

    #[test]
    fn test_precedence_order() {
        assert_eq!(classify(&record(&["reaction_type", "post_id"])), RecordKind::Post);
        assert_eq!(
            classify(&record(&["encryption_key", "created_at"])),
            RecordKind::GroupMembership
        );
        assert_eq!(
            classify(&record(&["pseudonym_hash", "attribute_type"])),
            RecordKind::Identity
        );
    }

    #[test]
    fn test_joined_group_is_not_owned() {
        assert_eq!(
            classify(&record(&["created_at", "joined_at"])),
            RecordKind::Unknown
        );
    }
}
