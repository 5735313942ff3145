//! Typed builders for the known program calls.
//!
//! Each builder fills in the timestamp and any random nonce or salt, so
//! callers only supply the values that carry meaning.

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};

use crate::config::ProgramsConfig;
use crate::content::ContentReference;
use crate::transaction::literal::{FieldElement, Literal};
use crate::transaction::request::{
    TransactionRequest, ADD_REACTION, CREATE_GROUP, CREATE_IDENTITY, FOLLOW_USER, PUBLISH_POST,
};

/// Reaction codes accepted by the reaction program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Reaction {
    Like = 1,
    Love = 2,
    Fire = 3,
    Think = 4,
}

impl Reaction {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Reaction::Like => "like",
            Reaction::Love => "love",
            Reaction::Fire => "fire",
            Reaction::Think => "think",
        };
        f.write_str(s)
    }
}

impl FromStr for Reaction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "like" | "1" => Ok(Reaction::Like),
            "love" | "2" => Ok(Reaction::Love),
            "fire" | "3" => Ok(Reaction::Fire),
            "think" | "4" => Ok(Reaction::Think),
            other => Err(format!("unknown reaction '{}'", other)),
        }
    }
}

/// Hash arbitrary text into a field element (SHA-256, reduced).
pub fn text_digest(text: &str) -> FieldElement {
    let digest: [u8; 32] = Sha256::digest(text.as_bytes()).into();
    FieldElement::from_digest(&digest)
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Builds requests against the configured program ids.
#[derive(Debug, Clone)]
pub struct ProgramCall {
    programs: ProgramsConfig,
    fee: u64,
    private_fee: bool,
}

impl ProgramCall {
    /// Create a new builder with the given fee settings.
    pub fn new(programs: ProgramsConfig, fee: u64, private_fee: bool) -> Self {
        Self {
            programs,
            fee,
            private_fee,
        }
    }

    fn request(&self, program: &str, function: &str, arguments: Vec<Literal>) -> TransactionRequest {
        TransactionRequest::new(program, function, arguments, self.fee)
            .with_private_fee(self.private_fee)
    }

    /// `publish_post(content_digest, timestamp, nonce)`.
    pub fn publish_post(&self, content: &ContentReference) -> TransactionRequest {
        self.request(
            &self.programs.post,
            PUBLISH_POST.function,
            vec![
                content.digest.into(),
                Literal::U64(now_secs()),
                FieldElement::random().into(),
            ],
        )
    }

    /// `add_reaction(post_id, reaction_type, timestamp)`.
    pub fn add_reaction(&self, post_id: FieldElement, reaction: Reaction) -> TransactionRequest {
        self.request(
            &self.programs.reaction,
            ADD_REACTION.function,
            vec![
                post_id.into(),
                Literal::U8(reaction.code()),
                Literal::U64(now_secs()),
            ],
        )
    }

    /// `add_reaction` with a raw code. Out-of-range codes are caught by validation.
    pub fn add_reaction_code(&self, post_id: FieldElement, code: u8) -> TransactionRequest {
        self.request(
            &self.programs.reaction,
            ADD_REACTION.function,
            vec![post_id.into(), Literal::U8(code), Literal::U64(now_secs())],
        )
    }

    /// `follow_user(target_hash, timestamp)` where the target is an address.
    pub fn follow_user(&self, target_address: &str) -> TransactionRequest {
        self.request(
            &self.programs.follow,
            FOLLOW_USER.function,
            vec![
                text_digest(target_address).into(),
                Literal::U64(now_secs()),
            ],
        )
    }

    /// `create_group(name_hash, nonce, secret, timestamp)`.
    ///
    /// Returns the request and the group secret, which the caller must keep.
    pub fn create_group(&self, name: &str) -> (TransactionRequest, FieldElement) {
        let secret = FieldElement::random();
        let request = self.request(
            &self.programs.group,
            CREATE_GROUP.function,
            vec![
                text_digest(name).into(),
                FieldElement::random().into(),
                secret.into(),
                Literal::U64(now_secs()),
            ],
        );
        (request, secret)
    }

    /// `create_identity(salt, display_name, avatar, bio, timestamp)`.
    ///
    /// Each profile argument is the digest of uploaded content; an unset
    /// field is `0field`.
    pub fn create_identity(
        &self,
        display_name: &ContentReference,
        avatar: Option<&ContentReference>,
        bio: Option<&ContentReference>,
    ) -> TransactionRequest {
        let digest = |r: Option<&ContentReference>| r.map_or(FieldElement::from_u64(0), |r| r.digest);
        self.request(
            &self.programs.identity,
            CREATE_IDENTITY.function,
            vec![
                FieldElement::random().into(),
                display_name.digest.into(),
                digest(avatar).into(),
                digest(bio).into(),
                Literal::U64(now_secs()),
            ],
        )
    }
}
