//! Transaction requests and their validation.
//!
//! # Responsibilities
//! - Hold one immutable program call (program, function, typed arguments, fee)
//! - Check calls to known programs against their signatures before signing
//!
//! # Design Decisions
//! - Fields are private; a request cannot change after it is built
//! - Arguments are `Literal`s, so free-form text cannot reach the chain
//! - Unknown programs pass with structural checks only; unknown functions on
//!   known programs are rejected

use std::collections::HashMap;

use crate::config::ProgramsConfig;
use crate::transaction::literal::{Literal, LiteralError, LiteralType};
use crate::transaction::types::TransactionError;

/// One call to an on-chain program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    program: String,
    function: String,
    arguments: Vec<Literal>,
    fee: u64,
    private_fee: bool,
}

impl TransactionRequest {
    /// Create a request with a public fee.
    pub fn new(
        program: impl Into<String>,
        function: impl Into<String>,
        arguments: Vec<Literal>,
        fee: u64,
    ) -> Self {
        Self {
            program: program.into(),
            function: function.into(),
            arguments,
            fee,
            private_fee: false,
        }
    }

    /// Parse already-rendered inputs such as `["42field", "1700000000u64"]`.
    pub fn from_inputs(
        program: impl Into<String>,
        function: impl Into<String>,
        inputs: &[&str],
        fee: u64,
    ) -> Result<Self, LiteralError> {
        let arguments = inputs
            .iter()
            .map(|input| input.parse::<Literal>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(program, function, arguments, fee))
    }

    /// Pay the fee from a private record.
    pub fn with_private_fee(mut self, private_fee: bool) -> Self {
        self.private_fee = private_fee;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn function(&self) -> &str {
        &self.function
    }

    pub fn arguments(&self) -> &[Literal] {
        &self.arguments
    }

    pub fn fee(&self) -> u64 {
        self.fee
    }

    pub fn private_fee(&self) -> bool {
        self.private_fee
    }

    /// Inputs rendered with explicit type suffixes, in order.
    pub fn inputs(&self) -> Vec<String> {
        self.arguments.iter().map(|a| a.to_string()).collect()
    }
}

/// Expected inputs of one program function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSignature {
    pub function: &'static str,
    pub params: &'static [(&'static str, LiteralType)],
}

pub const PUBLISH_POST: CallSignature = CallSignature {
    function: "publish_post",
    params: &[
        ("content_digest", LiteralType::Field),
        ("timestamp", LiteralType::U64),
        ("nonce", LiteralType::Field),
    ],
};

pub const ADD_REACTION: CallSignature = CallSignature {
    function: "add_reaction",
    params: &[
        ("post_id", LiteralType::Field),
        ("reaction_type", LiteralType::U8),
        ("timestamp", LiteralType::U64),
    ],
};

pub const FOLLOW_USER: CallSignature = CallSignature {
    function: "follow_user",
    params: &[
        ("target_hash", LiteralType::Field),
        ("timestamp", LiteralType::U64),
    ],
};

pub const CREATE_GROUP: CallSignature = CallSignature {
    function: "create_group",
    params: &[
        ("name_hash", LiteralType::Field),
        ("nonce", LiteralType::Field),
        ("secret", LiteralType::Field),
        ("timestamp", LiteralType::U64),
    ],
};

pub const CREATE_IDENTITY: CallSignature = CallSignature {
    function: "create_identity",
    params: &[
        ("salt", LiteralType::Field),
        ("display_name_digest", LiteralType::Field),
        ("avatar_digest", LiteralType::Field),
        ("bio_digest", LiteralType::Field),
        ("timestamp", LiteralType::U64),
    ],
};

/// Valid reaction codes: like, love, fire, think.
pub const REACTION_CODES: std::ops::RangeInclusive<u8> = 1..=4;

/// Known program functions, keyed by configured program id.
#[derive(Debug, Clone)]
pub struct CallRegistry {
    programs: HashMap<String, Vec<CallSignature>>,
}

impl CallRegistry {
    /// Build the registry for the configured program ids.
    pub fn new(programs: &ProgramsConfig) -> Self {
        let mut map = HashMap::new();
        map.insert(programs.post.clone(), vec![PUBLISH_POST]);
        map.insert(programs.reaction.clone(), vec![ADD_REACTION]);
        map.insert(programs.follow.clone(), vec![FOLLOW_USER]);
        map.insert(programs.group.clone(), vec![CREATE_GROUP]);
        map.insert(programs.identity.clone(), vec![CREATE_IDENTITY]);
        Self { programs: map }
    }

    /// Look up the signature of a known call.
    pub fn signature(&self, program: &str, function: &str) -> Option<&CallSignature> {
        self.programs
            .get(program)?
            .iter()
            .find(|sig| sig.function == function)
    }

    /// Check a request before it is handed to the wallet.
    pub fn validate(&self, request: &TransactionRequest) -> Result<(), TransactionError> {
        let program = request.program();
        let function = request.function();

        if !program.ends_with(".aleo") || program.len() <= ".aleo".len() {
            return Err(invalid(format!("'{}' is not a program id", program)));
        }
        if function.is_empty()
            || !function.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
        {
            return Err(invalid(format!("'{}' is not a function name", function)));
        }

        let Some(functions) = self.programs.get(program) else {
            tracing::debug!(program, function, "Unregistered program, skipping signature check");
            return Ok(());
        };

        let signature = functions
            .iter()
            .find(|sig| sig.function == function)
            .ok_or_else(|| invalid(format!("{} has no function '{}'", program, function)))?;

        let args = request.arguments();
        if args.len() != signature.params.len() {
            return Err(invalid(format!(
                "{}.{} expects {} arguments, got {}",
                program,
                function,
                signature.params.len(),
                args.len()
            )));
        }

        for (arg, (name, expected)) in args.iter().zip(signature.params) {
            if arg.literal_type() != *expected {
                return Err(invalid(format!(
                    "argument '{}' must be {}, got {}",
                    name,
                    expected,
                    arg.literal_type()
                )));
            }
        }

        if signature.function == ADD_REACTION.function {
            if let Literal::U8(code) = args[1] {
                if !REACTION_CODES.contains(&code) {
                    return Err(invalid(format!(
                        "reaction code {} is outside {}..={}",
                        code,
                        REACTION_CODES.start(),
                        REACTION_CODES.end()
                    )));
                }
            }
        }

        Ok(())
    }
}

fn invalid(message: String) -> TransactionError {
    TransactionError::InvalidRequest(message)
}
