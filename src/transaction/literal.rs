//! Typed program literals.
//!
//! Program inputs travel as strings with an explicit type suffix
//! (`123field`, `1700000000u64`, `1u8`). Arguments are kept typed until the
//! moment they are handed to the wallet, so a request can only ever carry
//! values the program understands.

use std::fmt;
use std::str::FromStr;

use alloy::primitives::U256;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Modulus of the ledger's `field` type (BLS12-377 scalar field).
pub const FIELD_MODULUS: U256 = U256::from_limbs([
    0x0a11_8000_0000_0001,
    0x59aa_76fe_d000_0001,
    0x60b4_4d1e_5c37_b001,
    0x12ab_655e_9a2c_a556,
]);

/// Error produced when a literal string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid literal '{input}': {reason}")]
pub struct LiteralError {
    pub input: String,
    pub reason: String,
}

impl LiteralError {
    fn new(input: &str, reason: impl Into<String>) -> Self {
        Self {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// An element of the `field` type, always strictly below [`FIELD_MODULUS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct FieldElement(U256);

impl FieldElement {
    /// Wrap a value, rejecting anything outside the field.
    pub fn new(value: U256) -> Option<Self> {
        (value < FIELD_MODULUS).then_some(Self(value))
    }

    /// Interpret a 32-byte digest as a big-endian integer reduced into the field.
    pub fn from_digest(digest: &[u8; 32]) -> Self {
        Self(U256::from_be_bytes(*digest) % FIELD_MODULUS)
    }

    /// Small integers are always valid field elements.
    pub fn from_u64(value: u64) -> Self {
        Self(U256::from(value))
    }

    /// A uniformly random field element, used for nonces, salts and secrets.
    pub fn random() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self::from_digest(&bytes)
    }

    /// The underlying integer.
    pub fn value(&self) -> U256 {
        self.0
    }
}

impl fmt::Display for FieldElement {
    /// Decimal value without the type suffix.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FieldElement {
    type Err = LiteralError;

    /// Accepts a decimal value with or without the `field` suffix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_suffix("field").unwrap_or(s);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(LiteralError::new(s, "expected a decimal field value"));
        }
        let value = U256::from_str_radix(digits, 10)
            .map_err(|e| LiteralError::new(s, e.to_string()))?;
        Self::new(value).ok_or_else(|| LiteralError::new(s, "value exceeds the field modulus"))
    }
}

impl From<FieldElement> for String {
    fn from(value: FieldElement) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for FieldElement {
    type Error = LiteralError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// The type of a program input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralType {
    Field,
    U8,
    U16,
    U32,
    U64,
    U128,
    Bool,
    Address,
}

impl LiteralType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LiteralType::Field => "field",
            LiteralType::U8 => "u8",
            LiteralType::U16 => "u16",
            LiteralType::U32 => "u32",
            LiteralType::U64 => "u64",
            LiteralType::U128 => "u128",
            LiteralType::Bool => "bool",
            LiteralType::Address => "address",
        }
    }
}

impl fmt::Display for LiteralType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed program input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    Field(FieldElement),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    Bool(bool),
    Address(String),
}

impl Literal {
    pub fn literal_type(&self) -> LiteralType {
        match self {
            Literal::Field(_) => LiteralType::Field,
            Literal::U8(_) => LiteralType::U8,
            Literal::U16(_) => LiteralType::U16,
            Literal::U32(_) => LiteralType::U32,
            Literal::U64(_) => LiteralType::U64,
            Literal::U128(_) => LiteralType::U128,
            Literal::Bool(_) => LiteralType::Bool,
            Literal::Address(_) => LiteralType::Address,
        }
    }

    /// Unsigned integer value, if this is an integer literal.
    pub fn as_u128(&self) -> Option<u128> {
        match self {
            Literal::U8(v) => Some(*v as u128),
            Literal::U16(v) => Some(*v as u128),
            Literal::U32(v) => Some(*v as u128),
            Literal::U64(v) => Some(*v as u128),
            Literal::U128(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    /// Renders the wire form with its type suffix.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Field(v) => write!(f, "{}field", v),
            Literal::U8(v) => write!(f, "{}u8", v),
            Literal::U16(v) => write!(f, "{}u16", v),
            Literal::U32(v) => write!(f, "{}u32", v),
            Literal::U64(v) => write!(f, "{}u64", v),
            Literal::U128(v) => write!(f, "{}u128", v),
            Literal::Bool(v) => write!(f, "{}", v),
            Literal::Address(v) => f.write_str(v),
        }
    }
}

fn parse_int<T: FromStr>(input: &str, digits: &str) -> Result<T, LiteralError>
where
    T::Err: fmt::Display,
{
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LiteralError::new(input, "expected an unsigned decimal integer"));
    }
    digits.parse::<T>().map_err(|e| LiteralError::new(input, e.to_string()))
}

impl FromStr for Literal {
    type Err = LiteralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "true" => return Ok(Literal::Bool(true)),
            "false" => return Ok(Literal::Bool(false)),
            _ => {}
        }
        if s.starts_with("aleo1") {
            if s.len() != 63 || !s.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()) {
                return Err(LiteralError::new(s, "malformed address"));
            }
            return Ok(Literal::Address(s.to_string()));
        }
        if let Some(digits) = s.strip_suffix("field") {
            return digits.parse::<FieldElement>().map(Literal::Field)
                .map_err(|e| LiteralError::new(s, e.reason));
        }
        if let Some(digits) = s.strip_suffix("u128") {
            return parse_int(s, digits).map(Literal::U128);
        }
        if let Some(digits) = s.strip_suffix("u64") {
            return parse_int(s, digits).map(Literal::U64);
        }
        if let Some(digits) = s.strip_suffix("u32") {
            return parse_int(s, digits).map(Literal::U32);
        }
        if let Some(digits) = s.strip_suffix("u16") {
            return parse_int(s, digits).map(Literal::U16);
        }
        if let Some(digits) = s.strip_suffix("u8") {
            return parse_int(s, digits).map(Literal::U8);
        }
        Err(LiteralError::new(s, "missing or unknown type suffix"))
    }
}

impl From<FieldElement> for Literal {
    fn from(value: FieldElement) -> Self {
        Literal::Field(value)
    }
}
