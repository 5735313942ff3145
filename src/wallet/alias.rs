//! Pseudonyms and simulated identifiers.

const ADJECTIVES: [&str; 15] = [
    "Swift", "Silent", "Mystic", "Shadow", "Cosmic", "Neon", "Cipher", "Phantom", "Nova", "Echo",
    "Stellar", "Quantum", "Void", "Prime", "Zero",
];

const NOUNS: [&str; 15] = [
    "Fox", "Wolf", "Hawk", "Raven", "Tiger", "Dragon", "Phoenix", "Serpent", "Panther", "Falcon",
    "Sage", "Ghost", "Knight", "Nomad", "Oracle",
];

const BASE36: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Derive the display pseudonym for an address.
///
/// The same address always yields the same alias.
pub fn generate_pseudonym(address: &str) -> String {
    let h: u64 = address.chars().map(|c| c as u64).sum();
    let adjective = ADJECTIVES[(h % 15) as usize];
    let noun = NOUNS[(h.wrapping_mul(7) % 15) as usize];
    format!("{}{}{}", adjective, noun, h % 9999 + 1)
}

/// A syntactically plausible address for demo sessions.
pub fn generate_demo_address() -> String {
    format!("aleo1{}", random_base36(58))
}

/// A synthetic transaction id for demo sessions.
pub fn generate_demo_transaction_id() -> String {
    format!("at1demo{}", random_base36(16))
}

/// Not for secrets; demo ids only need to look distinct.
fn random_base36(len: usize) -> String {
    (0..len)
        .map(|_| BASE36[fastrand::usize(..BASE36.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pseudonym_deterministic() {
        let address = generate_demo_address();
        assert_eq!(generate_pseudonym(&address), generate_pseudonym(&address));
    }

    #[test]
    fn test_pseudonym_formula() {
        // "ab" → 97 + 98 = 195; 195 % 15 = 0; 1365 % 15 = 0; 195 % 9999 + 1 = 196
        assert_eq!(generate_pseudonym("ab"), "SwiftFox196");
        // "c" → 99; 99 % 15 = 9; 693 % 15 = 3
        assert_eq!(generate_pseudonym("c"), "EchoRaven100");
    }

    #[test]
    fn test_demo_address_shape() {
        let address = generate_demo_address();
        assert_eq!(address.len(), 63);
        assert!(address.starts_with("aleo1"));
        assert!(address[5..]
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()));
        // Parses as an address literal.
        assert!(address.parse::<crate::transaction::Literal>().is_ok());
    }

    #[test]
    fn test_demo_transaction_id() {
        let id = generate_demo_transaction_id();
        assert!(id.starts_with("at1demo"));
        assert_ne!(id, generate_demo_transaction_id());
    }
}
