//! Content encryption and hashing.
//!
//! AES-256-GCM with a random 96-bit IV. Ciphertexts travel as
//! `base64(iv || ciphertext || tag)`; keys are exported as base64.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use argon2::{Algorithm, Argon2, Params, Version};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::content::types::{ContentError, ContentResult, SymmetricKey};
use crate::transaction::FieldElement;

const IV_LEN: usize = 12;

/// Minimum salt length accepted by `derive_key`.
pub const MIN_SALT_LEN: usize = 8;

/// Generate a fresh random key.
pub fn generate_key() -> SymmetricKey {
    let mut bytes = [0u8; SymmetricKey::LEN];
    rand::thread_rng().fill_bytes(&mut bytes);
    SymmetricKey::from_bytes(bytes)
}

pub fn export_key(key: &SymmetricKey) -> String {
    BASE64.encode(key.as_bytes())
}

pub fn import_key(encoded: &str) -> ContentResult<SymmetricKey> {
    let bytes = BASE64
        .decode(encoded.trim())
        .map_err(|e| ContentError::Decryption(format!("invalid key encoding: {}", e)))?;
    let bytes: [u8; SymmetricKey::LEN] = bytes
        .try_into()
        .map_err(|_| ContentError::Decryption("key must be 32 bytes".to_string()))?;
    Ok(SymmetricKey::from_bytes(bytes))
}

/// Derive a key from a passphrase with Argon2id.
pub fn derive_key(passphrase: &str, salt: &[u8]) -> ContentResult<SymmetricKey> {
    if salt.len() < MIN_SALT_LEN {
        return Err(ContentError::Encryption(format!(
            "salt must be at least {} bytes",
            MIN_SALT_LEN
        )));
    }

    let params = Params::new(65536, 3, 1, Some(SymmetricKey::LEN))
        .map_err(|e| ContentError::Encryption(format!("invalid Argon2 parameters: {}", e)))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut bytes = [0u8; SymmetricKey::LEN];
    argon2
        .hash_password_into(passphrase.as_bytes(), salt, &mut bytes)
        .map_err(|e| ContentError::Encryption(format!("key derivation failed: {}", e)))?;
    Ok(SymmetricKey::from_bytes(bytes))
}

pub fn encrypt(plaintext: &[u8], key: &SymmetricKey) -> ContentResult<String> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));

    let mut iv = [0u8; IV_LEN];
    rand::thread_rng().fill_bytes(&mut iv);

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&iv), plaintext)
        .map_err(|e| ContentError::Encryption(format!("AES-256-GCM encryption failed: {}", e)))?;

    let mut combined = Vec::with_capacity(IV_LEN + ciphertext.len());
    combined.extend_from_slice(&iv);
    combined.extend_from_slice(&ciphertext);
    Ok(BASE64.encode(combined))
}

pub fn decrypt(encoded: &str, key: &SymmetricKey) -> ContentResult<Vec<u8>> {
    let combined = BASE64
        .decode(encoded)
        .map_err(|e| ContentError::Decryption(format!("invalid ciphertext encoding: {}", e)))?;
    if combined.len() <= IV_LEN {
        return Err(ContentError::Decryption("ciphertext too short".to_string()));
    }

    let (iv, ciphertext) = combined.split_at(IV_LEN);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
    cipher
        .decrypt(Nonce::from_slice(iv), ciphertext)
        .map_err(|e| ContentError::Decryption(format!("AES-256-GCM decryption failed: {}", e)))
}

/// Hex SHA-256 of arbitrary bytes.
pub fn hash_content(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// The on-chain digest of a content address.
pub fn content_digest(content_address: &str) -> FieldElement {
    let digest: [u8; 32] = Sha256::digest(content_address.as_bytes()).into();
    FieldElement::from_digest(&digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypt_decrypt() {
        let key = generate_key();
        let sealed = encrypt(b"anonymous but verifiable", &key).unwrap();
        assert_eq!(decrypt(&sealed, &key).unwrap(), b"anonymous but verifiable");
    }

    #[test]
    fn test_fresh_iv_per_encryption() {
        let key = generate_key();
        assert_ne!(encrypt(b"same", &key).unwrap(), encrypt(b"same", &key).unwrap());
    }

    #[test]
    fn test_wrong_key_rejected() {
        let sealed = encrypt(b"secret", &generate_key()).unwrap();
        assert!(matches!(
            decrypt(&sealed, &generate_key()),
            Err(ContentError::Decryption(_))
        ));
    }

    #[test]
    fn test_tampered_ciphertext_rejected() {
        let key = generate_key();
        let sealed = encrypt(b"secret", &key).unwrap();
        let mut raw = BASE64.decode(&sealed).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0x01;
        assert!(decrypt(&BASE64.encode(raw), &key).is_err());
        assert!(decrypt("AAAA", &key).is_err());
    }

    #[test]
    fn test_key_export_import() {
        let key = generate_key();
        let exported = export_key(&key);
        assert_eq!(import_key(&exported).unwrap(), key);
        assert!(import_key("c2hvcnQ=").is_err());
    }

    #[test]
    fn test_hash_content() {
        assert_eq!(
            hash_content(b"hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
        assert_ne!(hash_content(b"hello"), hash_content(b"hellp"));
    }

    #[test]
    fn test_content_digest_deterministic() {
        assert_eq!(content_digest("bafyabc"), content_digest("bafyabc"));
        assert_ne!(content_digest("bafyabc"), content_digest("bafyabd"));
    }

    #[test]
    fn test_derive_key() {
        let a = derive_key("correct horse", b"saltsalt").unwrap();
        let b = derive_key("correct horse", b"saltsalt").unwrap();
        let c = derive_key("correct horse", b"pepperpepper").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(derive_key("pw", b"short").is_err());
    }
}
