//! Capability-token generation and hashing.
//!
//! Capability tokens (license keys, invitation tokens, password-reset
//! tokens) are high-entropy random strings, not low-entropy human passwords,
//! so they are digested with a fast cryptographic hash (`sha2`) rather than
//! `argon2` — `argon2`'s deliberate slowness defends against brute-forcing a
//! small password space, which does not apply to a 256-bit random token.
//! Only the digest is ever persisted; the plaintext is returned once, at
//! creation, and is not retrievable again.

use sha2::{Digest, Sha256};

use crate::utils::generate_random_string;

/// Length of the plaintext token returned to the caller on creation.
pub const TOKEN_PLAINTEXT_LEN: usize = 48;

/// Generate a fresh plaintext capability token.
pub fn generate_token() -> String {
    generate_random_string(TOKEN_PLAINTEXT_LEN)
}

/// Digest a plaintext token for storage/lookup. Deterministic so the digest
/// of a presented token can be compared against the stored digest without
/// ever storing the plaintext.
pub fn hash_token(plaintext: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(plaintext.as_bytes());
    hex::encode(hasher.finalize())
}

mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        use std::fmt::Write;
        let mut out = String::with_capacity(bytes.as_ref().len() * 2);
        for byte in bytes.as_ref() {
            write!(out, "{:02x}", byte).expect("writing to a String cannot fail");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_plaintext_hashes_identically() {
        let token = generate_token();
        assert_eq!(hash_token(&token), hash_token(&token));
    }

    #[test]
    fn different_tokens_hash_differently() {
        assert_ne!(hash_token(&generate_token()), hash_token(&generate_token()));
    }

    #[test]
    fn digest_is_hex_of_expected_length() {
        let digest = hash_token("some-token");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
