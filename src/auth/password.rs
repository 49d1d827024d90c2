//! Password hashing and verification.
//!
//! # Purpose
//! Wraps bcrypt with a configurable cost factor. Verification never surfaces
//! errors to callers; a malformed stored hash simply fails the check.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("bcrypt failure: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}

/// Hash a raw password with the given bcrypt cost.
pub fn hash_password(raw: &str, cost: u32) -> Result<String, PasswordError> {
    Ok(bcrypt::hash(raw, cost)?)
}

/// Check a raw password against a stored bcrypt hash.
///
/// Returns false on mismatch and on malformed hashes. Callers only ever
/// need a yes/no answer here, and a corrupt hash must read as "no".
pub fn verify_password(raw: &str, hash: &str) -> bool {
    bcrypt::verify(raw, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    // MIN_COST keeps the tests fast; production cost comes from config.
    const TEST_COST: u32 = 4;

    #[test]
    fn hash_then_verify_roundtrip() {
        let hash = hash_password("hunter2", TEST_COST).expect("hash");
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
    }

    #[test]
    fn hashes_are_salted() {
        let first = hash_password("hunter2", TEST_COST).expect("hash");
        let second = hash_password("hunter2", TEST_COST).expect("hash");
        assert_ne!(first, second);
    }

    #[test]
    fn malformed_hash_fails_closed() {
        assert!(!verify_password("hunter2", "not-a-bcrypt-hash"));
        assert!(!verify_password("hunter2", ""));
    }
}
