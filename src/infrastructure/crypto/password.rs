//! Password hashing utilities

use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};

/// Hash a password using bcrypt at the default cost.
pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    hash_password_with_cost(password, DEFAULT_COST)
}

pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, BcryptError> {
    hash(password, cost)
}

/// Verify a password against a bcrypt hash (`$2a$`, `$2b$`, `$2y$` prefixes).
///
/// CPU-bound; call from a blocking context.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, BcryptError> {
    verify(password, hash)
}
