//! API token generation and hashing.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// API token prefix.
pub const API_TOKEN_PREFIX: &str = "pd";

/// Generate a fresh opaque bearer token.
#[must_use]
pub fn generate_token() -> String {
    format!(
        "{API_TOKEN_PREFIX}_{}{}",
        Uuid::new_v4().simple(),
        Uuid::new_v4().simple()
    )
}

/// Hex encoded SHA-256 digest stored in place of the raw token.
#[must_use]
pub fn hash_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}
