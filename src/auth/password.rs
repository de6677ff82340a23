use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::{AppError, AppResult};

/// Bcrypt cost factor used for stored accounts
pub const BCRYPT_COST: u32 = DEFAULT_COST;

/// Hash a password on the blocking thread pool (bcrypt is CPU-bound)
pub async fn hash_password(password: &str, cost: u32) -> AppResult<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || hash(password, cost))
        .await
        .map_err(|e| AppError::Internal(format!("hashing task failed: {e}")))?
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))
}

/// Constant-time check of a password against a stored bcrypt hash.
/// A malformed stored hash counts as a mismatch.
pub async fn verify_password(password: &str, stored_hash: &str) -> AppResult<bool> {
    let password = password.to_string();
    let stored_hash = stored_hash.to_string();
    let matched = tokio::task::spawn_blocking(move || verify(password, &stored_hash).unwrap_or(false))
        .await
        .map_err(|e| AppError::Internal(format!("verification task failed: {e}")))?;
    Ok(matched)
}
