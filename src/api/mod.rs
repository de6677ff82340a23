pub mod alumni;
pub mod auth;
pub mod files;
pub mod health;
pub mod pekerjaan;
pub mod response;
pub mod state;
pub mod validation;

use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Parse a path or body identifier; malformed ids are a client error
pub fn parse_id(raw: &str, what: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::validation(format!("invalid {what} id")))
}
