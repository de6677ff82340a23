pub mod extractor;
pub mod password;
pub mod policy;
pub mod role;
pub mod token;

use uuid::Uuid;

pub use role::Role;
pub use token::TokenService;

/// Verified caller, trusted verbatim once the token checks out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub username: String,
    pub role: Role,
}
