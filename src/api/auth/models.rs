use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::auth::{Identity, Role};
use crate::db::models::UserRow;

/// Login body; `username` may also be the account's email
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginData {
    pub user: UserRow,
    pub token: String,
}

/// Claims of the verified caller
#[derive(Debug, Serialize)]
pub struct ProfileData {
    pub user_id: Uuid,
    pub username: String,
    pub role: Role,
}

impl From<Identity> for ProfileData {
    fn from(identity: Identity) -> Self {
        Self {
            user_id: identity.user_id,
            username: identity.username,
            role: identity.role,
        }
    }
}

/// Account seeded from the command line
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}
