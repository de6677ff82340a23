use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};
use uuid::Uuid;
use validator::ValidateEmail;

use super::models::{LoginData, NewUser};
use crate::auth::password::{hash_password, verify_password, BCRYPT_COST};
use crate::auth::{Identity, TokenService};
use crate::clock::Clock;
use crate::db::models::UserRow;
use crate::db::user_repository::UserRepository;
use crate::db::Repositories;
use crate::error::{within, AppError, AppResult};

/// Same answer for unknown accounts and wrong passwords
pub const BAD_CREDENTIALS: &str = "invalid username or password";

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<TokenService>,
    clock: Arc<dyn Clock>,
    timeout: Duration,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(repos: &Repositories, tokens: Arc<TokenService>, clock: Arc<dyn Clock>, timeout: Duration) -> Self {
        Self {
            users: repos.users.clone(),
            tokens,
            clock,
            timeout,
            bcrypt_cost: BCRYPT_COST,
        }
    }

    /// Lower bcrypt cost, for tests
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Exchange credentials for a bearer token
    pub async fn login(&self, username: &str, password: &str) -> AppResult<LoginData> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AppError::validation("username and password are required"));
        }

        within(self.timeout, async {
            let Some(user) = self.users.find_by_username_or_email(username).await? else {
                warn!("Login failed: unknown account");
                return Err(AppError::Unauthorized(BAD_CREDENTIALS));
            };

            if !verify_password(password, &user.password_hash).await? {
                warn!("Login failed: wrong password for user id={}", user.id);
                return Err(AppError::Unauthorized(BAD_CREDENTIALS));
            }

            let role = user.role().ok_or_else(|| {
                error!("User id={} has unknown role {:?}", user.id, user.role);
                AppError::Internal(format!("stored role {:?} is not recognized", user.role))
            })?;

            let token = self.tokens.issue(&Identity {
                user_id: user.id,
                username: user.username.clone(),
                role,
            })?;

            info!("User id={} logged in", user.id);
            Ok(LoginData { user, token })
        })
        .await
    }

    /// Seed an account (used by the `create-user` command)
    pub async fn create_user(&self, new_user: NewUser) -> AppResult<UserRow> {
        let username = new_user.username.trim().to_string();
        let email = new_user.email.trim().to_string();
        if username.is_empty() || new_user.password.is_empty() {
            return Err(AppError::validation("username and password are required"));
        }
        if !email.validate_email() {
            return Err(AppError::validation("email must be a valid email address"));
        }

        for login in [&username, &email] {
            if self.users.find_by_username_or_email(login).await?.is_some() {
                return Err(AppError::Conflict("username or email already taken".into()));
            }
        }

        let password_hash = hash_password(&new_user.password, self.bcrypt_cost).await?;
        let row = UserRow {
            id: Uuid::new_v4(),
            username,
            email,
            role: new_user.role.to_string(),
            password_hash,
            created_at: self.clock.now(),
        };

        let created = self.users.insert(&row).await.map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("username or email already taken".into())
            }
            other => AppError::Database(other),
        })?;

        info!("User created: id={}, role={}", created.id, created.role);
        Ok(created)
    }
}
