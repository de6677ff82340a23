use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use tracing::debug;
use uuid::Uuid;

use crate::db::models::UserRow;

const USER_COLUMNS: &str = "id, username, email, role, password_hash, created_at";

/// Account storage
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Login lookup; `login` is matched against username and email
    async fn find_by_username_or_email(&self, login: &str) -> Result<Option<UserRow>, sqlx::Error>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRow>, sqlx::Error>;
    async fn insert(&self, user: &UserRow) -> Result<UserRow, sqlx::Error>;
}

pub struct PgUserRepository {
    pool: Pool<Postgres>,
}

impl PgUserRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_username_or_email(&self, login: &str) -> Result<Option<UserRow>, sqlx::Error> {
        debug!("Looking up user by username or email");
        sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1 OR email = $1 LIMIT 1"
        ))
        .bind(login)
        .fetch_optional(&self.pool)
        .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRow>, sqlx::Error> {
        sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn insert(&self, user: &UserRow) -> Result<UserRow, sqlx::Error> {
        debug!("Creating user: username={}, role={}", user.username, user.role);

        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (id, username, email, role, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.role)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await?;

        debug!("User created with id={}", row.id);
        Ok(row)
    }
}
