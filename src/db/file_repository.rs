use async_trait::async_trait;
use sqlx::{Pool, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use crate::db::models::FileRow;

const FILE_COLUMNS: &str = "id, owner_user_id, category, file_name, original_name, file_path, \
                            file_size, file_type, uploaded_at";

/// Uploaded file metadata
#[async_trait]
pub trait FileRepository: Send + Sync {
    async fn insert(&self, file: &FileRow) -> Result<FileRow, sqlx::Error>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<FileRow>, sqlx::Error>;
    /// Newest first; `None` lists every owner
    async fn list(&self, owner: Option<Uuid>) -> Result<Vec<FileRow>, sqlx::Error>;
    async fn delete_one(&self, id: Uuid) -> Result<u64, sqlx::Error>;
}

pub struct PgFileRepository {
    pool: Pool<Postgres>,
}

impl PgFileRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileRepository for PgFileRepository {
    async fn insert(&self, file: &FileRow) -> Result<FileRow, sqlx::Error> {
        debug!(
            "Recording file: category={}, owner={}, size={}",
            file.category, file.owner_user_id, file.file_size
        );

        sqlx::query_as::<_, FileRow>(&format!(
            r#"
            INSERT INTO files (id, owner_user_id, category, file_name, original_name, file_path,
                               file_size, file_type, uploaded_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {FILE_COLUMNS}
            "#
        ))
        .bind(file.id)
        .bind(file.owner_user_id)
        .bind(&file.category)
        .bind(&file.file_name)
        .bind(&file.original_name)
        .bind(&file.file_path)
        .bind(file.file_size)
        .bind(&file.file_type)
        .bind(file.uploaded_at)
        .fetch_one(&self.pool)
        .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FileRow>, sqlx::Error> {
        sqlx::query_as::<_, FileRow>(&format!("SELECT {FILE_COLUMNS} FROM files WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn list(&self, owner: Option<Uuid>) -> Result<Vec<FileRow>, sqlx::Error> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {FILE_COLUMNS} FROM files"));
        if let Some(owner) = owner {
            qb.push(" WHERE owner_user_id = ").push_bind(owner);
        }
        qb.push(" ORDER BY uploaded_at DESC, id ASC");
        qb.build_query_as::<FileRow>().fetch_all(&self.pool).await
    }

    async fn delete_one(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        debug!("Deleting file record id={}", id);
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
