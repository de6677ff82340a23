use async_trait::async_trait;
use sqlx::{Pool, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use crate::db::models::AlumniRow;
use crate::db::query::{push_assignments, push_order_and_page, push_search};
use crate::listing::ListQuery;
use crate::patch::UpdateSet;

const ALUMNI_COLUMNS: &str = "id, user_id, nim, nama, jurusan, angkatan, tahun_lulus, email, \
                              no_telepon, alamat, created_at, updated_at";

/// Columns matched by the `search` parameter
pub const ALUMNI_SEARCH_COLUMNS: &[&str] = &["nama", "email", "jurusan", "nim", "alamat"];

/// Alumni profile storage
#[async_trait]
pub trait AlumniRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AlumniRow>, sqlx::Error>;
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<AlumniRow>, sqlx::Error>;
    /// Exact department match, ordered by name
    async fn list_by_jurusan(&self, jurusan: &str) -> Result<Vec<AlumniRow>, sqlx::Error>;
    async fn list_paged(&self, query: &ListQuery) -> Result<Vec<AlumniRow>, sqlx::Error>;
    async fn count(&self, search: Option<&str>) -> Result<i64, sqlx::Error>;
    async fn insert(&self, alumni: &AlumniRow) -> Result<AlumniRow, sqlx::Error>;
    /// Returns the number of rows changed
    async fn update_one(&self, id: Uuid, set: &UpdateSet) -> Result<u64, sqlx::Error>;
    async fn delete_one(&self, id: Uuid) -> Result<u64, sqlx::Error>;
}

pub struct PgAlumniRepository {
    pool: Pool<Postgres>,
}

impl PgAlumniRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AlumniRepository for PgAlumniRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AlumniRow>, sqlx::Error> {
        sqlx::query_as::<_, AlumniRow>(&format!("SELECT {ALUMNI_COLUMNS} FROM alumni WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<AlumniRow>, sqlx::Error> {
        sqlx::query_as::<_, AlumniRow>(&format!(
            "SELECT {ALUMNI_COLUMNS} FROM alumni WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn list_by_jurusan(&self, jurusan: &str) -> Result<Vec<AlumniRow>, sqlx::Error> {
        sqlx::query_as::<_, AlumniRow>(&format!(
            "SELECT {ALUMNI_COLUMNS} FROM alumni WHERE jurusan = $1 ORDER BY nama ASC, id ASC"
        ))
        .bind(jurusan)
        .fetch_all(&self.pool)
        .await
    }

    async fn list_paged(&self, query: &ListQuery) -> Result<Vec<AlumniRow>, sqlx::Error> {
        debug!(
            "Listing alumni: page={}, limit={}, sort={} {}",
            query.page,
            query.limit,
            query.sort_by,
            query.order.as_sql()
        );

        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {ALUMNI_COLUMNS} FROM alumni WHERE TRUE"));
        push_search(&mut qb, ALUMNI_SEARCH_COLUMNS, query.search.as_deref());
        push_order_and_page(&mut qb, query);

        qb.build_query_as::<AlumniRow>().fetch_all(&self.pool).await
    }

    async fn count(&self, search: Option<&str>) -> Result<i64, sqlx::Error> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM alumni WHERE TRUE");
        push_search(&mut qb, ALUMNI_SEARCH_COLUMNS, search);
        qb.build_query_scalar::<i64>().fetch_one(&self.pool).await
    }

    async fn insert(&self, alumni: &AlumniRow) -> Result<AlumniRow, sqlx::Error> {
        debug!("Creating alumni: nim={}, user_id={}", alumni.nim, alumni.user_id);

        let row = sqlx::query_as::<_, AlumniRow>(&format!(
            r#"
            INSERT INTO alumni (id, user_id, nim, nama, jurusan, angkatan, tahun_lulus, email,
                                no_telepon, alamat, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {ALUMNI_COLUMNS}
            "#
        ))
        .bind(alumni.id)
        .bind(alumni.user_id)
        .bind(&alumni.nim)
        .bind(&alumni.nama)
        .bind(&alumni.jurusan)
        .bind(alumni.angkatan)
        .bind(alumni.tahun_lulus)
        .bind(&alumni.email)
        .bind(&alumni.no_telepon)
        .bind(&alumni.alamat)
        .bind(alumni.created_at)
        .bind(alumni.updated_at)
        .fetch_one(&self.pool)
        .await?;

        debug!("Alumni created with id={}", row.id);
        Ok(row)
    }

    async fn update_one(&self, id: Uuid, set: &UpdateSet) -> Result<u64, sqlx::Error> {
        debug!("Updating alumni id={} ({} columns)", id, set.len());

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE alumni SET ");
        push_assignments(&mut qb, set);
        qb.push(" WHERE id = ").push_bind(id);

        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn delete_one(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        debug!("Deleting alumni id={}", id);
        let result = sqlx::query("DELETE FROM alumni WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
