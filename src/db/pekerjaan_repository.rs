use async_trait::async_trait;
use sqlx::{Pool, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use crate::db::models::{PekerjaanRow, RecordState};
use crate::db::query::{push_assignments, push_order_and_page, push_search};
use crate::listing::ListQuery;
use crate::patch::UpdateSet;

const PEKERJAAN_COLUMNS: &str = "id, alumni_id, nama_perusahaan, posisi_jabatan, bidang_industri, \
                                 lokasi_kerja, gaji_range, tanggal_mulai_kerja, tanggal_selesai_kerja, \
                                 status_pekerjaan, deskripsi_pekerjaan, created_at, updated_at, \
                                 is_deleted, deleted_by, deleted_at";

/// Columns matched by the `search` parameter
pub const PEKERJAAN_SEARCH_COLUMNS: &[&str] = &[
    "nama_perusahaan",
    "posisi_jabatan",
    "bidang_industri",
    "lokasi_kerja",
    "status_pekerjaan",
    "deskripsi_pekerjaan",
];

/// Selects at most one job; mutations only touch rows matching every set field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PekerjaanFilter {
    pub id: Uuid,
    pub alumni_id: Option<Uuid>,
    pub state: Option<RecordState>,
}

impl PekerjaanFilter {
    /// Match by id in any state
    pub fn by_id(id: Uuid) -> Self {
        Self {
            id,
            alumni_id: None,
            state: None,
        }
    }

    pub fn in_state(mut self, state: RecordState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn owned_by(mut self, alumni_id: Uuid) -> Self {
        self.alumni_id = Some(alumni_id);
        self
    }

    pub fn matches(&self, row: &PekerjaanRow) -> bool {
        row.id == self.id
            && self.alumni_id.map_or(true, |a| row.alumni_id == a)
            && self.state.map_or(true, |s| row.state() == s)
    }
}

/// Job storage, partitioned into active and trashed rows by `is_deleted`
#[async_trait]
pub trait PekerjaanRepository: Send + Sync {
    async fn find_one(&self, filter: &PekerjaanFilter) -> Result<Option<PekerjaanRow>, sqlx::Error>;
    /// Active jobs of one alumni, most recent start date first
    async fn list_by_alumni(&self, alumni_id: Uuid) -> Result<Vec<PekerjaanRow>, sqlx::Error>;
    async fn list_paged(&self, state: RecordState, query: &ListQuery) -> Result<Vec<PekerjaanRow>, sqlx::Error>;
    async fn count(&self, state: RecordState, search: Option<&str>) -> Result<i64, sqlx::Error>;
    async fn insert(&self, job: &PekerjaanRow) -> Result<PekerjaanRow, sqlx::Error>;
    /// Conditional update; returns the number of rows changed
    async fn update_one(&self, filter: &PekerjaanFilter, set: &UpdateSet) -> Result<u64, sqlx::Error>;
    /// Conditional physical delete; returns the number of rows removed
    async fn delete_one(&self, filter: &PekerjaanFilter) -> Result<u64, sqlx::Error>;
}

pub struct PgPekerjaanRepository {
    pool: Pool<Postgres>,
}

impl PgPekerjaanRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &PekerjaanFilter) {
    qb.push(" WHERE id = ").push_bind(filter.id);
    if let Some(alumni_id) = filter.alumni_id {
        qb.push(" AND alumni_id = ").push_bind(alumni_id);
    }
    if let Some(state) = filter.state {
        qb.push(" AND is_deleted = ").push_bind(state.is_deleted());
    }
}

#[async_trait]
impl PekerjaanRepository for PgPekerjaanRepository {
    async fn find_one(&self, filter: &PekerjaanFilter) -> Result<Option<PekerjaanRow>, sqlx::Error> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {PEKERJAAN_COLUMNS} FROM pekerjaan"));
        push_filter(&mut qb, filter);
        qb.build_query_as::<PekerjaanRow>().fetch_optional(&self.pool).await
    }

    async fn list_by_alumni(&self, alumni_id: Uuid) -> Result<Vec<PekerjaanRow>, sqlx::Error> {
        sqlx::query_as::<_, PekerjaanRow>(&format!(
            r#"
            SELECT {PEKERJAAN_COLUMNS} FROM pekerjaan
            WHERE alumni_id = $1 AND is_deleted = FALSE
            ORDER BY tanggal_mulai_kerja DESC, id ASC
            "#
        ))
        .bind(alumni_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn list_paged(&self, state: RecordState, query: &ListQuery) -> Result<Vec<PekerjaanRow>, sqlx::Error> {
        debug!(
            "Listing pekerjaan ({:?}): page={}, limit={}, sort={} {}",
            state,
            query.page,
            query.limit,
            query.sort_by,
            query.order.as_sql()
        );

        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {PEKERJAAN_COLUMNS} FROM pekerjaan WHERE is_deleted = "
        ));
        qb.push_bind(state.is_deleted());
        push_search(&mut qb, PEKERJAAN_SEARCH_COLUMNS, query.search.as_deref());
        push_order_and_page(&mut qb, query);

        qb.build_query_as::<PekerjaanRow>().fetch_all(&self.pool).await
    }

    async fn count(&self, state: RecordState, search: Option<&str>) -> Result<i64, sqlx::Error> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM pekerjaan WHERE is_deleted = ");
        qb.push_bind(state.is_deleted());
        push_search(&mut qb, PEKERJAAN_SEARCH_COLUMNS, search);
        qb.build_query_scalar::<i64>().fetch_one(&self.pool).await
    }

    async fn insert(&self, job: &PekerjaanRow) -> Result<PekerjaanRow, sqlx::Error> {
        debug!(
            "Creating pekerjaan: alumni_id={}, perusahaan={}",
            job.alumni_id, job.nama_perusahaan
        );

        let row = sqlx::query_as::<_, PekerjaanRow>(&format!(
            r#"
            INSERT INTO pekerjaan (id, alumni_id, nama_perusahaan, posisi_jabatan, bidang_industri,
                                   lokasi_kerja, gaji_range, tanggal_mulai_kerja, tanggal_selesai_kerja,
                                   status_pekerjaan, deskripsi_pekerjaan, created_at, updated_at,
                                   is_deleted, deleted_by, deleted_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING {PEKERJAAN_COLUMNS}
            "#
        ))
        .bind(job.id)
        .bind(job.alumni_id)
        .bind(&job.nama_perusahaan)
        .bind(&job.posisi_jabatan)
        .bind(&job.bidang_industri)
        .bind(&job.lokasi_kerja)
        .bind(&job.gaji_range)
        .bind(job.tanggal_mulai_kerja)
        .bind(job.tanggal_selesai_kerja)
        .bind(&job.status_pekerjaan)
        .bind(&job.deskripsi_pekerjaan)
        .bind(job.created_at)
        .bind(job.updated_at)
        .bind(job.is_deleted)
        .bind(&job.deleted_by)
        .bind(job.deleted_at)
        .fetch_one(&self.pool)
        .await?;

        debug!("Pekerjaan created with id={}", row.id);
        Ok(row)
    }

    async fn update_one(&self, filter: &PekerjaanFilter, set: &UpdateSet) -> Result<u64, sqlx::Error> {
        debug!("Updating pekerjaan {:?} ({} columns)", filter, set.len());

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE pekerjaan SET ");
        push_assignments(&mut qb, set);
        push_filter(&mut qb, filter);

        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn delete_one(&self, filter: &PekerjaanFilter) -> Result<u64, sqlx::Error> {
        debug!("Deleting pekerjaan {:?}", filter);

        let mut qb = QueryBuilder::<Postgres>::new("DELETE FROM pekerjaan");
        push_filter(&mut qb, filter);

        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
