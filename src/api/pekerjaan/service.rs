use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use uuid::Uuid;

use super::models::{CreatePekerjaan, UpdatePekerjaan, ACTIVE_SORT, TRASH_SORT};
use crate::api::parse_id;
use crate::auth::policy::{ensure_allowed, require_admin};
use crate::auth::Identity;
use crate::clock::Clock;
use crate::db::alumni_repository::AlumniRepository;
use crate::db::models::{PekerjaanRow, RecordState};
use crate::db::pekerjaan_repository::{PekerjaanFilter, PekerjaanRepository};
use crate::db::Repositories;
use crate::error::{within, AppError, AppResult};
use crate::listing::{ListParams, ListQuery, Page};
use crate::patch::{FieldValue, UpdateSet};

const PEKERJAAN: &str = "pekerjaan";

/// Job lifecycle: create, update, soft delete, restore, hard delete
pub struct PekerjaanService {
    pekerjaan: Arc<dyn PekerjaanRepository>,
    alumni: Arc<dyn AlumniRepository>,
    clock: Arc<dyn Clock>,
    timeout: Duration,
}

impl PekerjaanService {
    pub fn new(repos: &Repositories, clock: Arc<dyn Clock>, timeout: Duration) -> Self {
        Self {
            pekerjaan: repos.pekerjaan.clone(),
            alumni: repos.alumni.clone(),
            clock,
            timeout,
        }
    }

    /// One page of active or trashed jobs
    pub async fn list(&self, state: RecordState, params: &ListParams) -> AppResult<Page<PekerjaanRow>> {
        let sort = match state {
            RecordState::Active => ACTIVE_SORT,
            RecordState::Trashed => TRASH_SORT,
        };
        let query = ListQuery::from_params(params, &sort);

        within(self.timeout, async {
            let items = self.pekerjaan.list_paged(state, &query).await?;
            let total = self.pekerjaan.count(state, query.search.as_deref()).await?;
            Ok(Page {
                items,
                meta: query.meta(total),
            })
        })
        .await
    }

    pub async fn get(&self, id: &str) -> AppResult<PekerjaanRow> {
        let id = parse_id(id, PEKERJAAN)?;
        within(self.timeout, async {
            self.pekerjaan
                .find_one(&PekerjaanFilter::by_id(id).in_state(RecordState::Active))
                .await?
                .ok_or(AppError::NotFound(PEKERJAAN))
        })
        .await
    }

    pub async fn list_by_alumni(&self, alumni_id: &str) -> AppResult<Vec<PekerjaanRow>> {
        let alumni_id = parse_id(alumni_id, "alumni")?;
        within(self.timeout, async { Ok(self.pekerjaan.list_by_alumni(alumni_id).await?) }).await
    }

    /// Create an active job for an existing alumni (admin only)
    ///
    /// # Returns
    /// The record as stored, read back after insert
    pub async fn create(&self, identity: &Identity, input: CreatePekerjaan) -> AppResult<PekerjaanRow> {
        require_admin(identity)?;

        if input.alumni_id.trim().is_empty() {
            return Err(AppError::validation("alumni_id is required"));
        }
        let alumni_id = parse_id(&input.alumni_id, "alumni")?;

        for (column, value) in [
            ("nama_perusahaan", &input.nama_perusahaan),
            ("posisi_jabatan", &input.posisi_jabatan),
            ("bidang_industri", &input.bidang_industri),
            ("lokasi_kerja", &input.lokasi_kerja),
            ("status_pekerjaan", &input.status_pekerjaan),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::validation(format!("{column} is required")));
            }
        }

        info!("Service: Creating pekerjaan for alumni_id={}", alumni_id);

        within(self.timeout, async {
            if self.alumni.find_by_id(alumni_id).await?.is_none() {
                return Err(AppError::validation("alumni_id does not reference an existing alumni"));
            }

            let now = self.clock.now();
            let row = PekerjaanRow {
                id: Uuid::new_v4(),
                alumni_id,
                nama_perusahaan: input.nama_perusahaan,
                posisi_jabatan: input.posisi_jabatan,
                bidang_industri: input.bidang_industri,
                lokasi_kerja: input.lokasi_kerja,
                gaji_range: input.gaji_range,
                tanggal_mulai_kerja: input.tanggal_mulai_kerja,
                tanggal_selesai_kerja: input.tanggal_selesai_kerja,
                status_pekerjaan: input.status_pekerjaan,
                deskripsi_pekerjaan: input.deskripsi_pekerjaan,
                created_at: now,
                updated_at: now,
                is_deleted: false,
                deleted_by: None,
                deleted_at: None,
            };
            let inserted = self.pekerjaan.insert(&row).await?;

            let stored = self
                .pekerjaan
                .find_one(&PekerjaanFilter::by_id(inserted.id))
                .await?
                .ok_or_else(|| AppError::Internal(format!("pekerjaan {} missing after insert", inserted.id)))?;

            info!("Service: Pekerjaan created successfully with id={}", stored.id);
            Ok(stored)
        })
        .await
    }

    /// Apply a partial update to an active job (admin only)
    pub async fn update(&self, identity: &Identity, id: &str, input: UpdatePekerjaan) -> AppResult<PekerjaanRow> {
        require_admin(identity)?;
        let id = parse_id(id, PEKERJAAN)?;

        for (column, patch) in [
            ("nama_perusahaan", &input.nama_perusahaan),
            ("posisi_jabatan", &input.posisi_jabatan),
            ("bidang_industri", &input.bidang_industri),
            ("lokasi_kerja", &input.lokasi_kerja),
            ("status_pekerjaan", &input.status_pekerjaan),
        ] {
            patch.reject_blank(column)?;
        }
        for (column, patch, max) in [
            ("nama_perusahaan", &input.nama_perusahaan, 100),
            ("posisi_jabatan", &input.posisi_jabatan, 100),
            ("bidang_industri", &input.bidang_industri, 50),
            ("lokasi_kerja", &input.lokasi_kerja, 100),
            ("gaji_range", &input.gaji_range, 50),
            ("status_pekerjaan", &input.status_pekerjaan, 20),
        ] {
            patch.check_max_chars(column, max)?;
        }

        let mut set = UpdateSet::new();
        set.merge_required("nama_perusahaan", input.nama_perusahaan)?;
        set.merge_required("posisi_jabatan", input.posisi_jabatan)?;
        set.merge_required("bidang_industri", input.bidang_industri)?;
        set.merge_required("lokasi_kerja", input.lokasi_kerja)?;
        set.merge_optional("gaji_range", input.gaji_range);
        set.merge_required("tanggal_mulai_kerja", input.tanggal_mulai_kerja)?;
        set.merge_optional("tanggal_selesai_kerja", input.tanggal_selesai_kerja);
        set.merge_required("status_pekerjaan", input.status_pekerjaan)?;
        set.merge_optional("deskripsi_pekerjaan", input.deskripsi_pekerjaan);

        if set.is_empty() {
            return Err(AppError::validation("no fields to update"));
        }

        info!("Service: Updating pekerjaan id={} ({} fields)", id, set.len());

        within(self.timeout, async {
            set.set("updated_at", FieldValue::Timestamp(Some(self.clock.now())));

            let filter = PekerjaanFilter::by_id(id).in_state(RecordState::Active);
            if self.pekerjaan.update_one(&filter, &set).await? == 0 {
                return Err(AppError::NotFound(PEKERJAAN));
            }

            self.pekerjaan
                .find_one(&filter)
                .await?
                .ok_or(AppError::NotFound(PEKERJAAN))
        })
        .await
    }

    /// Move an active job to the trash
    ///
    /// # Returns
    /// A message naming whether an admin or the owner performed the delete
    pub async fn soft_delete(&self, identity: &Identity, id: &str) -> AppResult<String> {
        let id = parse_id(id, PEKERJAAN)?;

        within(self.timeout, async {
            let job = self
                .pekerjaan
                .find_one(&PekerjaanFilter::by_id(id).in_state(RecordState::Active))
                .await?
                .ok_or(AppError::NotFound(PEKERJAAN))?;

            let filter = self.authorize(identity, &job).await?.in_state(RecordState::Active);

            let mut set = UpdateSet::new();
            set.set("is_deleted", FieldValue::Bool(true))
                .set("deleted_by", FieldValue::Text(Some(identity.username.clone())))
                .set("deleted_at", FieldValue::Timestamp(Some(self.clock.now())));

            if self.pekerjaan.update_one(&filter, &set).await? == 0 {
                warn!("Service: Pekerjaan id={} changed state before soft delete", id);
                return Err(AppError::NotFound(PEKERJAAN));
            }

            info!("Service: Pekerjaan id={} moved to trash by {}", id, identity.username);
            Ok(format!("pekerjaan deleted by {}", actor_label(identity)))
        })
        .await
    }

    /// Bring a trashed job back to the active list
    pub async fn restore(&self, identity: &Identity, id: &str) -> AppResult<String> {
        let id = parse_id(id, PEKERJAAN)?;

        within(self.timeout, async {
            let job = self
                .pekerjaan
                .find_one(&PekerjaanFilter::by_id(id))
                .await?
                .ok_or(AppError::NotFound(PEKERJAAN))?;

            let filter = self.authorize(identity, &job).await?;
            if job.state() == RecordState::Active {
                return Err(AppError::Conflict("pekerjaan is not in the trash".into()));
            }

            let mut set = UpdateSet::new();
            set.set("is_deleted", FieldValue::Bool(false))
                .set("updated_at", FieldValue::Timestamp(Some(self.clock.now())))
                .set("deleted_by", FieldValue::Text(None))
                .set("deleted_at", FieldValue::Timestamp(None));

            let filter = filter.in_state(RecordState::Trashed);
            if self.pekerjaan.update_one(&filter, &set).await? == 0 {
                return Err(AppError::NotFound(PEKERJAAN));
            }

            info!("Service: Pekerjaan id={} restored by {}", id, identity.username);
            Ok(format!("pekerjaan restored by {}", actor_label(identity)))
        })
        .await
    }

    /// Permanently remove a trashed job
    pub async fn hard_delete(&self, identity: &Identity, id: &str) -> AppResult<()> {
        let id = parse_id(id, PEKERJAAN)?;

        within(self.timeout, async {
            let job = self
                .pekerjaan
                .find_one(&PekerjaanFilter::by_id(id))
                .await?
                .ok_or(AppError::NotFound(PEKERJAAN))?;

            let filter = self.authorize(identity, &job).await?;
            if job.state() == RecordState::Active {
                return Err(AppError::Conflict(
                    "pekerjaan must be moved to the trash before it can be permanently deleted".into(),
                ));
            }

            let filter = filter.in_state(RecordState::Trashed);
            if self.pekerjaan.delete_one(&filter).await? == 0 {
                return Err(AppError::NotFound(PEKERJAAN));
            }

            info!("Service: Pekerjaan id={} permanently deleted by {}", id, identity.username);
            Ok(())
        })
        .await
    }

    /// Ownership check for lifecycle mutations.
    ///
    /// Returns the filter the mutation must run under; non-admins are pinned
    /// to the alumni they were authorized against.
    async fn authorize(&self, identity: &Identity, job: &PekerjaanRow) -> AppResult<PekerjaanFilter> {
        let filter = PekerjaanFilter::by_id(job.id);
        if identity.role.is_admin() {
            return Ok(filter);
        }

        let owner = self.alumni.find_by_id(job.alumni_id).await?.map(|a| a.user_id);
        if let Err(denied) = ensure_allowed(identity, owner) {
            warn!(
                "Service: {} denied access to pekerjaan id={}",
                identity.username, job.id
            );
            return Err(denied);
        }
        Ok(filter.owned_by(job.alumni_id))
    }
}

fn actor_label(identity: &Identity) -> &'static str {
    if identity.role.is_admin() {
        "admin"
    } else {
        "owner"
    }
}
