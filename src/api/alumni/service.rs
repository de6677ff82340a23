use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use uuid::Uuid;
use validator::ValidateEmail;

use super::models::{CreateAlumni, UpdateAlumni, ALUMNI_SORT};
use crate::api::parse_id;
use crate::auth::policy::{ensure_allowed, require_admin};
use crate::auth::Identity;
use crate::clock::Clock;
use crate::db::alumni_repository::AlumniRepository;
use crate::db::models::AlumniRow;
use crate::db::user_repository::UserRepository;
use crate::db::Repositories;
use crate::error::{within, AppError, AppResult};
use crate::listing::{ListParams, ListQuery, Page};
use crate::patch::{FieldValue, Patch, UpdateSet};

const ALUMNI: &str = "alumni";
const PROFILE_EXISTS: &str = "this account already has an alumni profile";

pub struct AlumniService {
    alumni: Arc<dyn AlumniRepository>,
    users: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
    timeout: Duration,
}

impl AlumniService {
    pub fn new(repos: &Repositories, clock: Arc<dyn Clock>, timeout: Duration) -> Self {
        Self {
            alumni: repos.alumni.clone(),
            users: repos.users.clone(),
            clock,
            timeout,
        }
    }

    pub async fn list(&self, params: &ListParams) -> AppResult<Page<AlumniRow>> {
        let query = ListQuery::from_params(params, &ALUMNI_SORT);
        within(self.timeout, async {
            let items = self.alumni.list_paged(&query).await?;
            let total = self.alumni.count(query.search.as_deref()).await?;
            Ok(Page {
                items,
                meta: query.meta(total),
            })
        })
        .await
    }

    pub async fn get(&self, id: &str) -> AppResult<AlumniRow> {
        let id = parse_id(id, ALUMNI)?;
        within(self.timeout, async {
            self.alumni
                .find_by_id(id)
                .await?
                .ok_or(AppError::NotFound(ALUMNI))
        })
        .await
    }

    /// The caller's own profile
    pub async fn get_mine(&self, identity: &Identity) -> AppResult<AlumniRow> {
        within(self.timeout, async {
            self.alumni
                .find_by_user_id(identity.user_id)
                .await?
                .ok_or(AppError::NotFound(ALUMNI))
        })
        .await
    }

    pub async fn list_by_jurusan(&self, jurusan: &str) -> AppResult<Vec<AlumniRow>> {
        let jurusan = jurusan.trim();
        if jurusan.is_empty() {
            return Err(AppError::validation("jurusan is required"));
        }
        within(self.timeout, async { Ok(self.alumni.list_by_jurusan(jurusan).await?) }).await
    }

    /// Create a profile for the caller, or (admins only) for another account
    pub async fn create(&self, identity: &Identity, input: CreateAlumni) -> AppResult<AlumniRow> {
        let user_id = match input.user_id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            None => identity.user_id,
            Some(raw) => parse_id(raw, "user")?,
        };
        if user_id != identity.user_id {
            require_admin(identity)?;
        }

        for (column, value) in [
            ("nim", &input.nim),
            ("nama", &input.nama),
            ("jurusan", &input.jurusan),
            ("email", &input.email),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::validation(format!("{column} is required")));
            }
        }

        info!("Service: Creating alumni nim={} for user_id={}", input.nim, user_id);

        within(self.timeout, async {
            if user_id != identity.user_id && self.users.find_by_id(user_id).await?.is_none() {
                return Err(AppError::validation("user_id does not reference an existing user"));
            }
            if self.alumni.find_by_user_id(user_id).await?.is_some() {
                return Err(AppError::Conflict(PROFILE_EXISTS.into()));
            }

            let now = self.clock.now();
            let row = AlumniRow {
                id: Uuid::new_v4(),
                user_id,
                nim: input.nim,
                nama: input.nama,
                jurusan: input.jurusan,
                angkatan: input.angkatan,
                tahun_lulus: input.tahun_lulus,
                email: input.email,
                no_telepon: input.no_telepon,
                alamat: input.alamat,
                created_at: now,
                updated_at: now,
            };

            let created = self.alumni.insert(&row).await.map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    AppError::Conflict(PROFILE_EXISTS.into())
                }
                other => AppError::Database(other),
            })?;

            info!("Service: Alumni created successfully with id={}", created.id);
            Ok(created)
        })
        .await
    }

    /// Partial update by an admin or the profile's owner
    pub async fn update(&self, identity: &Identity, id: &str, input: UpdateAlumni) -> AppResult<AlumniRow> {
        let id = parse_id(id, ALUMNI)?;

        for (column, patch) in [
            ("nim", &input.nim),
            ("nama", &input.nama),
            ("jurusan", &input.jurusan),
            ("email", &input.email),
        ] {
            patch.reject_blank(column)?;
        }
        for (column, patch, max) in [
            ("nim", &input.nim, 20),
            ("nama", &input.nama, 100),
            ("jurusan", &input.jurusan, 100),
            ("email", &input.email, 100),
            ("no_telepon", &input.no_telepon, 20),
        ] {
            patch.check_max_chars(column, max)?;
        }
        input.angkatan.check_range("angkatan", 1900, 2100)?;
        input.tahun_lulus.check_range("tahun_lulus", 1900, 2100)?;
        if let Patch::Value(email) = &input.email {
            if !email.validate_email() {
                return Err(AppError::validation("email must be a valid email address"));
            }
        }

        let mut set = UpdateSet::new();
        set.merge_required("nim", input.nim)?;
        set.merge_required("nama", input.nama)?;
        set.merge_required("jurusan", input.jurusan)?;
        set.merge_required("angkatan", input.angkatan)?;
        set.merge_required("tahun_lulus", input.tahun_lulus)?;
        set.merge_required("email", input.email)?;
        set.merge_optional("no_telepon", input.no_telepon);
        set.merge_optional("alamat", input.alamat);

        if set.is_empty() {
            return Err(AppError::validation("no fields to update"));
        }

        within(self.timeout, async {
            let current = self
                .alumni
                .find_by_id(id)
                .await?
                .ok_or(AppError::NotFound(ALUMNI))?;

            if let Err(denied) = ensure_allowed(identity, Some(current.user_id)) {
                warn!("Service: {} denied update of alumni id={}", identity.username, id);
                return Err(denied);
            }

            info!("Service: Updating alumni id={} ({} fields)", id, set.len());
            set.set("updated_at", FieldValue::Timestamp(Some(self.clock.now())));

            if self.alumni.update_one(id, &set).await? == 0 {
                return Err(AppError::NotFound(ALUMNI));
            }

            self.alumni
                .find_by_id(id)
                .await?
                .ok_or(AppError::NotFound(ALUMNI))
        })
        .await
    }

    /// Remove a profile and, by cascade, its jobs (admin only)
    pub async fn delete(&self, identity: &Identity, id: &str) -> AppResult<()> {
        require_admin(identity)?;
        let id = parse_id(id, ALUMNI)?;

        within(self.timeout, async {
            if self.alumni.delete_one(id).await? == 0 {
                return Err(AppError::NotFound(ALUMNI));
            }
            info!("Service: Alumni id={} deleted by {}", id, identity.username);
            Ok(())
        })
        .await
    }
}
