//! Fixtures shared by the handler tests: an in-memory store behind the real
//! services, a clock the test drives, and helpers for seeding rows.

use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tempfile::TempDir;
use uuid::Uuid;

use crate::api::auth::models::NewUser;
use crate::api::auth::AuthService;
use crate::api::state::AppServices;
use crate::auth::{Identity, Role, TokenService};
use crate::clock::{Clock, ManualClock};
use crate::db::alumni_repository::AlumniRepository;
use crate::db::memory::MemoryStore;
use crate::db::models::{AlumniRow, PekerjaanRow, UserRow};
use crate::db::pekerjaan_repository::{PekerjaanFilter, PekerjaanRepository};
use crate::db::user_repository::UserRepository;
use crate::db::Repositories;
use crate::patch::{FieldValue, UpdateSet};

pub struct TestHarness {
    pub store: Arc<MemoryStore>,
    pub services: AppServices,
    clock: Arc<ManualClock>,
    tokens: Arc<TokenService>,
    uploads: TempDir,
    nim_seq: AtomicU32,
}

impl TestHarness {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let repos = Repositories::memory(store.clone());
        let start = Utc.with_ymd_and_hms(2025, 1, 6, 8, 0, 0).unwrap();
        let clock = Arc::new(ManualClock::new(start));
        let tokens = Arc::new(TokenService::new("test-secret", 1));
        let uploads = tempfile::tempdir().unwrap();
        let timeout = Duration::from_secs(5);

        let auth = AuthService::new(&repos, tokens.clone(), clock.clone(), timeout).with_bcrypt_cost(4);
        let services = AppServices::assemble(
            tokens.clone(),
            auth,
            &repos,
            clock.clone(),
            timeout,
            uploads.path().to_path_buf(),
        );

        Self {
            store,
            services,
            clock,
            tokens,
            uploads,
            nim_seq: AtomicU32::new(1),
        }
    }

    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        self.services.configure(cfg);
    }

    /// Account with an unusable password; log in through [`Self::bearer`]
    pub async fn user(&self, username: &str, role: Role) -> Identity {
        let row = UserRow {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            role: role.to_string(),
            password_hash: "!".to_string(),
            created_at: self.now(),
        };
        UserRepository::insert(self.store.as_ref(), &row).await.unwrap();
        Identity {
            user_id: row.id,
            username: row.username,
            role,
        }
    }

    pub async fn user_with_password(&self, username: &str, email: &str, password: &str, role: Role) -> Identity {
        let row = self
            .services
            .auth
            .create_user(NewUser {
                username: username.into(),
                email: email.into(),
                password: password.into(),
                role,
            })
            .await
            .unwrap();
        Identity {
            user_id: row.id,
            username: row.username,
            role,
        }
    }

    /// Profile in "Informatika" with a fresh nim
    pub async fn alumni_for(&self, owner: &Identity, nama: &str) -> AlumniRow {
        let seq = self.nim_seq.fetch_add(1, Ordering::SeqCst);
        let row = AlumniRow {
            id: Uuid::new_v4(),
            user_id: owner.user_id,
            nim: format!("2018{seq:05}"),
            nama: nama.to_string(),
            jurusan: "Informatika".to_string(),
            angkatan: 2018,
            tahun_lulus: 2022,
            email: format!("{}@alumni.example.com", owner.username),
            no_telepon: None,
            alamat: None,
            created_at: self.now(),
            updated_at: self.now(),
        };
        AlumniRepository::insert(self.store.as_ref(), &row).await.unwrap()
    }

    pub async fn job(&self, alumni: &AlumniRow, nama_perusahaan: &str, lokasi_kerja: &str) -> PekerjaanRow {
        let row = PekerjaanRow {
            id: Uuid::new_v4(),
            alumni_id: alumni.id,
            nama_perusahaan: nama_perusahaan.to_string(),
            posisi_jabatan: "Software Engineer".to_string(),
            bidang_industri: "Teknologi".to_string(),
            lokasi_kerja: lokasi_kerja.to_string(),
            gaji_range: None,
            tanggal_mulai_kerja: NaiveDate::from_ymd_opt(2022, 8, 1).unwrap(),
            tanggal_selesai_kerja: None,
            status_pekerjaan: "aktif".to_string(),
            deskripsi_pekerjaan: None,
            created_at: self.now(),
            updated_at: self.now(),
            is_deleted: false,
            deleted_by: None,
            deleted_at: None,
        };
        PekerjaanRepository::insert(self.store.as_ref(), &row).await.unwrap()
    }

    /// Move a job to the trash without going through the API
    pub async fn trash(&self, job: &PekerjaanRow, deleted_by: &str) {
        let mut set = UpdateSet::new();
        set.set("is_deleted", FieldValue::Bool(true))
            .set("deleted_by", FieldValue::Text(Some(deleted_by.to_string())))
            .set("deleted_at", FieldValue::Timestamp(Some(self.now())));
        let changed = PekerjaanRepository::update_one(self.store.as_ref(), &PekerjaanFilter::by_id(job.id), &set)
            .await
            .unwrap();
        assert_eq!(changed, 1);
    }

    pub fn stored_job(&self, id: Uuid) -> Option<PekerjaanRow> {
        self.store.pekerjaan_snapshot().into_iter().find(|j| j.id == id)
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn advance_minutes(&self, minutes: i64) {
        self.clock.advance(chrono::Duration::minutes(minutes));
    }

    pub fn bearer(&self, identity: &Identity) -> (&'static str, String) {
        let token = self.tokens.issue(identity).unwrap();
        ("Authorization", format!("Bearer {token}"))
    }

    pub fn upload_dir(&self) -> &Path {
        self.uploads.path()
    }
}

const BOUNDARY: &str = "----alumni-tracker-test-boundary";

/// A single-part multipart/form-data body and its Content-Type header value
pub fn multipart_body(field: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n").as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}
