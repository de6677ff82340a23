use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::auth::Role;

/// Database representation of a user account
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    /// Stored role; the column is constrained to known values
    pub fn role(&self) -> Option<Role> {
        self.role.parse().ok()
    }
}

/// Database representation of an alumni profile
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct AlumniRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub nim: String,
    pub nama: String,
    pub jurusan: String,
    pub angkatan: i32,
    pub tahun_lulus: i32,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_telepon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alamat: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Which side of the soft-delete partition a job sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    Active,
    Trashed,
}

impl RecordState {
    pub fn is_deleted(self) -> bool {
        self == RecordState::Trashed
    }
}

/// Database representation of a job (pekerjaan) with its deletion markers
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct PekerjaanRow {
    pub id: Uuid,
    pub alumni_id: Uuid,
    pub nama_perusahaan: String,
    pub posisi_jabatan: String,
    pub bidang_industri: String,
    pub lokasi_kerja: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gaji_range: Option<String>,
    pub tanggal_mulai_kerja: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tanggal_selesai_kerja: Option<NaiveDate>,
    pub status_pekerjaan: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deskripsi_pekerjaan: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl PekerjaanRow {
    pub fn state(&self) -> RecordState {
        if self.is_deleted {
            RecordState::Trashed
        } else {
            RecordState::Active
        }
    }
}

/// Metadata of an uploaded file; the bytes live on disk at `file_path`
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct FileRow {
    pub id: Uuid,
    pub owner_user_id: Uuid,
    pub category: String,
    pub file_name: String,
    pub original_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub file_type: String,
    pub uploaded_at: DateTime<Utc>,
}
