use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::listing::{SortOrder, SortSpec};
use crate::patch::Patch;

/// Sortable job columns
pub const PEKERJAAN_SORT_COLUMNS: &[&str] = &[
    "id",
    "alumni_id",
    "nama_perusahaan",
    "posisi_jabatan",
    "bidang_industri",
    "lokasi_kerja",
    "gaji_range",
    "tanggal_mulai_kerja",
    "tanggal_selesai_kerja",
    "status_pekerjaan",
    "deskripsi_pekerjaan",
    "created_at",
    "updated_at",
    "deleted_at",
];

pub const ACTIVE_SORT: SortSpec = SortSpec {
    columns: PEKERJAAN_SORT_COLUMNS,
    default_column: "created_at",
    default_order: SortOrder::Desc,
};

pub const TRASH_SORT: SortSpec = SortSpec {
    columns: PEKERJAAN_SORT_COLUMNS,
    default_column: "deleted_at",
    default_order: SortOrder::Desc,
};

/// Request body for creating a job
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePekerjaan {
    pub alumni_id: String,
    #[validate(length(max = 100, message = "nama_perusahaan must be at most 100 characters"))]
    pub nama_perusahaan: String,
    #[validate(length(max = 100, message = "posisi_jabatan must be at most 100 characters"))]
    pub posisi_jabatan: String,
    #[validate(length(max = 50, message = "bidang_industri must be at most 50 characters"))]
    pub bidang_industri: String,
    #[validate(length(max = 100, message = "lokasi_kerja must be at most 100 characters"))]
    pub lokasi_kerja: String,
    #[validate(length(max = 50, message = "gaji_range must be at most 50 characters"))]
    pub gaji_range: Option<String>,
    pub tanggal_mulai_kerja: NaiveDate,
    pub tanggal_selesai_kerja: Option<NaiveDate>,
    #[validate(length(max = 20, message = "status_pekerjaan must be at most 20 characters"))]
    pub status_pekerjaan: String,
    pub deskripsi_pekerjaan: Option<String>,
}

/// Request body for updating a job; only supplied fields change
///
/// `alumni_id` is fixed at creation and rejected here like any unknown field.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdatePekerjaan {
    #[serde(default)]
    pub nama_perusahaan: Patch<String>,
    #[serde(default)]
    pub posisi_jabatan: Patch<String>,
    #[serde(default)]
    pub bidang_industri: Patch<String>,
    #[serde(default)]
    pub lokasi_kerja: Patch<String>,
    #[serde(default)]
    pub gaji_range: Patch<String>,
    #[serde(default)]
    pub tanggal_mulai_kerja: Patch<NaiveDate>,
    #[serde(default)]
    pub tanggal_selesai_kerja: Patch<NaiveDate>,
    #[serde(default)]
    pub status_pekerjaan: Patch<String>,
    #[serde(default)]
    pub deskripsi_pekerjaan: Patch<String>,
}
