use serde::Deserialize;
use validator::Validate;

use crate::listing::{SortOrder, SortSpec};
use crate::patch::Patch;

pub const ALUMNI_SORT: SortSpec = SortSpec {
    columns: &[
        "id",
        "nim",
        "nama",
        "jurusan",
        "angkatan",
        "tahun_lulus",
        "email",
        "created_at",
        "updated_at",
    ],
    default_column: "id",
    default_order: SortOrder::Asc,
};

/// Request body for creating an alumni profile
///
/// `user_id` defaults to the caller; only admins may name another account.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAlumni {
    pub user_id: Option<String>,
    #[validate(length(max = 20, message = "nim must be at most 20 characters"))]
    pub nim: String,
    #[validate(length(max = 100, message = "nama must be at most 100 characters"))]
    pub nama: String,
    #[validate(length(max = 100, message = "jurusan must be at most 100 characters"))]
    pub jurusan: String,
    #[validate(range(min = 1900, max = 2100, message = "angkatan must be a year"))]
    pub angkatan: i32,
    #[validate(range(min = 1900, max = 2100, message = "tahun_lulus must be a year"))]
    pub tahun_lulus: i32,
    #[validate(
        email(message = "email must be a valid email address"),
        length(max = 100, message = "email must be at most 100 characters")
    )]
    pub email: String,
    #[validate(length(max = 20, message = "no_telepon must be at most 20 characters"))]
    pub no_telepon: Option<String>,
    pub alamat: Option<String>,
}

/// Request body for updating an alumni profile; only supplied fields change
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateAlumni {
    #[serde(default)]
    pub nim: Patch<String>,
    #[serde(default)]
    pub nama: Patch<String>,
    #[serde(default)]
    pub jurusan: Patch<String>,
    #[serde(default)]
    pub angkatan: Patch<i32>,
    #[serde(default)]
    pub tahun_lulus: Patch<i32>,
    #[serde(default)]
    pub email: Patch<String>,
    #[serde(default)]
    pub no_telepon: Patch<String>,
    #[serde(default)]
    pub alamat: Patch<String>,
}
