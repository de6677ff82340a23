use actix_multipart::form::{tempfile::TempFile, MultipartForm};
use serde::Serialize;
use uuid::Uuid;

/// Upload categories and their acceptance rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Foto,
    Sertifikat,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Foto => "foto",
            Category::Sertifikat => "sertifikat",
        }
    }

    /// Largest accepted file, in bytes
    pub fn max_size(self) -> usize {
        match self {
            Category::Foto => 1024 * 1024,
            Category::Sertifikat => 2 * 1024 * 1024,
        }
    }

    pub fn allowed_types(self) -> &'static [&'static str] {
        match self {
            Category::Foto => &["image/jpeg", "image/png", "image/jpg"],
            Category::Sertifikat => &["application/pdf"],
        }
    }
}

/// Multipart body: a single `file` part
#[derive(Debug, MultipartForm)]
pub struct UploadForm {
    pub file: Option<TempFile>,
}

#[derive(Debug, Serialize)]
pub struct UploadedFile {
    pub id: Uuid,
    pub path: String,
}
