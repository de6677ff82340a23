use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use actix_multipart::form::tempfile::TempFile;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::models::{Category, UploadedFile};
use crate::api::parse_id;
use crate::auth::policy::ensure_allowed;
use crate::auth::Identity;
use crate::clock::Clock;
use crate::db::file_repository::FileRepository;
use crate::db::models::FileRow;
use crate::db::user_repository::UserRepository;
use crate::db::Repositories;
use crate::error::{within, AppError, AppResult};

const FILE: &str = "file";

/// Target segment meaning "the caller"
pub const SELF_TARGET: &str = "me";

/// Uploads stored under `<upload_dir>/<category>/<user_id>/`, metadata in the database
pub struct FileService {
    files: Arc<dyn FileRepository>,
    users: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
    timeout: Duration,
    upload_dir: PathBuf,
}

impl FileService {
    pub fn new(repos: &Repositories, clock: Arc<dyn Clock>, timeout: Duration, upload_dir: PathBuf) -> Self {
        Self {
            files: repos.files.clone(),
            users: repos.users.clone(),
            clock,
            timeout,
            upload_dir,
        }
    }

    /// Store an uploaded file for `target` (`me` or a user id)
    pub async fn upload(
        &self,
        identity: &Identity,
        target: &str,
        category: Category,
        file: Option<TempFile>,
    ) -> AppResult<UploadedFile> {
        let target = target.trim();
        let owner = if target.is_empty() || target == SELF_TARGET {
            identity.user_id
        } else {
            parse_id(target, "user")?
        };
        if owner != identity.user_id && !identity.role.is_admin() {
            return Err(AppError::Forbidden("cannot upload files for another user"));
        }

        let file = file.ok_or_else(|| AppError::validation("no file uploaded"))?;
        check_rules(category, &file)?;

        // uploads get twice the usual budget
        within(self.timeout * 2, async {
            if owner != identity.user_id && self.users.find_by_id(owner).await?.is_none() {
                return Err(AppError::validation("user_id does not reference an existing user"));
            }

            let original_name = file.file_name.clone().unwrap_or_default();
            let file_name = format!("{}{}", Uuid::new_v4(), extension_of(&original_name));
            let dir = self
                .upload_dir
                .join(category.as_str())
                .join(owner.to_string());
            let destination = dir.join(&file_name);

            tokio::fs::create_dir_all(&dir)
                .await
                .map_err(|e| AppError::Internal(format!("cannot create upload directory: {e}")))?;
            tokio::fs::copy(file.file.path(), &destination)
                .await
                .map_err(|e| AppError::Internal(format!("cannot store uploaded file: {e}")))?;

            let row = FileRow {
                id: Uuid::new_v4(),
                owner_user_id: owner,
                category: category.as_str().to_string(),
                file_name: file_name.clone(),
                original_name,
                file_path: destination.to_string_lossy().into_owned(),
                file_size: file.size as i64,
                file_type: content_type_of(&file).unwrap_or_default(),
                uploaded_at: self.clock.now(),
            };

            let stored = match self.files.insert(&row).await {
                Ok(stored) => stored,
                Err(e) => {
                    remove_from_disk(&destination).await;
                    return Err(e.into());
                }
            };

            info!(
                "Stored {} file id={} for user_id={} ({} bytes)",
                category.as_str(),
                stored.id,
                owner,
                stored.file_size
            );

            Ok(UploadedFile {
                id: stored.id,
                path: format!("/uploads/{}/{}/{}", category.as_str(), owner, file_name),
            })
        })
        .await
    }

    /// Admins see every file, everyone else their own
    pub async fn list(&self, identity: &Identity) -> AppResult<Vec<FileRow>> {
        let owner = (!identity.role.is_admin()).then_some(identity.user_id);
        within(self.timeout, async { Ok(self.files.list(owner).await?) }).await
    }

    pub async fn get(&self, identity: &Identity, id: &str) -> AppResult<FileRow> {
        let id = parse_id(id, FILE)?;
        within(self.timeout, async {
            let file = self.files.find_by_id(id).await?.ok_or(AppError::NotFound(FILE))?;
            ensure_allowed(identity, Some(file.owner_user_id))?;
            Ok(file)
        })
        .await
    }

    /// Remove the stored bytes and the metadata row
    pub async fn delete(&self, identity: &Identity, id: &str) -> AppResult<()> {
        let id = parse_id(id, FILE)?;
        within(self.timeout, async {
            let file = self.files.find_by_id(id).await?.ok_or(AppError::NotFound(FILE))?;
            ensure_allowed(identity, Some(file.owner_user_id))?;

            if self.files.delete_one(id).await? == 0 {
                return Err(AppError::NotFound(FILE));
            }
            remove_from_disk(Path::new(&file.file_path)).await;

            info!("File id={} deleted by {}", id, identity.username);
            Ok(())
        })
        .await
    }
}

fn content_type_of(file: &TempFile) -> Option<String> {
    file.content_type.as_ref().map(|m| m.essence_str().to_string())
}

fn check_rules(category: Category, file: &TempFile) -> AppResult<()> {
    if file.size > category.max_size() {
        return Err(AppError::validation(format!(
            "file too large (max {} bytes)",
            category.max_size()
        )));
    }
    let content_type = content_type_of(file).unwrap_or_default();
    if !category.allowed_types().contains(&content_type.as_str()) {
        return Err(AppError::validation("file type not allowed"));
    }
    Ok(())
}

/// `.ext` of the client's file name, or nothing when it has none worth keeping
fn extension_of(original_name: &str) -> String {
    Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default()
}

async fn remove_from_disk(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("Stored file {} was already missing", path.display());
        }
        Err(e) => error!("Failed to remove stored file {}: {}", path.display(), e),
    }
}
