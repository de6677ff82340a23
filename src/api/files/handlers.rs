use actix_multipart::form::MultipartForm;
use actix_web::{
    delete, get, post,
    web::{scope, Data, Path, ServiceConfig},
    HttpResponse,
};

use super::models::{Category, UploadForm};
use super::service::FileService;
use crate::api::response::{ApiResponse, MessageResponse};
use crate::auth::Identity;
use crate::error::AppResult;

#[get("")]
async fn list_files(identity: Identity, service: Data<FileService>) -> AppResult<HttpResponse> {
    let files = service.list(&identity).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(files)))
}

#[get("/{id}")]
async fn get_file(identity: Identity, service: Data<FileService>, id: Path<String>) -> AppResult<HttpResponse> {
    let file = service.get(&identity, &id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(file)))
}

#[delete("/{id}")]
async fn delete_file(identity: Identity, service: Data<FileService>, id: Path<String>) -> AppResult<HttpResponse> {
    service.delete(&identity, &id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("file deleted")))
}

async fn upload(
    identity: Identity,
    service: Data<FileService>,
    target: String,
    category: Category,
    form: UploadForm,
) -> AppResult<HttpResponse> {
    let uploaded = service.upload(&identity, &target, category, form.file).await?;
    Ok(HttpResponse::Created().json(ApiResponse::with_message("the file has been uploaded", uploaded)))
}

#[post("/{user_id}/upload/foto")]
async fn upload_foto(
    identity: Identity,
    service: Data<FileService>,
    user_id: Path<String>,
    form: MultipartForm<UploadForm>,
) -> AppResult<HttpResponse> {
    upload(identity, service, user_id.into_inner(), Category::Foto, form.into_inner()).await
}

#[post("/{user_id}/upload/sertifikat")]
async fn upload_sertifikat(
    identity: Identity,
    service: Data<FileService>,
    user_id: Path<String>,
    form: MultipartForm<UploadForm>,
) -> AppResult<HttpResponse> {
    upload(identity, service, user_id.into_inner(), Category::Sertifikat, form.into_inner()).await
}

pub fn files_config(config: &mut ServiceConfig) {
    config
        .service(
            scope("/files")
                .service(list_files)
                .service(get_file)
                .service(delete_file),
        )
        .service(scope("/users").service(upload_foto).service(upload_sertifikat));
}
