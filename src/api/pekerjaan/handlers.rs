use actix_web::{
    delete, get, post, put,
    web::{scope, Data, Path, Query, ServiceConfig},
    HttpResponse,
};
use actix_web_validator::Json;

use super::models::{CreatePekerjaan, UpdatePekerjaan};
use super::service::PekerjaanService;
use crate::api::response::{ApiResponse, CountedResponse, ListResponse, MessageResponse};
use crate::auth::Identity;
use crate::db::models::RecordState;
use crate::error::AppResult;
use crate::listing::ListParams;

#[get("")]
async fn list_active(
    _identity: Identity,
    service: Data<PekerjaanService>,
    params: Query<ListParams>,
) -> AppResult<HttpResponse> {
    let page = service.list(RecordState::Active, &params).await?;
    Ok(HttpResponse::Ok().json(ListResponse::from(page)))
}

#[get("/trash")]
async fn list_trash(
    _identity: Identity,
    service: Data<PekerjaanService>,
    params: Query<ListParams>,
) -> AppResult<HttpResponse> {
    let page = service.list(RecordState::Trashed, &params).await?;
    Ok(HttpResponse::Ok().json(ListResponse::from(page)))
}

#[get("/alumni/{alumni_id}")]
async fn list_by_alumni(
    _identity: Identity,
    service: Data<PekerjaanService>,
    alumni_id: Path<String>,
) -> AppResult<HttpResponse> {
    let jobs = service.list_by_alumni(&alumni_id).await?;
    Ok(HttpResponse::Ok().json(CountedResponse::from(jobs)))
}

#[get("/{id}")]
async fn get_pekerjaan(
    _identity: Identity,
    service: Data<PekerjaanService>,
    id: Path<String>,
) -> AppResult<HttpResponse> {
    let job = service.get(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(job)))
}

#[post("")]
async fn create_pekerjaan(
    identity: Identity,
    service: Data<PekerjaanService>,
    body: Json<CreatePekerjaan>,
) -> AppResult<HttpResponse> {
    let job = service.create(&identity, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::with_message("pekerjaan created", job)))
}

#[put("/{id}")]
async fn update_pekerjaan(
    identity: Identity,
    service: Data<PekerjaanService>,
    id: Path<String>,
    body: Json<UpdatePekerjaan>,
) -> AppResult<HttpResponse> {
    let job = service.update(&identity, &id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message("pekerjaan updated", job)))
}

#[delete("/{id}")]
async fn soft_delete_pekerjaan(
    identity: Identity,
    service: Data<PekerjaanService>,
    id: Path<String>,
) -> AppResult<HttpResponse> {
    let message = service.soft_delete(&identity, &id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(message)))
}

#[post("/{id}/restore")]
async fn restore_pekerjaan(
    identity: Identity,
    service: Data<PekerjaanService>,
    id: Path<String>,
) -> AppResult<HttpResponse> {
    let message = service.restore(&identity, &id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(message)))
}

#[delete("/{id}/hard")]
async fn hard_delete_pekerjaan(
    identity: Identity,
    service: Data<PekerjaanService>,
    id: Path<String>,
) -> AppResult<HttpResponse> {
    service.hard_delete(&identity, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// `/pekerjaan` routes; `/trash` is registered ahead of `/{id}`
pub fn pekerjaan_config(config: &mut ServiceConfig) {
    config.service(
        scope("/pekerjaan")
            .service(list_active)
            .service(list_trash)
            .service(list_by_alumni)
            .service(create_pekerjaan)
            .service(restore_pekerjaan)
            .service(hard_delete_pekerjaan)
            .service(get_pekerjaan)
            .service(update_pekerjaan)
            .service(soft_delete_pekerjaan),
    );
}
