use actix_web::{
    delete, get, post, put,
    web::{scope, Data, Path, Query, ServiceConfig},
    HttpResponse,
};
use actix_web_validator::Json;

use super::models::{CreateAlumni, UpdateAlumni};
use super::service::AlumniService;
use crate::api::response::{ApiResponse, CountedResponse, ListResponse, MessageResponse};
use crate::auth::Identity;
use crate::error::AppResult;
use crate::listing::ListParams;

#[get("")]
async fn list_alumni(
    _identity: Identity,
    service: Data<AlumniService>,
    params: Query<ListParams>,
) -> AppResult<HttpResponse> {
    let page = service.list(&params).await?;
    Ok(HttpResponse::Ok().json(ListResponse::from(page)))
}

#[get("/me")]
async fn my_alumni(identity: Identity, service: Data<AlumniService>) -> AppResult<HttpResponse> {
    let alumni = service.get_mine(&identity).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(alumni)))
}

#[get("/jurusan/{jurusan}")]
async fn list_by_jurusan(
    _identity: Identity,
    service: Data<AlumniService>,
    jurusan: Path<String>,
) -> AppResult<HttpResponse> {
    let alumni = service.list_by_jurusan(&jurusan).await?;
    Ok(HttpResponse::Ok().json(CountedResponse::from(alumni)))
}

#[get("/{id}")]
async fn get_alumni(
    _identity: Identity,
    service: Data<AlumniService>,
    id: Path<String>,
) -> AppResult<HttpResponse> {
    let alumni = service.get(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(alumni)))
}

#[post("")]
async fn create_alumni(
    identity: Identity,
    service: Data<AlumniService>,
    body: Json<CreateAlumni>,
) -> AppResult<HttpResponse> {
    let alumni = service.create(&identity, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::with_message("alumni created", alumni)))
}

#[put("/{id}")]
async fn update_alumni(
    identity: Identity,
    service: Data<AlumniService>,
    id: Path<String>,
    body: Json<UpdateAlumni>,
) -> AppResult<HttpResponse> {
    let alumni = service.update(&identity, &id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message("alumni updated", alumni)))
}

#[delete("/{id}")]
async fn delete_alumni(
    identity: Identity,
    service: Data<AlumniService>,
    id: Path<String>,
) -> AppResult<HttpResponse> {
    service.delete(&identity, &id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("alumni deleted")))
}

/// `/alumni` routes; `/me` is registered ahead of `/{id}`
pub fn alumni_config(config: &mut ServiceConfig) {
    config.service(
        scope("/alumni")
            .service(list_alumni)
            .service(my_alumni)
            .service(list_by_jurusan)
            .service(create_alumni)
            .service(get_alumni)
            .service(update_alumni)
            .service(delete_alumni),
    );
}
