use actix_web::{
    get, post,
    web::{Data, ServiceConfig},
    HttpResponse,
};
use actix_web_validator::Json;

use super::models::{LoginRequest, ProfileData};
use super::service::AuthService;
use crate::api::response::ApiResponse;
use crate::auth::Identity;
use crate::error::AppResult;

#[post("/login")]
async fn login(service: Data<AuthService>, body: Json<LoginRequest>) -> AppResult<HttpResponse> {
    let data = service.login(&body.username, &body.password).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message("login successful", data)))
}

#[get("/profile")]
async fn profile(identity: Identity) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::data(ProfileData::from(identity)))
}

pub fn auth_config(config: &mut ServiceConfig) {
    config.service(login).service(profile);
}
