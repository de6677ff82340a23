//! Actix-web extractor for bearer authentication.
//!
//! Handlers take an [`Identity`] argument; the request is rejected with 401
//! before the handler (and any persistence call) runs when the credential is
//! missing, invalid or incomplete. The [`TokenService`] must be registered as
//! `web::Data<TokenService>`.

use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::header::AUTHORIZATION, web, FromRequest, HttpRequest};

use super::{token::TokenService, Identity};
use crate::error::{AppError, AppResult};

pub const TOKEN_MISSING: &str = "token not found";

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(identify(req))
    }
}

fn identify(req: &HttpRequest) -> AppResult<Identity> {
    let tokens = req
        .app_data::<web::Data<TokenService>>()
        .ok_or_else(|| AppError::Internal("token service not registered as app data".into()))?;

    let header = match req.headers().get(AUTHORIZATION) {
        Some(value) => value
            .to_str()
            .map_err(|_| AppError::Unauthorized(super::token::INVALID_TOKEN))?,
        None => "",
    };

    let token = bearer_token(header).ok_or(AppError::Unauthorized(TOKEN_MISSING))?;
    tokens.verify(token)
}

/// Accepts `Bearer <token>` (any case) or a bare `<token>`
pub fn bearer_token(header: &str) -> Option<&str> {
    let header = header.trim();
    let token = match header.get(..7) {
        Some(prefix) if prefix.eq_ignore_ascii_case("bearer ") => header[7..].trim(),
        _ if header.eq_ignore_ascii_case("bearer") => "",
        _ => header,
    };
    (!token.is_empty()).then_some(token)
}
