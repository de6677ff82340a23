use actix_web::HttpResponse;
use tracing::warn;

use crate::api::response::ErrorResponse;

/// Project-wide JSON body config: parse and validation failures become a 400
/// in the standard error envelope
pub fn json_config() -> actix_web_validator::JsonConfig {
    actix_web_validator::JsonConfig::default().error_handler(|err, _req| {
        let body = match &err {
            actix_web_validator::Error::Validate(validation_errors) => {
                let mut problems: Vec<String> = validation_errors
                    .field_errors()
                    .into_iter()
                    .flat_map(|(field, errors)| {
                        errors.iter().map(move |e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| format!("invalid value for {field}"))
                        })
                    })
                    .collect();
                problems.sort();
                ErrorResponse::with_error("validation failed", problems.join("; "))
            }
            other => {
                let detail = other.to_string();
                let message = if detail.contains("EOF while parsing") {
                    "request body is empty, expected a JSON payload"
                } else if detail.contains("unknown field") {
                    "request body contains a field that cannot be set"
                } else if detail.contains("missing field") {
                    "request body is missing a required field"
                } else {
                    "invalid JSON body"
                };
                ErrorResponse::with_error(message, detail)
            }
        };

        warn!("Rejected request body: {}", err);
        actix_web::error::InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    })
}
