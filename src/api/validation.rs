use actix_web::{HttpResponse, error::InternalError};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub fields: serde_json::Value,
}

fn bad_request(error: &str, fields: serde_json::Map<String, serde_json::Value>) -> actix_web::Error {
    let body = ErrorResponse {
        error: error.to_string(),
        fields: serde_json::Value::Object(fields),
    };
    InternalError::from_response("", HttpResponse::BadRequest().json(body)).into()
}

/// Per-field messages from a `validator` failure, keyed by field name.
pub fn field_messages(errors: &validator::ValidationErrors) -> serde_json::Map<String, serde_json::Value> {
    let mut fields = serde_json::Map::new();
    for (field, errors) in errors.field_errors() {
        let messages: Vec<String> = errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Validation error in field: {}", field))
            })
            .collect();
        fields.insert(field.to_string(), serde_json::json!({ "errors": messages }));
    }
    fields
}

/// JSON extractor config shared by every route: validation and
/// deserialization failures become a 400 with an `ErrorResponse` body.
pub fn json_config() -> actix_web_validator::JsonConfig {
    actix_web_validator::JsonConfig::default().error_handler(|err, _req| {
        let mut fields = serde_json::Map::new();

        match err {
            actix_web_validator::Error::Validate(validation_errors) => {
                bad_request("Validation failed", field_messages(&validation_errors))
            }
            actix_web_validator::Error::Deserialize(de_err) => {
                let err_string = de_err.to_string();
                let message = if err_string.contains("EOF while parsing") {
                    "Request body is empty. Expected JSON payload".to_string()
                } else if err_string.contains("missing field") {
                    err_string
                } else {
                    "Invalid JSON format".to_string()
                };
                fields.insert("message".to_string(), serde_json::json!(message));
                bad_request("Request validation failed", fields)
            }
            _ => {
                fields.insert("message".to_string(), serde_json::json!("Validation error"));
                bad_request("Validation failed", fields)
            }
        }
    })
}
