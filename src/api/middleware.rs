//! Server-wide middleware constructors.
//!
//! Kept out of `main.rs` so the HTTP tests wrap their apps in exactly the
//! same CORS policy and request logger as the server.

use actix_cors::Cors;
use actix_web::http::Method;
use actix_web::middleware;
use tracing::debug;

/// Browsers may cache a preflight answer for this long (seconds).
const PREFLIGHT_MAX_AGE: usize = 3600;

/// CORS policy for the single front-end origin allowed to call the API.
///
/// Credentials are allowed, so the origin is echoed back rather than `*`.
pub fn cors(allowed_origin: &str) -> Cors {
    debug!("CORS: Allowed origin: {}", allowed_origin);

    Cors::default()
        .allowed_origin(allowed_origin)
        .allowed_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_any_header()
        .supports_credentials()
        .max_age(PREFLIGHT_MAX_AGE)
}

/// Access log line per request: method, path, status and latency.
pub fn request_logger() -> middleware::Logger {
    middleware::Logger::new("%r %s %Dms")
}
