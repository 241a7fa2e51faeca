use actix_web::{HttpResponse, Responder, get, web};
use serde::Serialize;
use sqlx::{Pool, Postgres};
use tracing::error;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

async fn ping(pool: &Pool<Postgres>) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
}

/// Probe response for a database-backed check.
fn probe(result: Result<(), sqlx::Error>, up: &'static str, down: &'static str) -> HttpResponse {
    match result {
        Ok(()) => HttpResponse::Ok().json(HealthResponse {
            status: up,
            database: "connected",
            error: None,
        }),
        Err(e) => {
            error!("{} probe failed: {:?}", up, e);
            HttpResponse::ServiceUnavailable().json(HealthResponse {
                status: down,
                database: "disconnected",
                error: Some(format!("Database error: {}", e)),
            })
        }
    }
}

/// General health including database connectivity.
#[get("/health")]
async fn health_check(pool: web::Data<Pool<Postgres>>) -> impl Responder {
    probe(ping(pool.get_ref()).await, "healthy", "unhealthy")
}

/// Readiness: 503 while the database is unreachable.
#[get("/ready")]
async fn readiness_check(pool: web::Data<Pool<Postgres>>) -> impl Responder {
    probe(ping(pool.get_ref()).await, "ready", "not_ready")
}

/// Liveness only; does not touch the database.
#[get("/live")]
async fn liveness_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "alive",
        database: "not_checked",
        error: None,
    })
}

pub fn health_config(config: &mut web::ServiceConfig) {
    config
        .service(health_check)
        .service(readiness_check)
        .service(liveness_check);
}
