use actix_web::{get, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Liveness check for load balancers: reports `ok`, the crate version and server time.
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "version": VERSION,
        "timestamp": Utc::now()
    }))
}

/// Service banner.
#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "message": "Task tracking API",
        "version": VERSION
    }))
}
