use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;
use sqlx::SqlitePool;

use crate::db;

/// Banner
#[get("/")]
pub async fn root() -> impl Responder {
    HttpResponse::Ok().json(json!({ "message": "Todo API is running!" }))
}

/// Health check endpoint
///
/// Reports whether the database answers, with the current timestamp.
#[get("/health")]
pub async fn health(pool: web::Data<SqlitePool>) -> impl Responder {
    match db::health_check(&pool).await {
        Ok(()) => HttpResponse::Ok().json(json!({
            "status": "healthy",
            "timestamp": Utc::now()
        })),
        Err(e) => {
            log::error!("health check failed: {}", e);
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "unavailable",
                "timestamp": Utc::now()
            }))
        }
    }
}
