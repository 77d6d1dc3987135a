//! Unauthenticated liveness endpoints.

use api_types::health::{Health, Welcome};
use axum::Json;
use chrono::Utc;

pub async fn welcome() -> Json<Welcome> {
    Json(Welcome {
        message: "Welcome to the Expensa API".to_string(),
    })
}

pub async fn healthcheck() -> Json<Health> {
    Json(Health {
        date: Utc::now(),
        status: "healthy".to_string(),
    })
}
