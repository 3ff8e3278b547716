// src/web/handlers/system_handlers.rs
use rocket::serde::json::Json;
use rocket::State;
use tracing::error;

use crate::web::types::{AppState, StandardErrorResponse, TextResponse};

pub async fn health_handler(
    state: &State<AppState>,
) -> Result<Json<TextResponse>, Json<StandardErrorResponse>> {
    match state.db.health_check().await {
        Ok(()) => Ok(Json(TextResponse::success("OK".to_string()))),
        Err(e) => {
            error!("Health check failed: {:#}", e);
            Err(Json(StandardErrorResponse::new(
                "Database unavailable".to_string(),
                "DATABASE_ERROR",
                &["Check the database path and permissions"],
            )))
        }
    }
}
