use axum::{response::Json, http::StatusCode};

use crate::models::WelcomeResponse;

// GET / - Liveness/welcome payload
pub async fn welcome() -> (StatusCode, Json<WelcomeResponse>) {
    let response = WelcomeResponse {
        message: "Welcome to the Reading Clubs API".to_string(),
    };

    (StatusCode::OK, Json(response))
}
