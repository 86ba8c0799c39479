pub mod bookings;
pub mod crud;
pub mod health;
pub mod public;

use axum::http::HeaderMap;

use crate::errors::AppError;

/// Admin routes expect `Authorization: Bearer <ADMIN_TOKEN>`.
pub fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token.is_empty() || token != expected_token {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}
