use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use serde_json::Value;

use crate::errors::AppError;
use crate::handlers::{check_auth, crud};
use crate::models::{Booking, BookingStatus};
use crate::services::bookings::{self, BookingStats};
use crate::state::AppState;

// POST /api/bookings
pub async fn submit(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Json(body) = payload?;

    let booking = {
        let db = state.db()?;
        bookings::submit(&db, &body)?
    };

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "message": "Booking created successfully",
            "booking": booking,
        })),
    ))
}

// GET /api/admin/bookings/stats
pub async fn stats(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<BookingStats>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let stats = {
        let db = state.db()?;
        bookings::stats(&db, Utc::now())?
    };
    Ok(Json(stats))
}

// POST /api/admin/bookings/:id/cancel
pub async fn cancel(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    let id = crud::parse_id::<Booking>(Some(&raw_id))?;

    let booking = {
        let db = state.db()?;
        bookings::update_status(&db, id, BookingStatus::Cancelled)?
    };
    Ok(Json(booking))
}
