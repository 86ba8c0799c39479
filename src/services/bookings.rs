use chrono::{DateTime, Datelike, Utc};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use crate::db::store;
use crate::errors::AppError;
use crate::models::{Booking, BookingPatch, BookingStatus, NewBooking};
use crate::services::crud::{self, Resource};

/// Public booking form. Whatever status the client sends, the booking starts pending.
pub fn submit(conn: &Connection, input: &Value) -> Result<Booking, AppError> {
    let mut new = NewBooking::parse(input).inspect_err(|e| {
        tracing::warn!(error = %e, "rejected booking submission");
    })?;
    new.status = BookingStatus::Pending;

    let booking: Booking = crud::insert(conn, &new)?;
    tracing::info!(
        id = booking.id,
        service = %booking.service_name,
        date = %booking.booking_date,
        "booking submitted"
    );
    Ok(booking)
}

pub fn update_status(
    conn: &Connection,
    id: i64,
    status: BookingStatus,
) -> Result<Booking, AppError> {
    let mut booking: Booking = crud::get(conn, id)?;
    let patch = BookingPatch::status(status);
    booking.check_patch(&patch)?;
    booking.apply(patch);

    if !store::update(conn, id, &booking, Utc::now())? {
        return Err(AppError::NotFound("booking".to_string()));
    }
    tracing::info!(id, status = %status, "booking status changed");
    crud::get(conn, id)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingStats {
    pub total_today: i64,
    pub total_month: i64,
    pub completed: i64,
    pub pending: i64,
    pub revenue: Decimal,
}

/// Today and this month are UTC calendar periods of `booking_date`.
/// Revenue counts completed bookings only.
pub fn stats(conn: &Connection, now: DateTime<Utc>) -> Result<BookingStats, AppError> {
    let bookings: Vec<Booking> = store::list(conn)?;
    let today = now.date_naive();

    let mut stats = BookingStats::default();
    for booking in &bookings {
        let date = booking.booking_date.date_naive();
        if date == today {
            stats.total_today += 1;
        }
        if date.year() == today.year() && date.month() == today.month() {
            stats.total_month += 1;
        }
        match booking.status {
            BookingStatus::Completed => {
                stats.completed += 1;
                stats.revenue = stats
                    .revenue
                    .checked_add(booking.price.unwrap_or_default())
                    .ok_or_else(|| AppError::Internal(anyhow::anyhow!("revenue total overflowed")))?;
            }
            BookingStatus::Pending => stats.pending += 1,
            BookingStatus::Confirmed | BookingStatus::Cancelled => {}
        }
    }
    Ok(stats)
}
