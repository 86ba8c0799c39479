use std::fmt;

use chrono::{DateTime, Utc};
use rusqlite::types::Value as SqlValue;
use rusqlite::Row;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db::store::{Column, Table, ToColumns};
use crate::db::{self, format_timestamp};
use crate::errors::AppError;
use crate::services::crud::Resource;
use crate::validation::{self, Fields, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub service_name: String,
    pub service_category: String,
    pub artist_name: Option<String>,
    pub booking_date: DateTime<Utc>,
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub price: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 4] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }

    /// Forward-only lifecycle. Re-applying the current status is allowed.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        self == next
            || matches!(
                (self, next),
                (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Completed) | (Confirmed, Cancelled)
            )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn status(value: &Value) -> Result<BookingStatus, String> {
    let s = validation::text(value)?;
    BookingStatus::parse(&s.to_lowercase())
        .ok_or_else(|| "must be one of pending, confirmed, completed, cancelled".to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub service_name: String,
    pub service_category: String,
    pub artist_name: Option<String>,
    pub booking_date: DateTime<Utc>,
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub price: Option<Decimal>,
}

impl NewBooking {
    pub fn parse(input: &Value) -> Result<Self, ValidationErrors> {
        let mut f = Fields::new(input);
        let booking = NewBooking {
            customer_name: f.required("customerName", validation::text),
            customer_phone: f.required("customerPhone", validation::text),
            customer_email: f.optional("customerEmail", validation::email),
            service_name: f.required("serviceName", validation::text),
            service_category: f.required("serviceCategory", validation::text),
            artist_name: f.optional("artistName", validation::text),
            booking_date: f.required("bookingDate", validation::timestamp),
            status: f.optional("status", status).unwrap_or_default(),
            notes: f.optional("notes", validation::text),
            price: f.optional("price", validation::price),
        };
        f.finish(booking)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingPatch {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<Option<String>>,
    pub service_name: Option<String>,
    pub service_category: Option<String>,
    pub artist_name: Option<Option<String>>,
    pub booking_date: Option<DateTime<Utc>>,
    pub status: Option<BookingStatus>,
    pub notes: Option<Option<String>>,
    pub price: Option<Option<Decimal>>,
}

impl BookingPatch {
    pub fn parse(input: &Value) -> Result<Self, ValidationErrors> {
        let mut f = Fields::new(input);
        let patch = BookingPatch {
            customer_name: f.patch("customerName", validation::text),
            customer_phone: f.patch("customerPhone", validation::text),
            customer_email: f.patch_nullable("customerEmail", validation::email),
            service_name: f.patch("serviceName", validation::text),
            service_category: f.patch("serviceCategory", validation::text),
            artist_name: f.patch_nullable("artistName", validation::text),
            booking_date: f.patch("bookingDate", validation::timestamp),
            status: f.patch("status", status),
            notes: f.patch_nullable("notes", validation::text),
            price: f.patch_nullable("price", validation::price),
        };
        f.finish(patch)
    }

    pub fn status(status: BookingStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

impl ToColumns for NewBooking {
    fn columns(&self) -> Vec<Column> {
        vec![
            ("customer_name", SqlValue::from(self.customer_name.clone())),
            ("customer_phone", SqlValue::from(self.customer_phone.clone())),
            ("customer_email", SqlValue::from(self.customer_email.clone())),
            ("service_name", SqlValue::from(self.service_name.clone())),
            ("service_category", SqlValue::from(self.service_category.clone())),
            ("artist_name", SqlValue::from(self.artist_name.clone())),
            ("booking_date", SqlValue::from(format_timestamp(&self.booking_date))),
            ("status", SqlValue::from(self.status.as_str().to_string())),
            ("notes", SqlValue::from(self.notes.clone())),
            ("price", SqlValue::from(self.price.map(|p| p.to_string()))),
        ]
    }
}

impl From<&Booking> for NewBooking {
    fn from(b: &Booking) -> Self {
        NewBooking {
            customer_name: b.customer_name.clone(),
            customer_phone: b.customer_phone.clone(),
            customer_email: b.customer_email.clone(),
            service_name: b.service_name.clone(),
            service_category: b.service_category.clone(),
            artist_name: b.artist_name.clone(),
            booking_date: b.booking_date,
            status: b.status,
            notes: b.notes.clone(),
            price: b.price,
        }
    }
}

impl ToColumns for Booking {
    fn columns(&self) -> Vec<Column> {
        NewBooking::from(self).columns()
    }
}

impl Table for Booking {
    const TABLE: &'static str = "bookings";
    const SELECT: &'static str = "id, customer_name, customer_phone, customer_email, service_name, \
        service_category, artist_name, booking_date, status, notes, price, created_at";
    const ORDER_BY: &'static str = "created_at ASC, id ASC";
    const CREATED_AT: Option<&'static str> = Some("created_at");

    type New = NewBooking;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let status: String = row.get(8)?;
        Ok(Booking {
            id: row.get(0)?,
            customer_name: row.get(1)?,
            customer_phone: row.get(2)?,
            customer_email: row.get(3)?,
            service_name: row.get(4)?,
            service_category: row.get(5)?,
            artist_name: row.get(6)?,
            booking_date: db::timestamp_column(row, 7)?,
            status: BookingStatus::parse(&status)
                .ok_or_else(|| db::conversion_error(8, format!("bad booking status {status:?}")))?,
            notes: row.get(9)?,
            price: db::opt_decimal_column(row, 10)?,
            created_at: db::timestamp_column(row, 11)?,
        })
    }
}

impl Resource for Booking {
    const NAME: &'static str = "booking";

    type Patch = BookingPatch;

    fn parse_new(input: &Value) -> Result<NewBooking, ValidationErrors> {
        NewBooking::parse(input)
    }

    fn parse_patch(input: &Value) -> Result<BookingPatch, ValidationErrors> {
        BookingPatch::parse(input)
    }

    fn apply(&mut self, patch: BookingPatch) {
        if let Some(v) = patch.customer_name {
            self.customer_name = v;
        }
        if let Some(v) = patch.customer_phone {
            self.customer_phone = v;
        }
        if let Some(v) = patch.customer_email {
            self.customer_email = v;
        }
        if let Some(v) = patch.service_name {
            self.service_name = v;
        }
        if let Some(v) = patch.service_category {
            self.service_category = v;
        }
        if let Some(v) = patch.artist_name {
            self.artist_name = v;
        }
        if let Some(v) = patch.booking_date {
            self.booking_date = v;
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
        if let Some(v) = patch.notes {
            self.notes = v;
        }
        if let Some(v) = patch.price {
            self.price = v;
        }
    }

    fn check_patch(&self, patch: &BookingPatch) -> Result<(), AppError> {
        match patch.status {
            Some(next) if !self.status.can_transition_to(next) => Err(AppError::InvalidTransition {
                from: self.status,
                to: next,
            }),
            _ => Ok(()),
        }
    }
}
