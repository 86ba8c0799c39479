//! Input checking for create and patch payloads.
//!
//! Handlers accept raw JSON and hand it to [`Fields`], which reads one field
//! at a time and keeps going after a failure so that the caller sees every
//! bad field in a single response.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("validation failed: {}", summary(.errors))]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

fn summary(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{} {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError {
                field: field.to_string(),
                message: message.into(),
            }],
        }
    }

    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

/// Converts a present, non-null JSON value into a typed field value.
pub type Convert<T> = fn(&Value) -> Result<T, String>;

enum Slot<'a> {
    Absent,
    Blank,
    Present(&'a Value),
}

pub struct Fields<'a> {
    object: Option<&'a Map<String, Value>>,
    errors: Vec<FieldError>,
}

impl<'a> Fields<'a> {
    pub fn new(input: &'a Value) -> Self {
        let mut fields = Self {
            object: input.as_object(),
            errors: Vec::new(),
        };
        if fields.object.is_none() {
            fields.reject("body", "expected a JSON object");
        }
        fields
    }

    fn slot(&self, name: &str) -> Slot<'a> {
        match self.object.and_then(|o| o.get(name)) {
            None => Slot::Absent,
            Some(Value::Null) => Slot::Blank,
            Some(Value::String(s)) if s.trim().is_empty() => Slot::Blank,
            Some(v) => Slot::Present(v),
        }
    }

    pub fn reject(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    fn convert<T>(&mut self, name: &str, value: &Value, convert: Convert<T>) -> Option<T> {
        match convert(value) {
            Ok(v) => Some(v),
            Err(message) => {
                self.reject(name, message);
                None
            }
        }
    }

    /// Must be present and non-blank. On failure the error is recorded and a
    /// placeholder is returned; `finish` discards it.
    pub fn required<T: Default>(&mut self, name: &str, convert: Convert<T>) -> T {
        if self.object.is_none() {
            return T::default();
        }
        match self.slot(name) {
            Slot::Absent | Slot::Blank => {
                self.reject(name, "is required");
                T::default()
            }
            Slot::Present(v) => self.convert(name, v, convert).unwrap_or_default(),
        }
    }

    /// Absent, null and blank all read as `None`.
    pub fn optional<T>(&mut self, name: &str, convert: Convert<T>) -> Option<T> {
        match self.slot(name) {
            Slot::Absent | Slot::Blank => None,
            Slot::Present(v) => self.convert(name, v, convert),
        }
    }

    /// Patch of a required field: absent means unchanged, blank is an error.
    pub fn patch<T>(&mut self, name: &str, convert: Convert<T>) -> Option<T> {
        match self.slot(name) {
            Slot::Absent => None,
            Slot::Blank => {
                self.reject(name, "cannot be empty");
                None
            }
            Slot::Present(v) => self.convert(name, v, convert),
        }
    }

    /// Patch of an optional field: absent means unchanged, blank clears it.
    pub fn patch_nullable<T>(&mut self, name: &str, convert: Convert<T>) -> Option<Option<T>> {
        match self.slot(name) {
            Slot::Absent => None,
            Slot::Blank => Some(None),
            Slot::Present(v) => self.convert(name, v, convert).map(Some),
        }
    }

    pub fn check(&mut self, name: &str, ok: bool, message: &str) {
        if !ok {
            self.reject(name, message);
        }
    }

    pub fn finish<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(ValidationErrors {
                errors: self.errors,
            })
        }
    }
}

pub fn text(value: &Value) -> Result<String, String> {
    value
        .as_str()
        .map(|s| s.trim().to_string())
        .ok_or_else(|| "expected a string".to_string())
}

pub fn email(value: &Value) -> Result<String, String> {
    let s = text(value)?;
    match s.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(s),
        _ => Err("is not a valid email address".to_string()),
    }
}

pub fn boolean(value: &Value) -> Result<bool, String> {
    value
        .as_bool()
        .ok_or_else(|| "expected a boolean".to_string())
}

pub fn integer(value: &Value) -> Result<i64, String> {
    value
        .as_i64()
        .ok_or_else(|| "expected an integer".to_string())
}

/// Accepts `"1500.00"` as well as `1500`.
pub fn decimal(value: &Value) -> Result<Decimal, String> {
    let parsed = match value {
        Value::String(s) => s.trim().parse::<Decimal>(),
        Value::Number(n) => n.to_string().parse::<Decimal>(),
        _ => return Err("expected a decimal number".to_string()),
    };
    parsed.map_err(|_| "expected a decimal number".to_string())
}

pub fn price(value: &Value) -> Result<Decimal, String> {
    let amount = decimal(value)?;
    if amount.is_sign_negative() {
        return Err("must not be negative".to_string());
    }
    Ok(amount)
}

pub fn string_list(value: &Value) -> Result<Vec<String>, String> {
    let items = value
        .as_array()
        .ok_or_else(|| "expected an array of strings".to_string())?;
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| "expected an array of strings".to_string())
        })
        .collect()
}

/// Date coercion: RFC 3339, naive ISO forms (read as UTC), a bare date, or
/// epoch milliseconds.
pub fn timestamp(value: &Value) -> Result<DateTime<Utc>, String> {
    match value {
        Value::String(s) => parse_date_like(s.trim()).ok_or_else(|| "invalid date".to_string()),
        Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            .ok_or_else(|| "invalid date".to_string()),
        _ => Err("invalid date".to_string()),
    }
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

pub fn parse_date_like(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
