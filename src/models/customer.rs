use chrono::{DateTime, Utc};
use rusqlite::types::Value as SqlValue;
use rusqlite::Row;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db::store::{Column, Table, ToColumns};
use crate::db::{self, format_timestamp};
use crate::services::crud::Resource;
use crate::validation::{self, Fields, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub total_bookings: i64,
    /// Free-form tier label such as "regular", "vip" or "premium".
    pub loyalty_status: String,
    pub notes: Option<String>,
    pub last_visit: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCustomer {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub loyalty_status: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<Option<String>>,
    pub loyalty_status: Option<String>,
    pub notes: Option<Option<String>>,
    pub last_visit: Option<Option<DateTime<Utc>>>,
}

impl ToColumns for NewCustomer {
    fn columns(&self) -> Vec<Column> {
        vec![
            ("name", SqlValue::from(self.name.clone())),
            ("phone", SqlValue::from(self.phone.clone())),
            ("email", SqlValue::from(self.email.clone())),
            ("loyalty_status", SqlValue::from(self.loyalty_status.clone())),
            ("notes", SqlValue::from(self.notes.clone())),
        ]
    }
}

impl ToColumns for Customer {
    fn columns(&self) -> Vec<Column> {
        vec![
            ("name", SqlValue::from(self.name.clone())),
            ("phone", SqlValue::from(self.phone.clone())),
            ("email", SqlValue::from(self.email.clone())),
            ("total_bookings", SqlValue::from(self.total_bookings)),
            ("loyalty_status", SqlValue::from(self.loyalty_status.clone())),
            ("notes", SqlValue::from(self.notes.clone())),
            ("last_visit", SqlValue::from(self.last_visit.as_ref().map(format_timestamp))),
        ]
    }
}

impl Table for Customer {
    const TABLE: &'static str = "customers";
    const SELECT: &'static str =
        "id, name, phone, email, total_bookings, loyalty_status, notes, last_visit";
    const ORDER_BY: &'static str = "id ASC";

    type New = NewCustomer;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Customer {
            id: row.get(0)?,
            name: row.get(1)?,
            phone: row.get(2)?,
            email: row.get(3)?,
            total_bookings: row.get(4)?,
            loyalty_status: row.get(5)?,
            notes: row.get(6)?,
            last_visit: db::opt_timestamp_column(row, 7)?,
        })
    }
}

impl Resource for Customer {
    const NAME: &'static str = "customer";

    type Patch = CustomerPatch;

    fn parse_new(input: &Value) -> Result<NewCustomer, ValidationErrors> {
        let mut f = Fields::new(input);
        let customer = NewCustomer {
            name: f.required("name", validation::text),
            phone: f.required("phone", validation::text),
            email: f.optional("email", validation::email),
            loyalty_status: f
                .optional("loyaltyStatus", validation::text)
                .unwrap_or_else(|| "regular".to_string()),
            notes: f.optional("notes", validation::text),
        };
        f.finish(customer)
    }

    fn parse_patch(input: &Value) -> Result<CustomerPatch, ValidationErrors> {
        let mut f = Fields::new(input);
        let patch = CustomerPatch {
            name: f.patch("name", validation::text),
            phone: f.patch("phone", validation::text),
            email: f.patch_nullable("email", validation::email),
            loyalty_status: f.patch("loyaltyStatus", validation::text),
            notes: f.patch_nullable("notes", validation::text),
            last_visit: f.patch_nullable("lastVisit", validation::timestamp),
        };
        f.finish(patch)
    }

    fn apply(&mut self, patch: CustomerPatch) {
        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.phone {
            self.phone = v;
        }
        if let Some(v) = patch.email {
            self.email = v;
        }
        if let Some(v) = patch.loyalty_status {
            self.loyalty_status = v;
        }
        if let Some(v) = patch.notes {
            self.notes = v;
        }
        if let Some(v) = patch.last_visit {
            self.last_visit = v;
        }
    }
}
