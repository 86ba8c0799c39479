use chrono::{DateTime, Utc};
use rusqlite::types::Value as SqlValue;
use rusqlite::Row;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db;
use crate::db::store::{Column, Table, ToColumns};
use crate::services::catalog::Published;
use crate::services::crud::Resource;
use crate::validation::{self, Fields, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub id: i64,
    pub customer_name: String,
    pub text: String,
    pub rating: i64,
    pub service: Option<String>,
    pub is_approved: bool,
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTestimonial {
    pub customer_name: String,
    pub text: String,
    pub rating: i64,
    pub service: Option<String>,
    pub is_approved: bool,
    pub is_visible: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestimonialPatch {
    pub customer_name: Option<String>,
    pub text: Option<String>,
    pub rating: Option<i64>,
    pub service: Option<Option<String>>,
    pub is_approved: Option<bool>,
    pub is_visible: Option<bool>,
}

fn rating(value: &Value) -> Result<i64, String> {
    let stars = validation::integer(value)?;
    if !(1..=5).contains(&stars) {
        return Err("must be between 1 and 5".to_string());
    }
    Ok(stars)
}

impl ToColumns for NewTestimonial {
    fn columns(&self) -> Vec<Column> {
        vec![
            ("customer_name", SqlValue::from(self.customer_name.clone())),
            ("text", SqlValue::from(self.text.clone())),
            ("rating", SqlValue::from(self.rating)),
            ("service", SqlValue::from(self.service.clone())),
            ("is_approved", SqlValue::from(self.is_approved)),
            ("is_visible", SqlValue::from(self.is_visible)),
        ]
    }
}

impl ToColumns for Testimonial {
    fn columns(&self) -> Vec<Column> {
        NewTestimonial {
            customer_name: self.customer_name.clone(),
            text: self.text.clone(),
            rating: self.rating,
            service: self.service.clone(),
            is_approved: self.is_approved,
            is_visible: self.is_visible,
        }
        .columns()
    }
}

impl Table for Testimonial {
    const TABLE: &'static str = "testimonials";
    const SELECT: &'static str =
        "id, customer_name, text, rating, service, is_approved, is_visible, created_at";
    const ORDER_BY: &'static str = "created_at ASC, id ASC";
    const CREATED_AT: Option<&'static str> = Some("created_at");

    type New = NewTestimonial;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Testimonial {
            id: row.get(0)?,
            customer_name: row.get(1)?,
            text: row.get(2)?,
            rating: row.get(3)?,
            service: row.get(4)?,
            is_approved: row.get(5)?,
            is_visible: row.get(6)?,
            created_at: db::timestamp_column(row, 7)?,
        })
    }
}

impl Resource for Testimonial {
    const NAME: &'static str = "testimonial";

    type Patch = TestimonialPatch;

    fn parse_new(input: &Value) -> Result<NewTestimonial, ValidationErrors> {
        let mut f = Fields::new(input);
        let testimonial = NewTestimonial {
            customer_name: f.required("customerName", validation::text),
            text: f.required("text", validation::text),
            rating: f.required("rating", rating),
            service: f.optional("service", validation::text),
            is_approved: f.optional("isApproved", validation::boolean).unwrap_or(false),
            is_visible: f.optional("isVisible", validation::boolean).unwrap_or(true),
        };
        f.finish(testimonial)
    }

    fn parse_patch(input: &Value) -> Result<TestimonialPatch, ValidationErrors> {
        let mut f = Fields::new(input);
        let patch = TestimonialPatch {
            customer_name: f.patch("customerName", validation::text),
            text: f.patch("text", validation::text),
            rating: f.patch("rating", rating),
            service: f.patch_nullable("service", validation::text),
            is_approved: f.patch("isApproved", validation::boolean),
            is_visible: f.patch("isVisible", validation::boolean),
        };
        f.finish(patch)
    }

    fn apply(&mut self, patch: TestimonialPatch) {
        if let Some(v) = patch.customer_name {
            self.customer_name = v;
        }
        if let Some(v) = patch.text {
            self.text = v;
        }
        if let Some(v) = patch.rating {
            self.rating = v;
        }
        if let Some(v) = patch.service {
            self.service = v;
        }
        if let Some(v) = patch.is_approved {
            self.is_approved = v;
        }
        if let Some(v) = patch.is_visible {
            self.is_visible = v;
        }
    }
}

/// Only moderated entries reach the public page.
impl Published for Testimonial {
    const PUBLIC_FILTER: &'static str = "is_approved = 1 AND is_visible = 1";
}
