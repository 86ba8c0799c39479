use rusqlite::types::Value as SqlValue;
use rusqlite::Row;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db;
use crate::db::store::{Column, Table, ToColumns};
use crate::services::catalog::Published;
use crate::services::crud::Resource;
use crate::validation::{self, Fields, ValidationErrors};

/// An entry on the price list, e.g. a tattoo size tier or a facial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: i64,
    pub name: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: Option<String>,
    pub price: Decimal,
    /// Minutes.
    pub duration: Option<i64>,
    pub is_visible: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewService {
    pub name: String,
    pub category: String,
    pub kind: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub duration: Option<i64>,
    pub is_visible: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServicePatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub kind: Option<String>,
    pub description: Option<Option<String>>,
    pub price: Option<Decimal>,
    pub duration: Option<Option<i64>>,
    pub is_visible: Option<bool>,
}

fn duration(value: &Value) -> Result<i64, String> {
    let minutes = validation::integer(value)?;
    if minutes <= 0 {
        return Err("must be a positive number of minutes".to_string());
    }
    Ok(minutes)
}

impl ToColumns for NewService {
    fn columns(&self) -> Vec<Column> {
        vec![
            ("name", SqlValue::from(self.name.clone())),
            ("category", SqlValue::from(self.category.clone())),
            ("type", SqlValue::from(self.kind.clone())),
            ("description", SqlValue::from(self.description.clone())),
            ("price", SqlValue::from(self.price.to_string())),
            ("duration", SqlValue::from(self.duration)),
            ("is_visible", SqlValue::from(self.is_visible)),
        ]
    }
}

impl ToColumns for Service {
    fn columns(&self) -> Vec<Column> {
        NewService {
            name: self.name.clone(),
            category: self.category.clone(),
            kind: self.kind.clone(),
            description: self.description.clone(),
            price: self.price,
            duration: self.duration,
            is_visible: self.is_visible,
        }
        .columns()
    }
}

impl Table for Service {
    const TABLE: &'static str = "services";
    const SELECT: &'static str =
        "id, name, category, type, description, price, duration, is_visible";
    const ORDER_BY: &'static str = "id ASC";

    type New = NewService;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Service {
            id: row.get(0)?,
            name: row.get(1)?,
            category: row.get(2)?,
            kind: row.get(3)?,
            description: row.get(4)?,
            price: db::decimal_column(row, 5)?,
            duration: row.get(6)?,
            is_visible: row.get(7)?,
        })
    }
}

impl Resource for Service {
    const NAME: &'static str = "service";

    type Patch = ServicePatch;

    fn parse_new(input: &Value) -> Result<NewService, ValidationErrors> {
        let mut f = Fields::new(input);
        let service = NewService {
            name: f.required("name", validation::text),
            category: f.required("category", validation::text),
            kind: f.required("type", validation::text),
            description: f.optional("description", validation::text),
            price: f.required("price", validation::price),
            duration: f.optional("duration", duration),
            is_visible: f.optional("isVisible", validation::boolean).unwrap_or(true),
        };
        f.finish(service)
    }

    fn parse_patch(input: &Value) -> Result<ServicePatch, ValidationErrors> {
        let mut f = Fields::new(input);
        let patch = ServicePatch {
            name: f.patch("name", validation::text),
            category: f.patch("category", validation::text),
            kind: f.patch("type", validation::text),
            description: f.patch_nullable("description", validation::text),
            price: f.patch("price", validation::price),
            duration: f.patch_nullable("duration", duration),
            is_visible: f.patch("isVisible", validation::boolean),
        };
        f.finish(patch)
    }

    fn apply(&mut self, patch: ServicePatch) {
        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.category {
            self.category = v;
        }
        if let Some(v) = patch.kind {
            self.kind = v;
        }
        if let Some(v) = patch.description {
            self.description = v;
        }
        if let Some(v) = patch.price {
            self.price = v;
        }
        if let Some(v) = patch.duration {
            self.duration = v;
        }
        if let Some(v) = patch.is_visible {
            self.is_visible = v;
        }
    }
}

impl Published for Service {
    const PUBLIC_FILTER: &'static str = "is_visible = 1";
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_requires_price_and_type() {
        let err = Service::parse_new(&json!({"name": "Facial", "category": "beauty"})).unwrap_err();
        assert!(err.has("price"));
        assert!(err.has("type"));
    }

    #[test]
    fn duration_must_be_positive() {
        let err = Service::parse_new(&json!({
            "name": "Facial",
            "category": "beauty",
            "type": "skin",
            "price": "2500",
            "duration": 0
        }))
        .unwrap_err();
        assert_eq!(err.errors.len(), 1);
        assert!(err.has("duration"));
    }

    #[test]
    fn type_field_serializes_under_its_wire_name() {
        let service = Service {
            id: 1,
            name: "Small Tattoo".to_string(),
            category: "tattoo".to_string(),
            kind: "size".to_string(),
            description: None,
            price: Decimal::new(300000, 2),
            duration: Some(60),
            is_visible: true,
        };
        let json = serde_json::to_value(&service).unwrap();
        assert_eq!(json["type"], "size");
        assert_eq!(json["price"], "3000.00");
        assert_eq!(json["isVisible"], true);
    }
}
