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

/// Editable site copy, looked up by `key` (e.g. `hero_headline`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: i64,
    pub key: String,
    pub section: String,
    pub english_text: String,
    pub bangla_text: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewContentItem {
    pub key: String,
    pub section: String,
    pub english_text: String,
    pub bangla_text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentPatch {
    pub key: Option<String>,
    pub section: Option<String>,
    pub english_text: Option<String>,
    pub bangla_text: Option<Option<String>>,
}

impl ToColumns for NewContentItem {
    fn columns(&self) -> Vec<Column> {
        vec![
            ("key", SqlValue::from(self.key.clone())),
            ("section", SqlValue::from(self.section.clone())),
            ("english_text", SqlValue::from(self.english_text.clone())),
            ("bangla_text", SqlValue::from(self.bangla_text.clone())),
        ]
    }
}

impl ToColumns for ContentItem {
    fn columns(&self) -> Vec<Column> {
        NewContentItem {
            key: self.key.clone(),
            section: self.section.clone(),
            english_text: self.english_text.clone(),
            bangla_text: self.bangla_text.clone(),
        }
        .columns()
    }
}

impl Table for ContentItem {
    const TABLE: &'static str = "content";
    const SELECT: &'static str = "id, key, section, english_text, bangla_text, updated_at";
    const ORDER_BY: &'static str = "id ASC";
    const UPDATED_AT: Option<&'static str> = Some("updated_at");

    type New = NewContentItem;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(ContentItem {
            id: row.get(0)?,
            key: row.get(1)?,
            section: row.get(2)?,
            english_text: row.get(3)?,
            bangla_text: row.get(4)?,
            updated_at: db::timestamp_column(row, 5)?,
        })
    }
}

impl Resource for ContentItem {
    const NAME: &'static str = "content item";

    type Patch = ContentPatch;

    fn parse_new(input: &Value) -> Result<NewContentItem, ValidationErrors> {
        let mut f = Fields::new(input);
        let item = NewContentItem {
            key: f.required("key", validation::text),
            section: f.required("section", validation::text),
            english_text: f.required("englishText", validation::text),
            bangla_text: f.optional("banglaText", validation::text),
        };
        f.finish(item)
    }

    fn parse_patch(input: &Value) -> Result<ContentPatch, ValidationErrors> {
        let mut f = Fields::new(input);
        let patch = ContentPatch {
            key: f.patch("key", validation::text),
            section: f.patch("section", validation::text),
            english_text: f.patch("englishText", validation::text),
            bangla_text: f.patch_nullable("banglaText", validation::text),
        };
        f.finish(patch)
    }

    fn apply(&mut self, patch: ContentPatch) {
        if let Some(v) = patch.key {
            self.key = v;
        }
        if let Some(v) = patch.section {
            self.section = v;
        }
        if let Some(v) = patch.english_text {
            self.english_text = v;
        }
        if let Some(v) = patch.bangla_text {
            self.bangla_text = v;
        }
    }
}

impl Published for ContentItem {
    const PUBLIC_FILTER: &'static str = "1 = 1";
}
