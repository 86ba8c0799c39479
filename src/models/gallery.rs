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
pub struct GalleryItem {
    pub id: i64,
    pub image_url: String,
    pub category: String,
    pub caption: Option<String>,
    pub tags: Vec<String>,
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewGalleryItem {
    pub image_url: String,
    pub category: String,
    pub caption: Option<String>,
    pub tags: Vec<String>,
    pub is_visible: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GalleryPatch {
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub caption: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub is_visible: Option<bool>,
}

fn tags_json(tags: &[String]) -> String {
    serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string())
}

impl ToColumns for NewGalleryItem {
    fn columns(&self) -> Vec<Column> {
        vec![
            ("image_url", SqlValue::from(self.image_url.clone())),
            ("category", SqlValue::from(self.category.clone())),
            ("caption", SqlValue::from(self.caption.clone())),
            ("tags", SqlValue::from(tags_json(&self.tags))),
            ("is_visible", SqlValue::from(self.is_visible)),
        ]
    }
}

impl ToColumns for GalleryItem {
    fn columns(&self) -> Vec<Column> {
        NewGalleryItem {
            image_url: self.image_url.clone(),
            category: self.category.clone(),
            caption: self.caption.clone(),
            tags: self.tags.clone(),
            is_visible: self.is_visible,
        }
        .columns()
    }
}

impl Table for GalleryItem {
    const TABLE: &'static str = "gallery";
    const SELECT: &'static str = "id, image_url, category, caption, tags, is_visible, created_at";
    const ORDER_BY: &'static str = "created_at ASC, id ASC";
    const CREATED_AT: Option<&'static str> = Some("created_at");

    type New = NewGalleryItem;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(GalleryItem {
            id: row.get(0)?,
            image_url: row.get(1)?,
            category: row.get(2)?,
            caption: row.get(3)?,
            tags: db::json_list_column(row, 4)?,
            is_visible: row.get(5)?,
            created_at: db::timestamp_column(row, 6)?,
        })
    }
}

impl Resource for GalleryItem {
    const NAME: &'static str = "gallery item";

    type Patch = GalleryPatch;

    fn parse_new(input: &Value) -> Result<NewGalleryItem, ValidationErrors> {
        let mut f = Fields::new(input);
        let item = NewGalleryItem {
            image_url: f.required("imageUrl", validation::text),
            category: f.required("category", validation::text),
            caption: f.optional("caption", validation::text),
            tags: f.optional("tags", validation::string_list).unwrap_or_default(),
            is_visible: f.optional("isVisible", validation::boolean).unwrap_or(true),
        };
        f.finish(item)
    }

    fn parse_patch(input: &Value) -> Result<GalleryPatch, ValidationErrors> {
        let mut f = Fields::new(input);
        let patch = GalleryPatch {
            image_url: f.patch("imageUrl", validation::text),
            category: f.patch("category", validation::text),
            caption: f.patch_nullable("caption", validation::text),
            tags: f
                .patch_nullable("tags", validation::string_list)
                .map(Option::unwrap_or_default),
            is_visible: f.patch("isVisible", validation::boolean),
        };
        f.finish(patch)
    }

    fn apply(&mut self, patch: GalleryPatch) {
        if let Some(v) = patch.image_url {
            self.image_url = v;
        }
        if let Some(v) = patch.category {
            self.category = v;
        }
        if let Some(v) = patch.caption {
            self.caption = v;
        }
        if let Some(v) = patch.tags {
            self.tags = v;
        }
        if let Some(v) = patch.is_visible {
            self.is_visible = v;
        }
    }
}

impl Published for GalleryItem {
    const PUBLIC_FILTER: &'static str = "is_visible = 1";
}
