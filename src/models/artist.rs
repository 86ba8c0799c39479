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

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    pub id: i64,
    pub name: String,
    pub specialty: String,
    pub bio: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub is_available: bool,
    pub rating: Decimal,
    pub image_url: Option<String>,
}

/// `rating` is left to the column default.
#[derive(Debug, Clone, PartialEq)]
pub struct NewArtist {
    pub name: String,
    pub specialty: String,
    pub bio: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub is_available: bool,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArtistPatch {
    pub name: Option<String>,
    pub specialty: Option<String>,
    pub bio: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub is_available: Option<bool>,
    pub image_url: Option<Option<String>>,
}

impl ToColumns for NewArtist {
    fn columns(&self) -> Vec<Column> {
        vec![
            ("name", SqlValue::from(self.name.clone())),
            ("specialty", SqlValue::from(self.specialty.clone())),
            ("bio", SqlValue::from(self.bio.clone())),
            ("phone", SqlValue::from(self.phone.clone())),
            ("email", SqlValue::from(self.email.clone())),
            ("is_available", SqlValue::from(self.is_available)),
            ("image_url", SqlValue::from(self.image_url.clone())),
        ]
    }
}

impl ToColumns for Artist {
    fn columns(&self) -> Vec<Column> {
        let mut columns = NewArtist {
            name: self.name.clone(),
            specialty: self.specialty.clone(),
            bio: self.bio.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            is_available: self.is_available,
            image_url: self.image_url.clone(),
        }
        .columns();
        columns.push(("rating", SqlValue::from(self.rating.to_string())));
        columns
    }
}

impl Table for Artist {
    const TABLE: &'static str = "artists";
    const SELECT: &'static str =
        "id, name, specialty, bio, phone, email, is_available, rating, image_url";
    const ORDER_BY: &'static str = "id ASC";

    type New = NewArtist;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Artist {
            id: row.get(0)?,
            name: row.get(1)?,
            specialty: row.get(2)?,
            bio: row.get(3)?,
            phone: row.get(4)?,
            email: row.get(5)?,
            is_available: row.get(6)?,
            rating: db::decimal_column(row, 7)?,
            image_url: row.get(8)?,
        })
    }
}

impl Resource for Artist {
    const NAME: &'static str = "artist";

    type Patch = ArtistPatch;

    fn parse_new(input: &Value) -> Result<NewArtist, ValidationErrors> {
        let mut f = Fields::new(input);
        let artist = NewArtist {
            name: f.required("name", validation::text),
            specialty: f.required("specialty", validation::text),
            bio: f.optional("bio", validation::text),
            phone: f.optional("phone", validation::text),
            email: f.optional("email", validation::email),
            is_available: f.optional("isAvailable", validation::boolean).unwrap_or(true),
            image_url: f.optional("imageUrl", validation::text),
        };
        f.finish(artist)
    }

    fn parse_patch(input: &Value) -> Result<ArtistPatch, ValidationErrors> {
        let mut f = Fields::new(input);
        let patch = ArtistPatch {
            name: f.patch("name", validation::text),
            specialty: f.patch("specialty", validation::text),
            bio: f.patch_nullable("bio", validation::text),
            phone: f.patch_nullable("phone", validation::text),
            email: f.patch_nullable("email", validation::email),
            is_available: f.patch("isAvailable", validation::boolean),
            image_url: f.patch_nullable("imageUrl", validation::text),
        };
        f.finish(patch)
    }

    fn apply(&mut self, patch: ArtistPatch) {
        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.specialty {
            self.specialty = v;
        }
        if let Some(v) = patch.bio {
            self.bio = v;
        }
        if let Some(v) = patch.phone {
            self.phone = v;
        }
        if let Some(v) = patch.email {
            self.email = v;
        }
        if let Some(v) = patch.is_available {
            self.is_available = v;
        }
        if let Some(v) = patch.image_url {
            self.image_url = v;
        }
    }
}

impl Published for Artist {
    const PUBLIC_FILTER: &'static str = "is_available = 1";
}
