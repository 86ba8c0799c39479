use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use crate::errors::AppError;
use crate::models::ContentItem;
use crate::services::catalog::{self, Published};
use crate::state::AppState;

// GET /api/services, /api/artists, /api/gallery, /api/testimonials, /api/content
pub async fn list<R: Published>(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<R>>, AppError> {
    let records = {
        let db = state.db()?;
        catalog::list_public::<R>(&db)?
    };
    Ok(Json(records))
}

// GET /api/content/:key
pub async fn content_by_key(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Json<ContentItem>, AppError> {
    let item = {
        let db = state.db()?;
        catalog::content_by_key(&db, &key)?
    };
    Ok(Json(item))
}
