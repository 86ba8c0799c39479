//! Admin CRUD endpoints, instantiated once per resource in `routes`.
//!
//! Records are addressed either as `/api/admin/<resource>/:id` or, for
//! PATCH and DELETE, as `/api/admin/<resource>?id=<id>`.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::handlers::check_auth;
use crate::services::crud::{self, Resource};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

pub(crate) fn parse_id<R: Resource>(raw: Option<&str>) -> Result<i64, AppError> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::BadRequest(format!("invalid {} id", R::NAME)))
}

// GET /api/admin/<resource>
pub async fn list<R: Resource>(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<R>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let records = {
        let db = state.db()?;
        crud::list::<R>(&db)?
    };
    Ok(Json(records))
}

// GET /api/admin/<resource>/:id
pub async fn get_one<R: Resource>(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
) -> Result<Json<R>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    let id = parse_id::<R>(Some(&raw_id))?;

    let record = {
        let db = state.db()?;
        crud::get::<R>(&db, id)?
    };
    Ok(Json(record))
}

// POST /api/admin/<resource>
pub async fn create<R: Resource>(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<R>), AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    let Json(body) = payload?;

    let record = {
        let db = state.db()?;
        crud::create::<R>(&db, &body)?
    };
    Ok((StatusCode::CREATED, Json(record)))
}

fn patch_record<R: Resource>(
    state: &AppState,
    id: i64,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<R>, AppError> {
    let Json(body) = payload?;
    let record = {
        let db = state.db()?;
        crud::update::<R>(&db, id, &body)?
    };
    Ok(Json(record))
}

// PATCH /api/admin/<resource>/:id
pub async fn update<R: Resource>(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<R>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    let id = parse_id::<R>(Some(&raw_id))?;
    patch_record(&state, id, payload)
}

// PATCH /api/admin/<resource>?id=<id>
pub async fn update_by_query<R: Resource>(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<IdQuery>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<R>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    let id = parse_id::<R>(query.id.as_deref())?;
    patch_record(&state, id, payload)
}

fn delete_record<R: Resource>(state: &AppState, id: i64) -> Result<Json<Value>, AppError> {
    {
        let db = state.db()?;
        crud::delete::<R>(&db, id)?;
    }
    Ok(Json(serde_json::json!({
        "success": true,
        "message": format!("{} deleted", R::NAME),
    })))
}

// DELETE /api/admin/<resource>/:id
pub async fn delete<R: Resource>(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    let id = parse_id::<R>(Some(&raw_id))?;
    delete_record::<R>(&state, id)
}

// DELETE /api/admin/<resource>?id=<id>
pub async fn delete_by_query<R: Resource>(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<IdQuery>,
) -> Result<Json<Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    let id = parse_id::<R>(query.id.as_deref())?;
    delete_record::<R>(&state, id)
}
