use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use cafeteria_db::Meal;
use serde_json::{json, Value};
use tracing::info;

use crate::auth::WriteAuth;
use crate::error::AppError;
use crate::query::{parse_meal_query, MealQueryParams};
use crate::state::AppState;
use crate::types::ScrapeResult;
use crate::validation::{
    parse_meal_create_payload, parse_meal_scrape_payload, parse_meal_update_payload,
};

fn meal_id(raw: &str) -> Result<&str, AppError> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(AppError::invalid_query("`mealId` is required."));
    }
    Ok(id)
}

fn json_body(body: &Bytes) -> Result<Value, AppError> {
    serde_json::from_slice(body).map_err(|_| AppError::invalid_query("Invalid JSON body."))
}

pub async fn list_meals(
    State(state): State<AppState>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Vec<Meal>>, AppError> {
    let Query(pairs) = pairs.map_err(|e| AppError::invalid_query(e.body_text()))?;
    let query = parse_meal_query(&MealQueryParams::from_pairs(pairs))?;
    let meals = state.service.get_meals_by_query(&query).await?;
    Ok(Json(Vec::clone(&meals)))
}

pub async fn get_meal(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Meal>, AppError> {
    let id = meal_id(&raw_id)?;
    state
        .service
        .get_meal_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(AppError::meal_not_found)
}

pub async fn create_meal(
    _auth: WriteAuth,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let payload = parse_meal_create_payload(&json_body(&body)?)?;
    let meal = state.service.create_meal_entry(payload).await?;
    Ok((StatusCode::CREATED, Json(meal)))
}

pub async fn update_meal(
    _auth: WriteAuth,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Json<Meal>, AppError> {
    let id = meal_id(&raw_id)?;
    let payload = parse_meal_update_payload(&json_body(&body)?)?;
    state
        .service
        .update_meal_entry(id, payload)
        .await?
        .map(Json)
        .ok_or_else(AppError::meal_not_found)
}

pub async fn delete_meal(
    _auth: WriteAuth,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = meal_id(&raw_id)?;
    if !state.service.delete_meal_entry(id).await? {
        return Err(AppError::meal_not_found());
    }
    info!(id = %id, "Deleted meal");
    Ok(Json(json!({ "success": true })))
}

pub async fn scrape_meals(
    _auth: WriteAuth,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<ScrapeResult>), AppError> {
    let request = parse_meal_scrape_payload(&json_body(&body)?)?;
    let result = state.service.scrape_and_save(request).await?;
    Ok((StatusCode::CREATED, Json(result)))
}
