use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use tracing::{instrument, warn};
use uuid::Uuid;

use super::repo_types::{Category, Service};
use crate::{
    error::{AppError, AppResult},
    extract::ApiPath,
    state::AppState,
    store::ServiceCatalog,
};

pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/services", get(list_services))
        .route("/services/:id", get(get_service))
        .route("/services/category/:category", get(list_by_category))
}

#[instrument(skip(state))]
pub async fn list_services(State(state): State<AppState>) -> AppResult<Json<Vec<Service>>> {
    Ok(Json(state.store.list_services(None).await?))
}

#[instrument(skip(state))]
pub async fn get_service(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<Service>> {
    state
        .store
        .find_service(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("service not found"))
}

#[instrument(skip(state))]
pub async fn list_by_category(
    State(state): State<AppState>,
    ApiPath(category): ApiPath<String>,
) -> AppResult<Json<Vec<Service>>> {
    let category: Category = category.parse().map_err(|e: anyhow::Error| {
        warn!(%category, "unknown category");
        AppError::validation(e.to_string())
    })?;
    Ok(Json(state.store.list_services(Some(category)).await?))
}
