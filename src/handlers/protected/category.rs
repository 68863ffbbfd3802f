// handlers/protected/category.rs - /category CRUD

use axum::extract::State;
use serde::Deserialize;
use tracing::info;

use super::IdsQuery;
use crate::api::{ApiJson, ApiQuery};
use crate::app::AppState;
use crate::database::models::{Category, CategoryUpdate, NewCategory};
use crate::database::{Page, PageQuery};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

pub const CATEGORY_NOT_FOUND: &str = "Category not found";
pub const CATEGORY_HAS_DISHES: &str = "Category still has dishes and cannot be deleted";

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "type")]
    pub category_type: Option<i32>,
}

/// POST /category
pub async fn save(
    State(state): State<AppState>,
    ApiJson(category): ApiJson<NewCategory>,
) -> ApiResult<Category> {
    if category.name.trim().is_empty() {
        return Err(ApiError::bad_request("name is required"));
    }
    let created = state.storage.categories.insert(category).await?;
    info!("Added category {} ({})", created.id, created.name);
    Ok(ApiResponse::success(created))
}

/// GET /category/page?page=1&pageSize=10
pub async fn page(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Page<Category>> {
    Ok(ApiResponse::success(state.storage.categories.page(&query).await?))
}

/// PUT /category
pub async fn update(
    State(state): State<AppState>,
    ApiJson(changes): ApiJson<CategoryUpdate>,
) -> ApiResult<()> {
    if !state.storage.categories.update(changes).await? {
        return Err(ApiError::not_found(CATEGORY_NOT_FOUND));
    }
    Ok(ApiResponse::message("Category updated"))
}

/// DELETE /category?ids=
///
/// Refuses while any dish still points at the category. Checks every id
/// before deleting any of them.
pub async fn delete(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<IdsQuery>,
) -> ApiResult<()> {
    let ids = query.parse()?;

    for &id in &ids {
        if state.storage.categories.find_by_id(id).await?.is_none() {
            return Err(ApiError::not_found(CATEGORY_NOT_FOUND));
        }
        if state.storage.dishes.count_by_category(id).await? > 0 {
            return Err(ApiError::business(CATEGORY_HAS_DISHES));
        }
    }

    for &id in &ids {
        state.storage.categories.delete(id).await?;
    }
    info!("Deleted categories {:?}", ids);
    Ok(ApiResponse::message("Category deleted"))
}

/// GET /category/list?type=1 - everything for dropdowns, unpaged
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Vec<Category>> {
    Ok(ApiResponse::success(state.storage.categories.list(query.category_type).await?))
}
