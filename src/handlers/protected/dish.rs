// handlers/protected/dish.rs - /dish CRUD and sale status

use axum::extract::State;
use tracing::info;

use super::{check_status, IdsQuery};
use crate::api::{ApiJson, ApiPath, ApiQuery};
use crate::app::AppState;
use crate::database::models::{Dish, DishUpdate, NewDish, STATUS_ENABLED};
use crate::database::{Page, PageQuery};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

pub const DISH_NOT_FOUND: &str = "Dish not found";
pub const DISH_ON_SALE: &str = "Dishes on sale cannot be deleted";

async fn ensure_category(state: &AppState, category_id: i64) -> Result<(), ApiError> {
    match state.storage.categories.find_by_id(category_id).await? {
        Some(_) => Ok(()),
        None => Err(ApiError::business(super::category::CATEGORY_NOT_FOUND)),
    }
}

fn check_price(price: i64) -> Result<(), ApiError> {
    if price < 0 {
        return Err(ApiError::bad_request("price must not be negative"));
    }
    Ok(())
}

/// POST /dish
pub async fn save(
    State(state): State<AppState>,
    ApiJson(dish): ApiJson<NewDish>,
) -> ApiResult<Dish> {
    if dish.name.trim().is_empty() {
        return Err(ApiError::bad_request("name is required"));
    }
    check_price(dish.price)?;
    check_status(dish.status)?;
    ensure_category(&state, dish.category_id).await?;

    let created = state.storage.dishes.insert(dish).await?;
    info!("Added dish {} ({})", created.id, created.name);
    Ok(ApiResponse::success(created))
}

/// GET /dish/page?page=1&pageSize=10&name=
pub async fn page(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Page<Dish>> {
    Ok(ApiResponse::success(state.storage.dishes.page(&query).await?))
}

/// GET /dish/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Dish> {
    state
        .storage
        .dishes
        .find_by_id(id)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found(DISH_NOT_FOUND))
}

/// PUT /dish
pub async fn update(
    State(state): State<AppState>,
    ApiJson(changes): ApiJson<DishUpdate>,
) -> ApiResult<()> {
    if let Some(price) = changes.price {
        check_price(price)?;
    }
    if let Some(status) = changes.status {
        check_status(status)?;
    }
    if let Some(category_id) = changes.category_id {
        ensure_category(&state, category_id).await?;
    }

    if !state.storage.dishes.update(changes).await? {
        return Err(ApiError::not_found(DISH_NOT_FOUND));
    }
    Ok(ApiResponse::message("Dish updated"))
}

/// POST /dish/status/:status?ids= - put dishes on or take them off sale
pub async fn set_status(
    State(state): State<AppState>,
    ApiPath(status): ApiPath<i32>,
    ApiQuery(query): ApiQuery<IdsQuery>,
) -> ApiResult<()> {
    check_status(status)?;
    let ids = query.parse()?;

    let changed = state.storage.dishes.set_status(&ids, status).await?;
    if changed == 0 {
        return Err(ApiError::not_found(DISH_NOT_FOUND));
    }
    info!("Set status {} on {} dishes", status, changed);
    Ok(ApiResponse::message("Dish status updated"))
}

/// DELETE /dish?ids= - only dishes that are off sale
pub async fn delete(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<IdsQuery>,
) -> ApiResult<()> {
    let ids = query.parse()?;

    for &id in &ids {
        if let Some(dish) = state.storage.dishes.find_by_id(id).await? {
            if dish.status == STATUS_ENABLED {
                return Err(ApiError::business(DISH_ON_SALE));
            }
        }
    }

    let deleted = state.storage.dishes.delete(&ids).await?;
    info!("Deleted {} dishes", deleted);
    Ok(ApiResponse::message("Dish deleted"))
}
