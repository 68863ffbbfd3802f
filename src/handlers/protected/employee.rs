// handlers/protected/employee.rs - /employee CRUD

use axum::extract::State;
use tracing::info;

use super::check_status;
use crate::api::{ApiJson, ApiPath, ApiQuery};
use crate::app::AppState;
use crate::database::models::{Employee, EmployeeUpdate, NewEmployee};
use crate::database::{Page, PageQuery};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

pub const EMPLOYEE_NOT_FOUND: &str = "Employee not found";

/// POST /employee - new account with the configured initial password
pub async fn save(
    State(state): State<AppState>,
    ApiJson(employee): ApiJson<NewEmployee>,
) -> ApiResult<Employee> {
    if employee.username.trim().is_empty() || employee.name.trim().is_empty() {
        return Err(ApiError::bad_request("username and name are required"));
    }

    let digest = state.encoder.encode(&state.security.default_password)?;
    let created = state.storage.employees.insert(employee, digest).await?;
    info!("Added employee {} ({})", created.id, created.username);
    Ok(ApiResponse::success(created))
}

/// GET /employee/page?page=1&pageSize=10&name=
pub async fn page(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Page<Employee>> {
    let page = state.storage.employees.page(&query).await?;
    Ok(ApiResponse::success(page))
}

/// PUT /employee - partial update, also used to enable and disable accounts
pub async fn update(
    State(state): State<AppState>,
    ApiJson(changes): ApiJson<EmployeeUpdate>,
) -> ApiResult<()> {
    if let Some(status) = changes.status {
        check_status(status)?;
    }

    let id = changes.id;
    if !state.storage.employees.update(changes).await? {
        return Err(ApiError::not_found(EMPLOYEE_NOT_FOUND));
    }
    info!("Updated employee {}", id);
    Ok(ApiResponse::message("Employee updated"))
}

/// GET /employee/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Employee> {
    state
        .storage
        .employees
        .find_by_id(id)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found(EMPLOYEE_NOT_FOUND))
}
