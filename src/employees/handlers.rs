use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::dto::{EmployeeRequest, FilterQuery};
use super::repo_types::Employee;
use crate::{
    auth::extractors::{AdminUser, AuthUser},
    error::DirectoryError,
    state::AppState,
};

/// Reads need any authenticated employee, writes need `ROLE_ADMIN`.
pub fn employee_routes() -> Router<AppState> {
    Router::new()
        .route("/employees", get(list_employees).post(create_employee))
        .route(
            "/employees/:id",
            get(get_employee)
                .put(update_employee)
                .delete(delete_employee),
        )
}

/// GET /employees?skill_id=&years_of_service=
#[instrument(skip(state, _user))]
pub async fn list_employees(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(q): Query<FilterQuery>,
) -> Result<Json<Vec<Employee>>, DirectoryError> {
    let employees = state
        .directory
        .filter(q.skill_id, q.years_of_service)
        .await?;
    Ok(Json(employees))
}

#[instrument(skip(state, _user))]
pub async fn get_employee(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Employee>, DirectoryError> {
    Ok(Json(state.directory.find_by_id(id).await?))
}

#[instrument(skip(state, admin, payload), fields(by = %admin.0.email))]
pub async fn create_employee(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(payload): Json<EmployeeRequest>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<Employee>), DirectoryError> {
    let employee = state.directory.create(payload.into_command()?).await?;
    let location = format!("/api/v1/employees/{}", employee.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(employee),
    ))
}

#[instrument(skip(state, admin, payload), fields(by = %admin.0.email))]
pub async fn update_employee(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<EmployeeRequest>,
) -> Result<Json<Employee>, DirectoryError> {
    let employee = state.directory.update(id, payload.into_command()?).await?;
    Ok(Json(employee))
}

/// Responds with the employee as it was before deletion.
#[instrument(skip(state, admin), fields(by = %admin.0.email))]
pub async fn delete_employee(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Employee>, DirectoryError> {
    Ok(Json(state.directory.delete(id).await?))
}
