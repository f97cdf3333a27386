//! User management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::{User, UserStatus};
use crate::infrastructure::user::{CreateUserRequest, UpdateUserRequest};

/// Request to create a new user
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserApiRequest {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Request to create a batch of users
#[derive(Debug, Clone, Deserialize)]
pub struct BulkCreateUsersRequest {
    pub users: Vec<CreateUserApiRequest>,
}

/// Request to partially update a user
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserApiRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub status: Option<String>,
}

/// Request to change a user's status
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusApiRequest {
    pub status: String,
}

/// Query parameters for listing users
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListUsersQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub status: Option<String>,
}

/// User representation returned by the API
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub status: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().unwrap_or_default(),
            username: user.username().to_string(),
            email: user.email().to_string(),
            status: user.status().as_str().to_string(),
        }
    }
}

/// List users response
#[derive(Debug, Clone, Serialize)]
pub struct ListUsersResponse {
    pub users: Vec<UserResponse>,
    pub total: usize,
}

fn parse_status(raw: &str) -> Result<UserStatus, ApiError> {
    raw.parse::<UserStatus>()
        .map_err(|e| ApiError::bad_request(e.to_string()).with_param("status"))
}

fn parse_page_bounds(query: &ListUsersQuery) -> Result<(Option<i64>, Option<i64>), ApiError> {
    if query.limit.is_some_and(|limit| limit < 0) {
        return Err(ApiError::bad_request("limit must be non-negative").with_param("limit"));
    }
    if query.offset.is_some_and(|offset| offset < 0) {
        return Err(ApiError::bad_request("offset must be non-negative").with_param("offset"));
    }

    Ok((query.limit, query.offset))
}

fn into_service_request(request: CreateUserApiRequest) -> Result<CreateUserRequest, ApiError> {
    let status = match &request.status {
        Some(raw) => parse_status(raw)?,
        None => UserStatus::default(),
    };

    Ok(CreateUserRequest {
        username: request.username,
        email: request.email,
        status,
    })
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserApiRequest>,
) -> Result<impl IntoResponse, ApiError> {
    debug!(username = %request.username, "Creating user");

    let service_request = into_service_request(request)?;
    let user = state.user_service.create(service_request).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// POST /users/bulk
pub async fn bulk_create_users(
    State(state): State<AppState>,
    Json(request): Json<BulkCreateUsersRequest>,
) -> Result<impl IntoResponse, ApiError> {
    debug!(count = request.users.len(), "Creating users in bulk");

    let service_requests = request
        .users
        .into_iter()
        .map(into_service_request)
        .collect::<Result<Vec<_>, _>>()?;

    let users = state.user_service.bulk_create(service_requests).await?;
    let responses: Vec<UserResponse> = users.iter().map(UserResponse::from).collect();
    let total = responses.len();

    Ok((
        StatusCode::CREATED,
        Json(ListUsersResponse {
            users: responses,
            total,
        }),
    ))
}

/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<ListUsersResponse>, ApiError> {
    let (limit, offset) = parse_page_bounds(&query)?;

    let users = match &query.status {
        Some(raw) => {
            let status = parse_status(raw)?;
            state.user_service.list_by_status(status, limit).await?
        }
        None => state.user_service.list(limit, offset).await?,
    };

    let responses: Vec<UserResponse> = users.iter().map(UserResponse::from).collect();
    let total = responses.len();

    Ok(Json(ListUsersResponse {
        users: responses,
        total,
    }))
}

/// GET /users/count
pub async fn count_users(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let total = state.user_service.count().await?;

    Ok(Json(serde_json::json!({ "total": total })))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .user_service
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User with id {} not found", id)))?;

    Ok(Json(UserResponse::from(&user)))
}

/// GET /users/by-username/{username}
pub async fn get_user_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .user_service
        .get_by_username(&username)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User '{}' not found", username)))?;

    Ok(Json(UserResponse::from(&user)))
}

/// PATCH /users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateUserApiRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    debug!(id, "Updating user");

    let status = match &request.status {
        Some(raw) => Some(parse_status(raw)?),
        None => None,
    };

    let service_request = UpdateUserRequest {
        username: request.username,
        email: request.email,
        status,
    };

    let user = state
        .user_service
        .update_partial(id, service_request)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User with id {} not found", id)))?;

    Ok(Json(UserResponse::from(&user)))
}

/// PATCH /users/{id}/status
pub async fn update_user_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateStatusApiRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    debug!(id, status = %request.status, "Updating user status");

    let status = parse_status(&request.status)?;

    let user = state
        .user_service
        .update_status(id, status)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User with id {} not found", id)))?;

    Ok(Json(UserResponse::from(&user)))
}

/// DELETE /users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    debug!(id, "Deleting user");

    if !state.user_service.delete(id).await? {
        return Err(ApiError::not_found(format!("User with id {} not found", id)));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /users/{id}/soft
pub async fn soft_delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    debug!(id, "Soft-deleting user");

    let user = state
        .user_service
        .soft_delete(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User with id {} not found", id)))?;

    Ok(Json(UserResponse::from(&user)))
}
