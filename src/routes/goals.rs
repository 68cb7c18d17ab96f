//! Goal routes: create, list, read, re-submit, delete.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::models::goal::{Goal, GoalInput};
use crate::services::goal as goal_service;
use crate::AppState;

/// POST /api/goals
pub async fn create(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(body): Json<GoalInput>,
) -> Result<(StatusCode, Json<ApiResponse<Goal>>), AppError> {
    let body = body.normalized();
    body.validate()?;

    let goal = goal_service::create(&state.db, current_user.id, &body).await?;
    Ok((StatusCode::CREATED, ApiResponse::success(goal)))
}

/// GET /api/goals: the caller's goals.
pub async fn list_mine(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<ApiResponse<Vec<Goal>>>, AppError> {
    let goals = goal_service::list_by_user(&state.db, current_user.id).await?;
    Ok(ApiResponse::success(goals))
}

/// GET /api/goals/user/:user_id
pub async fn list_for_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Goal>>>, AppError> {
    current_user.ensure_can_view(user_id)?;
    let goals = goal_service::list_by_user(&state.db, user_id).await?;
    Ok(ApiResponse::success(goals))
}

/// GET /api/goals/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Goal>>, AppError> {
    let goal = goal_service::find_by_id(&state.db, id).await?;
    current_user.ensure_can_view(goal.user_id)?;
    Ok(ApiResponse::success(goal))
}

/// PUT /api/goals/:id: owner only.
pub async fn update(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<GoalInput>,
) -> Result<Json<ApiResponse<Goal>>, AppError> {
    let body = body.normalized();
    body.validate()?;

    let goal = goal_service::update(&state.db, &current_user, id, &body).await?;
    Ok(ApiResponse::success(goal))
}

/// DELETE /api/goals/:id: owner only.
pub async fn delete(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<&'static str>>, AppError> {
    goal_service::delete(&state.db, &current_user, id).await?;
    Ok(ApiResponse::success("Goal deleted successfully"))
}
