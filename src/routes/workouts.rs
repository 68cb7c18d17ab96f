//! Workout routes: CRUD by `workout_id`, per-user and per-category listings, completion.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::models::workout::{CreateWorkout, UpdateWorkout, Workout};
use crate::services::workout as workout_service;
use crate::AppState;

/// POST /api/workouts: create a workout owned by the caller.
pub async fn create(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(body): Json<CreateWorkout>,
) -> Result<(StatusCode, Json<ApiResponse<Workout>>), AppError> {
    let body = body.normalized();
    body.validate()?;

    let workout = workout_service::create(&state.db, current_user.id, &body).await?;
    Ok((StatusCode::CREATED, ApiResponse::success(workout)))
}

/// GET /api/workouts/user/:user_id: a user's workouts, newest first.
pub async fn list_by_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Workout>>>, AppError> {
    current_user.ensure_can_view(user_id)?;
    let workouts = workout_service::list_by_user(&state.db, user_id).await?;
    Ok(ApiResponse::success(workouts))
}

/// GET /api/workouts/category/:category/user/:user_id
pub async fn list_by_category(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path((category, user_id)): Path<(String, Uuid)>,
) -> Result<Json<ApiResponse<Vec<Workout>>>, AppError> {
    current_user.ensure_can_view(user_id)?;
    let workouts = workout_service::list_by_category(&state.db, user_id, &category).await?;
    Ok(ApiResponse::success(workouts))
}

/// GET /api/workouts/:workout_id
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(workout_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Workout>>, AppError> {
    let workout = workout_service::find_by_workout_id(&state.db, workout_id).await?;
    Ok(ApiResponse::success(workout))
}

/// PUT /api/workouts/:workout_id: owner only.
pub async fn update(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(workout_id): Path<Uuid>,
    Json(body): Json<UpdateWorkout>,
) -> Result<Json<ApiResponse<Workout>>, AppError> {
    let body = body.normalized();
    body.validate()?;
    let workout = workout_service::update(&state.db, &current_user, workout_id, &body).await?;
    Ok(ApiResponse::success(workout))
}

/// PATCH /api/workouts/:workout_id/complete: owner only.
pub async fn complete(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(workout_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Workout>>, AppError> {
    let workout = workout_service::complete(&state.db, &current_user, workout_id).await?;
    Ok(ApiResponse::success(workout))
}

/// DELETE /api/workouts/:workout_id
pub async fn delete(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(workout_id): Path<Uuid>,
) -> Result<Json<ApiResponse<&'static str>>, AppError> {
    workout_service::delete(&state.db, &current_user, workout_id).await?;
    Ok(ApiResponse::success("Workout deleted successfully"))
}
