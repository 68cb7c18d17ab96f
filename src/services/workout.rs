//! Workout service: CRUD scoped by `workout_id`, per-user listings, and completion.
//!
//! Ownership is enforced on update and complete. Delete only requires the
//! workout to exist.

use chrono::Utc;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::middleware::auth::CurrentUser;
use crate::models::workout::{CreateWorkout, UpdateWorkout, Workout};

fn not_found() -> AppError {
    AppError::NotFound("Workout not found".to_string())
}

/// Create a workout owned by `user_id` with a freshly generated `workout_id`.
pub async fn create(
    pool: &PgPool,
    user_id: Uuid,
    input: &CreateWorkout,
) -> Result<Workout, AppError> {
    let workout = sqlx::query_as::<_, Workout>(
        r#"
        INSERT INTO workouts (workout_id, user_id, title, description, exercises,
            duration, date, completed, category, calories)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&input.title)
    .bind(&input.description)
    .bind(Json(&input.exercises))
    .bind(input.duration)
    .bind(input.date.unwrap_or_else(Utc::now))
    .bind(input.completed)
    .bind(&input.category)
    .bind(input.calories)
    .fetch_one(pool)
    .await?;

    tracing::info!(workout_id = %workout.workout_id, %user_id, "Workout created");
    Ok(workout)
}

/// All workouts of a user, most recent first.
pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Workout>, AppError> {
    let workouts = sqlx::query_as::<_, Workout>(
        "SELECT * FROM workouts WHERE user_id = $1 ORDER BY date DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(workouts)
}

/// Workouts of a user in one category, most recent first.
pub async fn list_by_category(
    pool: &PgPool,
    user_id: Uuid,
    category: &str,
) -> Result<Vec<Workout>, AppError> {
    let workouts = sqlx::query_as::<_, Workout>(
        "SELECT * FROM workouts WHERE user_id = $1 AND category = $2 ORDER BY date DESC",
    )
    .bind(user_id)
    .bind(category)
    .fetch_all(pool)
    .await?;
    Ok(workouts)
}

/// Find a workout by its public identifier.
pub async fn find_by_workout_id(pool: &PgPool, workout_id: Uuid) -> Result<Workout, AppError> {
    sqlx::query_as::<_, Workout>("SELECT * FROM workouts WHERE workout_id = $1")
        .bind(workout_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(not_found)
}

/// Update workout fields. Only the owner may update.
///
/// The input is expected to be normalized and validated by the caller.
pub async fn update(
    pool: &PgPool,
    actor: &CurrentUser,
    workout_id: Uuid,
    input: &UpdateWorkout,
) -> Result<Workout, AppError> {
    let existing = find_by_workout_id(pool, workout_id).await?;
    actor.ensure_owner(existing.user_id)?;

    let workout = sqlx::query_as::<_, Workout>(
        r#"
        UPDATE workouts SET
            title = COALESCE($2, title),
            description = COALESCE($3, description),
            exercises = COALESCE($4, exercises),
            duration = COALESCE($5, duration),
            date = COALESCE($6, date),
            completed = COALESCE($7, completed),
            category = COALESCE($8, category),
            calories = COALESCE($9, calories),
            updated_at = NOW()
        WHERE workout_id = $1
        RETURNING *
        "#,
    )
    .bind(workout_id)
    .bind(&input.title)
    .bind(&input.description)
    .bind(input.exercises.as_ref().map(Json))
    .bind(input.duration)
    .bind(input.date)
    .bind(input.completed)
    .bind(&input.category)
    .bind(input.calories)
    .fetch_optional(pool)
    .await?
    .ok_or_else(not_found)?;

    Ok(workout)
}

/// Mark a workout completed. Only the owner may complete.
pub async fn complete(
    pool: &PgPool,
    actor: &CurrentUser,
    workout_id: Uuid,
) -> Result<Workout, AppError> {
    let existing = find_by_workout_id(pool, workout_id).await?;
    actor.ensure_owner(existing.user_id)?;

    let workout = sqlx::query_as::<_, Workout>(
        "UPDATE workouts SET completed = TRUE, updated_at = NOW() \
         WHERE workout_id = $1 RETURNING *",
    )
    .bind(workout_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(not_found)?;

    tracing::info!(%workout_id, user_id = %actor.id, "Workout completed");
    Ok(workout)
}

/// Delete a workout.
///
/// Ownership is not checked here: any authenticated caller can delete any
/// existing workout, unlike [`update`] and [`complete`].
pub async fn delete(pool: &PgPool, actor: &CurrentUser, workout_id: Uuid) -> Result<(), AppError> {
    let existing = find_by_workout_id(pool, workout_id).await?;
    if existing.user_id != actor.id {
        tracing::warn!(
            %workout_id,
            owner_id = %existing.user_id,
            actor_id = %actor.id,
            "Workout deleted by non-owner"
        );
    }

    sqlx::query("DELETE FROM workouts WHERE workout_id = $1")
        .bind(workout_id)
        .execute(pool)
        .await?;
    Ok(())
}
