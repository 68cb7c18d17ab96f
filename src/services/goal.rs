//! Goal service: per-user CRUD with ownership checks on mutation.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::middleware::auth::CurrentUser;
use crate::models::goal::{Goal, GoalInput};

/// Create a goal for `user_id`.
pub async fn create(pool: &PgPool, user_id: Uuid, input: &GoalInput) -> Result<Goal, AppError> {
    let goal = sqlx::query_as::<_, Goal>(
        "INSERT INTO goals (user_id, goal, progress) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(user_id)
    .bind(&input.goal)
    .bind(input.progress)
    .fetch_one(pool)
    .await?;
    Ok(goal)
}

/// All goals of a user, newest first.
pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Goal>, AppError> {
    let goals = sqlx::query_as::<_, Goal>(
        "SELECT * FROM goals WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(goals)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Goal, AppError> {
    sqlx::query_as::<_, Goal>("SELECT * FROM goals WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Goal not found".to_string()))
}

/// Replace a goal's text and progress. Only the owner may update.
pub async fn update(
    pool: &PgPool,
    actor: &CurrentUser,
    id: Uuid,
    input: &GoalInput,
) -> Result<Goal, AppError> {
    let existing = find_by_id(pool, id).await?;
    actor.ensure_owner(existing.user_id)?;

    let goal = sqlx::query_as::<_, Goal>(
        "UPDATE goals SET goal = $2, progress = $3, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&input.goal)
    .bind(input.progress)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Goal not found".to_string()))?;
    Ok(goal)
}

/// Delete a goal. Only the owner may delete.
pub async fn delete(pool: &PgPool, actor: &CurrentUser, id: Uuid) -> Result<(), AppError> {
    let existing = find_by_id(pool, id).await?;
    actor.ensure_owner(existing.user_id)?;

    sqlx::query("DELETE FROM goals WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
