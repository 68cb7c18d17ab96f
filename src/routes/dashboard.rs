//! Dashboard routes: aggregated workout statistics for one user.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::services::dashboard::{self, DashboardStats};
use crate::AppState;

/// GET /api/workouts/dashboard/stats/:user_id: aggregated dashboard statistics.
pub async fn stats(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<DashboardStats>>, AppError> {
    current_user.ensure_can_view(user_id)?;
    let stats = dashboard::get_stats(&state.db, user_id).await?;
    Ok(ApiResponse::success(stats))
}
