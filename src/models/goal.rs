//! Goal model: free-text fitness goal with a 0–100 progress percentage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub goal: String,
    pub progress: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body for both creating and re-submitting a goal.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GoalInput {
    #[validate(length(min = 3, max = 255, message = "must be between 3 and 255 characters"))]
    pub goal: String,
    #[validate(range(min = 0.0, max = 100.0, message = "must be between 0 and 100"))]
    pub progress: f64,
}

impl GoalInput {
    pub fn normalized(self) -> Self {
        Self {
            goal: self.goal.trim().to_string(),
            progress: self.progress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(goal: &str, progress: f64) -> GoalInput {
        GoalInput {
            goal: goal.to_string(),
            progress,
        }
        .normalized()
    }

    #[test]
    fn goal_length_is_checked_after_trim() {
        assert!(input("Run 5k", 10.0).validate().is_ok());
        assert!(input("  ab  ", 10.0).validate().is_err());
        assert!(input(&"x".repeat(255), 10.0).validate().is_ok());
        assert!(input(&"x".repeat(256), 10.0).validate().is_err());
    }

    #[test]
    fn progress_bounds() {
        assert!(input("Bench 100kg", 0.0).validate().is_ok());
        assert!(input("Bench 100kg", 100.0).validate().is_ok());
        assert!(input("Bench 100kg", -0.1).validate().is_err());
        assert!(input("Bench 100kg", 100.5).validate().is_err());
    }

    #[test]
    fn missing_progress_is_rejected_by_serde() {
        let parsed: Result<GoalInput, _> =
            serde_json::from_value(serde_json::json!({ "goal": "Swim 1km" }));
        assert!(parsed.is_err());
    }
}
