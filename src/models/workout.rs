//! Workout model: a dated training session owned by a single user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A single exercise within a workout, stored in order as JSONB.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct Exercise {
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub sets: Option<i32>,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub reps: Option<i32>,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub weight: Option<f64>,
}

/// Full workout row. Routes address workouts by `workout_id`, never by the storage `id`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Workout {
    pub id: Uuid,
    pub workout_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub exercises: Json<Vec<Exercise>>,
    /// Minutes.
    pub duration: i32,
    pub date: DateTime<Utc>,
    pub completed: bool,
    pub category: String,
    pub calories: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateWorkout {
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub title: String,
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub exercises: Vec<Exercise>,
    #[serde(default)]
    #[validate(range(min = 0, message = "must not be negative"))]
    pub duration: i32,
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed: bool,
    #[validate(length(min = 1, max = 50, message = "must be between 1 and 50 characters"))]
    pub category: String,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub calories: f64,
}

impl CreateWorkout {
    /// Trim text fields so length rules apply to the visible content.
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: self.description.map(|d| d.trim().to_string()),
            category: self.category.trim().to_string(),
            ..self
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct UpdateWorkout {
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub description: Option<String>,
    #[validate(nested)]
    pub exercises: Option<Vec<Exercise>>,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub duration: Option<i32>,
    pub date: Option<DateTime<Utc>>,
    pub completed: Option<bool>,
    #[validate(length(min = 1, max = 50, message = "must be between 1 and 50 characters"))]
    pub category: Option<String>,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub calories: Option<f64>,
}

impl UpdateWorkout {
    /// Trim provided text fields so length rules apply to the visible content.
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.map(|t| t.trim().to_string()),
            description: self.description.map(|d| d.trim().to_string()),
            category: self.category.map(|c| c.trim().to_string()),
            ..self
        }
    }
}
