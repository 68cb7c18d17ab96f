//! Seed script for development: populates a fresh database with sample data.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires `DATABASE_URL` (reads .env).

use chrono::{Duration, Utc};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

const ADMIN_PASSWORD: &str = "Admin123!";
const DEMO_PASSWORD: &str = "demo123";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL")?;
    let pool = fittrack::db::create_pool(&db_url, 5).await?;

    fittrack::db::run_migrations(&pool).await?;

    println!("=== FitTrack Seed Script ===");

    upsert_user(&pool, "admin@fittrack.local", "admin", ADMIN_PASSWORD, true).await?;
    let demo_id = upsert_user(&pool, "demo@fittrack.local", "demo", DEMO_PASSWORD, false).await?;
    seed_workouts(&pool, demo_id).await?;
    seed_goals(&pool, demo_id).await?;

    println!("\n=== Seed complete! ===");
    println!("Admin login: admin@fittrack.local / {ADMIN_PASSWORD}");
    println!("Demo login:  demo@fittrack.local / {DEMO_PASSWORD}");

    Ok(())
}

/// Create the user, or reset its password when it already exists.
async fn upsert_user(
    pool: &PgPool,
    email: &str,
    username: &str,
    password: &str,
    is_admin: bool,
) -> anyhow::Result<Uuid> {
    let hash = fittrack::services::auth::hash_password(password)?;

    let id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO users (email, username, password_hash, is_verified, is_admin)
        VALUES ($1, $2, $3, TRUE, $4)
        ON CONFLICT (email) DO UPDATE
            SET password_hash = EXCLUDED.password_hash, is_admin = EXCLUDED.is_admin,
                updated_at = NOW()
        RETURNING id
        "#,
    )
    .bind(email)
    .bind(username)
    .bind(&hash)
    .bind(is_admin)
    .fetch_one(pool)
    .await?;

    println!("[done] User {username} ({id})");
    Ok(id)
}

async fn seed_workouts(pool: &PgPool, user_id: Uuid) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM workouts WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    if count > 0 {
        println!("[skip] Workouts already exist ({count})");
        return Ok(());
    }

    // (days ago, title, category, minutes, calories, completed)
    let workouts = [
        (0, "Morning run", "Cardio", 35, 380.0, true),
        (1, "Upper body", "Strength", 50, 320.0, true),
        (2, "Yoga flow", "Flexibility", 40, 150.0, true),
        (4, "Intervals", "HIIT", 25, 410.0, true),
        (5, "Leg day", "Strength", 55, 360.0, false),
        (8, "Long ride", "Cardio", 90, 820.0, true),
        (10, "Full body", "Strength", 45, 300.0, true),
        (13, "Recovery swim", "Cardio", 30, 250.0, false),
    ];

    let now = Utc::now();
    for (days_ago, title, category, duration, calories, completed) in workouts {
        let exercises = match category {
            "Strength" => json!([
                {"name": "Squat", "sets": 4, "reps": 8, "weight": 80.0},
                {"name": "Bench press", "sets": 4, "reps": 8, "weight": 60.0}
            ]),
            "HIIT" => json!([{"name": "Burpees", "sets": 5, "reps": 15, "weight": 0.0}]),
            _ => json!([]),
        };

        sqlx::query(
            r#"
            INSERT INTO workouts (workout_id, user_id, title, description, exercises,
                duration, date, completed, category, calories)
            VALUES ($1, $2, $3, NULL, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(title)
        .bind(exercises)
        .bind(duration)
        .bind(now - Duration::days(days_ago))
        .bind(completed)
        .bind(category)
        .bind(calories)
        .execute(pool)
        .await?;
    }

    println!("[done] Created {} sample workouts", workouts.len());
    Ok(())
}

async fn seed_goals(pool: &PgPool, user_id: Uuid) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM goals WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    if count > 0 {
        println!("[skip] Goals already exist ({count})");
        return Ok(());
    }

    let goals = [
        ("Run a half marathon", 40.0),
        ("Bench press bodyweight", 65.0),
        ("Stretch every day for a month", 20.0),
    ];

    for (goal, progress) in goals {
        sqlx::query("INSERT INTO goals (user_id, goal, progress) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(goal)
            .bind(progress)
            .execute(pool)
            .await?;
    }

    println!("[done] Created {} sample goals", goals.len());
    Ok(())
}
