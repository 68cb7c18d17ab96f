//! Dashboard statistics: totals, category split, streak, and weekly progress.
//!
//! Calendar days for the streak and the calories chart are UTC dates. The
//! weekly window starts at local midnight on the most recent Sunday.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::workout::Workout;

/// Completed workouts per week that count as 100% workout progress.
pub const WEEKLY_WORKOUT_TARGET: f64 = 5.0;

/// Calories per week that count as 100% calorie progress.
pub const WEEKLY_CALORIE_TARGET: f64 = 2500.0;

/// Length of the calories-over-time window, today included.
pub const CALORIE_WINDOW_DAYS: i64 = 7;

const RECENT_WORKOUTS_LIMIT: i64 = 5;

/// Aggregated statistics for a user's dashboard.
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_workouts: i64,
    pub completed_workouts: i64,
    pub total_calories: f64,
    pub category_distribution: Vec<CategoryCount>,
    pub recent_workouts: Vec<Workout>,
    pub current_streak: u32,
    pub calories_over_time: Vec<DailyCalories>,
    pub best_workout: Option<Workout>,
    pub weekly_progress: WeeklyProgress,
}

/// Workout count for a single category.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, PartialEq)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

/// Calories burned on one calendar day.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DailyCalories {
    pub date: NaiveDate,
    pub calories: f64,
}

/// Progress toward the weekly targets, each capped at 100.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WeeklyProgress {
    pub workouts_completed: i64,
    pub calories_burned: f64,
    pub workout_progress: f64,
    pub calorie_progress: f64,
    /// Mean of the two components, one decimal place.
    pub total_progress: String,
}

/// Intermediate row for the dated calorie query.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DatedCalories {
    pub date: DateTime<Utc>,
    pub calories: f64,
}

/// Intermediate row for the weekly totals query.
#[derive(Debug, sqlx::FromRow)]
struct WeeklyRow {
    workouts: i64,
    calories: f64,
}

/// Fetch all dashboard statistics for one user in parallel queries.
pub async fn get_stats(pool: &PgPool, user_id: Uuid) -> Result<DashboardStats, AppError> {
    let now = Utc::now();
    let today = now.date_naive();
    let window_start = window_start(today)?;
    let week_start = week_start(&Local::now())
        .ok_or_else(|| AppError::Internal("Could not resolve start of week".to_string()))?
        .with_timezone(&Utc);

    let (
        completed_workouts,
        total_calories,
        category_distribution,
        recent_workouts,
        completed_days,
        recent_calories,
        best_workout,
        weekly,
    ) = tokio::try_join!(
        fetch_completed_count(pool, user_id),
        fetch_total_calories(pool, user_id),
        fetch_category_distribution(pool, user_id),
        fetch_recent_workouts(pool, user_id),
        fetch_completed_days(pool, user_id),
        fetch_completed_calories_since(pool, user_id, window_start, now),
        fetch_best_workout(pool, user_id),
        fetch_weekly_totals(pool, user_id, week_start, now),
    )?;

    Ok(DashboardStats {
        total_workouts: category_distribution.iter().map(|c| c.count).sum(),
        completed_workouts,
        total_calories,
        category_distribution,
        recent_workouts,
        current_streak: current_streak(&completed_days, today),
        calories_over_time: calories_by_day(&recent_calories, today),
        best_workout,
        weekly_progress: weekly_progress(weekly.workouts, weekly.calories),
    })
}

/// Count consecutive active days ending today, or yesterday if today has no
/// completed workout. The walk stops at the first missing day.
///
/// `days_desc` must be sorted descending; repeated days are tolerated.
pub fn current_streak(days_desc: &[NaiveDate], today: NaiveDate) -> u32 {
    let mut expected = if days_desc.contains(&today) {
        today
    } else {
        today - Duration::days(1)
    };

    let mut streak = 0;
    for &day in days_desc {
        if day > expected {
            continue;
        }
        if day < expected {
            break;
        }
        streak += 1;
        expected -= Duration::days(1);
    }
    streak
}

/// Sum calories per calendar day within the trailing window ending `today`,
/// ascending by date. Rows outside the window are ignored.
pub fn calories_by_day(rows: &[DatedCalories], today: NaiveDate) -> Vec<DailyCalories> {
    let first_day = today - Duration::days(CALORIE_WINDOW_DAYS - 1);
    let mut buckets: BTreeMap<NaiveDate, f64> = BTreeMap::new();

    for row in rows {
        let day = row.date.date_naive();
        if day < first_day || day > today {
            continue;
        }
        *buckets.entry(day).or_insert(0.0) += row.calories;
    }

    buckets
        .into_iter()
        .map(|(date, calories)| DailyCalories { date, calories })
        .collect()
}

/// Compute weekly progress percentages against the fixed targets.
pub fn weekly_progress(workouts_completed: i64, calories_burned: f64) -> WeeklyProgress {
    let workout_progress =
        (workouts_completed as f64 * 100.0 / WEEKLY_WORKOUT_TARGET).clamp(0.0, 100.0);
    let calorie_progress = (calories_burned * 100.0 / WEEKLY_CALORIE_TARGET).clamp(0.0, 100.0);
    let total = ((workout_progress + calorie_progress) / 2.0).min(100.0);

    WeeklyProgress {
        workouts_completed,
        calories_burned,
        workout_progress,
        calorie_progress,
        total_progress: format!("{total:.1}"),
    }
}

/// Midnight at the start of the week (Sunday) containing `now`, in `now`'s zone.
///
/// Returns `None` when that midnight does not exist locally (DST gap).
pub fn week_start<Tz: TimeZone>(now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    let days_since_sunday = i64::from(now.weekday().num_days_from_sunday());
    let sunday = now.date_naive() - Duration::days(days_since_sunday);
    let midnight = sunday.and_hms_opt(0, 0, 0)?;
    now.timezone().from_local_datetime(&midnight).earliest()
}

/// Start of the first UTC day in the calories window.
fn window_start(today: NaiveDate) -> Result<DateTime<Utc>, AppError> {
    (today - Duration::days(CALORIE_WINDOW_DAYS - 1))
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
        .ok_or_else(|| AppError::Internal("Invalid calorie window start".to_string()))
}

async fn fetch_completed_count(pool: &PgPool, user_id: Uuid) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM workouts WHERE user_id = $1 AND completed = TRUE",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

async fn fetch_total_calories(pool: &PgPool, user_id: Uuid) -> Result<f64, AppError> {
    let total = sqlx::query_scalar::<_, f64>(
        "SELECT COALESCE(SUM(calories), 0)::DOUBLE PRECISION \
         FROM workouts WHERE user_id = $1 AND completed = TRUE",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(total)
}

/// Count every workout of the user grouped by category, completed or not.
async fn fetch_category_distribution(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<CategoryCount>, AppError> {
    let rows = sqlx::query_as::<_, CategoryCount>(
        r#"
        SELECT category, COUNT(*) AS count
        FROM workouts
        WHERE user_id = $1
        GROUP BY category
        ORDER BY count DESC, category ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

async fn fetch_recent_workouts(pool: &PgPool, user_id: Uuid) -> Result<Vec<Workout>, AppError> {
    let rows = sqlx::query_as::<_, Workout>(
        "SELECT * FROM workouts WHERE user_id = $1 ORDER BY date DESC LIMIT $2",
    )
    .bind(user_id)
    .bind(RECENT_WORKOUTS_LIMIT)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Distinct UTC calendar days with a completed workout, most recent first.
async fn fetch_completed_days(pool: &PgPool, user_id: Uuid) -> Result<Vec<NaiveDate>, AppError> {
    let rows = sqlx::query_scalar::<_, NaiveDate>(
        r#"
        SELECT DISTINCT (date AT TIME ZONE 'UTC')::date AS day
        FROM workouts
        WHERE user_id = $1 AND completed = TRUE
        ORDER BY day DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

async fn fetch_completed_calories_since(
    pool: &PgPool,
    user_id: Uuid,
    since: DateTime<Utc>,
    until: DateTime<Utc>,
) -> Result<Vec<DatedCalories>, AppError> {
    let rows = sqlx::query_as::<_, DatedCalories>(
        r#"
        SELECT date, calories
        FROM workouts
        WHERE user_id = $1 AND completed = TRUE AND date >= $2 AND date <= $3
        ORDER BY date ASC
        "#,
    )
    .bind(user_id)
    .bind(since)
    .bind(until)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Highest-calorie completed workout; ties go to the most recent.
async fn fetch_best_workout(pool: &PgPool, user_id: Uuid) -> Result<Option<Workout>, AppError> {
    let row = sqlx::query_as::<_, Workout>(
        r#"
        SELECT * FROM workouts
        WHERE user_id = $1 AND completed = TRUE
        ORDER BY calories DESC, date DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

async fn fetch_weekly_totals(
    pool: &PgPool,
    user_id: Uuid,
    since: DateTime<Utc>,
    until: DateTime<Utc>,
) -> Result<WeeklyRow, AppError> {
    let row = sqlx::query_as::<_, WeeklyRow>(
        r#"
        SELECT
            COUNT(*) AS workouts,
            COALESCE(SUM(calories), 0)::DOUBLE PRECISION AS calories
        FROM workouts
        WHERE user_id = $1 AND completed = TRUE AND date >= $2 AND date <= $3
        "#,
    )
    .bind(user_id)
    .bind(since)
    .bind(until)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Weekday};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    const TODAY: (i32, u32, u32) = (2024, 3, 15);

    fn today() -> NaiveDate {
        day(TODAY.0, TODAY.1, TODAY.2)
    }

    fn days_ago(n: i64) -> NaiveDate {
        today() - Duration::days(n)
    }

    #[test]
    fn streak_three_consecutive_days() {
        let days = [days_ago(0), days_ago(1), days_ago(2)];
        assert_eq!(current_streak(&days, today()), 3);
    }

    #[test]
    fn streak_stops_at_gap() {
        let days = [days_ago(0), days_ago(2)];
        assert_eq!(current_streak(&days, today()), 1);
    }

    #[test]
    fn streak_starts_yesterday_when_today_empty() {
        assert_eq!(current_streak(&[days_ago(1)], today()), 1);
        assert_eq!(current_streak(&[days_ago(1), days_ago(2), days_ago(3)], today()), 3);
    }

    #[test]
    fn streak_zero_when_last_activity_is_older() {
        assert_eq!(current_streak(&[days_ago(2), days_ago(3)], today()), 0);
        assert_eq!(current_streak(&[], today()), 0);
    }

    #[test]
    fn streak_ignores_future_days() {
        let tomorrow = today() + Duration::days(1);
        let days = [tomorrow, days_ago(0), days_ago(1)];
        assert_eq!(current_streak(&days, today()), 2);
    }

    #[test]
    fn repeated_days_count_once() {
        let days = [days_ago(0), days_ago(0), days_ago(1), days_ago(1), days_ago(3)];
        assert_eq!(current_streak(&days, today()), 2);
    }

    #[test]
    fn calories_bucketed_ascending_within_window() {
        let rows = vec![
            DatedCalories { date: at(2024, 3, 15, 8), calories: 200.0 },
            DatedCalories { date: at(2024, 3, 9, 8), calories: 150.0 },
            DatedCalories { date: at(2024, 3, 15, 19), calories: 100.0 },
            DatedCalories { date: at(2024, 3, 8, 23), calories: 999.0 },
            DatedCalories { date: at(2024, 3, 16, 1), calories: 999.0 },
            DatedCalories { date: at(2024, 3, 12, 12), calories: 50.5 },
        ];

        let series = calories_by_day(&rows, today());
        assert_eq!(
            series,
            vec![
                DailyCalories { date: day(2024, 3, 9), calories: 150.0 },
                DailyCalories { date: day(2024, 3, 12), calories: 50.5 },
                DailyCalories { date: day(2024, 3, 15), calories: 300.0 },
            ]
        );
        assert!(series.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn calories_empty_input() {
        assert!(calories_by_day(&[], today()).is_empty());
    }

    #[test]
    fn weekly_progress_partial() {
        let p = weekly_progress(2, 1000.0);
        assert_eq!(p.workout_progress, 40.0);
        assert_eq!(p.calorie_progress, 40.0);
        assert_eq!(p.total_progress, "40.0");
    }

    #[test]
    fn weekly_progress_caps_each_component() {
        let p = weekly_progress(50, 1_000_000.0);
        assert_eq!(p.workout_progress, 100.0);
        assert_eq!(p.calorie_progress, 100.0);
        assert_eq!(p.total_progress, "100.0");

        let mixed = weekly_progress(12, 0.0);
        assert_eq!(mixed.workout_progress, 100.0);
        assert_eq!(mixed.calorie_progress, 0.0);
        assert_eq!(mixed.total_progress, "50.0");
    }

    #[test]
    fn weekly_progress_one_decimal() {
        let p = weekly_progress(1, 333.0);
        // 20.0 and 13.32 -> 16.66
        assert_eq!(p.total_progress, "16.7");
        assert_eq!(weekly_progress(0, 0.0).total_progress, "0.0");
    }

    #[test]
    fn week_start_is_previous_sunday_midnight() {
        // Friday
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 14, 30, 0).unwrap();
        let start = week_start(&now).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap());
        assert_eq!(start.weekday(), Weekday::Sun);
    }

    #[test]
    fn week_start_on_sunday_is_same_day() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 23, 59, 0).unwrap();
        assert_eq!(
            week_start(&now).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn week_start_uses_local_calendar() {
        // Sunday 01:00 at UTC+3 is still Saturday in UTC.
        let tz = FixedOffset::east_opt(3 * 3600).unwrap();
        let now = tz.with_ymd_and_hms(2024, 3, 10, 1, 0, 0).unwrap();
        let start = week_start(&now).unwrap();
        assert_eq!(start, tz.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap());
        assert_eq!(start.with_timezone(&Utc), at(2024, 3, 9, 21));
    }

    #[test]
    fn window_start_covers_seven_days() {
        assert_eq!(window_start(today()).unwrap(), at(2024, 3, 9, 0));
    }
}
