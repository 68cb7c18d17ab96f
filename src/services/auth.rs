//! Authentication service: password hashing, session tokens, signup, and login.

use argon2::{
    password_hash::{
        rand_core::{OsRng, RngCore},
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{SignupRequest, User, UserResponse};

/// Lifetime of the verification code issued at signup, in hours.
const VERIFICATION_CODE_TTL_HOURS: i64 = 24;

/// Postgres' default name for the `UNIQUE` constraint on `users.username`.
const USERNAME_UNIQUE_CONSTRAINT: &str = "users_username_key";

/// Columns safe to return to clients.
const USER_RESPONSE_COLUMNS: &str = "id, email, username, is_verified, is_admin, created_at";

/// JWT claims embedded in session tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub username: String,
    pub is_admin: bool,
    pub exp: i64,
    pub iat: i64,
}

/// Hash a plaintext password with argon2id.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))
}

/// Verify a plaintext password against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Issue a signed session token for a user.
pub fn generate_token(user: &User, jwt_secret: &str, expiry_secs: i64) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id.to_string(),
        username: user.username.clone(),
        is_admin: user.is_admin,
        exp: (now + Duration::seconds(expiry_secs)).timestamp(),
        iat: now.timestamp(),
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {e}")))
}

/// Validate a JWT signature and expiry and return the claims.
pub fn validate_token(token: &str, jwt_secret: &str) -> Result<Claims, AppError> {
    let decoding_key = DecodingKey::from_secret(jwt_secret.as_bytes());
    let validation = Validation::default();

    jsonwebtoken::decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|_| AppError::Unauthorized("Unauthorized - invalid token".to_string()))
}

/// Six-digit numeric code stored with new accounts.
pub fn generate_verification_code() -> String {
    let n = OsRng.next_u32() % 900_000 + 100_000;
    n.to_string()
}

/// Register a new user. Email and username must both be unused.
///
/// The input is expected to be normalized and validated by the caller.
pub async fn signup(pool: &PgPool, input: &SignupRequest) -> Result<User, AppError> {
    let (email_taken, username_taken) = tokio::try_join!(
        exists_by(pool, "email", &input.email),
        exists_by(pool, "username", &input.username),
    )?;

    if email_taken {
        return Err(AppError::Validation("User already exists".to_string()));
    }
    if username_taken {
        return Err(AppError::Validation("Username taken".to_string()));
    }

    let password_hash = hash_password(&input.password)?;
    let expires_at = Utc::now() + Duration::hours(VERIFICATION_CODE_TTL_HOURS);

    // Accounts are created verified; the code is kept for a future email flow.
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (email, username, password_hash, is_verified,
            verification_token, verification_token_expires_at)
        VALUES ($1, $2, $3, TRUE, $4, $5)
        RETURNING *
        "#,
    )
    .bind(&input.email)
    .bind(&input.username)
    .bind(&password_hash)
    .bind(generate_verification_code())
    .bind(expires_at)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::Validation(duplicate_user_message(db_err.constraint()).to_string())
        }
        _ => AppError::Database(e),
    })?;

    tracing::info!(user_id = %user.id, username = %user.username, "User signed up");
    Ok(user)
}

/// Signup conflict message for the unique constraint that was violated.
fn duplicate_user_message(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some(USERNAME_UNIQUE_CONSTRAINT) => "Username taken",
        _ => "User already exists",
    }
}

async fn exists_by(pool: &PgPool, column: &str, value: &str) -> Result<bool, AppError> {
    let sql = format!("SELECT EXISTS(SELECT 1 FROM users WHERE {column} = $1)");
    let exists = sqlx::query_scalar::<_, bool>(&sql)
        .bind(value)
        .fetch_one(pool)
        .await?;
    Ok(exists)
}

/// Authenticate by email and password.
pub async fn login(pool: &PgPool, email: &str, password: &str) -> Result<User, AppError> {
    let invalid = || AppError::Validation("Invalid credentials".to_string());

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email.trim().to_lowercase())
        .fetch_optional(pool)
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(password, &user.password_hash)? {
        tracing::warn!(user_id = %user.id, "Failed login attempt");
        return Err(invalid());
    }

    tracing::info!(user_id = %user.id, "User logged in");
    Ok(user)
}

/// Find a user by ID without the password hash.
pub async fn find_user_by_id(pool: &PgPool, id: Uuid) -> Result<Option<UserResponse>, AppError> {
    let sql = format!("SELECT {USER_RESPONSE_COLUMNS} FROM users WHERE id = $1");
    let user = sqlx::query_as::<_, UserResponse>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// List all users, newest first.
pub async fn list_users(pool: &PgPool) -> Result<Vec<UserResponse>, AppError> {
    let sql = format!("SELECT {USER_RESPONSE_COLUMNS} FROM users ORDER BY created_at DESC");
    let users = sqlx::query_as::<_, UserResponse>(&sql).fetch_all(pool).await?;
    Ok(users)
}
