//! Authentication routes: signup, login, logout, session check, user listing.

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::CookieJar;
use serde::Serialize;
use validator::Validate;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::{removal_cookie, session_cookie, CurrentUser};
use crate::middleware::rbac::RequireAdmin;
use crate::models::user::{LoginRequest, SignupRequest, User, UserResponse};
use crate::services::auth as auth_service;
use crate::AppState;

/// Issued session: the token is also set as the `token` cookie.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Session check result.
#[derive(Debug, Serialize)]
pub struct SessionStatus {
    pub authenticated: bool,
    pub user: Option<UserResponse>,
}

fn start_session(
    state: &AppState,
    jar: CookieJar,
    user: User,
) -> Result<(CookieJar, Json<ApiResponse<AuthResponse>>), AppError> {
    let token = auth_service::generate_token(
        &user,
        &state.config.jwt_secret,
        state.config.jwt_expiry_secs,
    )?;
    let jar = jar.add(session_cookie(
        token.clone(),
        state.config.environment.is_production(),
    ));
    Ok((
        jar,
        ApiResponse::success(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

/// POST /api/v1/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, CookieJar, Json<ApiResponse<AuthResponse>>), AppError> {
    let body = body.normalized();
    body.validate()?;

    let user = auth_service::signup(&state.db, &body).await?;
    let (jar, response) = start_session(&state, jar, user)?;
    Ok((StatusCode::CREATED, jar, response))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<AuthResponse>>), AppError> {
    body.validate()?;

    let user = auth_service::login(&state.db, &body.email, &body.password).await?;
    start_session(&state, jar, user)
}

/// POST /api/v1/auth/logout: clears the session cookie.
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<ApiResponse<&'static str>>) {
    // Tokens are stateless; an already-copied token stays valid until it expires.
    (
        jar.add(removal_cookie()),
        ApiResponse::success("Logged out successfully"),
    )
}

/// GET /api/v1/auth/check-auth: reports the session user, if any.
pub async fn check_auth(current_user: Option<CurrentUser>) -> Json<ApiResponse<SessionStatus>> {
    let user = current_user.map(|u| u.user);
    ApiResponse::success(SessionStatus {
        authenticated: user.is_some(),
        user,
    })
}

/// GET /api/v1/auth/users: admin-only user listing.
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, AppError> {
    let users = auth_service::list_users(&state.db).await?;
    Ok(ApiResponse::success(users))
}
