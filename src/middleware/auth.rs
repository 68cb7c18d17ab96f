//! Session authentication extractor for Axum handlers.
//!
//! The session token travels in the `token` cookie set at signup/login.
//! API clients may send it as `Authorization: Bearer <token>` instead.

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::request::Parts,
    RequestPartsExt,
};
use axum_extra::{
    extract::cookie::{Cookie, CookieJar, SameSite},
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::UserResponse;
use crate::services::auth as auth_service;
use crate::AppState;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "token";

/// Build the HttpOnly session cookie.
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .build()
}

/// Expired, empty session cookie. Added to a jar it always emits a removal
/// `Set-Cookie`, whether or not the request carried the cookie.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .build();
    cookie.make_removal();
    cookie
}

/// Authenticated user resolved from the session token.
///
/// Use as an Axum extractor in handlers that require authentication:
/// ```ignore
/// async fn handler(current_user: CurrentUser) -> impl IntoResponse { ... }
/// ```
/// `Option<CurrentUser>` yields `None` instead of rejecting when the caller
/// is not authenticated.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
    /// Admin flag as embedded in the token.
    pub is_admin: bool,
    pub user: UserResponse,
}

impl CurrentUser {
    /// Reject unless the caller owns the record.
    pub fn ensure_owner(&self, owner_id: Uuid) -> Result<(), AppError> {
        if self.id != owner_id {
            return Err(AppError::Forbidden(
                "You do not own this resource".to_string(),
            ));
        }
        Ok(())
    }

    /// Reject unless the caller is the given user or an admin.
    pub fn ensure_can_view(&self, user_id: Uuid) -> Result<(), AppError> {
        if self.id != user_id && !self.is_admin {
            return Err(AppError::Forbidden(
                "You may only view your own data".to_string(),
            ));
        }
        Ok(())
    }
}

async fn session_token(parts: &mut Parts) -> Option<String> {
    let jar = CookieJar::from_headers(&parts.headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE).filter(|c| !c.value().is_empty()) {
        return Some(cookie.value().to_string());
    }

    parts
        .extract::<TypedHeader<Authorization<Bearer>>>()
        .await
        .ok()
        .map(|TypedHeader(Authorization(bearer))| bearer.token().to_string())
}

async fn authenticate(parts: &mut Parts, state: &AppState) -> Result<CurrentUser, AppError> {
    let token = session_token(parts)
        .await
        .ok_or_else(|| AppError::Unauthorized("Unauthorized - no token provided".to_string()))?;

    let claims = auth_service::validate_token(&token, &state.config.jwt_secret)?;

    let user_id: Uuid = claims
        .sub
        .parse()
        .map_err(|_| AppError::Unauthorized("Unauthorized - invalid token".to_string()))?;

    let user = auth_service::find_user_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("User not found".to_string()))?;

    Ok(CurrentUser {
        id: user.id,
        username: user.username.clone(),
        is_admin: claims.is_admin,
        user,
    })
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(parts, state).await
    }
}

impl OptionalFromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        match authenticate(parts, state).await {
            Ok(user) => Ok(Some(user)),
            Err(e @ (AppError::Database(_) | AppError::Internal(_))) => Err(e),
            Err(_) => Ok(None),
        }
    }
}
