use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;

use crate::{db::models::AuthUser, names, rejections::AppError, AppState};

async fn user_from_cookie(parts: &Parts, state: &AppState) -> Option<AuthUser> {
    let jar = CookieJar::from_headers(&parts.headers);
    let session_id = jar.get(names::USER_SESSION_COOKIE_NAME)?.value().to_string();
    state.db.get_user_by_session(&session_id).await.ok().flatten()
}

/// Guard extractor that verifies the user session cookie against the
/// database and carries the authenticated user into the handler.
pub struct AuthGuard(pub AuthUser);

impl FromRequestParts<AppState> for AuthGuard {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match user_from_cookie(parts, state).await {
            Some(user) => Ok(AuthGuard(user)),
            None => Err(AppError::Unauthorized),
        }
    }
}

/// Like [`AuthGuard`], but additionally requires the admin role. Everything
/// under /admin sits behind this.
pub struct AdminGuard(pub AuthUser);

impl FromRequestParts<AppState> for AdminGuard {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthGuard(user) = AuthGuard::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            tracing::warn!("user {} denied access to an admin route", user.id);
            return Err(AppError::Forbidden);
        }
        Ok(AdminGuard(user))
    }
}

/// The user if logged in, for pages that render either way.
pub struct OptionalUser(pub Option<AuthUser>);

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(OptionalUser(user_from_cookie(parts, state).await))
    }
}
