use axum::{
    extract::{Query, State},
    http::{header::SET_COOKIE, HeaderMap},
    response::{IntoResponse, Redirect},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;

use crate::{
    names,
    rejections::{AppError, ResultExt},
    utils, views, AppState,
};

use crate::views::auth as auth_views;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::LOGIN_URL, get(login_page))
        .route(names::MAGIC_LINK_URL, post(request_magic_link))
        .route(names::CHECK_EMAIL_URL, get(check_email_page))
        .route("/auth/verify", get(verify))
}

#[derive(Deserialize)]
struct LoginQuery {
    error: Option<String>,
}

async fn login_page(Query(query): Query<LoginQuery>) -> maud::Markup {
    views::page("Log in", auth_views::login(query.error.as_deref()))
}

#[derive(Deserialize)]
struct MagicLinkForm {
    email: String,
}

/// The redirect target and message are identical whether or not the address
/// has an account, so this endpoint cannot be used to probe for users.
async fn request_magic_link(
    State(state): State<AppState>,
    Form(form): Form<MagicLinkForm>,
) -> impl IntoResponse {
    if let Err(e) = state.auth.request_magic_link(&form.email).await {
        tracing::error!("magic link request failed: {e}");
    }

    let email = form.email.trim().to_lowercase();
    Redirect::to(&utils::redirect_with(names::CHECK_EMAIL_URL, "email", &email))
}

#[derive(Deserialize)]
struct CheckEmailQuery {
    #[serde(default)]
    email: String,
}

async fn check_email_page(Query(query): Query<CheckEmailQuery>) -> maud::Markup {
    views::page("Check your email", auth_views::check_email(&query.email))
}

#[derive(Deserialize)]
struct VerifyQuery {
    token: String,
}

async fn verify(
    State(state): State<AppState>,
    Query(query): Query<VerifyQuery>,
) -> Result<axum::response::Response, AppError> {
    let verified = state
        .auth
        .verify_magic_link(&query.token)
        .await
        .reject("could not verify magic link")?;

    let Some((user, session_id)) = verified else {
        return Ok(Redirect::to(&utils::redirect_with(
            names::LOGIN_URL,
            "error",
            "Invalid or expired link. Please request a new one.",
        ))
        .into_response());
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        utils::cookie(
            names::USER_SESSION_COOKIE_NAME,
            &session_id,
            state.secure_cookies,
        )
        .parse()
        .expect("static cookie header"),
    );

    let target = utils::redirect_with(
        names::HOME_URL,
        "message",
        &format!("Welcome back, {}!", user.display_name),
    );
    Ok((headers, Redirect::to(&target)).into_response())
}
