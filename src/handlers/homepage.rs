use axum::{
    extract::{Query, State},
    http::{header::SET_COOKIE, HeaderMap},
    response::{IntoResponse, Redirect},
    routing::{get, post},
    Router,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::{
    extractors::OptionalUser,
    names,
    rejections::{AppError, ResultExt},
    utils, views, AppState,
};

use crate::views::homepage as homepage_views;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route(names::LOGOUT_URL, post(logout))
}

#[derive(Deserialize)]
struct HomeQuery {
    message: Option<String>,
    error: Option<String>,
}

async fn home(
    OptionalUser(user): OptionalUser,
    State(state): State<AppState>,
    Query(query): Query<HomeQuery>,
) -> Result<maud::Markup, AppError> {
    let active_round = state.db.active_round().await.reject("could not get active round")?;

    let (can_play, player_round) = match (&user, &active_round) {
        (Some(user), Some(round)) => {
            let can_play = state
                .quiz
                .can_play(user.id, round.id)
                .await
                .reject("could not check playability")?;
            let player_round = state
                .db
                .find_player_round(user.id, round.id)
                .await
                .reject("could not get player round")?;
            (can_play, player_round)
        }
        _ => (false, None),
    };

    Ok(views::page_for(
        "Home",
        user.as_ref().map(|u| u.display_name.as_str()),
        homepage_views::home(homepage_views::HomeData {
            user: user.as_ref(),
            active_round: active_round.as_ref(),
            player_round: player_round.as_ref(),
            can_play,
            message: query.message.as_deref(),
            error: query.error.as_deref(),
        }),
    ))
}

async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(session) = jar.get(names::USER_SESSION_COOKIE_NAME) {
        if let Err(e) = state.auth.logout(session.value()).await {
            tracing::error!("could not delete user session: {e}");
        }
    }

    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        utils::expired_cookie(names::USER_SESSION_COOKIE_NAME, state.secure_cookies)
            .parse()
            .expect("static cookie header"),
    );

    (headers, Redirect::to(names::HOME_URL))
}
