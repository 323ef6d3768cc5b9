use axum::{
    extract::{Query, State},
    routing::get,
    Router,
};
use serde::Deserialize;

use crate::{
    extractors::OptionalUser,
    names,
    rejections::{AppError, ResultExt},
    services::scoreboard,
    views, AppState,
};

use crate::views::scoreboard as scoreboard_views;

pub fn routes() -> Router<AppState> {
    Router::new().route(names::SCOREBOARD_URL, get(scoreboard_page))
}

#[derive(Deserialize)]
struct ScoreboardQuery {
    round_id: Option<i32>,
}

async fn scoreboard_page(
    OptionalUser(user): OptionalUser,
    State(state): State<AppState>,
    Query(query): Query<ScoreboardQuery>,
) -> Result<maud::Markup, AppError> {
    let rounds = state.db.rounds().await.reject("could not get rounds")?;

    // Explicit selection, else the active round, else the most recent one.
    let selected_round = match query.round_id {
        Some(round_id) => rounds.iter().find(|r| r.id == round_id),
        None => {
            let active = state
                .db
                .active_round()
                .await
                .reject("could not get active round")?;
            match active {
                Some(active) => rounds.iter().find(|r| r.id == active.id),
                None => rounds.first(),
            }
        }
    };

    let entries = match selected_round {
        Some(round) => {
            let completed = state
                .db
                .completed_player_rounds(round.id)
                .await
                .reject("could not get completed rounds")?;
            scoreboard::rank(completed, user.as_ref().map(|u| u.id))
        }
        None => Vec::new(),
    };

    Ok(views::page_for(
        "Scoreboard",
        user.as_ref().map(|u| u.display_name.as_str()),
        scoreboard_views::scoreboard(scoreboard_views::ScoreboardData {
            rounds: &rounds,
            selected_round,
            entries: &entries,
        }),
    ))
}
