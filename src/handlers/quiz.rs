use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
    routing::{get, post},
    Form, Router,
};
use rand::seq::SliceRandom;
use serde::Deserialize;

use crate::{
    extractors::AuthGuard,
    names,
    rejections::{AppError, ResultExt},
    services::quiz::QuizState,
    utils, views, AppState,
};

use crate::views::quiz as quiz_views;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::QUIZ_URL, get(quiz_home))
        .route("/quiz/start/{round_id}", get(start_quiz))
        .route(names::SUBMIT_ANSWER_URL, post(submit_answer))
        .route("/quiz/continue/{player_round_id}", get(continue_quiz))
        .route("/quiz/result/{player_round_id}", get(quiz_result))
        .route(names::QUIZ_HISTORY_URL, get(quiz_history))
}

fn home_error(message: &str) -> Redirect {
    Redirect::to(&utils::redirect_with(names::HOME_URL, "error", message))
}

async fn quiz_home(AuthGuard(_user): AuthGuard) -> Redirect {
    // The landing page carries the play/continue affordances.
    Redirect::to(names::HOME_URL)
}

/// Renders the state's current question with a fresh option shuffle, or
/// `None` when the state carries no question. The shuffle is cosmetic only;
/// scoring goes by option id.
fn question_page(state: &QuizState, timer_seconds: u32, is_resuming: bool) -> Option<maud::Markup> {
    let question = state.current_question.as_ref()?;

    let mut options = question.options.clone();
    options.shuffle(&mut rand::thread_rng());

    Some(views::page(
        "Quiz",
        quiz_views::question(quiz_views::QuestionData {
            player_round_id: state.player_round.id,
            question,
            options: &options,
            question_number: state.current_question_index + 1,
            total_questions: state.total_questions,
            timer_seconds,
            is_resuming,
        }),
    ))
}

async fn start_quiz(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path(round_id): Path<i32>,
) -> Result<axum::response::Response, AppError> {
    let can_play = state
        .quiz
        .can_play(user.id, round_id)
        .await
        .reject("could not check playability")?;

    if !can_play {
        let completed = state
            .quiz
            .has_completed(user.id, round_id)
            .await
            .reject("could not check completion")?;
        let message = if completed {
            "You have already completed this quiz."
        } else {
            "This quiz is not available."
        };
        return Ok(home_error(message).into_response());
    }

    let quiz_state = state
        .quiz
        .start_or_resume(&user, round_id)
        .await
        .reject("could not start quiz")?;

    let Some(quiz_state) = quiz_state else {
        return Ok(home_error("Could not start quiz.").into_response());
    };

    let timer = state.quiz.scoring().timer_seconds;
    match question_page(&quiz_state, timer, false) {
        Some(page) => Ok(page.into_response()),
        None => {
            Ok(Redirect::to(&names::quiz_result_url(quiz_state.player_round.id)).into_response())
        }
    }
}

async fn continue_quiz(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path(player_round_id): Path<i32>,
) -> Result<axum::response::Response, AppError> {
    let player_round = state
        .db
        .find_player_round_by_id(player_round_id)
        .await
        .reject("could not get player round")?;

    let Some(player_round) = player_round.filter(|pr| pr.user_id == user.id) else {
        return Ok(home_error("Quiz not found.").into_response());
    };

    if player_round.is_completed() {
        return Ok(Redirect::to(&names::quiz_result_url(player_round_id)).into_response());
    }

    let quiz_state = state
        .quiz
        .start_or_resume(&user, player_round.round_id)
        .await
        .reject("could not resume quiz")?;

    let Some(quiz_state) = quiz_state else {
        return Ok(Redirect::to(&names::quiz_result_url(player_round_id)).into_response());
    };

    let timer = state.quiz.scoring().timer_seconds;
    let is_resuming = quiz_state.current_question_index > 0;
    match question_page(&quiz_state, timer, is_resuming) {
        Some(page) => Ok(page.into_response()),
        None => Ok(Redirect::to(&names::quiz_result_url(player_round_id)).into_response()),
    }
}

#[derive(Deserialize)]
struct SubmitAnswerForm {
    player_round_id: i32,
    question_id: i32,
    /// Absent when the timer ran out with nothing selected.
    answer_id: Option<i32>,
}

async fn submit_answer(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Form(form): Form<SubmitAnswerForm>,
) -> Result<axum::response::Response, AppError> {
    // The shown-at recorded when the question was rendered; the engine
    // assumes a fully elapsed timer if it is missing.
    let question_shown_at = state
        .db
        .find_player_round_by_id(form.player_round_id)
        .await
        .reject("could not get player round")?
        .and_then(|pr| pr.current_question_shown_at);

    let result = state
        .quiz
        .submit_answer(
            &user,
            form.player_round_id,
            form.question_id,
            form.answer_id,
            question_shown_at,
        )
        .await
        .reject("could not submit answer")?;

    let Some(result) = result else {
        return Ok(home_error("Could not submit answer.").into_response());
    };

    Ok(views::page(
        "Answer",
        quiz_views::answer_result(form.player_round_id, &result),
    )
    .into_response())
}

async fn quiz_result(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path(player_round_id): Path<i32>,
) -> Result<axum::response::Response, AppError> {
    let player_round = state
        .db
        .find_player_round_by_id(player_round_id)
        .await
        .reject("could not get player round")?;

    let Some(player_round) = player_round.filter(|pr| pr.user_id == user.id) else {
        return Ok(home_error("Quiz not found.").into_response());
    };

    let round = state
        .db
        .find_round(player_round.round_id)
        .await
        .reject("could not get round")?
        .ok_or(AppError::NotFound)?;

    let reviews = state
        .db
        .answer_reviews(player_round_id)
        .await
        .reject("could not get answers")?;

    Ok(views::page_for(
        "Result",
        Some(&user.display_name),
        quiz_views::result(quiz_views::ResultData {
            player_round: &player_round,
            round_name: &round.name,
            reviews: &reviews,
        }),
    )
    .into_response())
}

async fn quiz_history(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
) -> Result<maud::Markup, AppError> {
    let history = state
        .db
        .player_history(user.id)
        .await
        .reject("could not get history")?;

    Ok(views::page_for(
        "History",
        Some(&user.display_name),
        quiz_views::history(&history),
    ))
}
