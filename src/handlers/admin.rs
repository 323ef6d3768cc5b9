use std::collections::HashMap;

use axum::{
    extract::{Multipart, Path, Query, State},
    response::Redirect,
    routing::{get, post},
    Form, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
    db::{Language, QuestionFull, ROLE_ADMIN, ROLE_PLAYER},
    extractors::AdminGuard,
    names,
    rejections::{AppError, ResultExt},
    services::import,
    utils, views, AppState,
};

use crate::views::admin as admin_views;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::ADMIN_URL, get(dashboard))
        .route(names::ADMIN_ROUNDS_URL, get(rounds_page).post(create_round))
        .route("/admin/rounds/{id}/edit", get(edit_round_page))
        .route("/admin/rounds/{id}", post(update_round))
        .route("/admin/rounds/{id}/activate", post(activate_round))
        .route("/admin/rounds/{id}/deactivate", post(deactivate_round))
        .route("/admin/rounds/{id}/delete", post(delete_round))
        .route("/admin/rounds/{id}/questions", get(questions_page))
        .route("/admin/rounds/{id}/questions/import", post(import_questions))
        .route("/admin/rounds/{id}/images/upload", post(upload_images))
        .route("/admin/questions/{id}", post(update_question))
        .route("/admin/questions/{id}/delete", post(delete_question))
        .route(names::ADMIN_USERS_URL, get(users_page).post(create_user))
        .route("/admin/users/{id}", post(update_user))
        .route("/admin/users/{id}/delete", post(delete_user))
}

#[derive(Deserialize)]
struct FlashQuery {
    message: Option<String>,
    error: Option<String>,
}

async fn dashboard(
    AdminGuard(user): AdminGuard,
    State(state): State<AppState>,
) -> Result<maud::Markup, AppError> {
    let rounds = state.db.rounds().await.reject("could not get rounds")?;
    let users = state.db.users().await.reject("could not get users")?;

    Ok(views::page_for(
        "Admin",
        Some(&user.display_name),
        admin_views::dashboard(rounds.len(), users.len()),
    ))
}

// ---------------------------------------------------------------------------
// Rounds
// ---------------------------------------------------------------------------

async fn rounds_page(
    AdminGuard(user): AdminGuard,
    State(state): State<AppState>,
    Query(query): Query<FlashQuery>,
) -> Result<maud::Markup, AppError> {
    let rounds = state.db.rounds().await.reject("could not get rounds")?;

    let mut with_counts = Vec::with_capacity(rounds.len());
    for round in rounds {
        let counts = state
            .db
            .round_question_counts(round.id)
            .await
            .reject("could not get question counts")?;
        with_counts.push((round, counts));
    }

    Ok(views::page_for(
        "Rounds",
        Some(&user.display_name),
        admin_views::rounds(admin_views::RoundsData {
            rounds: &with_counts,
            message: query.message.as_deref(),
            error: query.error.as_deref(),
        }),
    ))
}

#[derive(Deserialize)]
struct RoundForm {
    name: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

fn rounds_redirect(key: &str, message: &str) -> Redirect {
    Redirect::to(&utils::redirect_with(names::ADMIN_ROUNDS_URL, key, message))
}

async fn create_round(
    AdminGuard(_user): AdminGuard,
    State(state): State<AppState>,
    Form(form): Form<RoundForm>,
) -> Result<Redirect, AppError> {
    if form.name.trim().is_empty() {
        return Ok(rounds_redirect("error", "Round name must not be empty"));
    }
    if form.start_date > form.end_date {
        return Ok(rounds_redirect("error", "Start date must not be after end date"));
    }

    state
        .db
        .create_round(form.name.trim(), form.start_date, form.end_date)
        .await
        .reject("could not create round")?;

    Ok(rounds_redirect("message", "Round created"))
}

async fn edit_round_page(
    AdminGuard(user): AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<maud::Markup, AppError> {
    let round = state
        .db
        .find_round(id)
        .await
        .reject("could not get round")?
        .ok_or(AppError::NotFound)?;

    Ok(views::page_for(
        "Edit round",
        Some(&user.display_name),
        admin_views::round_form(&round),
    ))
}

async fn update_round(
    AdminGuard(_user): AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<RoundForm>,
) -> Result<Redirect, AppError> {
    if form.start_date > form.end_date {
        return Ok(rounds_redirect("error", "Start date must not be after end date"));
    }

    let updated = state
        .db
        .update_round(id, form.name.trim(), form.start_date, form.end_date)
        .await
        .reject("could not update round")?;

    Ok(match updated {
        Some(_) => rounds_redirect("message", "Round updated"),
        None => rounds_redirect("error", "Round not found"),
    })
}

async fn activate_round(
    AdminGuard(_user): AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Redirect, AppError> {
    let activated = state
        .db
        .activate_round(id)
        .await
        .reject("could not activate round")?;

    Ok(match activated {
        Some(round) => rounds_redirect("message", &format!("{} is now active", round.name)),
        None => rounds_redirect("error", "Round not found"),
    })
}

async fn deactivate_round(
    AdminGuard(_user): AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Redirect, AppError> {
    state
        .db
        .deactivate_round(id)
        .await
        .reject("could not deactivate round")?;

    Ok(rounds_redirect("message", "Round deactivated"))
}

async fn delete_round(
    AdminGuard(_user): AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Redirect, AppError> {
    state
        .db
        .delete_round(id)
        .await
        .reject("could not delete round")?;

    Ok(rounds_redirect("message", "Round deleted"))
}

// ---------------------------------------------------------------------------
// Questions
// ---------------------------------------------------------------------------

struct QuestionsFlash<'a> {
    message: Option<&'a str>,
    error: Option<&'a str>,
    import_errors: &'a [String],
    uploaded_images: &'a [String],
}

impl Default for QuestionsFlash<'_> {
    fn default() -> Self {
        Self {
            message: None,
            error: None,
            import_errors: &[],
            uploaded_images: &[],
        }
    }
}

/// The questions page shows both language sets back to back.
async fn render_questions_page(
    state: &AppState,
    user_name: &str,
    round_id: i32,
    flash: QuestionsFlash<'_>,
) -> Result<maud::Markup, AppError> {
    let round = state
        .db
        .find_round(round_id)
        .await
        .reject("could not get round")?
        .ok_or(AppError::NotFound)?;

    let mut questions: Vec<QuestionFull> = Vec::new();
    for language in Language::ALL {
        let mut set = state
            .db
            .questions_for_round(round_id, language)
            .await
            .reject("could not get questions")?;
        questions.append(&mut set);
    }

    Ok(views::page_for(
        "Questions",
        Some(user_name),
        admin_views::questions(admin_views::QuestionsData {
            round: &round,
            questions: &questions,
            message: flash.message,
            error: flash.error,
            import_errors: flash.import_errors,
            uploaded_images: flash.uploaded_images,
        }),
    ))
}

async fn questions_page(
    AdminGuard(user): AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<FlashQuery>,
) -> Result<maud::Markup, AppError> {
    let flash = QuestionsFlash {
        message: query.message.as_deref(),
        error: query.error.as_deref(),
        ..Default::default()
    };
    render_questions_page(&state, &user.display_name, id, flash).await
}

async fn import_questions(
    AdminGuard(user): AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    mut multipart: Multipart,
) -> Result<maud::Markup, AppError> {
    let mut filename = String::new();
    let mut file_bytes: Vec<u8> = Vec::new();
    let mut language = Language::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .reject_input("failed to read multipart field")?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                filename = field.file_name().unwrap_or_default().to_string();
                file_bytes = field
                    .bytes()
                    .await
                    .reject_input("failed to read uploaded file")?
                    .to_vec();
            }
            "language" => {
                let value = field
                    .text()
                    .await
                    .reject_input("failed to read language field")?;
                language = Language::parse(&value).unwrap_or_default();
            }
            _ => {}
        }
    }

    if file_bytes.is_empty() {
        let flash = QuestionsFlash {
            error: Some("No file was uploaded"),
            ..Default::default()
        };
        return render_questions_page(&state, &user.display_name, id, flash).await;
    }

    if state
        .db
        .find_round(id)
        .await
        .reject("could not get round")?
        .is_none()
    {
        return Err(AppError::NotFound);
    }

    let result = import::import_questions(&state.db, id, language, &filename, &file_bytes)
        .await
        .reject("import failed")?;

    let message = format!(
        "Imported {} {} questions",
        result.questions_imported,
        language.label()
    );
    let flash = if result.success {
        QuestionsFlash {
            message: Some(&message),
            ..Default::default()
        }
    } else {
        QuestionsFlash {
            error: Some("Import finished with errors"),
            import_errors: &result.errors,
            ..Default::default()
        }
    };

    render_questions_page(&state, &user.display_name, id, flash).await
}

async fn upload_images(
    AdminGuard(user): AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    mut multipart: Multipart,
) -> Result<maud::Markup, AppError> {
    let mut uploaded = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .reject_input("failed to read multipart field")?
    {
        if field.name().unwrap_or_default() != "images" {
            continue;
        }

        let original = field.file_name().unwrap_or("image").to_string();
        let bytes = field
            .bytes()
            .await
            .reject_input("failed to read uploaded image")?;
        if bytes.is_empty() {
            continue;
        }

        let stored = state
            .images
            .store(&bytes, &original, "questions")
            .await
            .reject("could not store image")?;
        uploaded.push(stored);
    }

    let message = format!("Uploaded {} image(s)", uploaded.len());
    let flash = if uploaded.is_empty() {
        QuestionsFlash {
            error: Some("No images were uploaded"),
            ..Default::default()
        }
    } else {
        QuestionsFlash {
            message: Some(&message),
            uploaded_images: &uploaded,
            ..Default::default()
        }
    };

    render_questions_page(&state, &user.display_name, id, flash).await
}

async fn update_question(
    AdminGuard(_user): AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    mut multipart: Multipart,
) -> Result<Redirect, AppError> {
    let mut fields: HashMap<String, String> = HashMap::new();
    let mut image_file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .reject_input("failed to read multipart field")?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "image_file" {
            let original = field.file_name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .reject_input("failed to read uploaded image")?;
            if !bytes.is_empty() {
                image_file = Some((original, bytes.to_vec()));
            }
        } else {
            let value = field
                .text()
                .await
                .reject_input("failed to read field data")?;
            fields.insert(name, value);
        }
    }

    let round_id: i32 = fields
        .get("round_id")
        .and_then(|v| v.parse().ok())
        .ok_or(AppError::Input("missing round_id field"))?;

    let questions_redirect = |key: &str, message: &str| {
        Redirect::to(&utils::redirect_with(
            &names::round_questions_url(round_id),
            key,
            message,
        ))
    };

    let Some(existing) = state
        .db
        .find_question(id)
        .await
        .reject("could not get question")?
    else {
        return Ok(questions_redirect("error", "Question not found"));
    };

    let non_blank = |key: &str| -> Option<String> {
        fields
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let correct_answer: usize = fields
        .get("correct_answer")
        .and_then(|v| v.parse().ok())
        .filter(|n| (1..=4).contains(n))
        .ok_or(AppError::Input("correct answer must be 1-4"))?;

    let mut options = Vec::with_capacity(4);
    for i in 1..=4 {
        let option_id: i32 = fields
            .get(&format!("option_id_{i}"))
            .and_then(|v| v.parse().ok())
            .ok_or(AppError::Input("missing option id field"))?;
        let text = non_blank(&format!("option_text_{i}")).unwrap_or_default();
        options.push((option_id, text, i == correct_answer));
    }

    state
        .db
        .update_question(
            id,
            non_blank("text").as_deref(),
            non_blank("explanation").as_deref(),
            &options,
        )
        .await
        .reject("could not update question")?;

    // Image changes: removal, a replacement file, or an external URL. A
    // replaced locally-stored file is deleted from disk; URLs are left alone.
    let old_local_image = existing
        .question
        .image_filename
        .clone()
        .filter(|f| !f.starts_with("http"));

    let new_image: Option<Option<String>> = if fields
        .get("remove_image")
        .is_some_and(|v| v == "true")
    {
        Some(None)
    } else if let Some((original, bytes)) = image_file {
        let stored = state
            .images
            .store(&bytes, &original, "questions")
            .await
            .reject("could not store image")?;
        Some(Some(stored))
    } else {
        non_blank("image_url").map(Some)
    };

    if let Some(image) = new_image {
        if let Some(old) = &old_local_image {
            state.images.delete(old).await;
        }
        state
            .db
            .set_question_image(id, image.as_deref())
            .await
            .reject("could not update question image")?;
    }

    Ok(questions_redirect("message", "Question updated"))
}

#[derive(Deserialize)]
struct DeleteQuestionForm {
    round_id: i32,
}

async fn delete_question(
    AdminGuard(_user): AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<DeleteQuestionForm>,
) -> Result<Redirect, AppError> {
    state
        .db
        .delete_question(id)
        .await
        .reject("could not delete question")?;

    Ok(Redirect::to(&utils::redirect_with(
        &names::round_questions_url(form.round_id),
        "message",
        "Question deleted",
    )))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

fn users_redirect(key: &str, message: &str) -> Redirect {
    Redirect::to(&utils::redirect_with(names::ADMIN_USERS_URL, key, message))
}

async fn users_page(
    AdminGuard(user): AdminGuard,
    State(state): State<AppState>,
    Query(query): Query<FlashQuery>,
) -> Result<maud::Markup, AppError> {
    let users = state.db.users().await.reject("could not get users")?;

    Ok(views::page_for(
        "Users",
        Some(&user.display_name),
        admin_views::users(admin_views::UsersData {
            users: &users,
            message: query.message.as_deref(),
            error: query.error.as_deref(),
        }),
    ))
}

#[derive(Deserialize)]
struct UserForm {
    #[serde(default)]
    email: String,
    display_name: String,
    role: String,
    language: String,
}

fn sanitize_role(role: &str) -> &'static str {
    if role == ROLE_ADMIN {
        ROLE_ADMIN
    } else {
        ROLE_PLAYER
    }
}

async fn create_user(
    AdminGuard(_user): AdminGuard,
    State(state): State<AppState>,
    Form(form): Form<UserForm>,
) -> Result<Redirect, AppError> {
    let email = form.email.trim().to_lowercase();
    let display_name = form.display_name.trim();

    if email.is_empty() || display_name.is_empty() {
        return Ok(users_redirect("error", "Email and display name are required"));
    }

    let language = Language::parse(&form.language).unwrap_or_default();
    let created = state
        .db
        .create_user(&email, display_name, sanitize_role(&form.role), language.code())
        .await
        .reject("could not create user")?;

    Ok(match created {
        Some(_) => users_redirect("message", "User created"),
        None => users_redirect("error", "A user with this email already exists"),
    })
}

async fn update_user(
    AdminGuard(_user): AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<UserForm>,
) -> Result<Redirect, AppError> {
    let display_name = form.display_name.trim();
    if display_name.is_empty() {
        return Ok(users_redirect("error", "Display name is required"));
    }

    let language = Language::parse(&form.language).unwrap_or_default();
    state
        .db
        .update_user(id, display_name, sanitize_role(&form.role), language.code())
        .await
        .reject("could not update user")?;

    Ok(users_redirect("message", "User updated"))
}

async fn delete_user(
    AdminGuard(_user): AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Redirect, AppError> {
    state
        .db
        .delete_user(id)
        .await
        .reject("could not delete user")?;

    Ok(users_redirect("message", "User deleted"))
}
