use maud::{html, Markup};

use crate::db::{Language, QuestionCount, QuestionFull, Round, UserRow, ROLE_ADMIN, ROLE_PLAYER};
use crate::names;

fn flash(message: Option<&str>, error: Option<&str>) -> Markup {
    html! {
        @if let Some(message) = message {
            p class="flash" { (message) }
        }
        @if let Some(error) = error {
            p class="flash error" { (error) }
        }
    }
}

pub fn dashboard(round_count: usize, user_count: usize) -> Markup {
    html! {
        h1 { "Administration" }
        ul {
            li { a href=(names::ADMIN_ROUNDS_URL) { "Rounds" } " (" (round_count) ")" }
            li { a href=(names::ADMIN_USERS_URL) { "Users" } " (" (user_count) ")" }
        }
    }
}

// ---------------------------------------------------------------------------
// Rounds
// ---------------------------------------------------------------------------

pub struct RoundsData<'a> {
    pub rounds: &'a [(Round, Vec<QuestionCount>)],
    pub message: Option<&'a str>,
    pub error: Option<&'a str>,
}

pub fn rounds(data: RoundsData<'_>) -> Markup {
    html! {
        h1 { "Rounds" }
        (flash(data.message, data.error))

        article {
            h3 { "New round" }
            form method="post" action=(names::ADMIN_ROUNDS_URL) class="grid" {
                label { "Name" input type="text" name="name" required; }
                label { "Start" input type="date" name="start_date" required; }
                label { "End" input type="date" name="end_date" required; }
                button type="submit" { "Create" }
            }
        }

        table {
            thead {
                tr {
                    th { "Name" }
                    th { "Dates" }
                    th { "Questions" }
                    th { "Status" }
                    th { "Actions" }
                }
            }
            tbody {
                @for (round, counts) in data.rounds {
                    tr {
                        td { a href=(names::round_questions_url(round.id)) { (round.name) } }
                        td { (round.start_date) " – " (round.end_date) }
                        td {
                            @if counts.is_empty() { "none" }
                            @for count in counts {
                                span class="count" { (count.language) ": " (count.count) " " }
                            }
                        }
                        td {
                            @if round.active { strong { "active" } } @else { "inactive" }
                        }
                        td class="actions" {
                            @if round.active {
                                form method="post" action=(format!("/admin/rounds/{}/deactivate", round.id)) {
                                    button type="submit" class="secondary" { "Deactivate" }
                                }
                            } @else {
                                form method="post" action=(format!("/admin/rounds/{}/activate", round.id)) {
                                    button type="submit" { "Activate" }
                                }
                            }
                            a href=(format!("/admin/rounds/{}/edit", round.id)) role="button" class="secondary" { "Edit" }
                            form method="post" action=(format!("/admin/rounds/{}/delete", round.id)) {
                                button type="submit" class="danger" { "Delete" }
                            }
                        }
                    }
                }
            }
        }
    }
}

pub fn round_form(round: &Round) -> Markup {
    html! {
        h1 { "Edit round" }
        form method="post" action=(format!("/admin/rounds/{}", round.id)) {
            label { "Name" input type="text" name="name" value=(round.name) required; }
            label { "Start" input type="date" name="start_date" value=(round.start_date) required; }
            label { "End" input type="date" name="end_date" value=(round.end_date) required; }
            button type="submit" { "Save" }
            " "
            a href=(names::ADMIN_ROUNDS_URL) { "Back" }
        }
    }
}

// ---------------------------------------------------------------------------
// Questions
// ---------------------------------------------------------------------------

pub struct QuestionsData<'a> {
    pub round: &'a Round,
    pub questions: &'a [QuestionFull],
    pub message: Option<&'a str>,
    pub error: Option<&'a str>,
    pub import_errors: &'a [String],
    pub uploaded_images: &'a [String],
}

pub fn questions(data: QuestionsData<'_>) -> Markup {
    html! {
        h1 { "Questions: " (data.round.name) }
        p { a href=(names::ADMIN_ROUNDS_URL) { "Back to rounds" } }
        (flash(data.message, data.error))

        @if !data.import_errors.is_empty() {
            article class="flash error" {
                p { "Some rows could not be imported:" }
                ul {
                    @for error in data.import_errors {
                        li { (error) }
                    }
                }
            }
        }

        @if !data.uploaded_images.is_empty() {
            article class="flash" {
                p { "Uploaded images (use these names in the image column):" }
                ul {
                    @for filename in data.uploaded_images {
                        li { code { (filename) } }
                    }
                }
            }
        }

        div class="grid" {
            article {
                h3 { "Import questions" }
                form method="post" action=(names::round_import_url(data.round.id)) enctype="multipart/form-data" {
                    label {
                        "Spreadsheet (.xlsx, .xls or .csv)"
                        input type="file" name="file" accept=".xlsx,.xls,.csv" required;
                    }
                    label {
                        "Language"
                        select name="language" {
                            @for language in Language::ALL {
                                option value=(language.code()) { (language.label()) }
                            }
                        }
                    }
                    button type="submit" { "Import" }
                }
            }

            article {
                h3 { "Upload images" }
                form method="post" action=(names::round_images_url(data.round.id)) enctype="multipart/form-data" {
                    label {
                        "Image files"
                        input type="file" name="images" accept="image/*" multiple required;
                    }
                    button type="submit" { "Upload" }
                }
            }
        }

        @for full in data.questions {
            (question_editor(data.round.id, full))
        }
    }
}

fn question_editor(round_id: i32, full: &QuestionFull) -> Markup {
    let q = &full.question;

    html! {
        article {
            p class="muted" { (q.language) " · #" (q.order_index + 1) }

            form method="post" action=(format!("/admin/questions/{}", q.id)) enctype="multipart/form-data" {
                input type="hidden" name="round_id" value=(round_id);

                label {
                    "Question text"
                    input type="text" name="text" value=[q.text.as_deref()];
                }

                @if let Some(image) = &q.image_filename {
                    img src=(names::image_url(image)) alt="Question image" class="question-image";
                    label {
                        input type="checkbox" name="remove_image" value="true";
                        "Remove image"
                    }
                }
                label { "Replace image (file)" input type="file" name="image_file" accept="image/*"; }
                label { "…or image URL" input type="text" name="image_url"; }

                fieldset {
                    @for (i, option) in full.options.iter().enumerate() {
                        input type="hidden" name=(format!("option_id_{}", i + 1)) value=(option.id);
                        label {
                            input type="radio" name="correct_answer" value=(i + 1) checked[option.correct];
                            input type="text" name=(format!("option_text_{}", i + 1)) value=[option.text.as_deref()];
                        }
                    }
                }

                label {
                    "Explanation"
                    input type="text" name="explanation" value=[q.explanation.as_deref()];
                }

                button type="submit" { "Save" }
            }

            form method="post" action=(format!("/admin/questions/{}/delete", q.id)) {
                input type="hidden" name="round_id" value=(round_id);
                button type="submit" class="danger" { "Delete question" }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

pub struct UsersData<'a> {
    pub users: &'a [UserRow],
    pub message: Option<&'a str>,
    pub error: Option<&'a str>,
}

fn role_select(selected: &str) -> Markup {
    html! {
        select name="role" {
            option value=(ROLE_PLAYER) selected[selected == ROLE_PLAYER] { "Player" }
            option value=(ROLE_ADMIN) selected[selected == ROLE_ADMIN] { "Admin" }
        }
    }
}

fn language_select(selected: &str) -> Markup {
    html! {
        select name="language" {
            @for language in Language::ALL {
                option value=(language.code()) selected[selected == language.code()] {
                    (language.label())
                }
            }
        }
    }
}

pub fn users(data: UsersData<'_>) -> Markup {
    html! {
        h1 { "Users" }
        (flash(data.message, data.error))

        article {
            h3 { "New user" }
            form method="post" action=(names::ADMIN_USERS_URL) class="grid" {
                label { "Email" input type="email" name="email" required; }
                label { "Display name" input type="text" name="display_name" required; }
                label { "Role" (role_select(ROLE_PLAYER)) }
                label { "Language" (language_select("de")) }
                button type="submit" { "Create" }
            }
        }

        table {
            thead {
                tr {
                    th { "Email" }
                    th { "Name / role / language" }
                    th { "Created" }
                    th { "Actions" }
                }
            }
            tbody {
                @for user in data.users {
                    tr {
                        td { (user.email) }
                        td {
                            form method="post" action=(format!("/admin/users/{}", user.id)) class="inline" {
                                input type="text" name="display_name" value=(user.display_name) required;
                                (role_select(&user.role))
                                (language_select(&user.language))
                                button type="submit" class="secondary" { "Save" }
                            }
                        }
                        td { (user.created_at.format("%Y-%m-%d")) }
                        td {
                            form method="post" action=(format!("/admin/users/{}/delete", user.id)) {
                                button type="submit" class="danger" { "Delete" }
                            }
                        }
                    }
                }
            }
        }
    }
}
