pub const HOME_URL: &str = "/";
pub const LOGIN_URL: &str = "/auth/login";
pub const MAGIC_LINK_URL: &str = "/auth/magic-link";
pub const CHECK_EMAIL_URL: &str = "/auth/check-email";
pub const LOGOUT_URL: &str = "/logout";

pub const QUIZ_URL: &str = "/quiz";
pub const SUBMIT_ANSWER_URL: &str = "/quiz/answer";
pub const QUIZ_HISTORY_URL: &str = "/quiz/history";
pub const SCOREBOARD_URL: &str = "/scoreboard";

pub const ADMIN_URL: &str = "/admin";
pub const ADMIN_ROUNDS_URL: &str = "/admin/rounds";
pub const ADMIN_USERS_URL: &str = "/admin/users";

pub const USER_SESSION_COOKIE_NAME: &str = "user_session";

pub fn start_quiz_url(round_id: i32) -> String {
    format!("/quiz/start/{round_id}")
}

pub fn continue_quiz_url(player_round_id: i32) -> String {
    format!("/quiz/continue/{player_round_id}")
}

pub fn quiz_result_url(player_round_id: i32) -> String {
    format!("/quiz/result/{player_round_id}")
}

pub fn scoreboard_url(round_id: i32) -> String {
    format!("/scoreboard?round_id={round_id}")
}

pub fn round_questions_url(round_id: i32) -> String {
    format!("/admin/rounds/{round_id}/questions")
}

pub fn round_import_url(round_id: i32) -> String {
    format!("/admin/rounds/{round_id}/questions/import")
}

pub fn round_images_url(round_id: i32) -> String {
    format!("/admin/rounds/{round_id}/images/upload")
}

pub fn image_url(filename: &str) -> String {
    if filename.starts_with("http") {
        filename.to_string()
    } else {
        format!("/images/{filename}")
    }
}
