// Database model structs

use chrono::{DateTime, NaiveDate, Utc};

/// Question/user language tag. The catalog is bilingual; each player plays
/// the question set matching their own tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    De,
    En,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::De, Language::En];

    pub fn code(self) -> &'static str {
        match self {
            Language::De => "de",
            Language::En => "en",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Language::De => "German",
            Language::En => "English",
        }
    }

    pub fn parse(code: &str) -> Option<Language> {
        match code {
            "de" => Some(Language::De),
            "en" => Some(Language::En),
            _ => None,
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::De
    }
}

pub const ROLE_PLAYER: &str = "player";
pub const ROLE_ADMIN: &str = "admin";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AuthUser {
    pub id: i32,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub language: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    pub fn language(&self) -> Language {
        Language::parse(&self.language).unwrap_or_default()
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: i32,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub language: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Round {
    pub id: i32,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct QuestionRow {
    pub id: i32,
    pub round_id: i32,
    pub order_index: i32,
    pub language: String,
    pub text: Option<String>,
    pub image_filename: Option<String>,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AnswerOptionRow {
    pub id: i32,
    pub order_index: i32,
    pub text: Option<String>,
    pub image_filename: Option<String>,
    pub correct: bool,
}

/// A question together with its options, ordered for play.
#[derive(Debug, Clone)]
pub struct QuestionFull {
    pub question: QuestionRow,
    pub options: Vec<AnswerOptionRow>,
}

impl QuestionFull {
    pub fn correct_option(&self) -> Option<&AnswerOptionRow> {
        self.options.iter().find(|o| o.correct)
    }

    pub fn option(&self, answer_id: i32) -> Option<&AnswerOptionRow> {
        self.options.iter().find(|o| o.id == answer_id)
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlayerRound {
    pub id: i32,
    pub user_id: i32,
    pub round_id: i32,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub total_score: i32,
    pub current_question_shown_at: Option<DateTime<Utc>>,
}

impl PlayerRound {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// One reviewed answer on the result page: what the question asked, what the
/// player picked, and what it was worth.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AnswerReview {
    pub order_index: i32,
    pub question_text: Option<String>,
    pub selected_text: Option<String>,
    pub correct: bool,
    pub score: i32,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HistoryRow {
    pub player_round_id: i32,
    pub round_name: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub total_score: i32,
}

/// A completed attempt as the scoreboard sees it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CompletedRound {
    pub user_id: i32,
    pub display_name: String,
    pub total_score: i32,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct QuestionCount {
    pub language: String,
    pub count: i64,
}
