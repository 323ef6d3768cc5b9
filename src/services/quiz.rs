use std::future::Future;

use chrono::{DateTime, Duration, Utc};
use color_eyre::Result;

use crate::db::player::{RecordAnswer, RecordedAnswer};
use crate::db::{AnswerOptionRow, AuthUser, Db, Language, PlayerRound, QuestionFull, Round};

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Time-weighted scoring: full marks for an instant correct answer, decaying
/// linearly to the floor once the timer runs out. Wrong answers score zero.
#[derive(Debug, Clone, Copy)]
pub struct ScoringConfig {
    pub timer_seconds: u32,
    pub max_score: i32,
    pub min_score: i32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            timer_seconds: 10,
            max_score: 100,
            min_score: 50,
        }
    }
}

impl ScoringConfig {
    pub fn score(&self, shown_at: DateTime<Utc>, answered_at: DateTime<Utc>, correct: bool) -> i32 {
        if !correct {
            return 0;
        }

        let elapsed = (answered_at - shown_at).num_milliseconds() as f64 / 1000.0;
        let timer = f64::from(self.timer_seconds);

        if elapsed <= 0.0 {
            self.max_score
        } else if elapsed >= timer {
            self.min_score
        } else {
            let range = f64::from(self.max_score - self.min_score);
            // `as` truncates toward zero; the interpolated score never rounds up.
            (f64::from(self.max_score) - range * (elapsed / timer)) as i32
        }
    }
}

// ---------------------------------------------------------------------------
// QuizStore trait (the engine defines the storage it needs; Db implements it)
// ---------------------------------------------------------------------------

#[cfg_attr(test, mockall::automock)]
pub trait QuizStore: Send + Sync {
    fn find_round(&self, round_id: i32)
        -> impl Future<Output = Result<Option<Round>>> + Send;

    fn questions_for_round(
        &self,
        round_id: i32,
        language: Language,
    ) -> impl Future<Output = Result<Vec<QuestionFull>>> + Send;

    fn find_question(
        &self,
        question_id: i32,
    ) -> impl Future<Output = Result<Option<QuestionFull>>> + Send;

    fn find_player_round(
        &self,
        user_id: i32,
        round_id: i32,
    ) -> impl Future<Output = Result<Option<PlayerRound>>> + Send;

    fn find_player_round_by_id(
        &self,
        id: i32,
    ) -> impl Future<Output = Result<Option<PlayerRound>>> + Send;

    fn start_player_round(
        &self,
        user_id: i32,
        round_id: i32,
    ) -> impl Future<Output = Result<PlayerRound>> + Send;

    fn answered_count(&self, player_round_id: i32) -> impl Future<Output = Result<i64>> + Send;

    fn mark_question_shown(
        &self,
        player_round_id: i32,
        shown_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<()>> + Send;

    fn record_answer(
        &self,
        answer: RecordAnswer,
        total_questions: i64,
    ) -> impl Future<Output = Result<Option<RecordedAnswer>>> + Send;
}

impl QuizStore for Db {
    fn find_round(&self, round_id: i32) -> impl Future<Output = Result<Option<Round>>> + Send {
        Db::find_round(self, round_id)
    }

    fn questions_for_round(
        &self,
        round_id: i32,
        language: Language,
    ) -> impl Future<Output = Result<Vec<QuestionFull>>> + Send {
        Db::questions_for_round(self, round_id, language)
    }

    fn find_question(
        &self,
        question_id: i32,
    ) -> impl Future<Output = Result<Option<QuestionFull>>> + Send {
        Db::find_question(self, question_id)
    }

    fn find_player_round(
        &self,
        user_id: i32,
        round_id: i32,
    ) -> impl Future<Output = Result<Option<PlayerRound>>> + Send {
        Db::find_player_round(self, user_id, round_id)
    }

    fn find_player_round_by_id(
        &self,
        id: i32,
    ) -> impl Future<Output = Result<Option<PlayerRound>>> + Send {
        Db::find_player_round_by_id(self, id)
    }

    fn start_player_round(
        &self,
        user_id: i32,
        round_id: i32,
    ) -> impl Future<Output = Result<PlayerRound>> + Send {
        Db::start_player_round(self, user_id, round_id)
    }

    fn answered_count(&self, player_round_id: i32) -> impl Future<Output = Result<i64>> + Send {
        Db::answered_count(self, player_round_id)
    }

    fn mark_question_shown(
        &self,
        player_round_id: i32,
        shown_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<()>> + Send {
        Db::mark_question_shown(self, player_round_id, shown_at)
    }

    fn record_answer(
        &self,
        answer: RecordAnswer,
        total_questions: i64,
    ) -> impl Future<Output = Result<Option<RecordedAnswer>>> + Send {
        Db::record_answer(self, answer, total_questions)
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// What the player sees when a round is started or resumed. The current
/// question is always derived from the count of recorded answers, never from
/// a stored cursor, which is what makes resuming after a crash safe.
#[derive(Debug, Clone)]
pub struct QuizState {
    pub player_round: PlayerRound,
    pub current_question_index: usize,
    pub total_questions: usize,
    pub current_question: Option<QuestionFull>,
    pub question_shown_at: Option<DateTime<Utc>>,
    pub is_completed: bool,
}

#[derive(Debug, Clone)]
pub struct AnswerResult {
    pub correct: bool,
    pub score: i32,
    pub correct_answer: Option<AnswerOptionRow>,
    pub explanation: Option<String>,
    pub has_next_question: bool,
    pub player_round: PlayerRound,
}

pub struct QuizService<S: QuizStore = Db> {
    store: S,
    scoring: ScoringConfig,
}

impl<S: QuizStore + Clone> Clone for QuizService<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            scoring: self.scoring,
        }
    }
}

impl<S: QuizStore> QuizService<S> {
    pub fn new(store: S, scoring: ScoringConfig) -> Self {
        Self { store, scoring }
    }

    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    /// A round is playable while it is active and the player has not already
    /// finished it. A completed attempt blocks replay for good.
    pub async fn can_play(&self, user_id: i32, round_id: i32) -> Result<bool> {
        let Some(round) = self.store.find_round(round_id).await? else {
            return Ok(false);
        };
        if !round.active {
            return Ok(false);
        }

        let player_round = self.store.find_player_round(user_id, round_id).await?;
        Ok(player_round.is_none_or(|pr| !pr.is_completed()))
    }

    pub async fn has_completed(&self, user_id: i32, round_id: i32) -> Result<bool> {
        let player_round = self.store.find_player_round(user_id, round_id).await?;
        Ok(player_round.is_some_and(|pr| pr.is_completed()))
    }

    /// Loads or creates the player's attempt and derives the current question
    /// from the number of answers on record. Repeated calls without a
    /// submission serve the same question at the same index.
    pub async fn start_or_resume(
        &self,
        user: &AuthUser,
        round_id: i32,
    ) -> Result<Option<QuizState>> {
        if self.store.find_round(round_id).await?.is_none() {
            return Ok(None);
        }

        let player_round = self.store.start_player_round(user.id, round_id).await?;

        if player_round.is_completed() {
            return Ok(Some(QuizState {
                player_round,
                current_question_index: 0,
                total_questions: 0,
                current_question: None,
                question_shown_at: None,
                is_completed: true,
            }));
        }

        let questions = self
            .store
            .questions_for_round(round_id, user.language())
            .await?;
        let answered = self.store.answered_count(player_round.id).await? as usize;

        let current_question = questions.get(answered).cloned();
        let question_shown_at = match &current_question {
            Some(_) => {
                let now = Utc::now();
                self.store.mark_question_shown(player_round.id, now).await?;
                Some(now)
            }
            None => None,
        };

        let is_completed = current_question.is_none();
        Ok(Some(QuizState {
            player_round,
            current_question_index: answered,
            total_questions: questions.len(),
            current_question,
            question_shown_at,
            is_completed,
        }))
    }

    /// Scores and persists one answer. Refuses (returns `None`) when the
    /// attempt is missing, foreign, or finished, when the question is
    /// unknown, or when this question was already answered; a duplicate
    /// submission never produces a second score.
    pub async fn submit_answer(
        &self,
        user: &AuthUser,
        player_round_id: i32,
        question_id: i32,
        answer_id: Option<i32>,
        question_shown_at: Option<DateTime<Utc>>,
    ) -> Result<Option<AnswerResult>> {
        let Some(player_round) = self.store.find_player_round_by_id(player_round_id).await? else {
            return Ok(None);
        };
        if player_round.user_id != user.id {
            tracing::warn!(
                "user {} tried to answer for player_round {player_round_id} owned by {}",
                user.id,
                player_round.user_id
            );
            return Ok(None);
        }
        if player_round.is_completed() {
            return Ok(None);
        }

        let Some(question) = self.store.find_question(question_id).await? else {
            return Ok(None);
        };

        // An unknown or absent option id means no selection, which scores as
        // an incorrect answer rather than an error.
        let selected = answer_id.and_then(|id| question.option(id)).cloned();

        let answered_at = Utc::now();
        // Without a recorded shown-at the full timer is assumed to have
        // elapsed, capping a correct answer at the minimum score.
        let shown_at = question_shown_at
            .unwrap_or_else(|| answered_at - Duration::seconds(i64::from(self.scoring.timer_seconds)));

        let correct = selected.as_ref().is_some_and(|o| o.correct);
        let score = self.scoring.score(shown_at, answered_at, correct);

        let questions = self
            .store
            .questions_for_round(player_round.round_id, user.language())
            .await?;
        let total_questions = questions.len() as i64;

        let recorded = self
            .store
            .record_answer(
                RecordAnswer {
                    player_round_id,
                    question_id,
                    answer_id: selected.as_ref().map(|o| o.id),
                    question_shown_at: shown_at,
                    answered_at,
                    score,
                },
                total_questions,
            )
            .await?;

        let Some(recorded) = recorded else {
            return Ok(None);
        };

        Ok(Some(AnswerResult {
            correct,
            score,
            correct_answer: question.correct_option().cloned(),
            explanation: question.question.explanation.clone(),
            has_next_question: recorded.answered_count < total_questions,
            player_round: recorded.player_round,
        }))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::QuestionRow;

    fn player(user_id: i32) -> AuthUser {
        AuthUser {
            id: user_id,
            email: format!("player{user_id}@example.com"),
            display_name: format!("Player {user_id}"),
            role: "player".to_string(),
            language: "de".to_string(),
        }
    }

    fn round(id: i32, active: bool) -> Round {
        Round {
            id,
            name: format!("Round {id}"),
            start_date: chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: chrono::NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
            active,
            created_at: Utc::now(),
        }
    }

    fn player_round(id: i32, user_id: i32, round_id: i32, completed: bool) -> PlayerRound {
        PlayerRound {
            id,
            user_id,
            round_id,
            started_at: Utc::now(),
            completed_at: completed.then(Utc::now),
            total_score: 0,
            current_question_shown_at: None,
        }
    }

    fn question(id: i32, order_index: i32, correct_option: i32) -> QuestionFull {
        let options = (0..4)
            .map(|i| AnswerOptionRow {
                id: id * 10 + i,
                order_index: i,
                text: Some(format!("Option {}", i + 1)),
                image_filename: None,
                correct: i == correct_option,
            })
            .collect();

        QuestionFull {
            question: QuestionRow {
                id,
                round_id: 1,
                order_index,
                language: "de".to_string(),
                text: Some(format!("Question {id}?")),
                image_filename: None,
                explanation: Some("Because.".to_string()),
            },
            options,
        }
    }

    fn service(store: MockQuizStore) -> QuizService<MockQuizStore> {
        QuizService::new(store, ScoringConfig::default())
    }

    // ----- scoring -----

    #[test]
    fn score_is_max_for_instant_correct_answer() {
        let scoring = ScoringConfig::default();
        let shown = Utc::now();
        assert_eq!(scoring.score(shown, shown, true), 100);
    }

    #[test]
    fn score_is_min_at_timer_expiry() {
        let scoring = ScoringConfig::default();
        let shown = Utc::now();
        assert_eq!(scoring.score(shown, shown + Duration::seconds(10), true), 50);
    }

    #[test]
    fn score_interpolates_linearly() {
        let scoring = ScoringConfig::default();
        let shown = Utc::now();
        assert_eq!(scoring.score(shown, shown + Duration::seconds(5), true), 75);
        assert_eq!(scoring.score(shown, shown + Duration::seconds(2), true), 90);
    }

    #[test]
    fn score_truncates_toward_zero() {
        let scoring = ScoringConfig::default();
        let shown = Utc::now();
        // 3.3s elapsed: 100 - 50 * 0.33 = 83.5, truncated to 83.
        assert_eq!(
            scoring.score(shown, shown + Duration::milliseconds(3300), true),
            83
        );
    }

    #[test]
    fn score_clamps_past_the_timer() {
        let scoring = ScoringConfig::default();
        let shown = Utc::now();
        assert_eq!(scoring.score(shown, shown + Duration::seconds(100), true), 50);
    }

    #[test]
    fn score_clamps_negative_elapsed_to_max() {
        let scoring = ScoringConfig::default();
        let shown = Utc::now();
        assert_eq!(scoring.score(shown, shown - Duration::seconds(3), true), 100);
    }

    #[test]
    fn incorrect_answer_scores_zero() {
        let scoring = ScoringConfig::default();
        let shown = Utc::now();
        assert_eq!(scoring.score(shown, shown + Duration::seconds(1), false), 0);
        assert_eq!(scoring.score(shown, shown + Duration::seconds(99), false), 0);
    }

    // ----- can_play -----

    #[tokio::test]
    async fn can_play_inactive_round_is_false() {
        let mut store = MockQuizStore::new();
        store
            .expect_find_round()
            .returning(|id| Box::pin(async move { Ok(Some(round(id, false))) }));

        let svc = service(store);
        assert!(!svc.can_play(1, 7).await.unwrap());
    }

    #[tokio::test]
    async fn can_play_missing_round_is_false() {
        let mut store = MockQuizStore::new();
        store
            .expect_find_round()
            .returning(|_| Box::pin(async { Ok(None) }));

        let svc = service(store);
        assert!(!svc.can_play(1, 7).await.unwrap());
    }

    #[tokio::test]
    async fn can_play_completed_attempt_blocks_replay() {
        let mut store = MockQuizStore::new();
        store
            .expect_find_round()
            .returning(|id| Box::pin(async move { Ok(Some(round(id, true))) }));
        store
            .expect_find_player_round()
            .returning(|user_id, round_id| {
                Box::pin(async move { Ok(Some(player_round(5, user_id, round_id, true))) })
            });

        let svc = service(store);
        assert!(!svc.can_play(1, 7).await.unwrap());
    }

    #[tokio::test]
    async fn can_play_in_progress_attempt_is_true() {
        let mut store = MockQuizStore::new();
        store
            .expect_find_round()
            .returning(|id| Box::pin(async move { Ok(Some(round(id, true))) }));
        store
            .expect_find_player_round()
            .returning(|user_id, round_id| {
                Box::pin(async move { Ok(Some(player_round(5, user_id, round_id, false))) })
            });

        let svc = service(store);
        assert!(svc.can_play(1, 7).await.unwrap());
    }

    // ----- start_or_resume -----

    #[tokio::test]
    async fn start_serves_first_question() {
        let mut store = MockQuizStore::new();
        store
            .expect_find_round()
            .returning(|id| Box::pin(async move { Ok(Some(round(id, true))) }));
        store
            .expect_start_player_round()
            .returning(|user_id, round_id| {
                Box::pin(async move { Ok(player_round(5, user_id, round_id, false)) })
            });
        store
            .expect_questions_for_round()
            .returning(|_, _| Box::pin(async { Ok(vec![question(1, 0, 1), question(2, 1, 0)]) }));
        store
            .expect_answered_count()
            .returning(|_| Box::pin(async { Ok(0) }));
        store
            .expect_mark_question_shown()
            .returning(|_, _| Box::pin(async { Ok(()) }));

        let svc = service(store);
        let state = svc.start_or_resume(&player(1), 7).await.unwrap().unwrap();

        assert_eq!(state.current_question_index, 0);
        assert_eq!(state.total_questions, 2);
        assert_eq!(state.current_question.unwrap().question.id, 1);
        assert!(state.question_shown_at.is_some());
        assert!(!state.is_completed);
    }

    #[tokio::test]
    async fn resume_derives_index_from_answer_count() {
        let mut store = MockQuizStore::new();
        store
            .expect_find_round()
            .returning(|id| Box::pin(async move { Ok(Some(round(id, true))) }));
        store
            .expect_start_player_round()
            .returning(|user_id, round_id| {
                Box::pin(async move { Ok(player_round(5, user_id, round_id, false)) })
            });
        store
            .expect_questions_for_round()
            .returning(|_, _| {
                Box::pin(async { Ok(vec![question(1, 0, 1), question(2, 1, 0), question(3, 2, 2)]) })
            });
        store
            .expect_answered_count()
            .returning(|_| Box::pin(async { Ok(2) }));
        store
            .expect_mark_question_shown()
            .returning(|_, _| Box::pin(async { Ok(()) }));

        let svc = service(store);

        // Same question and index on every call while nothing is submitted.
        for _ in 0..3 {
            let state = svc.start_or_resume(&player(1), 7).await.unwrap().unwrap();
            assert_eq!(state.current_question_index, 2);
            assert_eq!(state.current_question.as_ref().unwrap().question.id, 3);
            assert!(!state.is_completed);
        }
    }

    #[tokio::test]
    async fn start_on_completed_attempt_is_terminal() {
        let mut store = MockQuizStore::new();
        store
            .expect_find_round()
            .returning(|id| Box::pin(async move { Ok(Some(round(id, true))) }));
        store
            .expect_start_player_round()
            .returning(|user_id, round_id| {
                Box::pin(async move { Ok(player_round(5, user_id, round_id, true)) })
            });

        let svc = service(store);
        let state = svc.start_or_resume(&player(1), 7).await.unwrap().unwrap();

        assert!(state.is_completed);
        assert!(state.current_question.is_none());
        assert!(state.question_shown_at.is_none());
    }

    #[tokio::test]
    async fn start_on_missing_round_is_none() {
        let mut store = MockQuizStore::new();
        store
            .expect_find_round()
            .returning(|_| Box::pin(async { Ok(None) }));

        let svc = service(store);
        assert!(svc.start_or_resume(&player(1), 7).await.unwrap().is_none());
    }

    // ----- submit_answer -----

    fn submit_store(total: usize, answered_after: i64, completed_after: bool) -> MockQuizStore {
        let mut store = MockQuizStore::new();
        store
            .expect_find_player_round_by_id()
            .returning(|id| Box::pin(async move { Ok(Some(player_round(id, 1, 7, false))) }));
        store
            .expect_find_question()
            .returning(|id| Box::pin(async move { Ok(Some(question(id, 0, 1))) }));
        store.expect_questions_for_round().returning(move |_, _| {
            Box::pin(async move {
                Ok((0..total as i32).map(|i| question(i + 1, i, 1)).collect())
            })
        });
        store.expect_record_answer().returning(move |answer, _| {
            Box::pin(async move {
                let mut pr = player_round(answer.player_round_id, 1, 7, completed_after);
                pr.total_score = answer.score;
                Ok(Some(RecordedAnswer {
                    player_round: pr,
                    answered_count: answered_after,
                }))
            })
        });
        store
    }

    #[tokio::test]
    async fn submit_correct_answer_scores_and_advances() {
        let svc = service(submit_store(2, 1, false));

        // Shown-at slightly in the future clamps elapsed to zero: full score,
        // without depending on test wall-clock time.
        let shown = Utc::now() + Duration::seconds(1);
        let result = svc
            .submit_answer(&player(1), 5, 1, Some(11), Some(shown))
            .await
            .unwrap()
            .unwrap();

        assert!(result.correct);
        assert_eq!(result.score, 100);
        assert!(result.has_next_question);
        assert_eq!(result.correct_answer.unwrap().id, 11);
        assert_eq!(result.explanation.as_deref(), Some("Because."));
    }

    #[tokio::test]
    async fn submit_wrong_answer_scores_zero() {
        let svc = service(submit_store(2, 1, false));

        let result = svc
            .submit_answer(&player(1), 5, 1, Some(12), Some(Utc::now()))
            .await
            .unwrap()
            .unwrap();

        assert!(!result.correct);
        assert_eq!(result.score, 0);
    }

    #[tokio::test]
    async fn submit_without_selection_is_incorrect() {
        let svc = service(submit_store(2, 1, false));

        let result = svc
            .submit_answer(&player(1), 5, 1, None, Some(Utc::now()))
            .await
            .unwrap()
            .unwrap();

        assert!(!result.correct);
        assert_eq!(result.score, 0);
    }

    #[tokio::test]
    async fn submit_with_unknown_option_id_is_incorrect() {
        let svc = service(submit_store(2, 1, false));

        let result = svc
            .submit_answer(&player(1), 5, 1, Some(9999), Some(Utc::now()))
            .await
            .unwrap()
            .unwrap();

        assert!(!result.correct);
        assert_eq!(result.score, 0);
    }

    #[tokio::test]
    async fn submit_without_shown_at_caps_at_min_score() {
        let svc = service(submit_store(2, 1, false));

        let result = svc
            .submit_answer(&player(1), 5, 1, Some(11), None)
            .await
            .unwrap()
            .unwrap();

        assert!(result.correct);
        assert_eq!(result.score, 50);
    }

    #[tokio::test]
    async fn submit_final_answer_completes_the_round() {
        let svc = service(submit_store(2, 2, true));

        let result = svc
            .submit_answer(&player(1), 5, 2, Some(21), Some(Utc::now() - Duration::seconds(12)))
            .await
            .unwrap()
            .unwrap();

        assert!(result.correct);
        assert_eq!(result.score, 50);
        assert!(!result.has_next_question);
        assert!(result.player_round.is_completed());
    }

    #[tokio::test]
    async fn submit_duplicate_is_refused() {
        let mut store = MockQuizStore::new();
        store
            .expect_find_player_round_by_id()
            .returning(|id| Box::pin(async move { Ok(Some(player_round(id, 1, 7, false))) }));
        store
            .expect_find_question()
            .returning(|id| Box::pin(async move { Ok(Some(question(id, 0, 1))) }));
        store
            .expect_questions_for_round()
            .returning(|_, _| Box::pin(async { Ok(vec![question(1, 0, 1), question(2, 1, 1)]) }));
        // The storage-level unique constraint reports the answer already exists.
        store
            .expect_record_answer()
            .returning(|_, _| Box::pin(async { Ok(None) }));

        let svc = service(store);
        let result = svc
            .submit_answer(&player(1), 5, 1, Some(11), Some(Utc::now()))
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn submit_on_completed_round_is_refused() {
        let mut store = MockQuizStore::new();
        store
            .expect_find_player_round_by_id()
            .returning(|id| Box::pin(async move { Ok(Some(player_round(id, 1, 7, true))) }));

        let svc = service(store);
        let result = svc
            .submit_answer(&player(1), 5, 1, Some(11), Some(Utc::now()))
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn submit_for_foreign_player_round_is_refused() {
        let mut store = MockQuizStore::new();
        store
            .expect_find_player_round_by_id()
            .returning(|id| Box::pin(async move { Ok(Some(player_round(id, 42, 7, false))) }));

        let svc = service(store);
        let result = svc
            .submit_answer(&player(1), 5, 1, Some(11), Some(Utc::now()))
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn submit_on_missing_player_round_is_refused() {
        let mut store = MockQuizStore::new();
        store
            .expect_find_player_round_by_id()
            .returning(|_| Box::pin(async { Ok(None) }));

        let svc = service(store);
        let result = svc
            .submit_answer(&player(1), 5, 1, Some(11), Some(Utc::now()))
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn submit_on_missing_question_is_refused() {
        let mut store = MockQuizStore::new();
        store
            .expect_find_player_round_by_id()
            .returning(|id| Box::pin(async move { Ok(Some(player_round(id, 1, 7, false))) }));
        store
            .expect_find_question()
            .returning(|_| Box::pin(async { Ok(None) }));

        let svc = service(store);
        let result = svc
            .submit_answer(&player(1), 5, 999, Some(11), Some(Utc::now()))
            .await
            .unwrap();

        assert!(result.is_none());
    }
}
