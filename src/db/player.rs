use chrono::{DateTime, Utc};
use color_eyre::{eyre::OptionExt, Result};

use super::models::{AnswerReview, CompletedRound, HistoryRow, PlayerRound};
use super::Db;

/// Everything needed to persist one submitted answer.
#[derive(Debug, Clone)]
pub struct RecordAnswer {
    pub player_round_id: i32,
    pub question_id: i32,
    pub answer_id: Option<i32>,
    pub question_shown_at: DateTime<Utc>,
    pub answered_at: DateTime<Utc>,
    pub score: i32,
}

#[derive(Debug, Clone)]
pub struct RecordedAnswer {
    pub player_round: PlayerRound,
    pub answered_count: i64,
}

impl Db {
    /// Find-or-create the one attempt a player gets per round. Two concurrent
    /// starts race through `ON CONFLICT DO NOTHING` and converge on the same
    /// row.
    pub async fn start_player_round(&self, user_id: i32, round_id: i32) -> Result<PlayerRound> {
        let inserted = sqlx::query_as::<_, PlayerRound>(
            r#"
            INSERT INTO player_rounds (user_id, round_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, round_id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(round_id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(player_round) = inserted {
            tracing::info!(
                "player round created: id={}, user={user_id}, round={round_id}",
                player_round.id
            );
            return Ok(player_round);
        }

        self.find_player_round(user_id, round_id)
            .await?
            .ok_or_eyre("player round vanished after conflicting insert")
    }

    pub async fn find_player_round(
        &self,
        user_id: i32,
        round_id: i32,
    ) -> Result<Option<PlayerRound>> {
        let player_round = sqlx::query_as::<_, PlayerRound>(
            "SELECT * FROM player_rounds WHERE user_id = $1 AND round_id = $2",
        )
        .bind(user_id)
        .bind(round_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(player_round)
    }

    pub async fn find_player_round_by_id(&self, id: i32) -> Result<Option<PlayerRound>> {
        let player_round =
            sqlx::query_as::<_, PlayerRound>("SELECT * FROM player_rounds WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(player_round)
    }

    /// Progress is always this count; there is no stored cursor to drift out
    /// of sync with the answer log.
    pub async fn answered_count(&self, player_round_id: i32) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM player_answers WHERE player_round_id = $1")
                .bind(player_round_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// Remembers when the current question went on screen, so a resumed
    /// session keeps the original timer instead of restarting it.
    pub async fn mark_question_shown(
        &self,
        player_round_id: i32,
        shown_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query("UPDATE player_rounds SET current_question_shown_at = $1 WHERE id = $2")
            .bind(shown_at)
            .bind(player_round_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Persists one answer atomically: the insert, the score bump and the
    /// completion check share a transaction. Returns `None` when an answer
    /// for this (player_round, question) pair already exists; the unique
    /// constraint is the authoritative duplicate guard, so two concurrent
    /// submissions cannot both score.
    pub async fn record_answer(
        &self,
        answer: RecordAnswer,
        total_questions: i64,
    ) -> Result<Option<RecordedAnswer>> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO player_answers
                (player_round_id, question_id, answer_id, question_shown_at, answered_at, score)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (player_round_id, question_id) DO NOTHING
            "#,
        )
        .bind(answer.player_round_id)
        .bind(answer.question_id)
        .bind(answer.answer_id)
        .bind(answer.question_shown_at)
        .bind(answer.answered_at)
        .bind(answer.score)
        .execute(&mut *tx)
        .await?;

        if inserted.rows_affected() == 0 {
            tracing::warn!(
                "duplicate answer rejected: player_round={}, question={}",
                answer.player_round_id,
                answer.question_id
            );
            return Ok(None);
        }

        let answered_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM player_answers WHERE player_round_id = $1")
                .bind(answer.player_round_id)
                .fetch_one(&mut *tx)
                .await?;

        let completed_at = (answered_count >= total_questions).then_some(answer.answered_at);

        let player_round = sqlx::query_as::<_, PlayerRound>(
            r#"
            UPDATE player_rounds
            SET total_score = total_score + $1,
                current_question_shown_at = NULL,
                completed_at = COALESCE(completed_at, $2)
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(answer.score)
        .bind(completed_at)
        .bind(answer.player_round_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(RecordedAnswer {
            player_round,
            answered_count,
        }))
    }

    pub async fn player_history(&self, user_id: i32) -> Result<Vec<HistoryRow>> {
        let history = sqlx::query_as::<_, HistoryRow>(
            r#"
            SELECT pr.id AS player_round_id, r.name AS round_name,
                   pr.started_at, pr.completed_at, pr.total_score
            FROM player_rounds pr
            JOIN rounds r ON r.id = pr.round_id
            WHERE pr.user_id = $1
            ORDER BY pr.started_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(history)
    }

    /// The result page's per-question review, in play order. A null selected
    /// option reads as "no answer".
    pub async fn answer_reviews(&self, player_round_id: i32) -> Result<Vec<AnswerReview>> {
        let reviews = sqlx::query_as::<_, AnswerReview>(
            r#"
            SELECT q.order_index, q.text AS question_text, ao.text AS selected_text,
                   COALESCE(ao.correct, FALSE) AS correct, pa.score, q.explanation
            FROM player_answers pa
            JOIN questions q ON q.id = pa.question_id
            LEFT JOIN answer_options ao ON ao.id = pa.answer_id
            WHERE pa.player_round_id = $1
            ORDER BY q.order_index
            "#,
        )
        .bind(player_round_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    /// Completed attempts for a round, best first. Tie order within a score
    /// is whatever the database returns and deliberately unspecified.
    pub async fn completed_player_rounds(&self, round_id: i32) -> Result<Vec<CompletedRound>> {
        let completed = sqlx::query_as::<_, CompletedRound>(
            r#"
            SELECT pr.user_id, u.display_name, pr.total_score
            FROM player_rounds pr
            JOIN users u ON u.id = pr.user_id
            WHERE pr.round_id = $1 AND pr.completed_at IS NOT NULL
            ORDER BY pr.total_score DESC
            "#,
        )
        .bind(round_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(completed)
    }
}
