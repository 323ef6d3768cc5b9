use chrono::NaiveDate;
use color_eyre::Result;

use super::models::{QuestionCount, Round};
use super::Db;

impl Db {
    pub async fn create_round(
        &self,
        name: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Round> {
        let round = sqlx::query_as::<_, Round>(
            "INSERT INTO rounds (name, start_date, end_date) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(name)
        .bind(start_date)
        .bind(end_date)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("round created: id={}, name={name}", round.id);
        Ok(round)
    }

    pub async fn update_round(
        &self,
        id: i32,
        name: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Option<Round>> {
        let round = sqlx::query_as::<_, Round>(
            "UPDATE rounds SET name = $1, start_date = $2, end_date = $3 WHERE id = $4 RETURNING *",
        )
        .bind(name)
        .bind(start_date)
        .bind(end_date)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(round)
    }

    /// Clears every active flag and sets the target's inside one transaction,
    /// so no reader ever sees two active rounds and the partial unique index
    /// on `rounds(active)` is never violated mid-flight.
    pub async fn activate_round(&self, id: i32) -> Result<Option<Round>> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE rounds SET active = FALSE WHERE active")
            .execute(&mut *tx)
            .await?;

        let round = sqlx::query_as::<_, Round>(
            "UPDATE rounds SET active = TRUE WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;

        if round.is_some() {
            tracing::info!("round {id} activated");
        }
        Ok(round)
    }

    pub async fn deactivate_round(&self, id: i32) -> Result<Option<Round>> {
        let round = sqlx::query_as::<_, Round>(
            "UPDATE rounds SET active = FALSE WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(round)
    }

    pub async fn delete_round(&self, id: i32) -> Result<()> {
        sqlx::query("DELETE FROM rounds WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::info!("round {id} deleted");
        Ok(())
    }

    pub async fn rounds(&self) -> Result<Vec<Round>> {
        let rounds = sqlx::query_as::<_, Round>("SELECT * FROM rounds ORDER BY start_date DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(rounds)
    }

    pub async fn find_round(&self, id: i32) -> Result<Option<Round>> {
        let round = sqlx::query_as::<_, Round>("SELECT * FROM rounds WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(round)
    }

    pub async fn active_round(&self) -> Result<Option<Round>> {
        let round = sqlx::query_as::<_, Round>("SELECT * FROM rounds WHERE active")
            .fetch_optional(&self.pool)
            .await?;

        Ok(round)
    }

    /// Per-language question counts for the admin round list.
    pub async fn round_question_counts(&self, round_id: i32) -> Result<Vec<QuestionCount>> {
        let counts = sqlx::query_as::<_, QuestionCount>(
            "SELECT language, COUNT(*) AS count FROM questions WHERE round_id = $1 GROUP BY language ORDER BY language",
        )
        .bind(round_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }
}
