use color_eyre::Result;

use super::models::{AnswerOptionRow, Language, QuestionFull, QuestionRow};
use super::Db;

/// A question parsed out of an import batch, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub text: Option<String>,
    pub image_filename: Option<String>,
    pub explanation: Option<String>,
    pub options: Vec<NewAnswerOption>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAnswerOption {
    pub text: String,
    pub correct: bool,
}

impl Db {
    /// The round's playable question list for one language, in play order,
    /// options attached.
    pub async fn questions_for_round(
        &self,
        round_id: i32,
        language: Language,
    ) -> Result<Vec<QuestionFull>> {
        let questions = sqlx::query_as::<_, QuestionRow>(
            "SELECT * FROM questions WHERE round_id = $1 AND language = $2 ORDER BY order_index",
        )
        .bind(round_id)
        .bind(language.code())
        .fetch_all(&self.pool)
        .await?;

        let mut full = Vec::with_capacity(questions.len());
        for question in questions {
            let options = self.options_for_question(question.id).await?;
            full.push(QuestionFull { question, options });
        }

        Ok(full)
    }

    pub async fn find_question(&self, question_id: i32) -> Result<Option<QuestionFull>> {
        let question = sqlx::query_as::<_, QuestionRow>("SELECT * FROM questions WHERE id = $1")
            .bind(question_id)
            .fetch_optional(&self.pool)
            .await?;

        match question {
            Some(question) => {
                let options = self.options_for_question(question.id).await?;
                Ok(Some(QuestionFull { question, options }))
            }
            None => Ok(None),
        }
    }

    async fn options_for_question(&self, question_id: i32) -> Result<Vec<AnswerOptionRow>> {
        let options = sqlx::query_as::<_, AnswerOptionRow>(
            "SELECT id, order_index, text, image_filename, correct FROM answer_options WHERE question_id = $1 ORDER BY order_index",
        )
        .bind(question_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(options)
    }

    pub async fn count_questions(&self, round_id: i32, language: Language) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM questions WHERE round_id = $1 AND language = $2",
        )
        .bind(round_id)
        .bind(language.code())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Appends an import batch after the round's existing questions for that
    /// language, all-or-nothing. The order-index counter is seeded inside the
    /// transaction so concurrent imports cannot interleave indexes.
    pub async fn insert_questions(
        &self,
        round_id: i32,
        language: Language,
        batch: &[NewQuestion],
    ) -> Result<usize> {
        let mut tx = self.pool.begin().await?;

        let mut order_index: i32 = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM questions WHERE round_id = $1 AND language = $2",
        )
        .bind(round_id)
        .bind(language.code())
        .fetch_one(&mut *tx)
        .await? as i32;

        for question in batch {
            let question_id: i32 = sqlx::query_scalar(
                r#"
                INSERT INTO questions (round_id, order_index, language, text, image_filename, explanation)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id
                "#,
            )
            .bind(round_id)
            .bind(order_index)
            .bind(language.code())
            .bind(&question.text)
            .bind(&question.image_filename)
            .bind(&question.explanation)
            .fetch_one(&mut *tx)
            .await?;

            for (i, option) in question.options.iter().enumerate() {
                sqlx::query(
                    "INSERT INTO answer_options (question_id, order_index, text, correct) VALUES ($1, $2, $3, $4)",
                )
                .bind(question_id)
                .bind(i as i32)
                .bind(&option.text)
                .bind(option.correct)
                .execute(&mut *tx)
                .await?;
            }

            order_index += 1;
        }

        tx.commit().await?;

        tracing::info!(
            "imported {} {} questions for round {round_id}",
            batch.len(),
            language.code()
        );
        Ok(batch.len())
    }

    /// Question edit: new text/explanation plus the four options rewritten by
    /// positional option-id mapping, in one transaction.
    pub async fn update_question(
        &self,
        question_id: i32,
        text: Option<&str>,
        explanation: Option<&str>,
        options: &[(i32, String, bool)],
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE questions SET text = $1, explanation = $2 WHERE id = $3")
            .bind(text)
            .bind(explanation)
            .bind(question_id)
            .execute(&mut *tx)
            .await?;

        for (option_id, option_text, correct) in options {
            sqlx::query(
                "UPDATE answer_options SET text = $1, correct = $2 WHERE id = $3 AND question_id = $4",
            )
            .bind(option_text)
            .bind(correct)
            .bind(option_id)
            .bind(question_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!("question {question_id} updated");
        Ok(())
    }

    pub async fn set_question_image(
        &self,
        question_id: i32,
        image_filename: Option<&str>,
    ) -> Result<()> {
        sqlx::query("UPDATE questions SET image_filename = $1 WHERE id = $2")
            .bind(image_filename)
            .bind(question_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn delete_question(&self, question_id: i32) -> Result<()> {
        sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(question_id)
            .execute(&self.pool)
            .await?;

        tracing::info!("question {question_id} deleted");
        Ok(())
    }
}
