use chrono::{DateTime, Utc};
use color_eyre::Result;

use super::Db;

impl Db {
    pub async fn insert_magic_token(
        &self,
        token: &str,
        user_id: i32,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query("INSERT INTO magic_tokens (token, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(token)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Burns the token and returns its user in one conditional update: a
    /// token verifies at most once, and an expired one fails closed.
    pub async fn consume_magic_token(&self, token: &str) -> Result<Option<i32>> {
        let user_id: Option<i32> = sqlx::query_scalar(
            r#"
            UPDATE magic_tokens
            SET used = TRUE
            WHERE token = $1 AND NOT used AND expires_at > now()
            RETURNING user_id
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user_id)
    }

    pub async fn sweep_magic_tokens(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM magic_tokens WHERE used OR expires_at < now()")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
