use color_eyre::Result;
use ulid::Ulid;

use super::models::{AuthUser, UserRow};
use super::Db;

impl Db {
    /// Returns `None` when the email is already taken.
    pub async fn create_user(
        &self,
        email: &str,
        display_name: &str,
        role: &str,
        language: &str,
    ) -> Result<Option<UserRow>> {
        let user = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (email, display_name, role, language)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(display_name)
        .bind(role)
        .bind(language)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(user) = &user {
            tracing::info!("user created: id={}, email={email}", user.id);
        }
        Ok(user)
    }

    pub async fn users(&self) -> Result<Vec<UserRow>> {
        let users = sqlx::query_as::<_, UserRow>("SELECT * FROM users ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    pub async fn find_user(&self, id: i32) -> Result<Option<UserRow>> {
        let user = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn find_auth_user(&self, id: i32) -> Result<Option<AuthUser>> {
        let user = sqlx::query_as::<_, AuthUser>(
            "SELECT id, email, display_name, role, language FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>> {
        let user = sqlx::query_as::<_, AuthUser>(
            "SELECT id, email, display_name, role, language FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn update_user(
        &self,
        id: i32,
        display_name: &str,
        role: &str,
        language: &str,
    ) -> Result<()> {
        sqlx::query("UPDATE users SET display_name = $1, role = $2, language = $3 WHERE id = $4")
            .bind(display_name)
            .bind(role)
            .bind(language)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn delete_user(&self, id: i32) -> Result<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::info!("user {id} deleted");
        Ok(())
    }

    pub async fn create_user_session(&self, user_id: i32) -> Result<String> {
        let session = Ulid::new().to_string();

        sqlx::query("INSERT INTO user_sessions (id, user_id) VALUES ($1, $2)")
            .bind(&session)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        tracing::info!("new user session created for user_id={user_id}");
        Ok(session)
    }

    pub async fn get_user_by_session(&self, session_id: &str) -> Result<Option<AuthUser>> {
        let user = sqlx::query_as::<_, AuthUser>(
            r#"
            SELECT u.id, u.email, u.display_name, u.role, u.language
            FROM user_sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.id = $1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn delete_user_session(&self, session_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM user_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
