use std::future::Future;

use base64::Engine as _;
use chrono::{DateTime, Duration, Utc};
use color_eyre::{eyre::OptionExt, Result};
use rand::Rng;

use crate::db::{AuthUser, Db};
use crate::email::ResendEmailSender;

// ---------------------------------------------------------------------------
// TokenStore trait (the service defines the storage it needs; Db implements it)
// ---------------------------------------------------------------------------

#[cfg_attr(test, mockall::automock)]
pub trait TokenStore: Send + Sync {
    fn find_user_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<AuthUser>>> + Send;

    fn find_auth_user(&self, id: i32) -> impl Future<Output = Result<Option<AuthUser>>> + Send;

    fn insert_magic_token(
        &self,
        token: &str,
        user_id: i32,
        expires_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<()>> + Send;

    fn consume_magic_token(&self, token: &str)
        -> impl Future<Output = Result<Option<i32>>> + Send;

    fn create_user_session(&self, user_id: i32) -> impl Future<Output = Result<String>> + Send;

    fn delete_user_session(&self, session_id: &str) -> impl Future<Output = Result<()>> + Send;

    fn sweep_magic_tokens(&self) -> impl Future<Output = Result<u64>> + Send;
}

impl TokenStore for Db {
    fn find_user_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<AuthUser>>> + Send {
        Db::find_user_by_email(self, email)
    }

    fn find_auth_user(&self, id: i32) -> impl Future<Output = Result<Option<AuthUser>>> + Send {
        Db::find_auth_user(self, id)
    }

    fn insert_magic_token(
        &self,
        token: &str,
        user_id: i32,
        expires_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<()>> + Send {
        Db::insert_magic_token(self, token, user_id, expires_at)
    }

    fn consume_magic_token(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<Option<i32>>> + Send {
        Db::consume_magic_token(self, token)
    }

    fn create_user_session(&self, user_id: i32) -> impl Future<Output = Result<String>> + Send {
        Db::create_user_session(self, user_id)
    }

    fn delete_user_session(&self, session_id: &str) -> impl Future<Output = Result<()>> + Send {
        Db::delete_user_session(self, session_id)
    }

    fn sweep_magic_tokens(&self) -> impl Future<Output = Result<u64>> + Send {
        Db::sweep_magic_tokens(self)
    }
}

// ---------------------------------------------------------------------------
// EmailSender trait
// ---------------------------------------------------------------------------

#[cfg_attr(test, mockall::automock)]
pub trait EmailSender: Send + Sync {
    /// Whether email delivery is configured (false in dev mode, where the
    /// login link is logged instead of sent).
    fn is_enabled(&self) -> bool;

    fn send_magic_link(
        &self,
        to_email: &str,
        magic_url: &str,
        expiry_minutes: i64,
    ) -> impl Future<Output = Result<()>> + Send;
}

// ---------------------------------------------------------------------------
// AuthService
// ---------------------------------------------------------------------------

pub struct AuthService<R: TokenStore = Db, E: EmailSender = ResendEmailSender> {
    repo: R,
    email: E,
    base_url: String,
    expiry_minutes: i64,
}

impl<R: TokenStore + Clone, E: EmailSender + Clone> Clone for AuthService<R, E> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            email: self.email.clone(),
            base_url: self.base_url.clone(),
            expiry_minutes: self.expiry_minutes,
        }
    }
}

impl<R: TokenStore, E: EmailSender> AuthService<R, E> {
    pub fn new(repo: R, email: E, base_url: String, expiry_minutes: i64) -> Self {
        Self {
            repo,
            email,
            base_url,
            expiry_minutes,
        }
    }

    /// Issues a single-use login link for an existing account. The outcome is
    /// identical from the caller's point of view whether or not the address
    /// has an account, and an email delivery failure does not bubble up
    /// either, so nothing about account existence leaks.
    pub async fn request_magic_link(&self, email: &str) -> Result<()> {
        let normalized = email.trim().to_lowercase();

        let Some(user) = self.repo.find_user_by_email(&normalized).await? else {
            tracing::info!("magic link requested for unknown address");
            return Ok(());
        };

        let token = generate_token();
        let expires_at = Utc::now() + Duration::minutes(self.expiry_minutes);
        self.repo
            .insert_magic_token(&token, user.id, expires_at)
            .await?;

        let magic_url = format!("{}/auth/verify?token={}", self.base_url, token);

        if self.email.is_enabled() {
            if let Err(e) = self
                .email
                .send_magic_link(&normalized, &magic_url, self.expiry_minutes)
                .await
            {
                tracing::error!("failed to send magic link to {normalized}: {e}");
            }
        } else {
            tracing::info!("email disabled, magic link for {normalized}: {magic_url}");
        }

        Ok(())
    }

    /// Burns the token and opens a session for its user. Used or expired
    /// tokens fail closed; a token verifies at most once.
    pub async fn verify_magic_link(&self, token: &str) -> Result<Option<(AuthUser, String)>> {
        let Some(user_id) = self.repo.consume_magic_token(token).await? else {
            return Ok(None);
        };

        let user = self
            .repo
            .find_auth_user(user_id)
            .await?
            .ok_or_eyre("magic token points at a missing user")?;

        let session_id = self.repo.create_user_session(user.id).await?;

        tracing::info!("user {} logged in via magic link", user.id);
        Ok(Some((user, session_id)))
    }

    pub async fn logout(&self, session_id: &str) -> Result<()> {
        self.repo.delete_user_session(session_id).await
    }

    pub async fn cleanup_expired_tokens(&self) -> Result<u64> {
        let swept = self.repo.sweep_magic_tokens().await?;
        if swept > 0 {
            tracing::info!("swept {swept} expired or used magic tokens");
        }
        Ok(swept)
    }
}

/// 32 random bytes, URL-safe base64 without padding.
fn generate_token() -> String {
    let bytes: [u8; 32] = rand::thread_rng().gen();
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn auth_user(id: i32) -> AuthUser {
        AuthUser {
            id,
            email: "player@example.com".to_string(),
            display_name: "Player".to_string(),
            role: "player".to_string(),
            language: "de".to_string(),
        }
    }

    fn mock_email_disabled() -> MockEmailSender {
        let mut mock = MockEmailSender::new();
        mock.expect_is_enabled().returning(|| false);
        mock
    }

    fn mock_email_ok() -> MockEmailSender {
        let mut mock = MockEmailSender::new();
        mock.expect_is_enabled().returning(|| true);
        mock.expect_send_magic_link()
            .returning(|_, _, _| Box::pin(async { Ok(()) }));
        mock
    }

    fn mock_email_fail() -> MockEmailSender {
        let mut mock = MockEmailSender::new();
        mock.expect_is_enabled().returning(|| true);
        mock.expect_send_magic_link()
            .returning(|_, _, _| Box::pin(async { Err(color_eyre::eyre::eyre!("send failed")) }));
        mock
    }

    fn service(repo: MockTokenStore, email: MockEmailSender) -> AuthService<MockTokenStore, MockEmailSender> {
        AuthService::new(repo, email, "http://localhost:3000".to_string(), 15)
    }

    #[test]
    fn generated_tokens_are_long_and_unique() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), 43);
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[tokio::test]
    async fn magic_link_for_unknown_address_succeeds_without_a_token() {
        let mut repo = MockTokenStore::new();
        repo.expect_find_user_by_email()
            .returning(|_| Box::pin(async { Ok(None) }));
        repo.expect_insert_magic_token().never();

        let svc = service(repo, mock_email_disabled());
        svc.request_magic_link("nobody@example.com").await.unwrap();
    }

    #[tokio::test]
    async fn magic_link_for_known_address_stores_token_and_sends() {
        let mut repo = MockTokenStore::new();
        repo.expect_find_user_by_email()
            .withf(|email| email == "player@example.com")
            .returning(|_| Box::pin(async { Ok(Some(auth_user(1))) }));
        repo.expect_insert_magic_token()
            .withf(|token, user_id, expires_at| {
                token.len() == 43 && *user_id == 1 && *expires_at > Utc::now()
            })
            .returning(|_, _, _| Box::pin(async { Ok(()) }));

        let svc = service(repo, mock_email_ok());
        // Address is normalized before lookup.
        svc.request_magic_link("  Player@Example.COM ").await.unwrap();
    }

    #[tokio::test]
    async fn magic_link_email_failure_still_succeeds() {
        let mut repo = MockTokenStore::new();
        repo.expect_find_user_by_email()
            .returning(|_| Box::pin(async { Ok(Some(auth_user(1))) }));
        repo.expect_insert_magic_token()
            .returning(|_, _, _| Box::pin(async { Ok(()) }));

        let svc = service(repo, mock_email_fail());
        svc.request_magic_link("player@example.com").await.unwrap();
    }

    #[tokio::test]
    async fn verify_valid_token_opens_a_session() {
        let mut repo = MockTokenStore::new();
        repo.expect_consume_magic_token()
            .withf(|token| token == "good-token")
            .returning(|_| Box::pin(async { Ok(Some(1)) }));
        repo.expect_find_auth_user()
            .returning(|id| Box::pin(async move { Ok(Some(auth_user(id))) }));
        repo.expect_create_user_session()
            .returning(|_| Box::pin(async { Ok("session-abc".to_string()) }));

        let svc = service(repo, mock_email_disabled());
        let (user, session) = svc.verify_magic_link("good-token").await.unwrap().unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(session, "session-abc");
    }

    #[tokio::test]
    async fn verify_spent_or_expired_token_fails_closed() {
        let mut repo = MockTokenStore::new();
        repo.expect_consume_magic_token()
            .returning(|_| Box::pin(async { Ok(None) }));
        repo.expect_create_user_session().never();

        let svc = service(repo, mock_email_disabled());
        assert!(svc.verify_magic_link("spent-token").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn logout_deletes_the_session() {
        let mut repo = MockTokenStore::new();
        repo.expect_delete_user_session()
            .withf(|id| id == "session-123")
            .returning(|_| Box::pin(async { Ok(()) }));

        let svc = service(repo, mock_email_disabled());
        svc.logout("session-123").await.unwrap();
    }

    #[tokio::test]
    async fn cleanup_reports_swept_tokens() {
        let mut repo = MockTokenStore::new();
        repo.expect_sweep_magic_tokens()
            .returning(|| Box::pin(async { Ok(7) }));

        let svc = service(repo, mock_email_disabled());
        assert_eq!(svc.cleanup_expired_tokens().await.unwrap(), 7);
    }
}
