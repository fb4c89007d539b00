//! Server-side sessions
//!
//! A session row carries the selected display language, the signed-in user
//! (if any) and flash messages waiting to be shown. The browser only holds the
//! opaque id in the `herdbook_session` cookie.
//!
//! Handlers never touch the store directly. They attach markers to their
//! responses ([`PendingFlashes`], [`FlashesShown`], [`SessionChange`]) and
//! [`middleware::session_layer`] applies them after the handler returns.

pub mod extract;
pub mod middleware;

use axum::http::{header, HeaderMap};
use chrono::{DateTime, Duration, Utc};
use herdbook_common::{Language, Message};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use thiserror::Error;
use uuid::Uuid;

pub use extract::{AuthContext, RequestContext};
pub use middleware::session_layer;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "herdbook_session";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// One-shot message shown on the next rendered page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: Message,
}

impl Flash {
    pub fn success(message: Message) -> Self {
        Self {
            level: FlashLevel::Success,
            message,
        }
    }

    pub fn error(message: Message) -> Self {
        Self {
            level: FlashLevel::Error,
            message,
        }
    }

    pub fn text(&self, language: Language) -> &'static str {
        self.message.text(language)
    }
}

/// Response marker: flashes to store for the next page
#[derive(Debug, Clone, Default)]
pub struct PendingFlashes(pub Vec<Flash>);

/// Response marker: the page displayed the pending flashes, drop them
#[derive(Debug, Clone, Copy)]
pub struct FlashesShown;

/// Response marker: replace the current session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionChange {
    /// Re-issue the session bound to a user
    Login { user_id: i64, language: Language },
    /// Destroy the session and start a fresh anonymous one
    Logout,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session storage failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Session flashes could not be encoded: {0}")]
    Encoding(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub user_id: Option<i64>,
    pub language: Language,
    pub flashes: Vec<Flash>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct SessionRecord {
    id: String,
    user_id: Option<i64>,
    language: String,
    flashes: String,
    expires_at: DateTime<Utc>,
}

impl TryFrom<SessionRecord> for Session {
    type Error = SessionError;

    fn try_from(record: SessionRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: record.id,
            user_id: record.user_id,
            language: Language::from_code_or_default(&record.language),
            flashes: serde_json::from_str(&record.flashes)?,
            expires_at: record.expires_at,
        })
    }
}

/// SQLite-backed session store
#[derive(Debug, Clone)]
pub struct SessionStore {
    pool: SqlitePool,
    ttl: Duration,
    cookie_secure: bool,
}

impl SessionStore {
    pub fn new(pool: SqlitePool, ttl_hours: i64, cookie_secure: bool) -> Self {
        Self {
            pool,
            ttl: Duration::hours(ttl_hours),
            cookie_secure,
        }
    }

    /// Live session by id; expired rows are treated as absent
    pub async fn load(&self, id: &str) -> Result<Option<Session>, SessionError> {
        let record = sqlx::query_as::<_, SessionRecord>(
            "SELECT id, user_id, language, flashes, expires_at FROM sessions WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match record {
            Some(record) if record.expires_at > Utc::now() => Ok(Some(record.try_into()?)),
            Some(_) => {
                self.destroy(id).await?;
                Ok(None)
            },
            None => Ok(None),
        }
    }

    #[tracing::instrument(skip(self, flashes), fields(user_id = ?user_id, language = %language))]
    pub async fn create(
        &self,
        user_id: Option<i64>,
        language: Language,
        flashes: &[Flash],
    ) -> Result<Session, SessionError> {
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4().simple().to_string(),
            user_id,
            language,
            flashes: flashes.to_vec(),
            expires_at: now + self.ttl,
        };

        sqlx::query(
            r#"
            INSERT INTO sessions (id, user_id, language, flashes, created_at, expires_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&session.id)
        .bind(session.user_id)
        .bind(session.language.code())
        .bind(serde_json::to_string(&session.flashes)?)
        .bind(now)
        .bind(session.expires_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!("Session created");
        Ok(session)
    }

    pub async fn set_language(&self, id: &str, language: Language) -> Result<(), SessionError> {
        sqlx::query("UPDATE sessions SET language = ? WHERE id = ?")
            .bind(language.code())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn set_flashes(&self, id: &str, flashes: &[Flash]) -> Result<(), SessionError> {
        sqlx::query("UPDATE sessions SET flashes = ? WHERE id = ?")
            .bind(serde_json::to_string(flashes)?)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn destroy(&self, id: &str) -> Result<(), SessionError> {
        sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Delete every expired session, returning how many were removed
    pub async fn purge_expired(&self) -> Result<u64, SessionError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at < ?")
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// `Set-Cookie` value for a session id
    pub fn cookie(&self, id: &str) -> String {
        let mut cookie = format!(
            "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
            SESSION_COOKIE,
            id,
            self.ttl.num_seconds()
        );
        if self.cookie_secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

/// Session id from the request's `Cookie` headers
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::test_pool;
    use axum::http::HeaderValue;

    #[test]
    fn test_session_id_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; herdbook_session=abc123; other=1"),
        );
        assert_eq!(session_id_from_headers(&headers).as_deref(), Some("abc123"));

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("herdbook_session="));
        assert_eq!(session_id_from_headers(&headers), None);
        assert_eq!(session_id_from_headers(&HeaderMap::new()), None);
    }

    #[tokio::test]
    async fn test_create_load_and_destroy() {
        let pool = test_pool().await;
        let store = SessionStore::new(pool, 1, false);

        let session = store
            .create(None, Language::Marathi, &[Flash::success(Message::LoggedOut)])
            .await
            .unwrap();
        let loaded = store.load(&session.id).await.unwrap().unwrap();
        assert_eq!(loaded.language, Language::Marathi);
        assert_eq!(loaded.flashes, vec![Flash::success(Message::LoggedOut)]);
        assert_eq!(loaded.user_id, None);

        store.set_language(&session.id, Language::English).await.unwrap();
        store.set_flashes(&session.id, &[]).await.unwrap();
        let loaded = store.load(&session.id).await.unwrap().unwrap();
        assert_eq!(loaded.language, Language::English);
        assert!(loaded.flashes.is_empty());

        store.destroy(&session.id).await.unwrap();
        assert!(store.load(&session.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_session_is_absent() {
        let pool = test_pool().await;
        let store = SessionStore::new(pool.clone(), 1, false);
        let session = store.create(None, Language::English, &[]).await.unwrap();

        sqlx::query("UPDATE sessions SET expires_at = ? WHERE id = ?")
            .bind(Utc::now() - Duration::minutes(1))
            .bind(&session.id)
            .execute(&pool)
            .await
            .unwrap();

        assert!(store.load(&session.id).await.unwrap().is_none());
        assert_eq!(store.purge_expired().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_cookie_attributes() {
        let pool = test_pool().await;
        let store = SessionStore::new(pool, 1, true);
        let cookie = store.cookie("abc");
        assert!(cookie.starts_with("herdbook_session=abc;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=3600"));
        assert!(cookie.ends_with("; Secure"));
    }
}
