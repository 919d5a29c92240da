/// Server-side web sessions
///
/// The cookie carries only an opaque session id; values live in the
/// `web_session` table and are written inside the request transaction.
mod flash;

pub use flash::{Flash, FlashKind};

use crate::error::{KumanoError, KumanoResult};
use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use sqlx::{Row, SqliteConnection, SqlitePool};
use uuid::Uuid;

/// Account the visitor is logged in as
pub const CURRENT_ACCOUNT_ID: &str = "current_account_id";
/// Placeholder account awaiting external authentication
pub const PENDING_INVITEE_ID: &str = "pending_invitee_id";
/// CSRF state for an in-flight provider redirect
pub const OAUTH_STATE: &str = "oauth_state";
const FLASH_KEY: &str = "_flash";

/// A visitor's session
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    data: Map<String, Value>,
    dirty: bool,
}

impl Session {
    /// Fresh, unsaved session with a random id
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            data: Map::new(),
            dirty: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.data
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> KumanoResult<()> {
        let value = serde_json::to_value(value)
            .map_err(|e| KumanoError::Session(format!("Failed to encode {}: {}", key, e)))?;
        self.data.insert(key.to_string(), value);
        self.dirty = true;
        Ok(())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let removed = self.data.remove(key);
        if removed.is_some() {
            self.dirty = true;
        }
        removed
    }

    /// Get and remove in one step
    pub fn take<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        self.remove(key).and_then(|v| serde_json::from_value(v).ok())
    }

    pub fn clear(&mut self) {
        self.data.clear();
        self.dirty = true;
    }

    /// Move the values to a fresh id. The old id stops resolving once the
    /// request scope saves the session.
    pub fn regenerate(&mut self) {
        self.id = Uuid::new_v4().to_string();
        self.dirty = true;
    }

    /// Queue a message for the next rendered page
    pub fn flash(&mut self, kind: FlashKind, message: impl Into<String>) -> KumanoResult<()> {
        let mut flashes: Vec<Flash> = self.get(FLASH_KEY).unwrap_or_default();
        flashes.push(Flash::new(kind, message));
        self.set(FLASH_KEY, flashes)
    }

    /// Drain queued messages
    pub fn take_flashes(&mut self) -> Vec<Flash> {
        self.take(FLASH_KEY).unwrap_or_default()
    }

    /// Account id this session is logged in as
    pub fn current_account_id(&self) -> Option<String> {
        self.get(CURRENT_ACCOUNT_ID)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Loads and persists sessions
#[derive(Debug, Clone)]
pub struct SessionStore {
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    /// Load an unexpired session by id
    pub async fn load(&self, conn: &mut SqliteConnection, id: &str) -> KumanoResult<Option<Session>> {
        let row = sqlx::query("SELECT data, expires_at FROM web_session WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let expires_at: DateTime<Utc> = row.try_get("expires_at")?;
        if expires_at < Utc::now() {
            return Ok(None);
        }

        let raw: String = row.try_get("data")?;
        let data = serde_json::from_str(&raw)
            .map_err(|e| KumanoError::Session(format!("Corrupt session {}: {}", id, e)))?;

        Ok(Some(Session {
            id: id.to_string(),
            data,
            dirty: false,
        }))
    }

    /// Write the session and extend its expiry
    pub async fn save(&self, conn: &mut SqliteConnection, session: &mut Session) -> KumanoResult<()> {
        let data = serde_json::to_string(&session.data)
            .map_err(|e| KumanoError::Session(format!("Failed to encode session: {}", e)))?;
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO web_session (id, data, created_at, expires_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET data = excluded.data, expires_at = excluded.expires_at",
        )
        .bind(&session.id)
        .bind(&data)
        .bind(now)
        .bind(now + self.ttl)
        .execute(&mut *conn)
        .await
        .map_err(|e| KumanoError::Session(format!("Failed to save session: {}", e)))?;

        session.dirty = false;
        Ok(())
    }

    pub async fn destroy(&self, conn: &mut SqliteConnection, id: &str) -> KumanoResult<()> {
        sqlx::query("DELETE FROM web_session WHERE id = ?1")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    /// Delete sessions past their expiry
    pub async fn cleanup_expired(&self, pool: &SqlitePool) -> KumanoResult<u64> {
        let result = sqlx::query("DELETE FROM web_session WHERE expires_at < ?1")
            .bind(Utc::now())
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{self, DatabaseOptions};
    use tempfile::TempDir;

    #[test]
    fn test_set_get_take() {
        let mut session = Session::new();
        assert!(!session.is_dirty());

        session.set(PENDING_INVITEE_ID, "acct-1").unwrap();
        assert!(session.is_dirty());
        assert_eq!(session.get::<String>(PENDING_INVITEE_ID).as_deref(), Some("acct-1"));

        assert_eq!(session.take::<String>(PENDING_INVITEE_ID).as_deref(), Some("acct-1"));
        assert_eq!(session.get::<String>(PENDING_INVITEE_ID), None);
    }

    #[test]
    fn test_flashes_drain_once() {
        let mut session = Session::new();
        session.flash(FlashKind::Success, "one").unwrap();
        session.flash(FlashKind::Danger, "two").unwrap();

        let flashes = session.take_flashes();
        assert_eq!(flashes.len(), 2);
        assert_eq!(flashes[1].kind, FlashKind::Danger);
        assert!(session.take_flashes().is_empty());
    }

    #[test]
    fn test_regenerate_keeps_values() {
        let mut session = Session::new();
        session.set(CURRENT_ACCOUNT_ID, "acct-3").unwrap();
        let before = session.id().to_string();

        session.regenerate();
        assert_ne!(session.id(), before);
        assert!(session.is_dirty());
        assert_eq!(session.current_account_id().as_deref(), Some("acct-3"));
    }

    #[tokio::test]
    async fn test_save_load_and_expire() {
        let dir = TempDir::new().unwrap();
        let pool = db::create_pool(&dir.path().join("s.sqlite"), DatabaseOptions::default())
            .await
            .unwrap();
        db::run_migrations(&pool).await.unwrap();
        let mut conn = pool.acquire().await.unwrap();

        let store = SessionStore::new(Duration::hours(1));
        let mut session = Session::new();
        session.set(CURRENT_ACCOUNT_ID, "acct-7").unwrap();
        store.save(&mut conn, &mut session).await.unwrap();
        assert!(!session.is_dirty());

        let loaded = store.load(&mut conn, session.id()).await.unwrap().unwrap();
        assert_eq!(loaded.current_account_id().as_deref(), Some("acct-7"));

        let expired = SessionStore::new(Duration::hours(-1));
        let mut stale = Session::new();
        expired.save(&mut conn, &mut stale).await.unwrap();
        assert!(store.load(&mut conn, stale.id()).await.unwrap().is_none());

        drop(conn);
        assert_eq!(store.cleanup_expired(&pool).await.unwrap(), 1);
    }
}
