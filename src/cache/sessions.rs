use async_trait::async_trait;
use redis::AsyncCommands;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Session key prefix
const SESSION_PREFIX: &str = "session:";

/// Server-side record of live sessions, keyed by token id (`jti`).
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, jti: &str, user_id: Uuid, ttl: Duration) -> AppResult<()>;

    /// Owner of the session if it is still live.
    async fn lookup(&self, jti: &str) -> AppResult<Option<Uuid>>;

    async fn revoke(&self, jti: &str) -> AppResult<()>;
}

pub struct RedisSessionStore {
    client: redis::Client,
}

impl RedisSessionStore {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }

    async fn get_connection(&self) -> AppResult<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(AppError::from)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn insert(&self, jti: &str, user_id: Uuid, ttl: Duration) -> AppResult<()> {
        let mut conn = self.get_connection().await?;
        let key = format!("{}{}", SESSION_PREFIX, jti);
        let _: () = conn
            .set_ex(&key, user_id.to_string(), ttl.as_secs().max(1))
            .await?;
        Ok(())
    }

    async fn lookup(&self, jti: &str) -> AppResult<Option<Uuid>> {
        let mut conn = self.get_connection().await?;
        let key = format!("{}{}", SESSION_PREFIX, jti);
        let value: Option<String> = conn.get(&key).await?;
        match value {
            Some(raw) => Uuid::parse_str(&raw)
                .map(Some)
                .map_err(|e| AppError::internal(format!("Corrupt session record: {}", e))),
            None => Ok(None),
        }
    }

    async fn revoke(&self, jti: &str) -> AppResult<()> {
        let mut conn = self.get_connection().await?;
        let key = format!("{}{}", SESSION_PREFIX, jti);
        let _: i64 = conn.del(&key).await?;
        Ok(())
    }
}

/// Single-process store; entries expire lazily on lookup.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, (Uuid, Instant)>>,
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn insert(&self, jti: &str, user_id: Uuid, ttl: Duration) -> AppResult<()> {
        let mut sessions = self.sessions.write().await;
        let now = Instant::now();
        sessions.retain(|_, (_, expires_at)| *expires_at > now);
        sessions.insert(jti.to_string(), (user_id, now + ttl));
        Ok(())
    }

    async fn lookup(&self, jti: &str) -> AppResult<Option<Uuid>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(jti)
            .filter(|(_, expires_at)| *expires_at > Instant::now())
            .map(|(user_id, _)| *user_id))
    }

    async fn revoke(&self, jti: &str) -> AppResult<()> {
        self.sessions.write().await.remove(jti);
        Ok(())
    }
}
