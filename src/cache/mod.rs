pub mod sessions;

pub use sessions::{MemorySessionStore, RedisSessionStore, SessionStore};

use std::sync::Arc;

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Picks the Redis store when `REDIS_URL` is configured, the in-process store otherwise.
pub fn session_store_from_config(config: &Config) -> AppResult<Arc<dyn SessionStore>> {
    match &config.redis_url {
        Some(url) => {
            let client = redis::Client::open(url.as_str())
                .map_err(|e| AppError::Config(format!("Failed to create Redis client: {}", e)))?;
            tracing::info!("Using Redis session store");
            Ok(Arc::new(RedisSessionStore::new(client)))
        }
        None => {
            if config.node_env.is_production() {
                tracing::warn!(
                    "REDIS_URL is not set; sessions are kept in process memory and will not survive restarts"
                );
            } else {
                tracing::info!("Using in-memory session store");
            }
            Ok(Arc::new(MemorySessionStore::default()))
        }
    }
}
