pub mod enums;
pub mod models;
pub mod repositories;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use diesel::PgConnection;
use diesel::r2d2::{self, ConnectionManager as DbConnectionManager};

pub type DbPool = r2d2::Pool<DbConnectionManager<PgConnection>>;

pub fn create_pool(config: &Config) -> AppResult<DbPool> {
    let manager = DbConnectionManager::<PgConnection>::new(&config.database_url);
    r2d2::Pool::builder()
        .max_size(config.database_max_connections)
        .build(manager)
        .map_err(|e| AppError::Config(format!("Failed to create database pool: {}", e)))
}

/// Pool that connects on first checkout; nothing is dialed at construction.
pub fn lazy_pool(config: &Config) -> DbPool {
    let manager = DbConnectionManager::<PgConnection>::new(&config.database_url);
    r2d2::Pool::builder()
        .max_size(config.database_max_connections)
        .build_unchecked(manager)
}

/// Runs blocking diesel work on the blocking thread pool.
pub async fn run<F, T>(pool: &DbPool, f: F) -> AppResult<T>
where
    F: FnOnce(&mut PgConnection) -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut conn = pool.get()?;
        f(&mut *conn)
    })
    .await
    .map_err(|e| AppError::internal(format!("Database task failed: {}", e)))?
}
