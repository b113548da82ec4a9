pub mod auth;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod schema;
pub mod services;
pub mod stripe;
pub mod validation;
pub mod websocket;

use crate::auth::{AuthHub, ConfirmationSigner};
use crate::cache::SessionStore;
use crate::config::Config;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::middleware::auth::{SessionResolver, TokenService};
use crate::stripe::{StripeLoader, StripeServer};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Arc<Config>,
    pub sessions: SessionResolver,
    pub auth_hub: AuthHub,
    pub confirmations: ConfirmationSigner,
    pub stripe: StripeServer,
    pub stripe_loader: StripeLoader,
}

impl AppState {
    /// Fails when the Stripe server secrets are missing or malformed.
    pub fn new(db: DbPool, config: Config, store: Arc<dyn SessionStore>) -> AppResult<Self> {
        let stripe_config = config.stripe();
        let stripe = StripeServer::from_config(&stripe_config)?;
        let stripe_loader = StripeLoader::new(stripe_config.publishable_key);

        let tokens = TokenService::new(
            config.jwt_secret.clone(),
            Duration::from_secs(config.session_ttl_secs),
        );
        let confirmations = ConfirmationSigner::new(&config.jwt_secret);

        Ok(Self {
            db,
            sessions: SessionResolver::new(tokens, store),
            auth_hub: AuthHub::new(),
            confirmations,
            stripe,
            stripe_loader,
            config: Arc::new(config),
        })
    }
}

pub fn init_tracing(config: &Config) {
    let logging = config.logging();
    let level_filter = match logging.level.as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" => "warn",
        "error" => "error",
        _ => "info",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_filter));

    match logging.format.as_str() {
        "json" => {
            let _ = tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .try_init();
        }
        _ => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .try_init();
        }
    }
}
