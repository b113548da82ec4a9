use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::OnceCell;

use crate::config::StripeConfig;
use crate::error::{AppError, AppResult};

pub const STRIPE_JS_URL: &str = "https://js.stripe.com/v3";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StripeMode {
    Test,
    Live,
}

impl StripeMode {
    fn from_key(key: &str) -> Self {
        if key.contains("_live_") {
            StripeMode::Live
        } else {
            StripeMode::Test
        }
    }
}

/// Server-side Stripe handle, built once at startup.
#[derive(Clone)]
pub struct StripeServer {
    secret_key: Arc<str>,
    webhook_secret: Arc<str>,
    mode: StripeMode,
}

impl StripeServer {
    pub fn from_config(config: &StripeConfig) -> AppResult<Self> {
        let secret_key = config.secret_key.trim();
        if secret_key.is_empty() {
            return Err(AppError::Config("STRIPE_SECRET_KEY is not set".to_string()));
        }
        if !(secret_key.starts_with("sk_") || secret_key.starts_with("rk_")) {
            return Err(AppError::Config(
                "STRIPE_SECRET_KEY must be a Stripe secret or restricted key".to_string(),
            ));
        }

        let webhook_secret = config.webhook_secret.trim();
        if webhook_secret.is_empty() {
            return Err(AppError::Config("STRIPE_WEBHOOK_SECRET is not set".to_string()));
        }
        if !webhook_secret.starts_with("whsec_") {
            return Err(AppError::Config(
                "STRIPE_WEBHOOK_SECRET must be a Stripe webhook signing secret".to_string(),
            ));
        }

        let mode = StripeMode::from_key(secret_key);
        tracing::info!(mode = ?mode, "Stripe server handle initialized");

        Ok(Self {
            secret_key: Arc::from(secret_key),
            webhook_secret: Arc::from(webhook_secret),
            mode,
        })
    }

    pub fn mode(&self) -> StripeMode {
        self.mode
    }

    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    pub fn webhook_secret(&self) -> &str {
        &self.webhook_secret
    }
}

impl fmt::Debug for StripeServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StripeServer")
            .field("secret_key", &"[REDACTED]")
            .field("webhook_secret", &"[REDACTED]")
            .field("mode", &self.mode)
            .finish()
    }
}

/// Browser-facing Stripe handle: what a client needs to load Stripe.js.
#[derive(Debug, Clone, Serialize)]
pub struct StripeJs {
    pub publishable_key: String,
    pub mode: StripeMode,
    pub script_url: &'static str,
}

struct LoaderInner {
    publishable_key: String,
    client: OnceCell<Arc<StripeJs>>,
    inits: AtomicUsize,
}

/// Lazily builds the client handle on first use and hands out the same
/// instance afterwards, including to concurrent first callers.
#[derive(Clone)]
pub struct StripeLoader {
    inner: Arc<LoaderInner>,
}

impl StripeLoader {
    pub fn new(publishable_key: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(LoaderInner {
                publishable_key: publishable_key.into(),
                client: OnceCell::new(),
                inits: AtomicUsize::new(0),
            }),
        }
    }

    pub async fn get(&self) -> AppResult<Arc<StripeJs>> {
        let inner = &self.inner;
        let client = inner
            .client
            .get_or_try_init(|| async {
                inner.inits.fetch_add(1, Ordering::SeqCst);
                let key = inner.publishable_key.trim();
                if !key.starts_with("pk_") {
                    return Err(AppError::Config(
                        "NEXT_PUBLIC_STRIPE_PUBLISHABLE_KEY must be a Stripe publishable key"
                            .to_string(),
                    ));
                }
                tracing::debug!("Stripe client handle created");
                Ok(Arc::new(StripeJs {
                    publishable_key: key.to_string(),
                    mode: StripeMode::from_key(key),
                    script_url: STRIPE_JS_URL,
                }))
            })
            .await?;
        Ok(client.clone())
    }

    /// Number of times the initializer ran.
    pub fn init_count(&self) -> usize {
        self.inner.inits.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for StripeLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StripeLoader")
            .field("initialized", &self.inner.client.initialized())
            .finish()
    }
}
