use crate::error::{AppError, AppResult};
use serde::Deserialize;

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

#[derive(Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub node_env: Environment,

    pub supabase_url: String,
    pub supabase_service_role_key: String,

    pub database_url: String,
    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,

    #[serde(default)]
    pub redis_url: Option<String>,

    pub jwt_secret: String,
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,

    pub stripe_secret_key: String,
    pub stripe_webhook_secret: String,
    pub next_public_stripe_publishable_key: String,

    #[serde(default)]
    pub sentry_dsn: Option<String>,

    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_format")]
    pub log_format: String,

    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

#[derive(Clone, Debug)]
pub struct StripeConfig {
    pub secret_key: String,
    pub webhook_secret: String,
    pub publishable_key: String,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8000
}
fn default_max_connections() -> u32 {
    10
}
fn default_session_ttl() -> u64 {
    604800
} // 7 days
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_bcrypt_cost() -> u32 {
    10
}

const MIN_JWT_SECRET_LEN: usize = 32;

impl Config {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let config = envy::from_env::<Config>()
            .map_err(|e| AppError::Config(format!("Failed to load config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Builds a config from explicit `NAME=value` pairs, using the same
    /// names as the process environment.
    pub fn from_vars<I, K, V>(vars: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let config = envy::from_iter::<_, Config>(
            vars.into_iter().map(|(k, v)| (k.into(), v.into())),
        )
        .map_err(|e| AppError::Config(format!("Failed to load config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> AppResult<()> {
        validate_url("SUPABASE_URL", &self.supabase_url)?;

        if self.supabase_service_role_key.trim().is_empty() {
            return Err(AppError::Config(
                "SUPABASE_SERVICE_ROLE_KEY must not be empty".to_string(),
            ));
        }

        if self.database_url.trim().is_empty() {
            return Err(AppError::Config("DATABASE_URL must not be empty".to_string()));
        }

        if self.database_max_connections == 0 {
            return Err(AppError::Config(
                "DATABASE_MAX_CONNECTIONS must be > 0".to_string(),
            ));
        }

        if let Some(redis_url) = &self.redis_url {
            if !redis_url.starts_with("redis://") && !redis_url.starts_with("rediss://") {
                return Err(AppError::Config(
                    "REDIS_URL must use the redis:// or rediss:// scheme".to_string(),
                ));
            }
        }

        if self.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(AppError::Config(format!(
                "JWT_SECRET must be at least {} characters",
                MIN_JWT_SECRET_LEN
            )));
        }

        if self.session_ttl_secs == 0 {
            return Err(AppError::Config("SESSION_TTL_SECS must be > 0".to_string()));
        }

        if !(self.stripe_secret_key.starts_with("sk_") || self.stripe_secret_key.starts_with("rk_"))
        {
            return Err(AppError::Config(
                "STRIPE_SECRET_KEY must be a Stripe secret or restricted key".to_string(),
            ));
        }

        if !self.stripe_webhook_secret.starts_with("whsec_") {
            return Err(AppError::Config(
                "STRIPE_WEBHOOK_SECRET must be a Stripe webhook signing secret".to_string(),
            ));
        }

        if !self.next_public_stripe_publishable_key.starts_with("pk_") {
            return Err(AppError::Config(
                "NEXT_PUBLIC_STRIPE_PUBLISHABLE_KEY must be a Stripe publishable key".to_string(),
            ));
        }

        if let Some(dsn) = &self.sentry_dsn {
            validate_url("SENTRY_DSN", dsn)?;
        }

        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(AppError::Config(
                "BCRYPT_COST must be between 4 and 31".to_string(),
            ));
        }

        if !matches!(self.log_format.as_str(), "json" | "pretty") {
            return Err(AppError::Config(
                "LOG_FORMAT must be either json or pretty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn stripe(&self) -> StripeConfig {
        StripeConfig {
            secret_key: self.stripe_secret_key.clone(),
            webhook_secret: self.stripe_webhook_secret.clone(),
            publishable_key: self.next_public_stripe_publishable_key.clone(),
        }
    }

    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.log_level.clone(),
            format: self.log_format.clone(),
        }
    }

    /// Session cookies are marked `Secure` outside local development.
    pub fn secure_cookies(&self) -> bool {
        self.node_env.is_production()
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("node_env", &self.node_env)
            .field("supabase_url", &self.supabase_url)
            .field("database_max_connections", &self.database_max_connections)
            .field("redis", &self.redis_url.is_some())
            .field("session_ttl_secs", &self.session_ttl_secs)
            .field("sentry", &self.sentry_dsn.is_some())
            .field("cors_origins", &self.cors_origins)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .finish_non_exhaustive()
    }
}

fn validate_url(name: &str, value: &str) -> AppResult<()> {
    let parsed = url::Url::parse(value)
        .map_err(|e| AppError::Config(format!("{} is not a valid URL: {}", name, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AppError::Config(format!("{} must be an http(s) URL", name)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_vars() -> Vec<(&'static str, &'static str)> {
        vec![
            ("SUPABASE_URL", "https://project.supabase.co"),
            ("SUPABASE_SERVICE_ROLE_KEY", "service-role"),
            ("DATABASE_URL", "postgres://localhost/pledgekit"),
            ("JWT_SECRET", "0123456789abcdef0123456789abcdef"),
            ("STRIPE_SECRET_KEY", "sk_test_123"),
            ("STRIPE_WEBHOOK_SECRET", "whsec_123"),
            ("NEXT_PUBLIC_STRIPE_PUBLISHABLE_KEY", "pk_test_123"),
        ]
    }

    #[test]
    fn loads_with_defaults() {
        let config = Config::from_vars(base_vars()).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.node_env, Environment::Development);
        assert!(config.redis_url.is_none());
        assert_eq!(config.cors_origins, vec!["*".to_string()]);
        assert_eq!(config.server_address(), "127.0.0.1:8000");
        assert!(!config.secure_cookies());
    }

    #[test]
    fn reads_node_env_and_port() {
        let mut vars = base_vars();
        vars.push(("NODE_ENV", "production"));
        vars.push(("PORT", "3001"));
        let config = Config::from_vars(vars).unwrap();
        assert_eq!(config.port, 3001);
        assert!(config.node_env.is_production());
        assert!(config.secure_cookies());
    }

    #[test]
    fn missing_stripe_secret_fails() {
        let vars: Vec<_> = base_vars()
            .into_iter()
            .filter(|(k, _)| *k != "STRIPE_SECRET_KEY")
            .collect();
        assert!(matches!(Config::from_vars(vars), Err(AppError::Config(_))));
    }

    #[test]
    fn rejects_malformed_values() {
        let mut vars = base_vars();
        vars.retain(|(k, _)| *k != "NEXT_PUBLIC_STRIPE_PUBLISHABLE_KEY");
        vars.push(("NEXT_PUBLIC_STRIPE_PUBLISHABLE_KEY", "sk_test_oops"));
        assert!(Config::from_vars(vars).is_err());

        let mut vars = base_vars();
        vars.retain(|(k, _)| *k != "JWT_SECRET");
        vars.push(("JWT_SECRET", "short"));
        assert!(Config::from_vars(vars).is_err());

        let mut vars = base_vars();
        vars.push(("SENTRY_DSN", "not a url"));
        assert!(Config::from_vars(vars).is_err());

        let mut vars = base_vars();
        vars.push(("NODE_ENV", "staging"));
        assert!(Config::from_vars(vars).is_err());
    }

    #[test]
    fn debug_output_hides_secrets() {
        let config = Config::from_vars(base_vars()).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("sk_test_123"));
        assert!(!rendered.contains("0123456789abcdef"));
    }
}
