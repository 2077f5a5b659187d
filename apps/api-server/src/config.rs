//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use quill_infra::DatabaseConfig;
use quill_infra::JwtConfig;
use quill_infra::auth::DEFAULT_JWT_SECRET;

/// Name of the cookie carrying the access token.
pub const AUTH_COOKIE: &str = "quill_token";

/// Auth cookie settings.
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub secure: bool,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: AUTH_COOKIE.to_string(),
            secure: false,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub cors_origin: String,
    pub cookie: CookieConfig,
    pub production: bool,
    /// Apply pending migrations at startup.
    pub auto_migrate: bool,
}

fn parsed<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

fn flag(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(default)
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let production = env::var("RUST_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let database = env::var("DATABASE_URL").ok().map(|url| {
            let mut config = DatabaseConfig::new(url);
            if let Some(max) = parsed("DB_MAX_CONNECTIONS") {
                config.max_connections = max;
            }
            if let Some(min) = parsed("DB_MIN_CONNECTIONS") {
                config.min_connections = min;
            }
            config
        });

        let defaults = JwtConfig::default();
        let jwt = JwtConfig {
            secret: env::var("JWT_SECRET").unwrap_or(defaults.secret),
            expiration_hours: parsed("JWT_EXPIRATION_HOURS").unwrap_or(defaults.expiration_hours),
            issuer: env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT").unwrap_or(8080),
            database,
            jwt,
            cors_origin: env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            cookie: CookieConfig {
                secure: flag("COOKIE_SECURE", production),
                ..CookieConfig::default()
            },
            production,
            auto_migrate: flag("AUTO_MIGRATE", false),
        }
    }

    /// Log configuration problems that should not stop the server.
    pub fn warn_insecure_defaults(&self) {
        if self.jwt.secret == DEFAULT_JWT_SECRET {
            if self.production {
                tracing::error!("JWT_SECRET is not set in production; tokens are signed with the default secret");
            } else {
                tracing::warn!("JWT_SECRET is not set; using the development default");
            }
        }
        if self.production && !self.cookie.secure {
            tracing::warn!("COOKIE_SECURE is disabled in production");
        }
    }
}
