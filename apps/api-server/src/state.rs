//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{PasswordService, TokenService};
use quill_infra::{Argon2PasswordService, JwtTokenService, Repositories};

use crate::config::{AppConfig, CookieConfig};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub repos: Repositories,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub cookie: CookieConfig,
}

impl AppState {
    /// Assemble state from already-built parts.
    pub fn new(
        repos: Repositories,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
        cookie: CookieConfig,
    ) -> Self {
        Self {
            repos,
            tokens,
            passwords,
            cookie,
        }
    }

    /// Build the application state with appropriate implementations.
    /// Fails only when requested migrations could not be applied.
    pub async fn from_config(config: &AppConfig) -> std::io::Result<Self> {
        let repos = Self::repositories(config).await?;
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        tracing::info!("Application state initialized");

        Ok(Self::new(repos, tokens, passwords, config.cookie.clone()))
    }

    #[cfg(feature = "postgres")]
    async fn repositories(config: &AppConfig) -> std::io::Result<Repositories> {
        use migration::{Migrator, MigratorTrait};

        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Ok(Repositories::in_memory());
        };

        let db = match quill_infra::database::connect(db_config).await {
            Ok(db) => db,
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                return Ok(Repositories::in_memory());
            }
        };

        if config.auto_migrate {
            migration_outcome(Migrator::up(&db, None).await)?;
        }

        Ok(Repositories::postgres(db))
    }

    #[cfg(not(feature = "postgres"))]
    async fn repositories(_config: &AppConfig) -> std::io::Result<Repositories> {
        tracing::info!("Running without postgres feature - using in-memory repositories");
        Ok(Repositories::in_memory())
    }
}

/// A failed auto-migration stops startup rather than serving a stale schema.
#[cfg(feature = "postgres")]
fn migration_outcome(result: Result<(), migration::DbErr>) -> std::io::Result<()> {
    match result {
        Ok(()) => {
            tracing::info!("Database migrations applied");
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to apply migrations");
            Err(std::io::Error::other(format!("migrations failed: {e}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_rt::test]
    async fn test_without_database_runs_in_memory() {
        let config = AppConfig {
            database: None,
            auto_migrate: true,
            ..AppConfig::from_env()
        };

        assert!(AppState::from_config(&config).await.is_ok());
    }

    #[cfg(feature = "postgres")]
    #[test]
    fn test_failed_migration_aborts_startup() {
        assert!(migration_outcome(Ok(())).is_ok());

        let err = migration_outcome(Err(migration::DbErr::Custom("relation exists".into())))
            .unwrap_err();
        assert!(err.to_string().contains("relation exists"));
    }
}
