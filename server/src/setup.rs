use std::{path::Path, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::Router;
use database::{ConnectionSettings, SqliteTaskRepository};
use http_api::{create_router, AppState, RouterOptions};
use taskhub_core::{TaskRepository, TaskService};
use tracing::{info, warn};

use crate::config::{Config, DatabaseConfig};

/// Open the store, retrying while it is unreachable
pub async fn connect_with_retry(config: &DatabaseConfig) -> Result<SqliteTaskRepository> {
    let settings = ConnectionSettings {
        max_connections: config.max_connections,
        acquire_timeout: Duration::from_secs(config.acquire_timeout_secs),
    };
    let delay = Duration::from_secs(config.retry_delay_secs);
    let attempts = config.connect_retries.max(1);

    let mut attempt = 1;
    loop {
        let result = match SqliteTaskRepository::new(&config.url, settings).await {
            Ok(repository) => repository.health_check().await.map(|()| repository),
            Err(e) => Err(e),
        };

        match result {
            Ok(repository) => {
                info!(attempt, "Database connection established");
                return Ok(repository);
            }
            Err(e) if attempt < attempts => {
                warn!(attempt, attempts, error = %e, "Database not reachable, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to connect to database after {attempts} attempts")
                });
            }
        }
    }
}

/// Open the store and apply pending migrations
pub async fn create_repository(config: &DatabaseConfig) -> Result<SqliteTaskRepository> {
    ensure_database_directory(&config.url)?;

    let repository = connect_with_retry(config).await?;

    repository
        .migrate()
        .await
        .context("Failed to run database migrations")?;

    info!("Database migrations completed");
    Ok(repository)
}

/// Wrap a repository in the service the HTTP layer shares
pub fn create_service(repository: Arc<dyn TaskRepository>, config: &Config) -> AppState {
    let service = TaskService::new(repository);
    match config.operation_timeout() {
        Some(timeout) => service.with_operation_timeout(timeout),
        None => service,
    }
}

pub fn router_options(config: &Config) -> RouterOptions {
    RouterOptions {
        request_timeout: config.request_timeout(),
        allowed_origins: config.server.allowed_origins.clone(),
    }
}

/// Ensure the parent directory of a file-backed database exists
pub fn ensure_database_directory(database_url: &str) -> Result<()> {
    let Some(path) = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
    else {
        return Ok(());
    };

    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path.starts_with(":memory:") {
        return Ok(());
    }

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create database directory: {}", parent.display())
            })?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(parent, std::fs::Permissions::from_mode(0o700))
                    .with_context(|| {
                        format!("Failed to set directory permissions: {}", parent.display())
                    })?;
            }

            info!(directory = %parent.display(), "Created database directory");
        }
    }

    Ok(())
}

/// Initialize the whole application: store, service and router
pub async fn initialize_app(config: &Config) -> Result<Router> {
    let repository = create_repository(&config.database).await?;
    let service = create_service(Arc::new(repository), config);
    Ok(create_router(service, &router_options(config)))
}

/// Resolves on SIGINT, or SIGTERM on unix
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_database_directory_creates_parent() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("data").join("tasks.db");
        let url = format!("sqlite://{}", nested.display());

        ensure_database_directory(&url).unwrap();
        assert!(temp_dir.path().join("data").is_dir());
        // The database file itself is left to the pool
        assert!(!nested.exists());
    }

    #[test]
    fn test_ensure_database_directory_ignores_memory_urls() {
        assert!(ensure_database_directory("sqlite::memory:").is_ok());
        assert!(ensure_database_directory("sqlite://:memory:").is_ok());
        assert!(ensure_database_directory("sqlite://tasks.db?mode=rwc").is_ok());
    }

    #[test]
    fn test_router_options_follow_config() {
        let mut config = Config::default();
        config.server.request_timeout_secs = 12;
        config.server.allowed_origins = vec!["https://tasks.example".to_string()];

        let options = router_options(&config);
        assert_eq!(options.request_timeout, Duration::from_secs(12));
        assert_eq!(options.allowed_origins, vec!["https://tasks.example"]);
    }

    #[tokio::test]
    async fn test_connect_with_retry_in_memory() {
        let mut config = Config::default().database;
        config.url = "sqlite::memory:".to_string();

        let repository = connect_with_retry(&config).await.unwrap();
        assert!(repository.health_check().await.is_ok());
    }

    #[tokio::test]
    async fn test_connect_with_retry_gives_up() {
        let temp_dir = TempDir::new().unwrap();
        // A directory cannot be opened as a database file
        let mut config = Config::default().database;
        config.url = format!("sqlite://{}", temp_dir.path().display());
        config.connect_retries = 2;
        config.retry_delay_secs = 0;

        let err = connect_with_retry(&config).await.unwrap_err();
        assert!(err.to_string().contains("after 2 attempts"));
    }
}
