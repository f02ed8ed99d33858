pub mod api;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod models;
pub mod recurrence;
pub mod reference;

use std::path::PathBuf;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::{ConfigError, ServerConfig};
use crate::db::DatabaseError;
use crate::reference::ReferenceData;

#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Server(#[from] api::ServerError),

    #[error("Bundled reference data is invalid: {0}")]
    Reference(#[from] serde_json::Error),

    #[error("Cannot read seed file {path}: {source}")]
    SeedFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Start the clinic service and block until Ctrl-C.
pub async fn run() -> Result<(), RunError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = ServerConfig::from_env()?;
    let reference = prepare_database(&config)?;

    let ctx = api::ApiContext::new(config.database_path.clone(), reference);
    let mut server = api::start_server(ctx, config.bind_addr).await?;
    tracing::info!(addr = %server.local_addr, "Listening");

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for Ctrl-C: {e}");
    }
    server.shutdown();
    server.wait().await?;
    Ok(())
}

/// Open (and migrate) the database, apply the seed file if configured, and
/// pick the reference lists to serve.
fn prepare_database(config: &ServerConfig) -> Result<ReferenceData, RunError> {
    let conn = db::open_database(&config.database_path)?;
    tracing::info!(path = %config.database_path.display(), "Database ready");

    let bundled = ReferenceData::bundled()?;
    let Some(seed_path) = &config.seed_file else {
        return Ok(bundled);
    };

    let json = std::fs::read_to_string(seed_path).map_err(|source| RunError::SeedFile {
        path: seed_path.clone(),
        source,
    })?;
    let seed = db::seed::parse_seed(&json)?;
    db::seed::apply_seed(&conn, &seed, chrono::Utc::now().naive_utc())?;

    if seed.reference.is_empty() {
        Ok(bundled)
    } else {
        Ok(seed.reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;

    #[test]
    fn seed_file_reference_replaces_bundled() {
        let dir = tempfile::tempdir().unwrap();
        let seed_path = dir.path().join("seed.json");
        std::fs::write(
            &seed_path,
            r#"{ "users": [ { "name": "Ada", "email": "ada@example.com" } ],
                 "medications": ["Aspirin"], "dosages": ["81mg"] }"#,
        )
        .unwrap();

        let config = ServerConfig {
            bind_addr: "127.0.0.1:0".parse::<SocketAddr>().unwrap(),
            database_path: dir.path().join("clinic.db"),
            seed_file: Some(seed_path),
        };
        let reference = prepare_database(&config).unwrap();
        assert_eq!(reference.medications, vec!["Aspirin"]);

        let conn = db::open_database(&config.database_path).unwrap();
        assert_eq!(db::list_patients(&conn).unwrap().len(), 1);
    }

    #[test]
    fn missing_seed_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            bind_addr: "127.0.0.1:0".parse::<SocketAddr>().unwrap(),
            database_path: dir.path().join("clinic.db"),
            seed_file: Some(dir.path().join("absent.json")),
        };
        assert!(matches!(prepare_database(&config), Err(RunError::SeedFile { .. })));
    }

    #[test]
    fn no_seed_serves_bundled_lists() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            bind_addr: "127.0.0.1:0".parse::<SocketAddr>().unwrap(),
            database_path: dir.path().join("clinic.db"),
            seed_file: None,
        };
        assert!(!prepare_database(&config).unwrap().is_empty());
    }
}
