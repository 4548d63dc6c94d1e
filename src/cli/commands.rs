//! CLI command implementations

use std::path::Path;
use std::sync::Arc;

use crate::config::{Backend, GatewayConfig};
use crate::http_server::{HttpServer, Stores};
use crate::observability;
use crate::store::{MongoDocumentStore, RedisKeyValueStore};

use super::args::{BackendArg, Command, DEFAULT_CONFIG_PATH};
use super::errors::{CliError, CliResult};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve {
            config,
            port,
            backend,
        } => serve(config.as_deref(), port, backend),
        Command::CheckConfig { config } => check_config(config.as_deref()),
    }
}

/// Load configuration
///
/// An explicit path must exist. Without one, the default path is used when
/// present and built-in defaults otherwise.
pub fn load_config(path: Option<&Path>) -> CliResult<GatewayConfig> {
    match path {
        Some(path) => Ok(GatewayConfig::load(path)?),
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                Ok(GatewayConfig::load(default_path)?)
            } else {
                Ok(GatewayConfig::default())
            }
        }
    }
}

/// Apply command-line overrides and re-validate
pub fn apply_overrides(
    mut config: GatewayConfig,
    port: Option<u16>,
    backend: Option<BackendArg>,
) -> CliResult<GatewayConfig> {
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(backend) = backend {
        config.backend = backend.into();
    }
    config.validate()?;
    Ok(config)
}

/// Build the store handles selected by `config.backend`
pub async fn build_stores(config: &GatewayConfig) -> CliResult<Stores> {
    match config.backend {
        Backend::Memory => {
            tracing::warn!("using in-memory stores; data is lost on exit");
            Ok(Stores::in_memory())
        }
        Backend::External => {
            let kv = RedisKeyValueStore::open(&config.kv_store.url, config.kv_store.timeout())
                .map_err(|e| CliError::startup_failed(format!("key-value store: {}", e)))?;
            let documents = MongoDocumentStore::connect(config.document_store.settings())
                .await
                .map_err(|e| CliError::startup_failed(format!("document store: {}", e)))?;

            Ok(Stores::new(Arc::new(kv), Arc::new(documents)))
        }
    }
}

/// Start the HTTP gateway and serve until shutdown
pub fn serve(
    config_path: Option<&Path>,
    port: Option<u16>,
    backend: Option<BackendArg>,
) -> CliResult<()> {
    let config = apply_overrides(load_config(config_path)?, port, backend)?;

    observability::init(&config.log)
        .map_err(|e| CliError::startup_failed(format!("Failed to initialise logging: {}", e)))?;

    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        backend = ?config.backend,
        "starting recordgate"
    );

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::startup_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        let stores = build_stores(&config).await?;
        let server = HttpServer::with_config(config.server.clone(), stores);

        server
            .start()
            .await
            .map_err(|e| CliError::startup_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Validate configuration and print the effective settings as JSON
pub fn check_config(config_path: Option<&Path>) -> CliResult<()> {
    let config = load_config(config_path)?;
    config.validate()?;

    let rendered = serde_json::to_string_pretty(&config)
        .map_err(|e| CliError::io_error(format!("JSON error: {}", e)))?;
    println!("{}", rendered);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::KeyValueStore;
    use std::io::Write;

    #[test]
    fn test_explicit_missing_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(Some(&dir.path().join("missing.json")));
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_apply() {
        let config =
            apply_overrides(GatewayConfig::default(), Some(9191), Some(BackendArg::Memory))
                .unwrap();
        assert_eq!(config.server.port, 9191);
        assert_eq!(config.backend, Backend::Memory);
    }

    #[test]
    fn test_override_rejects_port_zero() {
        let result = apply_overrides(GatewayConfig::default(), Some(0), None);
        assert!(result.is_err());
    }

    #[test]
    fn test_check_config_accepts_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"backend": "memory"}}"#).unwrap();

        assert!(check_config(Some(file.path())).is_ok());
    }

    #[tokio::test]
    async fn test_build_memory_stores() {
        let config = GatewayConfig {
            backend: Backend::Memory,
            ..Default::default()
        };
        let stores = build_stores(&config).await.unwrap();
        assert!(stores.kv.get("anything").await.unwrap_err().is_not_found());
    }
}
