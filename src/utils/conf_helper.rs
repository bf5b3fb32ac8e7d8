use anyhow::{anyhow, Context, Result};
use std::path::Path;
use std::sync::OnceLock;
use tokio::fs;
use tokio::net::TcpListener;
use tracing::info;

use crate::models::viewer_model::ViewerConfig;

static CONFIG_CACHE: OnceLock<ViewerConfig> = OnceLock::new();

const DEFAULT_CONFIG_PATH: &str = "viewer.json";

pub fn config_path() -> String {
    std::env::var("LIGHTWAVE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

pub async fn load_config(path: impl AsRef<Path>) -> Result<ViewerConfig> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)
        .await
        .with_context(|| format!("File read error: {}", path.display()))?;

    let mut config: ViewerConfig =
        serde_json::from_str(&data).context("JSON parse error in viewer config")?;

    config.endpoint = config.endpoint.trim_end_matches('/').to_string();
    if config.endpoint.is_empty() {
        return Err(anyhow!("viewer config has an empty endpoint"));
    }
    Ok(config)
}

/// Reads the config, binds the listener and caches the config with the
/// port actually bound (port 0 picks a free one).
pub async fn init_config_and_bind() -> Result<(TcpListener, &'static ViewerConfig)> {
    let mut config = load_config(config_path()).await?;

    let bind_addr = format!("{}:{}", config.connection.ip, config.connection.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Bind failed: {bind_addr}"))?;

    let actual_port = listener.local_addr().context("Addr error")?.port();
    config.connection.port = actual_port;

    CONFIG_CACHE
        .set(config)
        .map_err(|_| anyhow!("Config already initialized"))?;
    let config = get_cached_config().ok_or_else(|| anyhow!("Config not initialized"))?;

    info!("Config initialized with port: {}", actual_port);
    Ok((listener, config))
}

pub fn get_cached_config() -> Option<&'static ViewerConfig> {
    CONFIG_CACHE.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_config_trims_endpoint() {
        let path = std::env::temp_dir().join(format!("lightwave-conf-{}.json", std::process::id()));
        let json = r#"{ "name": "LightWAVE", "version": "0.1.0",
            "endpoint": "http://localhost:9/cgi-bin/lightwave/",
            "connection": { "ip": "127.0.0.1", "port": 0 } }"#;
        tokio::fs::write(&path, json).await.unwrap();

        let config = load_config(&path).await.unwrap();
        assert_eq!(config.endpoint, "http://localhost:9/cgi-bin/lightwave");

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_load_config_missing_file() {
        assert!(load_config("/nonexistent/viewer.json").await.is_err());
    }
}
