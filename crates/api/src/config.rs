use std::time::Duration;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `300`). Generous because a
    /// full migration run completes within one request.
    pub request_timeout_secs: u64,
    /// World server root URL (default: `http://localhost:30000`).
    pub world_api_url: String,
    /// Base URL assets are served under (default: the world server URL).
    pub asset_base_url: String,
    /// Timeout per document API request in seconds (default: `30`).
    pub store_timeout_secs: u64,
    /// Timeout per asset existence probe in seconds (default: `10`).
    pub probe_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `300`                      |
    /// | `WORLD_API_URL`        | `http://localhost:30000`   |
    /// | `ASSET_BASE_URL`       | value of `WORLD_API_URL`   |
    /// | `STORE_TIMEOUT_SECS`   | `30`                       |
    /// | `PROBE_TIMEOUT_SECS`   | `10`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let world_api_url = std::env::var("WORLD_API_URL")
            .unwrap_or_else(|_| "http://localhost:30000".into());

        let asset_base_url =
            std::env::var("ASSET_BASE_URL").unwrap_or_else(|_| world_api_url.clone());

        let store_timeout_secs: u64 = std::env::var("STORE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("STORE_TIMEOUT_SECS must be a valid u64");

        let probe_timeout_secs: u64 = std::env::var("PROBE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("PROBE_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            world_api_url,
            asset_base_url,
            store_timeout_secs,
            probe_timeout_secs,
        }
    }

    /// Document store request timeout as a [`Duration`].
    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }

    /// Asset probe request timeout as a [`Duration`].
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}
