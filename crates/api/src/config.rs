use courier_relay::RelayConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    /// A single `*` allows any origin.
    pub cors_origins: Vec<String>,
    /// Inbound request timeout in seconds (default: `120`). Must exceed the
    /// relay timeout or slow relays are cut off by the server first.
    pub request_timeout_secs: u64,
    /// How long shutdown waits for queued history to flush (default: `10`).
    pub shutdown_timeout_secs: u64,
    /// PostgreSQL URL. Unset means the in-memory store.
    pub database_url: Option<String>,
    /// Bounded history queue size (default: `1024`).
    pub history_queue_capacity: usize,
    /// Outbound HTTP settings.
    pub relay: RelayConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default   |
    /// |--------------------------|-----------|
    /// | `HOST`                   | `0.0.0.0` |
    /// | `PORT`                   | `5000`    |
    /// | `CORS_ORIGINS`           | `*`       |
    /// | `REQUEST_TIMEOUT_SECS`   | `120`     |
    /// | `SHUTDOWN_TIMEOUT_SECS`  | `10`      |
    /// | `DATABASE_URL`           | unset     |
    /// | `HISTORY_QUEUE_CAPACITY` | `1024`    |
    ///
    /// Relay settings come from [`RelayConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let history_queue_capacity: usize = std::env::var("HISTORY_QUEUE_CAPACITY")
            .unwrap_or_else(|_| courier_history::DEFAULT_QUEUE_CAPACITY.to_string())
            .parse()
            .expect("HISTORY_QUEUE_CAPACITY must be a valid usize");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            database_url,
            history_queue_capacity,
            relay: RelayConfig::from_env(),
        }
    }

    /// Whether `CORS_ORIGINS` allows any origin.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.is_empty() || self.cors_origins.iter().any(|o| o == "*")
    }
}
