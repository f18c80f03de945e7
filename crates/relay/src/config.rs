use std::time::Duration;

/// Outbound HTTP settings for the relay.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Total time allowed for one outbound call, body included.
    pub timeout: Duration,
    /// Time allowed to establish the connection.
    pub connect_timeout: Duration,
    /// Redirects followed before reporting the redirect response itself.
    /// `0` disables following.
    pub max_redirects: usize,
    /// `User-Agent` sent when the caller does not supply one.
    pub user_agent: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(30_000),
            connect_timeout: Duration::from_millis(10_000),
            max_redirects: 10,
            user_agent: format!("courier/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl RelayConfig {
    /// Load relay configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default            |
    /// |----------------------------|--------------------|
    /// | `RELAY_TIMEOUT_MS`         | `30000`            |
    /// | `RELAY_CONNECT_TIMEOUT_MS` | `10000`            |
    /// | `RELAY_MAX_REDIRECTS`      | `10`               |
    /// | `RELAY_USER_AGENT`         | `courier/<version>`|
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let timeout = std::env::var("RELAY_TIMEOUT_MS")
            .map(|v| {
                Duration::from_millis(v.parse().expect("RELAY_TIMEOUT_MS must be a valid u64"))
            })
            .unwrap_or(defaults.timeout);

        let connect_timeout = std::env::var("RELAY_CONNECT_TIMEOUT_MS")
            .map(|v| {
                Duration::from_millis(
                    v.parse()
                        .expect("RELAY_CONNECT_TIMEOUT_MS must be a valid u64"),
                )
            })
            .unwrap_or(defaults.connect_timeout);

        let max_redirects = std::env::var("RELAY_MAX_REDIRECTS")
            .map(|v| v.parse().expect("RELAY_MAX_REDIRECTS must be a valid usize"))
            .unwrap_or(defaults.max_redirects);

        let user_agent = std::env::var("RELAY_USER_AGENT").unwrap_or(defaults.user_agent);

        Self {
            timeout,
            connect_timeout,
            max_redirects,
            user_agent,
        }
    }
}
