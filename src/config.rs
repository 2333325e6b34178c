use std::time::Duration;

/// Server settings read from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// In-memory repositories are used when unset
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub token_expiration_days: i64,
    /// How long a recompute waits for its league before giving up
    pub recompute_lock_timeout: Duration,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unparseable numbers fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            jwt_secret: lookup("JWT_SECRET").unwrap_or(defaults.jwt_secret),
            token_expiration_days: lookup("TOKEN_EXPIRATION_DAYS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.token_expiration_days),
            recompute_lock_timeout: lookup("RECOMPUTE_LOCK_TIMEOUT_MS")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.recompute_lock_timeout),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            database_url: None,
            jwt_secret: "your-secret-key-change-in-production".to_string(),
            token_expiration_days: 365,
            recompute_lock_timeout: Duration::from_millis(5000),
        }
    }
}
