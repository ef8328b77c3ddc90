use std::env;

/// Session token settings. Passed by reference into the token issuer; there is
/// no process-wide signing secret.
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    /// Session lifetime in seconds.
    pub timeout: i64,
    /// Grace period past expiry during which a token may still be refreshed.
    pub max_refresh: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self {
            secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "your-secret-key-change-in-production".to_string()),
            timeout: env::var("JWT_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(14400), // 4 hours
            max_refresh: env::var("JWT_MAX_REFRESH_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3600), // 1 hour
        }
    }
}
