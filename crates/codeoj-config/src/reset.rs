use std::env;

#[derive(Clone, Debug)]
pub struct ResetConfig {
    /// Lifetime of a password-reset code in seconds.
    pub code_ttl: i64,
}

impl Default for ResetConfig {
    fn default() -> Self {
        Self { code_ttl: 300 }
    }
}

impl ResetConfig {
    pub fn from_env() -> Self {
        Self {
            code_ttl: env::var("RESET_CODE_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|ttl| *ttl > 0)
                .unwrap_or(300), // 5 minutes
        }
    }
}
