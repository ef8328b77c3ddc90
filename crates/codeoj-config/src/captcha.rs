use std::env;

/// Secret accepted by hCaptcha's test site key; every token verifies.
pub const HCAPTCHA_TEST_SECRET: &str = "0x0000000000000000000000000000000000000000";

#[derive(Clone, Debug)]
pub struct CaptchaConfig {
    pub secret: String,
    pub verify_url: String,
    /// Request timeout for the verification call, in seconds.
    pub timeout_secs: u64,
}

impl CaptchaConfig {
    pub fn from_env() -> Self {
        Self {
            secret: env::var("HCAPTCHA_SECRET").unwrap_or_else(|_| HCAPTCHA_TEST_SECRET.to_string()),
            verify_url: env::var("HCAPTCHA_VERIFY_URL")
                .unwrap_or_else(|_| "https://hcaptcha.com/siteverify".to_string()),
            timeout_secs: env::var("HCAPTCHA_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
        }
    }
}
