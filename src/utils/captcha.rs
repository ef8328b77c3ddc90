//! Human-verification gate.
//!
//! The password-reset request path only proceeds once a [`CaptchaVerifier`]
//! accepts the client's token. [`HCaptchaVerifier`] talks to hCaptcha's
//! `siteverify` endpoint; tests substitute their own implementation.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use codeoj_config::CaptchaConfig;

/// Outcome reported by the verification service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CaptchaVerdict {
    pub success: bool,
    #[serde(rename = "error-codes", default)]
    pub error_codes: Vec<String>,
}

impl CaptchaVerdict {
    pub fn passed() -> Self {
        Self {
            success: true,
            error_codes: Vec::new(),
        }
    }

    pub fn rejected(codes: Vec<String>) -> Self {
        Self {
            success: false,
            error_codes: codes,
        }
    }
}

#[async_trait]
pub trait CaptchaVerifier: Send + Sync {
    /// `Err` means the gate could not be reached or answered garbage; a
    /// rejected token is an `Ok` verdict with `success == false`.
    async fn verify(&self, token: &str, remote_ip: &str) -> anyhow::Result<CaptchaVerdict>;
}

#[derive(Debug, Clone)]
pub struct HCaptchaVerifier {
    client: reqwest::Client,
    secret: String,
    verify_url: String,
}

impl HCaptchaVerifier {
    pub fn new(config: &CaptchaConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build captcha HTTP client")?;

        Ok(Self {
            client,
            secret: config.secret.clone(),
            verify_url: config.verify_url.clone(),
        })
    }
}

#[async_trait]
impl CaptchaVerifier for HCaptchaVerifier {
    #[instrument(skip_all, fields(remote_ip = %remote_ip))]
    async fn verify(&self, token: &str, remote_ip: &str) -> anyhow::Result<CaptchaVerdict> {
        let mut form = vec![("secret", self.secret.as_str()), ("response", token)];
        if !remote_ip.is_empty() {
            form.push(("remoteip", remote_ip));
        }

        let verdict = self
            .client
            .post(&self.verify_url)
            .form(&form)
            .send()
            .await
            .context("Captcha verification request failed")?
            .error_for_status()
            .context("Captcha verification returned an error status")?
            .json::<CaptchaVerdict>()
            .await
            .context("Captcha verification returned an unreadable body")?;

        if !verdict.success {
            tracing::info!(error_codes = ?verdict.error_codes, "Captcha rejected");
        }

        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_parses_error_codes() {
        let verdict: CaptchaVerdict = serde_json::from_str(
            r#"{"success": false, "error-codes": ["missing-input-response", "invalid-input-secret"]}"#,
        )
        .unwrap();

        assert!(!verdict.success);
        assert_eq!(
            verdict.error_codes,
            vec!["missing-input-response", "invalid-input-secret"]
        );
    }

    #[test]
    fn test_verdict_without_error_codes() {
        let verdict: CaptchaVerdict =
            serde_json::from_str(r#"{"success": true, "challenge_ts": "2024-01-01T00:00:00Z"}"#)
                .unwrap();

        assert_eq!(verdict, CaptchaVerdict::passed());
    }
}
