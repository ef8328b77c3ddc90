//! Password-reset code lifecycle.
//!
//! A code is stored on the user record as `verify_code` plus
//! `verify_expires_at`. Requesting a reset overwrites whatever code was in
//! flight. Consuming one is a compare-and-clear in the store: the digest is
//! replaced only while the presented code is still the live one, so of any
//! number of concurrent consumers exactly one succeeds.
//!
//! Every entry point has an `_at` form taking the current time explicitly;
//! issuance and consumption read the same clock.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::instrument;

use codeoj_config::ResetConfig;
use codeoj_core::{hash_password, is_strong_enough};

use super::error::ResetError;
use super::model::{ForgetPasswordRequest, ResetPasswordRequest};
use crate::modules::users::model::ResetState;
use crate::modules::users::store::UserStore;
use crate::utils::captcha::CaptchaVerifier;
use crate::utils::email::ResetCodeSender;

#[derive(Clone)]
pub struct PasswordResetService {
    users: Arc<dyn UserStore>,
    captcha: Arc<dyn CaptchaVerifier>,
    sender: Arc<dyn ResetCodeSender>,
    code_ttl: Duration,
}

impl PasswordResetService {
    pub fn new(
        users: Arc<dyn UserStore>,
        captcha: Arc<dyn CaptchaVerifier>,
        sender: Arc<dyn ResetCodeSender>,
        config: &ResetConfig,
    ) -> Self {
        Self {
            users,
            captcha,
            sender,
            code_ttl: Duration::seconds(config.code_ttl),
        }
    }

    pub async fn request_reset(
        &self,
        dto: ForgetPasswordRequest,
        client_ip: &str,
    ) -> Result<(), ResetError> {
        self.request_reset_at(dto, client_ip, Utc::now()).await
    }

    /// Issues a code for `dto.username` once the captcha gate passes.
    ///
    /// An unknown username, or a lookup fault, returns `Ok` exactly like a
    /// successful send so the response does not reveal which usernames exist.
    #[instrument(skip_all, fields(username = %dto.username))]
    pub async fn request_reset_at(
        &self,
        dto: ForgetPasswordRequest,
        client_ip: &str,
        now: DateTime<Utc>,
    ) -> Result<(), ResetError> {
        if !dto.is_complete() {
            return Err(ResetError::BadRequest);
        }

        let verdict = self.captcha.verify(&dto.captcha_token, client_ip).await?;
        if !verdict.success {
            return Err(ResetError::Captcha(verdict.error_codes));
        }

        let user = match self.users.find_by_username(&dto.username).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::info!("Reset requested for unknown username");
                return Ok(());
            }
            // Masked on purpose: a lookup fault answers exactly like an
            // unknown username.
            Err(e) => {
                tracing::error!(error = %e, "Reset lookup failed");
                return Ok(());
            }
        };

        let code = self.sender.send_code(&user.email).await?;

        self.users
            .begin_reset(user.id, &code, now + self.code_ttl)
            .await
            .map_err(|e| ResetError::Server(e.into()))?;

        tracing::info!(user_id = user.id, "Reset code issued");
        Ok(())
    }

    pub async fn consume_reset(&self, dto: ResetPasswordRequest) -> Result<(), ResetError> {
        self.consume_reset_at(dto, Utc::now()).await
    }

    /// Checks, in order: completeness, user, code, expiry, password strength.
    #[instrument(skip_all, fields(username = %dto.username))]
    pub async fn consume_reset_at(
        &self,
        dto: ResetPasswordRequest,
        now: DateTime<Utc>,
    ) -> Result<(), ResetError> {
        if !dto.is_complete() {
            return Err(ResetError::BadRequest);
        }

        let user = self
            .users
            .find_by_username(&dto.username)
            .await
            .map_err(|e| ResetError::Server(e.into()))?
            .ok_or(ResetError::NotFound)?;

        if user.verify_code.is_empty()
            || !constant_time_eq(user.verify_code.as_bytes(), dto.verify_code.as_bytes())
        {
            return Err(ResetError::InvalidCode);
        }

        if user.reset_state(now) == ResetState::Expired {
            return Err(ResetError::CodeExpired);
        }

        if !is_strong_enough(&dto.password) {
            return Err(ResetError::WeakPassword);
        }

        let password_hash =
            hash_password(&dto.password).map_err(|e| ResetError::Server(e.error))?;

        let consumed = self
            .users
            .complete_reset(user.id, &dto.verify_code, now, &password_hash)
            .await
            .map_err(|e| ResetError::Server(e.into()))?;
        if !consumed {
            // Consumed or replaced by another request since the read above.
            return Err(ResetError::InvalidCode);
        }

        tracing::info!(user_id = user.id, "Password reset completed");
        Ok(())
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
