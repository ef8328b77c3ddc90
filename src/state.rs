use std::fmt;
use std::sync::Arc;

use anyhow::Context;

use codeoj_auth::SessionTokens;
use codeoj_config::{CaptchaConfig, EmailConfig, JwtConfig, ResetConfig};
use codeoj_db::init_db_pool;

use crate::modules::password_reset::service::PasswordResetService;
use crate::modules::users::store::{PgUserStore, UserStore};
use crate::utils::captcha::{CaptchaVerifier, HCaptchaVerifier};
use crate::utils::email::{ResetCodeSender, SmtpCodeSender};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub tokens: SessionTokens,
    pub captcha: Arc<dyn CaptchaVerifier>,
    pub mailer: Arc<dyn ResetCodeSender>,
    pub reset_config: ResetConfig,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("tokens", &self.tokens)
            .field("reset_config", &self.reset_config)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn password_reset(&self) -> PasswordResetService {
        PasswordResetService::new(
            self.users.clone(),
            self.captcha.clone(),
            self.mailer.clone(),
            &self.reset_config,
        )
    }
}

/// Postgres-backed state; `DATABASE_URL` must be set.
pub async fn init_app_state() -> anyhow::Result<AppState> {
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let db = init_db_pool(&database_url).await?;

    build_app_state(Arc::new(PgUserStore::new(db)))
}

/// State around an arbitrary credential store, collaborators from the
/// environment.
pub fn build_app_state(users: Arc<dyn UserStore>) -> anyhow::Result<AppState> {
    Ok(AppState {
        users,
        tokens: SessionTokens::new(&JwtConfig::from_env()),
        captcha: Arc::new(HCaptchaVerifier::new(&CaptchaConfig::from_env())?),
        mailer: Arc::new(SmtpCodeSender::new(EmailConfig::from_env())),
        reset_config: ResetConfig::from_env(),
    })
}
