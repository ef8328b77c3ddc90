use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Missing fields deserialize as empty; completeness is checked by the
/// reset service so both endpoints answer "data is not complete" uniformly.
#[derive(Deserialize, Clone, Default, Validate, ToSchema)]
pub struct ForgetPasswordRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub captcha_token: String,
}

impl ForgetPasswordRequest {
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.captcha_token.is_empty()
    }
}

#[derive(Deserialize, Clone, Default, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub verify_code: String,
    #[serde(default)]
    pub password: String,
}

impl ResetPasswordRequest {
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.verify_code.is_empty() && !self.password.is_empty()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
