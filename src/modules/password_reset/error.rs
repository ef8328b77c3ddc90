use codeoj_core::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResetError {
    #[error("data is not complete")]
    BadRequest,
    #[error("captcha verification failed")]
    Captcha(Vec<String>),
    #[error("User not found")]
    NotFound,
    #[error("Verify code error")]
    InvalidCode,
    #[error("Verify code expired")]
    CodeExpired,
    #[error("password is too short, at least 6 characters")]
    WeakPassword,
    #[error(transparent)]
    Server(#[from] anyhow::Error),
}

impl From<ResetError> for AppError {
    fn from(err: ResetError) -> Self {
        match err {
            ResetError::Captcha(codes) => {
                AppError::bad_request(anyhow::anyhow!("captcha verification failed"))
                    .with_codes(codes)
            }
            ResetError::NotFound => AppError::not_found(err),
            ResetError::Server(e) => AppError::internal(e),
            ResetError::BadRequest
            | ResetError::InvalidCode
            | ResetError::CodeExpired
            | ResetError::WeakPassword => AppError::bad_request(err),
        }
    }
}
