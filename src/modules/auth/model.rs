use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use codeoj_auth::IssuedToken;
use codeoj_core::AppError;

#[derive(Deserialize, Clone, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// A signed session token and its expiry as an RFC 3339 timestamp.
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
    pub expire: String,
}

impl TryFrom<IssuedToken> for TokenResponse {
    type Error = AppError;

    fn try_from(issued: IssuedToken) -> Result<Self, Self::Error> {
        let expire = DateTime::<Utc>::from_timestamp(issued.expires_at, 0)
            .ok_or_else(|| AppError::internal_error("Token expiry out of range"))?
            .to_rfc3339_opts(SecondsFormat::Secs, true);

        Ok(Self {
            token: issued.token,
            expire,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_expire_format() {
        let response = TokenResponse::try_from(IssuedToken {
            token: "t".to_string(),
            expires_at: 1_700_000_000,
        })
        .unwrap();

        assert_eq!(response.expire, "2023-11-14T22:13:20Z");
    }
}
