//! Token stage and claims-projection stage.
//!
//! Routes that need an authenticated caller are wrapped, outermost first, in
//! [`require_token`] and then [`project_claims`]. The first verifies the bearer
//! token and stashes its [`Claims`] in the request extensions; the second turns
//! those claims into a typed [`CurrentUser`] that handlers extract.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};

use codeoj_auth::{AuthError, Claims};
use codeoj_core::AppError;

use crate::state::AppState;

/// Identity of the caller, projected from verified claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: i64,
    pub username: String,
    pub is_admin: bool,
    pub is_teacher: bool,
}

impl TryFrom<&Claims> for CurrentUser {
    type Error = AppError;

    fn try_from(claims: &Claims) -> Result<Self, Self::Error> {
        let user_id = claims.sub.parse::<i64>().map_err(|e| {
            AppError::internal_error(format!("Invalid user id {:?} in claims: {}", claims.sub, e))
        })?;

        Ok(Self {
            user_id,
            username: claims.username.clone(),
            is_admin: claims.admin,
            is_teacher: claims.teacher,
        })
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingToken)
}

pub async fn require_token(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = state.tokens.verify(bearer_token(req.headers())?)?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Must run inside [`require_token`]. A subject that is not a numeric id is a
/// server fault, never an anonymous or default user.
pub async fn project_claims(mut req: Request, next: Next) -> Result<Response, AppError> {
    let current_user = {
        let claims = req
            .extensions()
            .get::<Claims>()
            .ok_or_else(|| AppError::internal_error("Claims missing from request"))?;
        CurrentUser::try_from(claims)?
    };

    req.extensions_mut().insert(current_user);
    Ok(next.run(req).await)
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| AppError::internal_error("Route is missing the claims projection"))
    }
}

/// Verified claims for routes that only need a valid token. Must run inside
/// [`require_token`].
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| AppError::internal_error("Route is missing the token stage"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, Request};

    fn create_test_claims(sub: &str) -> Claims {
        Claims {
            sub: sub.to_string(),
            username: "alice".to_string(),
            admin: true,
            teacher: false,
            exp: 9_999_999_999,
            iat: 1_234_567_890,
        }
    }

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers), Ok("abc.def.ghi"));
    }

    #[test]
    fn test_bearer_token_missing_or_malformed() {
        assert_eq!(bearer_token(&HeaderMap::new()), Err(AuthError::MissingToken));

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), Err(AuthError::MissingToken));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), Err(AuthError::MissingToken));
    }

    #[test]
    fn test_projection_from_claims() {
        let current = CurrentUser::try_from(&create_test_claims("42")).unwrap();
        assert_eq!(
            current,
            CurrentUser {
                user_id: 42,
                username: "alice".to_string(),
                is_admin: true,
                is_teacher: false,
            }
        );
    }

    #[test]
    fn test_projection_rejects_non_numeric_subject() {
        let err = CurrentUser::try_from(&create_test_claims("not-a-number")).unwrap_err();
        assert_eq!(err.status.as_u16(), 500);
    }

    #[tokio::test]
    async fn test_auth_user_reads_verified_claims() {
        let (mut parts, _) = Request::new(()).into_parts();
        let claims = create_test_claims("7");
        parts.extensions.insert(claims.clone());

        let AuthUser(extracted) = AuthUser::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(extracted, claims);
    }

    #[tokio::test]
    async fn test_auth_user_outside_token_stage_is_server_fault() {
        let (mut parts, _) = Request::new(()).into_parts();
        parts
            .headers
            .insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));

        let err = AuthUser::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(err.status.as_u16(), 500);
    }
}
