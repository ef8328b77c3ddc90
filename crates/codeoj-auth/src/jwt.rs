//! Session token issuing, verification and refresh.
//!
//! Tokens are HS512 JWTs signed with the secret from [`JwtConfig`]. The
//! [`SessionTokens`] value is built once at startup and shared through the
//! application state; nothing here reads process-wide state.
//!
//! Expiry is checked here rather than by `jsonwebtoken` so that the same
//! signature check can serve both verification (`now <= exp`) and refresh
//! (`now <= exp + max_refresh`), and so both can be driven by an explicit
//! clock value in tests.
//!
//! # Example
//!
//! ```ignore
//! use codeoj_auth::{SessionIdentity, SessionTokens};
//! use codeoj_config::JwtConfig;
//!
//! let tokens = SessionTokens::new(&JwtConfig::from_env());
//! let issued = tokens.issue(&identity)?;
//! let claims = tokens.verify(&issued.token)?;
//! let refreshed = tokens.refresh(&issued.token)?;
//! ```

use std::fmt;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use codeoj_config::JwtConfig;

use crate::claims::{Claims, IssuedToken, SessionIdentity};
use crate::error::AuthError;

const ALGORITHM: Algorithm = Algorithm::HS512;

#[derive(Clone)]
pub struct SessionTokens {
    timeout: i64,
    max_refresh: i64,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTokens")
            .field("timeout", &self.timeout)
            .field("max_refresh", &self.max_refresh)
            .finish_non_exhaustive()
    }
}

impl SessionTokens {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            timeout: config.timeout,
            max_refresh: config.max_refresh,
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
        }
    }

    pub fn timeout(&self) -> i64 {
        self.timeout
    }

    pub fn max_refresh(&self) -> i64 {
        self.max_refresh
    }

    /// Mints a session token for an identity whose credentials were already
    /// checked by the caller.
    pub fn issue(&self, identity: &SessionIdentity) -> Result<IssuedToken, AuthError> {
        self.issue_at(identity, now())
    }

    pub fn issue_at(
        &self,
        identity: &SessionIdentity,
        now: i64,
    ) -> Result<IssuedToken, AuthError> {
        self.sign(Claims::for_identity(identity, now, self.timeout))
    }

    /// Verifies signature and expiry and returns the embedded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_at(token, now())
    }

    pub fn verify_at(&self, token: &str, now: i64) -> Result<Claims, AuthError> {
        let claims = self.decode_signed(token)?;

        if now > claims.exp {
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }

    /// Re-signs the same claim values with a new validity window.
    ///
    /// Accepted while `now <= exp + max_refresh`. Role flags are copied from
    /// the presented token and are not re-read from the credential store, so a
    /// role change only reaches a session at its next full login.
    pub fn refresh(&self, token: &str) -> Result<IssuedToken, AuthError> {
        self.refresh_at(token, now())
    }

    pub fn refresh_at(&self, token: &str, now: i64) -> Result<IssuedToken, AuthError> {
        let claims = self.decode_signed(token)?;

        if now > claims.exp.saturating_add(self.max_refresh) {
            return Err(AuthError::RefreshWindowExceeded);
        }

        self.sign(claims.renewed(now, self.timeout))
    }

    fn sign(&self, claims: Claims) -> Result<IssuedToken, AuthError> {
        let token = encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to create token: {}", e)))?;

        Ok(IssuedToken {
            token,
            expires_at: claims.exp,
        })
    }

    /// Checks structure and signature only; expiry is the caller's decision.
    fn decode_signed(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }
}

fn now() -> i64 {
    Utc::now().timestamp()
}
