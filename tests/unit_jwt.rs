use codeoj_user::codeoj_auth::{AuthError, SessionIdentity, SessionTokens};
use codeoj_user::codeoj_config::JwtConfig;

const NOW: i64 = 1_700_000_000;

fn get_test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-key-at-least-32-characters-long".to_string(),
        timeout: 14_400,
        max_refresh: 3_600,
    }
}

fn identity(user_id: i64) -> SessionIdentity {
    SessionIdentity {
        user_id,
        username: format!("user{}", user_id),
        is_admin: false,
        is_teacher: true,
    }
}

#[test]
fn test_issue_verify_round_trip_for_many_subjects() {
    let tokens = SessionTokens::new(&get_test_jwt_config());

    for user_id in [1_i64, 42, 9_007_199_254_740_993] {
        let issued = tokens.issue_at(&identity(user_id), NOW).unwrap();
        let claims = tokens.verify_at(&issued.token, NOW).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert!(claims.teacher);
        assert!(!claims.admin);
    }
}

#[test]
fn test_every_signature_byte_matters() {
    let tokens = SessionTokens::new(&get_test_jwt_config());
    let issued = tokens.issue_at(&identity(7), NOW).unwrap();
    let sig_start = issued.token.rfind('.').unwrap() + 1;

    // The final base64url char carries padding bits; skip it.
    for idx in sig_start..issued.token.len() - 1 {
        let mut bytes = issued.token.clone().into_bytes();
        bytes[idx] = if bytes[idx] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        assert_eq!(
            tokens.verify_at(&tampered, NOW),
            Err(AuthError::InvalidToken),
            "byte {} accepted",
            idx
        );
    }
}

#[test]
fn test_tampered_payload_is_rejected() {
    let tokens = SessionTokens::new(&get_test_jwt_config());
    let issued = tokens.issue_at(&identity(7), NOW).unwrap();

    let parts: Vec<&str> = issued.token.split('.').collect();
    let other = tokens.issue_at(&identity(8), NOW).unwrap();
    let other_payload = other.token.split('.').nth(1).unwrap();
    let spliced = format!("{}.{}.{}", parts[0], other_payload, parts[2]);

    assert_eq!(tokens.verify_at(&spliced, NOW), Err(AuthError::InvalidToken));
}

#[test]
fn test_refresh_window_is_measured_from_expiry() {
    let tokens = SessionTokens::new(&get_test_jwt_config());
    let issued = tokens.issue_at(&identity(7), NOW).unwrap();

    let limit = issued.expires_at + 3_600;
    assert!(tokens.refresh_at(&issued.token, limit - 1).is_ok());
    assert!(tokens.refresh_at(&issued.token, limit).is_ok());
    assert_eq!(
        tokens.refresh_at(&issued.token, limit + 1),
        Err(AuthError::RefreshWindowExceeded)
    );
}

#[test]
fn test_refreshed_token_verifies() {
    let tokens = SessionTokens::new(&get_test_jwt_config());
    let issued = tokens.issue_at(&identity(7), NOW).unwrap();

    let later = issued.expires_at + 60;
    assert_eq!(
        tokens.verify_at(&issued.token, later),
        Err(AuthError::TokenExpired)
    );

    let refreshed = tokens.refresh_at(&issued.token, later).unwrap();
    let claims = tokens.verify_at(&refreshed.token, later).unwrap();
    assert_eq!(claims.sub, "7");
    assert_eq!(claims.exp, later + 14_400);
}
