mod common;

use axum::http::StatusCode;
use chrono::Utc;
use codeoj_user::codeoj_auth::{SessionIdentity, SessionTokens};
use common::{
    create_test_user, empty_request, get_test_jwt_config, json_request, login, send,
    setup_app_without_store, setup_test_app,
};
use serde_json::json;

#[tokio::test]
async fn test_ping() {
    let app = setup_test_app();
    let (status, body) = send(&app, empty_request("GET", "/ping", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "pong");
}

#[tokio::test]
async fn test_ping_reports_unreachable_store() {
    let app = setup_app_without_store();
    let (status, body) = send(&app, empty_request("GET", "/ping", None)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Server error");
}

#[tokio::test]
async fn test_unknown_route() {
    let app = setup_test_app();
    let (status, body) = send(&app, empty_request("GET", "/api/v1/nowhere", None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Page not found");
}

#[tokio::test]
async fn test_login_success_carries_subject() {
    let app = setup_test_app();
    let user = create_test_user(&app, "alice", "secret1", false).await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/token",
            None,
            json!({ "username": "alice", "password": "secret1" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["expire"].is_string());

    let claims = app.state.tokens.verify(body["token"].as_str().unwrap()).unwrap();
    assert_eq!(claims.sub, user.id.to_string());
    assert_eq!(claims.username, "alice");
    assert!(!claims.admin);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = setup_test_app();
    create_test_user(&app, "alice", "secret1", false).await;

    let (wrong_status, wrong_body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/token",
            None,
            json!({ "username": "alice", "password": "wrong-password" }),
        ),
    )
    .await;
    let (unknown_status, unknown_body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/token",
            None,
            json!({ "username": "nobody", "password": "secret1" }),
        ),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
async fn test_login_missing_password() {
    let app = setup_test_app();
    let (status, _) = send(
        &app,
        json_request("POST", "/api/v1/token", None, json!({ "username": "alice" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_protected_route_without_token() {
    let app = setup_test_app();

    let (status, _) = send(&app, empty_request("GET", "/api/v1/user", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        json_request("POST", "/api/v1/username", None, json!({ "user_id": ["1"] })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_with_garbage_token() {
    let app = setup_test_app();
    let (status, body) = send(&app, empty_request("GET", "/api/v1/user", Some("not.a.jwt"))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid or expired token");
}

#[tokio::test]
async fn test_protected_route_with_expired_token() {
    let app = setup_test_app();
    let user = create_test_user(&app, "alice", "secret1", false).await;
    let tokens = SessionTokens::new(&get_test_jwt_config());

    let long_ago = Utc::now().timestamp() - 20_000;
    let issued = tokens
        .issue_at(
            &SessionIdentity {
                user_id: user.id,
                username: user.username.clone(),
                is_admin: false,
                is_teacher: false,
            },
            long_ago,
        )
        .unwrap();

    let (status, _) = send(&app, empty_request("GET", "/api/v1/user", Some(&issued.token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_returns_new_token() {
    let app = setup_test_app();
    create_test_user(&app, "alice", "secret1", false).await;
    let token = login(&app, "alice", "secret1").await;

    let (status, body) = send(&app, empty_request("GET", "/api/v1/token", Some(&token))).await;

    assert_eq!(status, StatusCode::OK);
    let claims = app.state.tokens.verify(body["token"].as_str().unwrap()).unwrap();
    assert_eq!(claims.username, "alice");
}

#[tokio::test]
async fn test_refresh_accepts_expired_token_inside_window() {
    let app = setup_test_app();
    let user = create_test_user(&app, "alice", "secret1", false).await;
    let tokens = SessionTokens::new(&get_test_jwt_config());

    // Expired 30 minutes ago; the refresh window is one hour.
    let issued_at = Utc::now().timestamp() - 14_400 - 1_800;
    let issued = tokens
        .issue_at(
            &SessionIdentity {
                user_id: user.id,
                username: user.username.clone(),
                is_admin: false,
                is_teacher: false,
            },
            issued_at,
        )
        .unwrap();

    let (status, _) = send(&app, empty_request("GET", "/api/v1/user", Some(&issued.token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, empty_request("GET", "/api/v1/token", Some(&issued.token))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        empty_request("GET", "/api/v1/user", Some(body["token"].as_str().unwrap())),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_rejects_token_past_window() {
    let app = setup_test_app();
    let user = create_test_user(&app, "alice", "secret1", false).await;
    let tokens = SessionTokens::new(&get_test_jwt_config());

    let issued_at = Utc::now().timestamp() - 14_400 - 3_600 - 60;
    let issued = tokens
        .issue_at(
            &SessionIdentity {
                user_id: user.id,
                username: user.username.clone(),
                is_admin: false,
                is_teacher: false,
            },
            issued_at,
        )
        .unwrap();

    let (status, _) = send(&app, empty_request("GET", "/api/v1/token", Some(&issued.token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_without_token() {
    let app = setup_test_app();
    let (status, _) = send(&app, empty_request("GET", "/api/v1/token", None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
