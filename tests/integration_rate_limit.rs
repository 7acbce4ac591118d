mod common;

use axum::http::{StatusCode, header};
use common::{
    TEST_PASSWORD, body_json, create_test_user, login_request, request, test_app,
    test_rate_limit_config, test_state_with,
};
use tower::ServiceExt;
use vitrina_config::RateLimitConfig;
use vitrina_models::Role;

fn login_limit(max_attempts: u32) -> RateLimitConfig {
    RateLimitConfig {
        login_enabled: true,
        login_max_attempts: max_attempts,
        login_window_secs: 60,
        ..test_rate_limit_config()
    }
}

#[tokio::test]
async fn test_sixth_login_attempt_is_throttled() {
    let state = test_state_with(login_limit(5));
    let app = test_app(&state);

    for _ in 0..5 {
        let response = app
            .clone()
            .oneshot(login_request("192.168.1.100", "ghost", "wrong"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let response = app
        .clone()
        .oneshot(login_request("192.168.1.100", "ghost", "wrong"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    let retry_after: u64 = response.headers()[header::RETRY_AFTER]
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!((1..=60).contains(&retry_after));

    let body = body_json(response).await;
    assert!(
        body["detail"]
            .as_str()
            .unwrap()
            .starts_with("Request was throttled. Expected available in")
    );
}

#[tokio::test]
async fn test_different_ips_have_separate_windows() {
    let state = test_state_with(login_limit(5));
    let app = test_app(&state);

    for _ in 0..6 {
        app.clone()
            .oneshot(login_request("10.0.0.1", "ghost", "wrong"))
            .await
            .unwrap();
    }

    let response = app
        .oneshot(login_request("10.0.0.2", "ghost", "wrong"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_successful_logins_count_toward_the_limit() {
    let state = test_state_with(login_limit(2));
    let app = test_app(&state);
    create_test_user(&state, "maria", Role::Cliente).await;

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(login_request("10.0.0.9", "maria", TEST_PASSWORD))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .oneshot(login_request("10.0.0.9", "maria", TEST_PASSWORD))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_disabled_login_throttle_never_rejects() {
    let state = test_state_with(test_rate_limit_config());
    let app = test_app(&state);

    for _ in 0..10 {
        let response = app
            .clone()
            .oneshot(login_request("10.0.0.3", "ghost", "wrong"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_general_limit_applies_to_api_but_not_health() {
    let state = test_state_with(RateLimitConfig {
        general_enabled: true,
        anon_per_minute: 2,
        ..test_rate_limit_config()
    });
    let app = test_app(&state);

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(request("GET", "/api/products/", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let response = app
        .clone()
        .oneshot(request("GET", "/api/products/", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    for _ in 0..5 {
        let response = app
            .clone()
            .oneshot(request("GET", "/health", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn test_login_attempts_do_not_consume_general_quota() {
    let state = test_state_with(RateLimitConfig {
        general_enabled: true,
        anon_per_minute: 2,
        ..login_limit(5)
    });
    let app = test_app(&state);

    for _ in 0..5 {
        let response = app
            .clone()
            .oneshot(login_request("198.51.100.7", "ghost", "wrong"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
    let response = app
        .clone()
        .oneshot(login_request("198.51.100.7", "ghost", "wrong"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    // same client, full anonymous allowance still available
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(request("GET", "/api/products/", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
