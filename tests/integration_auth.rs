mod common;

use axum::http::StatusCode;
use common::{
    TEST_PASSWORD, access_token, body_json, create_test_user, login_request, request, test_app,
    test_state,
};
use serde_json::json;
use tower::ServiceExt;
use vitrina_auth::verify_token;
use vitrina_models::{ProductScope, Role};

#[tokio::test]
async fn test_login_returns_token_pair() {
    let state = test_state();
    create_test_user(&state, "maria", Role::Staff).await;

    let response = test_app(&state)
        .oneshot(login_request("203.0.113.1", "maria", TEST_PASSWORD))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let access = body["access"].as_str().unwrap();
    assert!(body["refresh"].is_string());

    let claims = verify_token(access, &state.jwt_config).unwrap();
    assert_eq!(claims.username, "maria");
    assert_eq!(claims.role, Role::Staff);
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let state = test_state();
    create_test_user(&state, "maria", Role::Staff).await;

    let response = test_app(&state)
        .oneshot(login_request("203.0.113.1", "maria", "not-the-password"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(
        body["detail"],
        "No active account found with the given credentials"
    );
    assert!(body.get("access").is_none());
    assert!(body.get("refresh").is_none());
}

#[tokio::test]
async fn test_login_with_unknown_user() {
    let state = test_state();

    let response = test_app(&state)
        .oneshot(login_request("203.0.113.1", "ghost", TEST_PASSWORD))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_missing_password() {
    let state = test_state();

    let response = test_app(&state)
        .oneshot(request(
            "POST",
            "/api/login",
            None,
            Some(json!({ "username": "maria" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["fields"]["password"][0], "This field is required.");
}

#[tokio::test]
async fn test_refresh_issues_new_access_token() {
    let state = test_state();
    let app = test_app(&state);
    create_test_user(&state, "maria", Role::Cliente).await;

    let response = app
        .clone()
        .oneshot(login_request("203.0.113.1", "maria", TEST_PASSWORD))
        .await
        .unwrap();
    let refresh = body_json(response).await["refresh"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .oneshot(request(
            "POST",
            "/api/refresh/",
            None,
            Some(json!({ "refresh": refresh })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let claims = verify_token(body["access"].as_str().unwrap(), &state.jwt_config).unwrap();
    assert_eq!(claims.role, Role::Cliente);
}

#[tokio::test]
async fn test_refresh_rejects_access_token() {
    let state = test_state();
    let user = create_test_user(&state, "maria", Role::Cliente).await;

    let response = test_app(&state)
        .oneshot(request(
            "POST",
            "/api/refresh/",
            None,
            Some(json!({ "refresh": access_token(&state, &user) })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await["detail"],
        "Token is invalid or expired"
    );
}

#[tokio::test]
async fn test_protected_endpoint() {
    let state = test_state();
    let app = test_app(&state);
    let user = create_test_user(&state, "maria", Role::Cliente).await;

    let response = app
        .clone()
        .oneshot(request("GET", "/api/protected/", Some(&access_token(&state, &user)), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Access granted");
    assert_eq!(body["user"], "maria");

    let response = app
        .clone()
        .oneshot(request("GET", "/api/protected/", Some("garbage"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(request("GET", "/api/protected/", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_of_deleted_user_is_rejected() {
    let state = test_state();
    let app = test_app(&state);
    let admin = create_test_user(&state, "admin", Role::Admin).await;
    let gone = create_test_user(&state, "gone", Role::Staff).await;
    let gone_token = access_token(&state, &gone);

    let response = app
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/api/users/{}/", gone.id),
            Some(&access_token(&state, &admin)),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(request("GET", "/api/protected/", Some(&gone_token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["detail"], "User not found");

    let response = app
        .oneshot(request(
            "POST",
            "/api/products/",
            Some(&gone_token),
            Some(json!({ "name": "Lamp", "price": "19.99", "stock": 3 })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let products = state.store.list_products(ProductScope::All).await.unwrap();
    assert!(products.is_empty());
}

#[tokio::test]
async fn test_health() {
    let state = test_state();

    let response = test_app(&state)
        .oneshot(request("GET", "/health", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "ok" }));
}
