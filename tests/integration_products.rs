mod common;

use std::collections::HashSet;

use axum::http::StatusCode;
use common::{
    access_token, body_json, create_test_product, create_test_user, request, test_app, test_state,
};
use serde_json::json;
use tower::ServiceExt;
use vitrina_models::{ProductScope, Role};

fn ids(body: &serde_json::Value) -> HashSet<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_list_is_scoped_by_role() {
    let state = test_state();
    let app = test_app(&state);

    let admin = create_test_user(&state, "admin", Role::Admin).await;
    let staff = create_test_user(&state, "staff", Role::Staff).await;
    let client = create_test_user(&state, "client", Role::Cliente).await;
    let other = create_test_user(&state, "other", Role::Cliente).await;

    let mut own = HashSet::new();
    own.insert(create_test_product(&state, &client, false).await.id.to_string());
    own.insert(create_test_product(&state, &client, false).await.id.to_string());
    own.insert(create_test_product(&state, &client, true).await.id.to_string());
    let public_other = create_test_product(&state, &other, true).await;
    create_test_product(&state, &other, false).await;

    let response = app
        .clone()
        .oneshot(request("GET", "/api/products/", Some(&access_token(&state, &client)), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(ids(&body_json(response).await), own);

    let response = app
        .clone()
        .oneshot(request("GET", "/api/products/", Some(&access_token(&state, &staff)), None))
        .await
        .unwrap();
    let visible = ids(&body_json(response).await);
    assert_eq!(visible.len(), 2);
    assert!(visible.contains(&public_other.id.to_string()));

    let response = app
        .oneshot(request("GET", "/api/products/", Some(&access_token(&state, &admin)), None))
        .await
        .unwrap();
    assert_eq!(ids(&body_json(response).await).len(), 5);
}

#[tokio::test]
async fn test_list_requires_authentication() {
    let state = test_state();
    let response = test_app(&state)
        .oneshot(request("GET", "/api/products/", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["detail"], "Authentication credentials were not provided.");
}

#[tokio::test]
async fn test_staff_creates_product_owned_by_itself() {
    let state = test_state();
    let app = test_app(&state);
    let staff = create_test_user(&state, "staff", Role::Staff).await;
    let other = create_test_user(&state, "other", Role::Cliente).await;

    let response = app
        .oneshot(request(
            "POST",
            "/api/products/",
            Some(&access_token(&state, &staff)),
            Some(json!({
                "name": "Desk lamp",
                "price": "19.99",
                "stock": 7,
                "is_public": true,
                "owner": other.id.to_string()
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["owner"], staff.id.to_string());
    assert_eq!(body["price"], "19.99");
    assert_eq!(body["is_public"], true);
}

#[tokio::test]
async fn test_cliente_cannot_create() {
    let state = test_state();
    let client = create_test_user(&state, "client", Role::Cliente).await;

    let response = test_app(&state)
        .oneshot(request(
            "POST",
            "/api/products/",
            Some(&access_token(&state, &client)),
            Some(json!({ "name": "Lamp", "price": "5.00", "stock": 1 })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(
        body["detail"],
        "You do not have permission to perform this action."
    );
    assert!(
        state
            .store
            .list_products(ProductScope::All)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_invalid_price_is_rejected() {
    let state = test_state();
    let staff = create_test_user(&state, "staff", Role::Staff).await;

    let response = test_app(&state)
        .oneshot(request(
            "POST",
            "/api/products/",
            Some(&access_token(&state, &staff)),
            Some(json!({ "name": "Lamp", "price": "1.999", "stock": 1 })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["fields"]["price"].is_array());
}

#[tokio::test]
async fn test_only_admin_deletes() {
    let state = test_state();
    let app = test_app(&state);
    let admin = create_test_user(&state, "admin", Role::Admin).await;
    let staff = create_test_user(&state, "staff", Role::Staff).await;
    let product = create_test_product(&state, &staff, true).await;
    let uri = format!("/api/products/{}/", product.id);

    let response = app
        .clone()
        .oneshot(request("DELETE", &uri, Some(&access_token(&state, &staff)), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(request("DELETE", &uri, Some(&access_token(&state, &admin)), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(request("GET", &uri, Some(&access_token(&state, &admin)), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_out_of_scope_product_is_not_found() {
    let state = test_state();
    let app = test_app(&state);
    let staff = create_test_user(&state, "staff", Role::Staff).await;
    let client = create_test_user(&state, "client", Role::Cliente).await;
    let private = create_test_product(&state, &client, false).await;
    let uri = format!("/api/products/{}/", private.id);

    let response = app
        .clone()
        .oneshot(request("GET", &uri, Some(&access_token(&state, &staff)), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["detail"], "Not found.");

    let response = app
        .clone()
        .oneshot(request(
            "PATCH",
            &uri,
            Some(&access_token(&state, &staff)),
            Some(json!({ "stock": 0 })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(request("GET", &uri, Some(&access_token(&state, &client)), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_put_requires_every_field_patch_does_not() {
    let state = test_state();
    let app = test_app(&state);
    let admin = create_test_user(&state, "admin", Role::Admin).await;
    let product = create_test_product(&state, &admin, false).await;
    let token = access_token(&state, &admin);
    let uri = format!("/api/products/{}", product.id);

    let response = app
        .clone()
        .oneshot(request("PUT", &uri, Some(&token), Some(json!({ "name": "Renamed" }))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["fields"]["price"].is_array());
    assert!(body["fields"]["stock"].is_array());

    let response = app
        .clone()
        .oneshot(request("PATCH", &uri, Some(&token), Some(json!({ "name": "Renamed" }))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["name"], "Renamed");
    assert_eq!(body["stock"], 5);

    let response = app
        .oneshot(request(
            "PUT",
            &uri,
            Some(&token),
            Some(json!({ "name": "Full", "price": "3.50", "stock": 9, "is_public": true })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["price"], "3.50");
    assert_eq!(body["is_public"], true);
}
