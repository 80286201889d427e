//! Authentication flow tests against a running server

mod helpers;

use helpers::*;
use serde_json::{json, Value};

#[tokio::test]
async fn register_returns_public_view_and_rejects_duplicates() {
    let app = spawn_app().await;

    let response = app
        .post_register(&json!({
            "name": "Ann",
            "email": "ann@example.com",
            "password": "password123"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 201);

    let body: Value = response.json().await.unwrap();
    let account = &body["data"];
    assert_eq!(account["name"], "Ann");
    assert_eq!(account["email"], "ann@example.com");
    assert_eq!(account["role"], "user");
    assert!(account.get("password").is_none());
    assert!(account.get("password_hash").is_none());

    // Same address with different casing is still a duplicate
    let response = app
        .post_register(&json!({
            "name": "Ann Again",
            "email": "ANN@example.com",
            "password": "password456"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 409);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], "already_exists");
}

#[tokio::test]
async fn register_validates_input() {
    let app = spawn_app().await;

    let cases = [
        json!({ "name": "", "email": "a@example.com", "password": "password123" }),
        json!({ "name": "Ann", "email": "not-an-email", "password": "password123" }),
        json!({ "name": "Ann", "email": "a@example.com", "password": "short" }),
    ];

    for case in cases {
        let response = app.post_register(&case).await;
        assert_eq!(response.status().as_u16(), 400, "payload {}", case);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"]["code"], "validation_error");
    }
}

#[tokio::test]
async fn login_issues_distinct_tokens() {
    let app = spawn_app().await;
    let user = TestUser::generate();
    app.register(&user).await;

    let response = app.post_login(&user.credentials()).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    let tokens = &body["data"];
    let access = tokens["access_token"].as_str().unwrap();
    let refresh = tokens["refresh_token"].as_str().unwrap();
    assert!(!access.is_empty());
    assert!(!refresh.is_empty());
    assert_ne!(access, refresh);
    assert_eq!(tokens["token_type"], "Bearer");
    assert!(tokens["expires_in"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn login_failures_look_identical() {
    let app = spawn_app().await;
    let user = TestUser::generate();
    app.register(&user).await;

    let wrong_password = app
        .post_login(&json!({ "email": user.email, "password": "wrongpass" }))
        .await;
    let unknown_email = app
        .post_login(&json!({ "email": "nobody@example.com", "password": "wrongpass" }))
        .await;

    assert_eq!(wrong_password.status().as_u16(), 401);
    assert_eq!(unknown_email.status().as_u16(), 401);

    let first: Value = wrong_password.json().await.unwrap();
    let second: Value = unknown_email.json().await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first["error"]["code"], "invalid_credentials");
}

#[tokio::test]
async fn login_validates_input() {
    let app = spawn_app().await;

    let cases = [
        json!({ "email": "not-an-email", "password": "password123" }),
        json!({ "email": "ann@example.com", "password": "" }),
    ];

    for case in cases {
        let response = app.post_login(&case).await;
        assert_eq!(response.status().as_u16(), 400, "payload {}", case);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"]["code"], "validation_error");
    }
}

#[tokio::test]
async fn me_requires_a_valid_access_token() {
    let app = spawn_app().await;
    let user = TestUser::generate();
    let account = app.register(&user).await;
    let token = app.login(&user.email, &user.password).await;

    let response = app.get_with_auth("/v1/auth/me", &token).await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["id"], account["id"]);

    let response = app
        .api_client
        .get(app.url("/v1/auth/me"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);

    let response = app
        .api_client
        .get(app.url("/v1/auth/me"))
        .header("Authorization", format!("Token {}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);

    let response = app.get_with_auth("/v1/auth/me", "not.a.jwt").await;
    assert_eq!(response.status().as_u16(), 401);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], "unauthorized");
}

#[tokio::test]
async fn refresh_exchanges_refresh_token_only() {
    let app = spawn_app().await;
    let user = TestUser::generate();
    app.register(&user).await;

    let response = app.post_login(&user.credentials()).await;
    let body: Value = response.json().await.unwrap();
    let access = body["data"]["access_token"].as_str().unwrap().to_string();
    let refresh = body["data"]["refresh_token"].as_str().unwrap().to_string();

    let response = app.post_refresh(&refresh).await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    let renewed = body["data"]["access_token"].as_str().unwrap();
    assert_eq!(
        app.get_with_auth("/v1/auth/me", renewed).await.status().as_u16(),
        200
    );

    // Tokens of one kind never stand in for the other
    assert_eq!(app.post_refresh(&access).await.status().as_u16(), 401);
    assert_eq!(
        app.get_with_auth("/v1/auth/me", &refresh).await.status().as_u16(),
        401
    );
}

#[tokio::test]
async fn tokens_from_another_server_are_rejected() {
    let first = spawn_app().await;
    let second = spawn_app().await;

    let user = TestUser::generate();
    first.register(&user).await;
    let token = first.login(&user.email, &user.password).await;

    let response = second.get_with_auth("/v1/auth/me", &token).await;
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn listing_accounts_is_admin_only() {
    let app = spawn_app().await;
    let user = TestUser::generate();
    app.register(&user).await;
    let user_token = app.login(&user.email, &user.password).await;

    let response = app.get_with_auth("/v1/users", &user_token).await;
    assert_eq!(response.status().as_u16(), 403);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], "forbidden");

    let admin_token = app.admin_token().await;
    let response = app.get_with_auth("/v1/users", &admin_token).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    let accounts = body["data"].as_array().unwrap();
    assert_eq!(accounts.len(), 2);
    assert!(accounts.iter().any(|a| a["email"] == ADMIN_EMAIL && a["role"] == "admin"));
    assert!(accounts.iter().all(|a| a.get("password_hash").is_none()));
}

#[tokio::test]
async fn anonymous_account_listing_is_unauthorized() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .get(app.url("/v1/users"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);
}
