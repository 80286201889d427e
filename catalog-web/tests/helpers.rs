//! Integration test helpers
//!
//! Each test gets its own server on an ephemeral port with an in-memory store.

#![allow(dead_code)]

use catalog_core::{AppConfig, PasswordConfig};
use serde_json::{json, Value};
use std::sync::LazyLock;
use tokio::net::TcpListener;
use tracing::info;
use uuid::Uuid;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin-password-123";

// Initialise tracing only once
static TRACING: LazyLock<()> = LazyLock::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(std::io::sink)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
});

/// Running test application
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn get_health(&self) -> reqwest::Response {
        self.api_client
            .get(self.url("/healthz"))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_register<Body>(&self, body: &Body) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.api_client
            .post(self.url("/v1/auth/register"))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_login<Body>(&self, body: &Body) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.api_client
            .post(self.url("/v1/auth/login"))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_refresh(&self, refresh_token: &str) -> reqwest::Response {
        self.api_client
            .post(self.url("/v1/auth/refresh"))
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_with_auth(&self, path: &str, token: &str) -> reqwest::Response {
        self.api_client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_with_auth<Body>(&self, path: &str, token: &str, body: &Body) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.api_client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn put_with_auth<Body>(&self, path: &str, token: &str, body: &Body) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.api_client
            .put(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn delete_with_auth(&self, path: &str, token: &str) -> reqwest::Response {
        self.api_client
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Register `user` and return the created account
    pub async fn register(&self, user: &TestUser) -> Value {
        let response = self.post_register(&user.registration()).await;
        assert_eq!(response.status().as_u16(), 201, "registration failed");
        response.json::<Value>().await.expect("json body")["data"].clone()
    }

    /// Log in and return the access token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .post_login(&json!({ "email": email, "password": password }))
            .await;
        assert_eq!(response.status().as_u16(), 200, "login failed");
        let body: Value = response.json().await.expect("json body");
        body["data"]["access_token"]
            .as_str()
            .expect("access token")
            .to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }
}

/// Configuration shared by every integration test
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.server.port = 0;
    config.auth.jwt_secret = format!("integration-secret-{}", Uuid::new_v4());
    config.auth.admin_email = Some(ADMIN_EMAIL.to_string());
    config.auth.admin_password = Some(ADMIN_PASSWORD.to_string());
    config.password = PasswordConfig::minimal();
    config
}

/// Spawn an application backed by the in-memory store
pub async fn spawn_app() -> TestApp {
    spawn_app_with_config(test_config()).await
}

/// Spawn an application with a custom configuration
pub async fn spawn_app_with_config(config: AppConfig) -> TestApp {
    LazyLock::force(&TRACING);

    info!("Building test application");
    let state = catalog_web::AppState::new(config).await.unwrap();
    let app = catalog_web::create_app(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        port,
        api_client: client,
    }
}

/// Test account data
pub struct TestUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl TestUser {
    /// Unique account so tests never collide
    pub fn generate() -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        Self {
            name: format!("User {}", &suffix[..8]),
            email: format!("user-{}@example.com", &suffix[..12]),
            password: "password123".to_string(),
        }
    }

    pub fn registration(&self) -> Value {
        json!({
            "name": self.name,
            "email": self.email,
            "password": self.password,
        })
    }

    pub fn credentials(&self) -> Value {
        json!({
            "email": self.email,
            "password": self.password,
        })
    }
}
