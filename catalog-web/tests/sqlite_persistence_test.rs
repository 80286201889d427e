//! Accounts and items survive a restart when backed by a SQLite file

#![cfg(feature = "sqlite")]

mod helpers;

use helpers::*;
use serde_json::{json, Value};

#[tokio::test]
async fn data_survives_server_restart() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("catalog.db").display());

    let mut config = test_config();
    config.database.url = Some(url);

    let user = TestUser::generate();
    let item_id = {
        let app = spawn_app_with_config(config.clone()).await;
        app.register(&user).await;
        let token = app.login(&user.email, &user.password).await;

        let response = app
            .post_with_auth(
                "/v1/items",
                &token,
                &json!({ "name": "Lamp", "description": "Desk lamp", "price": 25.0, "stock": 4 }),
            )
            .await;
        assert_eq!(response.status().as_u16(), 201);
        let body: Value = response.json().await.unwrap();
        body["data"]["id"].as_str().unwrap().to_string()
    };

    // Same secret and database, fresh process state
    let app = spawn_app_with_config(config).await;
    let token = app.login(&user.email, &user.password).await;

    let response = app
        .get_with_auth(&format!("/v1/items/{}", item_id), &token)
        .await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["name"], "Lamp");

    // The bootstrapped admin is not duplicated on restart
    let admin_token = app.admin_token().await;
    let response = app.get_with_auth("/v1/users", &admin_token).await;
    let body: Value = response.json().await.unwrap();
    let admins = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|a| a["role"] == "admin")
        .count();
    assert_eq!(admins, 1);

    let response = app.post_register(&user.registration()).await;
    assert_eq!(response.status().as_u16(), 409);
}
