mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use snack_catalog_api::database::CatalogStore;

fn new_item(category: i32) -> Value {
    json!({ "title": "Crunchy Cheese Flavored Snack Chips", "brand": "Cheetos", "category": category })
}

#[tokio::test]
async fn missing_header_is_rejected() -> Result<()> {
    let server = common::spawn_server().await?;
    let category = server.seed_category("Chips").await?;

    let res = server
        .client
        .post(server.url("/items"))
        .json(&new_item(category))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], 401);
    assert_eq!(body["code"], "authorization_header_missing");
    assert_eq!(body["message"], "Authorization header is expected.");
    assert_eq!(server.store.count_items().await?, 0);
    Ok(())
}

#[tokio::test]
async fn non_bearer_scheme_is_rejected() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .client
        .get(server.url("/temp/comments"))
        .header("Authorization", "Basic dXNlcjpwYXNz")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "invalid_header");
    assert_eq!(body["message"], "Authorization header must start with \"Bearer\".");
    Ok(())
}

#[tokio::test]
async fn wrong_permission_names_the_missing_one() -> Result<()> {
    let server = common::spawn_server().await?;
    let category = server.seed_category("Chips").await?;

    let res = server
        .client
        .post(server.url("/items"))
        .bearer_auth(common::token(&["patch:item", "delete:item"]))
        .json(&new_item(category))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = res.json::<Value>().await?;
    assert_eq!(body["error"], 403);
    assert_eq!(body["code"], "unauthorized");
    assert_eq!(body["message"], "Permission not found: post:item.");
    Ok(())
}

#[tokio::test]
async fn token_without_permissions_claim_is_rejected() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .client
        .get(server.url("/temp/comments"))
        .bearer_auth(common::token_without_permissions())
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = res.json::<Value>().await?;
    assert_eq!(body["error"], 400);
    assert_eq!(body["message"], "Permissions not included in JWT.");
    Ok(())
}

#[tokio::test]
async fn expired_token_is_rejected() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .client
        .get(server.url("/temp/comments"))
        .bearer_auth(common::expired_token(&["get:temp_comments"]))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "token_expired");
    assert_eq!(body["message"], "Token expired.");
    Ok(())
}

#[tokio::test]
async fn garbage_token_is_rejected() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .client
        .delete(server.url("/items/1"))
        .bearer_auth("not.a.jwt")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "invalid_header");
    Ok(())
}

#[tokio::test]
async fn public_routes_need_no_token() -> Result<()> {
    let server = common::spawn_server().await?;
    server.seed_category("Chips").await?;

    let res = server.client.get(server.url("/categories")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}
