#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::{json, Value};

use snack_catalog_api::auth::{Authorizer, StaticJwks};
use snack_catalog_api::config::{AppConfig, AuthConfig};
use snack_catalog_api::database::models::{Item, NewItem};
use snack_catalog_api::database::{CatalogStore, MemoryCatalogStore};
use snack_catalog_api::identity::{OAuthClient, ProvisionError, ProvisionedUser, UserProvisioner};
use snack_catalog_api::AppState;

pub const DOMAIN: &str = "snacks.test";
pub const ISSUER: &str = "https://snacks.test/";
pub const AUDIENCE: &str = "snacks";
pub const KEY_ID: &str = "test-key-1";

/// Email the fake provider reports as already registered
pub const TAKEN_EMAIL: &str = "taken@example.com";

/// Records signups instead of calling the identity provider
#[derive(Default)]
pub struct FakeProvisioner {
    pub created: Mutex<Vec<String>>,
}

#[async_trait]
impl UserProvisioner for FakeProvisioner {
    async fn create_user(&self, email: &str, _password: &str) -> Result<ProvisionedUser, ProvisionError> {
        if email == TAKEN_EMAIL {
            return Err(ProvisionError::Rejected {
                status: 400,
                body: r#"{"code":"invalid_signup"}"#.to_string(),
            });
        }
        self.created.lock().unwrap().push(email.to_string());
        Ok(ProvisionedUser {
            user_id: format!("auth0|{}", email),
            email: email.to_string(),
        })
    }
}

/// One in-process server with its own in-memory store
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub store: Arc<MemoryCatalogStore>,
    pub provisioner: Arc<FakeProvisioner>,
    pub client: reqwest::Client,
}

impl TestServer {
    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Insert `count` items into `category` directly through the store
    pub async fn seed_items(&self, category: i32, count: usize) -> Result<Vec<Item>> {
        let mut items = Vec::with_capacity(count);
        for n in 0..count {
            let item = self
                .store
                .insert_item(NewItem {
                    title: format!("Snack {}", n + 1),
                    brand: "Acme".to_string(),
                    category,
                    comment: None,
                })
                .await?;
            items.push(item);
        }
        Ok(items)
    }

    pub async fn seed_category(&self, kind: &str) -> Result<i32> {
        Ok(self.store.insert_category(kind).await?.id)
    }
}

fn auth_config() -> AuthConfig {
    AuthConfig {
        domain: DOMAIN.to_string(),
        audience: AUDIENCE.to_string(),
        client_id: "test-client".to_string(),
        client_secret: "test-secret".to_string(),
        callback_url: "http://localhost/login-results".to_string(),
        connection: "Username-Password-Authentication".to_string(),
        jwks_url: None,
    }
}

/// Start a fresh server on an unused port and wait until it answers
pub async fn spawn_server() -> Result<TestServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);

    let keys = StaticJwks::from_json(include_str!("../fixtures/jwks.json"))?;
    let authorizer = Authorizer::new(ISSUER, AUDIENCE, Arc::new(keys));
    let store = Arc::new(MemoryCatalogStore::new());
    let provisioner = Arc::new(FakeProvisioner::default());
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()?;

    let mut api = AppConfig::development().api;
    api.enable_request_logging = false;

    let state = AppState::new(
        store.clone(),
        Arc::new(authorizer),
        provisioner.clone(),
        Arc::new(OAuthClient::new(auth_config(), client.clone())),
        api,
    );

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test port")?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, snack_catalog_api::app(state)).await;
    });

    let server = TestServer {
        port,
        base_url,
        store,
        provisioner,
        client,
    };
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

fn sign(claims: Value) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(KEY_ID.to_string());
    let key = EncodingKey::from_rsa_pem(include_bytes!("../fixtures/jwt_private.pem"))
        .expect("fixture key is valid PEM");
    encode(&header, &claims, &key).expect("fixture key signs")
}

fn claims(permissions: &[&str], exp_offset: i64) -> Value {
    let now = chrono::Utc::now().timestamp();
    json!({
        "sub": "auth0|tester",
        "iss": ISSUER,
        "aud": [AUDIENCE],
        "iat": now,
        "exp": now + exp_offset,
        "permissions": permissions,
    })
}

/// Bearer token carrying `permissions`, valid for an hour
pub fn token(permissions: &[&str]) -> String {
    sign(claims(permissions, 3600))
}

pub fn expired_token(permissions: &[&str]) -> String {
    sign(claims(permissions, -3600))
}

/// Valid signature and audience but no `permissions` claim at all
pub fn token_without_permissions() -> String {
    let now = chrono::Utc::now().timestamp();
    sign(json!({
        "sub": "auth0|tester",
        "iss": ISSUER,
        "aud": [AUDIENCE],
        "iat": now,
        "exp": now + 3600,
    }))
}

/// Every permission the API knows about
pub const ALL_PERMISSIONS: &[&str] = &[
    "post:item",
    "patch:item",
    "delete:item",
    "temp_post:comments",
    "get:temp_comments",
    "temp_delete:comments",
    "post:comments",
    "delete:comments",
];

pub fn admin_token() -> String {
    token(ALL_PERMISSIONS)
}
