use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::config::AuthConfig;

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("identity provider rejected signup ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("identity provider response had no user id")]
    MissingUserId,

    #[error("identity provider request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvisionedUser {
    pub user_id: String,
    pub email: String,
}

/// Creates login credentials with the identity provider
#[async_trait]
pub trait UserProvisioner: Send + Sync {
    async fn create_user(&self, email: &str, password: &str) -> Result<ProvisionedUser, ProvisionError>;
}

#[derive(Serialize)]
struct SignupRequest<'a> {
    client_id: &'a str,
    email: &'a str,
    password: &'a str,
    connection: &'a str,
}

#[derive(Deserialize)]
struct SignupResponse {
    #[serde(rename = "_id")]
    id: Option<String>,
    email: Option<String>,
}

/// Auth0 database-connection signup (`POST /dbconnections/signup`)
pub struct Auth0Provisioner {
    signup_url: String,
    client_id: String,
    connection: String,
    client: reqwest::Client,
}

impl Auth0Provisioner {
    pub fn new(config: &AuthConfig, client: reqwest::Client) -> Self {
        Self {
            signup_url: format!("{}dbconnections/signup", config.issuer()),
            client_id: config.client_id.clone(),
            connection: config.connection.clone(),
            client,
        }
    }
}

#[async_trait]
impl UserProvisioner for Auth0Provisioner {
    async fn create_user(&self, email: &str, password: &str) -> Result<ProvisionedUser, ProvisionError> {
        let response = self
            .client
            .post(&self.signup_url)
            .json(&SignupRequest {
                client_id: &self.client_id,
                email,
                password,
                connection: &self.connection,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProvisionError::Rejected { status: status.as_u16(), body });
        }

        let created: SignupResponse = response.json().await?;
        let user = normalize(created, email)?;
        info!("Provisioned user {}", user.user_id);
        Ok(user)
    }
}

fn normalize(created: SignupResponse, requested_email: &str) -> Result<ProvisionedUser, ProvisionError> {
    let id = created.id.ok_or(ProvisionError::MissingUserId)?;
    Ok(ProvisionedUser {
        user_id: format!("auth0|{}", id),
        email: created.email.unwrap_or_else(|| requested_email.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_gets_connection_prefix() {
        let created: SignupResponse =
            serde_json::from_str(r#"{"_id":"64f0c1","email_verified":false,"email":"snack@example.com"}"#).unwrap();
        let user = normalize(created, "snack@example.com").unwrap();
        assert_eq!(user.user_id, "auth0|64f0c1");
        assert_eq!(user.email, "snack@example.com");
    }

    #[test]
    fn response_without_id_is_an_error() {
        let created: SignupResponse = serde_json::from_str(r#"{"email":"snack@example.com"}"#).unwrap();
        assert!(matches!(normalize(created, "snack@example.com"), Err(ProvisionError::MissingUserId)));
    }

    #[test]
    fn signup_url_is_built_from_domain() {
        let mut config = crate::config::AppConfig::development().auth;
        config.domain = "snacks.us.auth0.com".to_string();
        let provisioner = Auth0Provisioner::new(&config, reqwest::Client::new());
        assert_eq!(provisioner.signup_url, "https://snacks.us.auth0.com/dbconnections/signup");
    }
}
