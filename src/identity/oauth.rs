use serde::{Deserialize, Serialize};
use url::Url;

use super::ProvisionError;
use crate::config::AuthConfig;

/// Tokens returned by `POST /oauth/token`
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

#[derive(Serialize)]
struct CodeExchange<'a> {
    grant_type: &'static str,
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
    redirect_uri: &'a str,
}

/// Authorization-code flow against the identity provider
pub struct OAuthClient {
    config: AuthConfig,
    client: reqwest::Client,
}

impl OAuthClient {
    pub fn new(config: AuthConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    /// Where `/login` sends the browser
    pub fn authorize_url(&self, state: &str) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&self.config.issuer())?.join("authorize")?;
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.callback_url)
            .append_pair("audience", &self.config.audience)
            .append_pair("scope", "openid profile email")
            .append_pair("state", state);
        Ok(url)
    }

    /// Provider logout, returning to the app's own origin afterwards
    pub fn logout_url(&self) -> Result<Url, url::ParseError> {
        let return_to = self.config.app_origin()?;
        let mut url = Url::parse(&self.config.issuer())?.join("v2/logout")?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("returnTo", return_to.as_str());
        Ok(url)
    }

    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, ProvisionError> {
        let response = self
            .client
            .post(format!("{}oauth/token", self.config.issuer()))
            .json(&CodeExchange {
                grant_type: "authorization_code",
                client_id: &self.config.client_id,
                client_secret: &self.config.client_secret,
                code,
                redirect_uri: &self.config.callback_url,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProvisionError::Rejected { status: status.as_u16(), body });
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OAuthClient {
        let mut config = crate::config::AppConfig::development().auth;
        config.domain = "snacks.us.auth0.com".to_string();
        config.client_id = "abc123".to_string();
        config.audience = "snacks".to_string();
        OAuthClient::new(config, reqwest::Client::new())
    }

    #[test]
    fn authorize_url_carries_client_and_state() {
        let url = client().authorize_url("xyz").unwrap();
        assert_eq!(url.host_str(), Some("snacks.us.auth0.com"));
        assert_eq!(url.path(), "/authorize");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("client_id".to_string(), "abc123".to_string())));
        assert!(pairs.contains(&("state".to_string(), "xyz".to_string())));
        assert!(pairs.contains(&("redirect_uri".to_string(), "http://localhost:5000/login-results".to_string())));
    }

    #[test]
    fn logout_url_returns_to_callback_origin() {
        let url = client().logout_url().unwrap();
        assert_eq!(url.path(), "/v2/logout");
        assert!(url.query().unwrap().contains("returnTo=http%3A%2F%2Flocalhost%3A5000%2F"));
    }

    #[test]
    fn logout_url_rejects_unparseable_callback() {
        let mut config = crate::config::AppConfig::development().auth;
        config.domain = "snacks.us.auth0.com".to_string();
        config.callback_url = "login-results".to_string();
        let client = OAuthClient::new(config, reqwest::Client::new());
        assert!(client.logout_url().is_err());
    }
}
