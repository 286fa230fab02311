use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub domain: String,
    pub audience: String,
    pub client_id: String,
    pub client_secret: String,
    pub callback_url: String,
    /// Database connection used by the signup endpoint
    pub connection: String,
    /// Overrides the JWKS location derived from `domain`
    pub jwks_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub items_per_page: i64,
    pub comments_per_page: i64,
    pub enable_request_logging: bool,
    pub cors_origins: Vec<String>,
}

impl AuthConfig {
    /// Token issuer, always `https://{domain}/` with the trailing slash Auth0 emits
    pub fn issuer(&self) -> String {
        format!("https://{}/", self.domain.trim_end_matches('/'))
    }

    pub fn jwks_url(&self) -> String {
        match &self.jwks_url {
            Some(url) => url.clone(),
            None => format!("{}.well-known/jwks.json", self.issuer()),
        }
    }

    /// Root of this service, taken from the configured callback URL
    pub fn app_origin(&self) -> Result<url::Url, url::ParseError> {
        url::Url::parse(&self.callback_url)?.join("/")
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from `var`, a lookup shaped like `env::var`
    fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        // DATABASE_URL wins. The DB_HOST/DB_NAME pair only fills in a local
        // development database; other environments must name theirs.
        if let Some(v) = var("DATABASE_URL") {
            self.database.url = v;
        } else if matches!(self.environment, Environment::Development) {
            let host = var("DB_HOST").unwrap_or_else(|| "localhost:5432".to_string());
            let name = var("DB_NAME").unwrap_or_else(|| "fsnd".to_string());
            self.database.url = format!("postgresql://{}/{}", host, name);
        }
        if let Some(v) = var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Some(v) = var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Identity provider
        if let Some(v) = var("AUTH0_DOMAIN") {
            self.auth.domain = v;
        }
        if let Some(v) = var("API_AUDIENCE") {
            self.auth.audience = v;
        }
        if let Some(v) = var("AUTH0_CLIENT_ID") {
            self.auth.client_id = v;
        }
        if let Some(v) = var("AUTH0_CLIENT_SECRET") {
            self.auth.client_secret = v;
        }
        if let Some(v) = var("AUTH0_CALLBACK_URL") {
            self.auth.callback_url = v;
        }
        if let Some(v) = var("AUTH0_CONNECTION") {
            self.auth.connection = v;
        }
        if let Some(v) = var("AUTH0_JWKS_URL") {
            self.auth.jwks_url = Some(v);
        }

        // API overrides
        if let Some(v) = var("PORT") {
            self.api.port = v.parse().unwrap_or(self.api.port);
        }
        if let Some(v) = var("API_ITEMS_PER_PAGE") {
            self.api.items_per_page = page_size(&v).unwrap_or(self.api.items_per_page);
        }
        if let Some(v) = var("API_COMMENTS_PER_PAGE") {
            self.api.comments_per_page = page_size(&v).unwrap_or(self.api.comments_per_page);
        }
        if let Some(v) = var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Some(v) = var("API_CORS_ORIGINS") {
            self.api.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: "postgresql://localhost:5432/fsnd".to_string(),
                max_connections: 10,
                connection_timeout: 30,
            },
            auth: AuthConfig::unconfigured(),
            api: ApiConfig {
                port: 5000,
                items_per_page: 10,
                comments_per_page: 5,
                enable_request_logging: true,
                cors_origins: Vec::new(),
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 20,
                connection_timeout: 10,
            },
            auth: AuthConfig::unconfigured(),
            api: ApiConfig {
                port: 5000,
                items_per_page: 10,
                comments_per_page: 5,
                enable_request_logging: true,
                cors_origins: Vec::new(),
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 50,
                connection_timeout: 5,
            },
            auth: AuthConfig::unconfigured(),
            api: ApiConfig {
                port: 5000,
                items_per_page: 10,
                comments_per_page: 5,
                enable_request_logging: false,
                cors_origins: Vec::new(),
            },
        }
    }
}

/// Page size override; anything that is not a positive integer is ignored
fn page_size(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|n| *n >= 1)
}

impl AuthConfig {
    fn unconfigured() -> Self {
        Self {
            domain: String::new(),
            audience: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            callback_url: "http://localhost:5000/login-results".to_string(),
            connection: "Username-Password-Authentication".to_string(),
            jwks_url: None,
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}
