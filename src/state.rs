use std::sync::Arc;

use crate::auth::Authorizer;
use crate::config::ApiConfig;
use crate::database::CatalogStore;
use crate::identity::{OAuthClient, UserProvisioner};

/// Shared handles every handler and guard can reach through axum `State`
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CatalogStore>,
    pub authorizer: Arc<Authorizer>,
    pub provisioner: Arc<dyn UserProvisioner>,
    pub oauth: Arc<OAuthClient>,
    pub api: ApiConfig,
}

impl AppState {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        authorizer: Arc<Authorizer>,
        provisioner: Arc<dyn UserProvisioner>,
        oauth: Arc<OAuthClient>,
        api: ApiConfig,
    ) -> Self {
        Self { store, authorizer, provisioner, oauth, api }
    }

    pub fn items_per_page(&self) -> i64 {
        self.api.items_per_page
    }

    pub fn comments_per_page(&self) -> i64 {
        self.api.comments_per_page
    }
}
