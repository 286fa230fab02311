use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::auth::{check_permissions, extract_bearer_token, Authorizer};
use crate::error::ApiError;
use crate::state::AppState;

pub use crate::auth::AuthUser;

/// State for one guarded route: the verifier plus the single permission
/// that route requires
#[derive(Clone)]
pub struct PermissionGuard {
    authorizer: Arc<Authorizer>,
    permission: &'static str,
}

impl PermissionGuard {
    pub fn new(state: &AppState, permission: &'static str) -> Self {
        Self {
            authorizer: state.authorizer.clone(),
            permission,
        }
    }
}

/// Bearer-token middleware. Verifies the token, checks the guard's
/// permission and injects `AuthUser` for the handler.
pub async fn require_permission(
    State(guard): State<PermissionGuard>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(request.headers())?.to_string();
    let claims = guard.authorizer.verify(&token).await?;
    check_permissions(guard.permission, &claims)?;

    let auth_user = AuthUser::from(claims);
    tracing::debug!("{} granted {}", auth_user.subject, guard.permission);
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}
