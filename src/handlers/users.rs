use axum::extract::{rejection::JsonRejection, Json, State};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::forms::SignupForm;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

use super::utils::json_body;

/// POST /user/create - validate the signup form, then create the login with
/// the identity provider
pub async fn create_user(
    State(state): State<AppState>,
    body: Result<Json<SignupForm>, JsonRejection>,
) -> ApiResult<Value> {
    let signup = json_body(body)?
        .validate()
        .map_err(|field_errors| ApiError::validation("signup form rejected", field_errors))?;

    let user = state.provisioner.create_user(&signup.email, &signup.password).await?;

    Ok(ApiResponse::success(json!({
        "email": user.email,
    })))
}
