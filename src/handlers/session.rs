//! Browser login through the identity provider's authorization-code flow.
//! Tokens end up in an HttpOnly cookie; nothing is kept server side.

use axum::{
    extract::{Query, State},
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderMap,
    },
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use cookie::{time::Duration, Cookie, SameSite};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

const STATE_COOKIE: &str = "oauth_state";
const TOKEN_COOKIE: &str = "access_token";
const STATE_TTL_SECS: i64 = 600;

fn set_cookie(name: &'static str, value: &str, max_age: i64) -> String {
    Cookie::build((name, value.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(max_age))
        .build()
        .to_string()
}

fn clear_cookie(name: &'static str) -> String {
    set_cookie(name, "", 0)
}

/// Value of cookie `name` from the request's `Cookie` headers
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| Cookie::split_parse(value))
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_string())
}

/// GET /login
pub async fn login(State(state): State<AppState>) -> Result<Response, ApiError> {
    let nonce = Uuid::new_v4().simple().to_string();
    let url = state
        .oauth
        .authorize_url(&nonce)
        .map_err(|e| ApiError::internal_server_error(format!("authorize url: {}", e)))?;

    Ok((
        AppendHeaders([(SET_COOKIE, set_cookie(STATE_COOKIE, &nonce, STATE_TTL_SECS))]),
        Redirect::to(url.as_str()),
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// GET /login-results - provider callback
pub async fn login_results(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<CallbackQuery>,
) -> Result<Response, ApiError> {
    if let Some(error) = query.error {
        return Err(ApiError::bad_request(format!("provider returned error: {}", error)));
    }
    let code = query.code.ok_or_else(|| ApiError::bad_request("callback without code"))?;

    let expected = read_cookie(&headers, STATE_COOKIE);
    if expected.is_none() || expected != query.state {
        return Err(ApiError::bad_request("login state mismatch"));
    }

    let tokens = state.oauth.exchange_code(&code).await?;
    let max_age = tokens.expires_in.unwrap_or(86_400);
    tracing::info!("Login completed");

    Ok((
        AppendHeaders([
            (SET_COOKIE, set_cookie(TOKEN_COOKIE, &tokens.access_token, max_age)),
            (SET_COOKIE, clear_cookie(STATE_COOKIE)),
        ]),
        Redirect::to("/"),
    )
        .into_response())
}

/// GET /logout
pub async fn logout(State(state): State<AppState>) -> Result<Response, ApiError> {
    let url = state
        .oauth
        .logout_url()
        .map_err(|e| ApiError::internal_server_error(format!("logout url: {}", e)))?;

    Ok((
        AppendHeaders([(SET_COOKIE, clear_cookie(TOKEN_COOKIE))]),
        Redirect::to(url.as_str()),
    )
        .into_response())
}
