use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{delete, get, patch, post, MethodRouter},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{categories, comments, items, session, system, users};
use crate::middleware::{json_method_not_allowed, require_permission, PermissionGuard};
use crate::state::AppState;

/// Wrap a method router with the bearer-token guard for one permission
fn guarded(route: MethodRouter<AppState>, state: &AppState, permission: &'static str) -> MethodRouter<AppState> {
    route.route_layer(middleware::from_fn_with_state(
        PermissionGuard::new(state, permission),
        require_permission,
    ))
}

pub fn app(state: AppState) -> Router {
    let request_logging = state.api.enable_request_logging;
    let cors = cors_layer(&state.api.cors_origins);

    let router = Router::new()
        // Public
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .merge(session_routes())
        .merge(catalog_routes(&state))
        .merge(comment_routes(&state))
        .route("/user/create", post(users::create_user))
        .fallback(system::not_found)
        .layer(middleware::map_response(json_method_not_allowed))
        .layer(cors)
        .with_state(state);

    if request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(session::login))
        .route("/login-results", get(session::login_results))
        .route("/logout", get(session::logout))
}

fn catalog_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/categories", get(categories::list_categories))
        .route("/api/v1/categories/:id", get(categories::category_items))
        .route("/items", get(items::list_items))
        .route("/items", guarded(post(items::create_item), state, "post:item"))
        .route("/items/:id", get(items::get_item))
        .route("/items/:id", guarded(patch(items::update_item), state, "patch:item"))
        .route("/items/:id", guarded(delete(items::delete_item), state, "delete:item"))
}

fn comment_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/comments", get(comments::list_comments))
        .route(
            "/user/comments",
            guarded(post(comments::create_temp_comment), state, "temp_post:comments"),
        )
        .route(
            "/temp/comments",
            guarded(get(comments::list_temp_comments), state, "get:temp_comments"),
        )
        .route(
            "/temp/comments/:id",
            guarded(delete(comments::delete_temp_comment), state, "temp_delete:comments"),
        )
        .route(
            "/admin/comments/:id",
            guarded(post(comments::create_comment), state, "post:comments"),
        )
        .route(
            "/admin/comments/:id",
            guarded(delete(comments::delete_comment), state, "delete:comments"),
        )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins.iter().filter_map(|o| HeaderValue::from_str(o).ok()))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_methods([
            Method::GET,
            Method::PUT,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
}
