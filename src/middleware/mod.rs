pub mod auth;
pub mod response;

pub use auth::{require_permission, AuthUser, PermissionGuard};
pub use response::{json_method_not_allowed, ApiResponse, ApiResult};
