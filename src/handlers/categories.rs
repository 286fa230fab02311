use axum::extract::{rejection::PathRejection, Path, State};
use serde_json::{json, Map, Value};

use crate::database::models::Category;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

use super::utils::path_id;

/// `{id: type}` map used by the category and item listings
pub fn category_map(categories: &[Category]) -> Map<String, Value> {
    categories
        .iter()
        .map(|c| (c.id.to_string(), Value::String(c.kind.clone())))
        .collect()
}

/// GET /categories
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Value> {
    let categories = state.store.categories().await?;
    if categories.is_empty() {
        return Err(ApiError::not_found("no categories"));
    }

    Ok(ApiResponse::success(json!({
        "categories": category_map(&categories),
    })))
}

/// GET /api/v1/categories/:id - every item filed under one category
pub async fn category_items(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Value> {
    let id = path_id(id)?;
    let category = state
        .store
        .category(id)
        .await?
        .ok_or_else(|| ApiError::unprocessable(format!("category {} does not exist", id)))?;

    let items = state.store.items_in_category(category.id).await?;
    Ok(ApiResponse::success(json!({
        "category": category.kind,
        "total_items": items.len(),
        "items": items,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_is_keyed_by_id() {
        let categories = vec![
            Category { id: 2, kind: "Candy".to_string() },
            Category { id: 1, kind: "Chips".to_string() },
        ];
        let map = category_map(&categories);
        assert_eq!(Value::Object(map), json!({ "1": "Chips", "2": "Candy" }));
    }
}
