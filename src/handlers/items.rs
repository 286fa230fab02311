use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Extension, Json, Path, Query, State,
    },
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::models::{ItemPatch, NewItem};
use crate::database::{Page, PageQuery};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

use super::categories::category_map;
use super::utils::{json_body, page_query, path_id, required};

/// Body of `POST /items`
#[derive(Debug, Default, Deserialize)]
pub struct CreateItem {
    pub title: Option<String>,
    pub brand: Option<String>,
    pub category: Option<i32>,
    pub comment: Option<String>,
}

impl CreateItem {
    fn validate(self) -> Result<NewItem, ApiError> {
        Ok(NewItem {
            title: required(self.title, "title")?,
            brand: required(self.brand, "brand")?,
            category: required(self.category, "category")?,
            comment: self.comment,
        })
    }
}

/// GET /items?page=N
pub async fn list_items(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Value> {
    let page = Page::from_query(&page_query(query)?, state.items_per_page())?;
    let items = state.store.items_page(page).await?;
    if items.is_empty() {
        return Err(ApiError::not_found(format!("no items on page {}", page.number)));
    }

    let categories = state.store.categories().await?;
    let total_items = state.store.count_items().await?;

    Ok(ApiResponse::success(json!({
        "categories": category_map(&categories),
        "items": items,
        "total_items": total_items,
    })))
}

/// GET /items/:id - one item with its tastes and holidays
pub async fn get_item(State(state): State<AppState>, id: Result<Path<i32>, PathRejection>) -> ApiResult<Value> {
    let id = path_id(id)?;
    let item = state
        .store
        .item(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("item {}", id)))?;

    let tastes = state.store.tastes_for_item(id).await?;
    let holidays = state.store.holidays_for_item(id).await?;

    Ok(ApiResponse::success(json!({
        "item": item,
        "tastes": tastes,
        "holidays": holidays,
    })))
}

/// POST /items (`post:item`)
pub async fn create_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    query: Result<Query<PageQuery>, QueryRejection>,
    body: Result<Json<CreateItem>, JsonRejection>,
) -> ApiResult<Value> {
    let new_item = json_body(body)?.validate()?;
    let page = Page::from_query(&page_query(query)?, state.items_per_page())?;

    let item = state.store.insert_item(new_item).await?;
    tracing::info!("Item {} created by {}", item.id, user.subject);

    let items = state.store.items_page(page).await?;
    let total_items = state.store.count_items().await?;

    Ok(ApiResponse::success(json!({
        "created": item.id,
        "items": items,
        "total_items": total_items,
    })))
}

/// PATCH /items/:id (`patch:item`)
pub async fn update_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<ItemPatch>, JsonRejection>,
) -> ApiResult<Value> {
    let id = path_id(id)?;
    let patch = json_body(body)?;
    if patch.is_empty() {
        return Err(ApiError::unprocessable("patch names no fields"));
    }

    let mut item = state
        .store
        .item(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("item {}", id)))?;

    patch.apply(&mut item)?;
    state.store.update_item(&item).await?;
    tracing::info!("Item {} updated by {}", id, user.subject);

    let total_items = state.store.count_items().await?;

    Ok(ApiResponse::success(json!({
        "updated": id,
        "items": item,
        "total_items": total_items,
    })))
}

/// DELETE /items/:id (`delete:item`)
pub async fn delete_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i32>, PathRejection>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Value> {
    let id = path_id(id)?;
    let page = Page::from_query(&page_query(query)?, state.items_per_page())?;

    if !state.store.delete_item(id).await? {
        return Err(ApiError::not_found(format!("item {}", id)));
    }
    tracing::info!("Item {} deleted by {}", id, user.subject);

    let items = state.store.items_page(page).await?;
    let total_items = state.store.count_items().await?;

    Ok(ApiResponse::success(json!({
        "deleted": id,
        "items": items,
        "total_items": total_items,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_title_brand_and_category() {
        let body = CreateItem {
            title: Some("Crunchy Cheese Flavored Snack Chips".to_string()),
            category: Some(1),
            ..Default::default()
        };
        let err = body.validate().unwrap_err();
        assert_eq!(err.to_json()["field_errors"]["brand"], "This field is required");
    }

    #[test]
    fn comment_is_optional() {
        let body = CreateItem {
            title: Some("Crunchy Cheese Flavored Snack Chips".to_string()),
            brand: Some("Cheetos".to_string()),
            category: Some(1),
            comment: None,
        };
        let item = body.validate().unwrap();
        assert_eq!(item.comment, None);
        assert_eq!(item.brand, "Cheetos");
    }
}
