use axum::extract::{
    rejection::{JsonRejection, PathRejection, QueryRejection},
    Extension, Json, Path, Query, State,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::models::NewComment;
use crate::database::{Page, PageQuery};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

use super::utils::{json_body, page_query, path_id, required};

/// Body shared by temp and approved comment submissions
#[derive(Debug, Default, Deserialize)]
pub struct CommentBody {
    pub comment: Option<String>,
    pub rating: Option<f64>,
    pub item: Option<i32>,
    pub userid: Option<i32>,
}

impl CommentBody {
    fn validate(self) -> Result<NewComment, ApiError> {
        Ok(NewComment {
            comment: required(self.comment, "comment")?,
            rating: required(self.rating, "rating")?,
            item: required(self.item, "item")?,
            userid: required(self.userid, "userid")?,
        })
    }
}

/// GET /comments?page=N - approved comments
pub async fn list_comments(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Value> {
    let page = Page::from_query(&page_query(query)?, state.comments_per_page())?;
    let comments = state.store.comments_page(page).await?;
    if comments.is_empty() {
        return Err(ApiError::not_found(format!("no comments on page {}", page.number)));
    }
    let total_comments = state.store.count_comments().await?;

    Ok(ApiResponse::success(json!({
        "comments": comments,
        "total_comments": total_comments,
    })))
}

/// GET /temp/comments?page=N (`get:temp_comments`) - moderation queue
pub async fn list_temp_comments(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Value> {
    let page = Page::from_query(&page_query(query)?, state.comments_per_page())?;
    let comments = state.store.temp_comments_page(page).await?;
    if comments.is_empty() {
        return Err(ApiError::not_found(format!("no temp comments on page {}", page.number)));
    }
    let total_comments = state.store.count_temp_comments().await?;

    Ok(ApiResponse::success(json!({
        "comments": comments,
        "total_comments": total_comments,
    })))
}

/// POST /user/comments (`temp_post:comments`) - unmoderated submission
pub async fn create_temp_comment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    query: Result<Query<PageQuery>, QueryRejection>,
    body: Result<Json<CommentBody>, JsonRejection>,
) -> ApiResult<Value> {
    let new_comment = json_body(body)?.validate()?;
    let page = Page::from_query(&page_query(query)?, state.comments_per_page())?;

    // Unmoderated comments are queued without looking the item up
    let comment = state.store.insert_temp_comment(new_comment).await?;
    tracing::info!("Temp comment {} on item {} submitted by {}", comment.id, comment.item, user.subject);

    let items = state.store.temp_comments_page(page).await?;
    let total_items = state.store.count_temp_comments().await?;

    Ok(ApiResponse::success(json!({
        "items": items,
        "total_items": total_items,
    })))
}

/// POST /admin/comments/:id (`post:comments`) - publish a moderated comment
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    item_id: Result<Path<i32>, PathRejection>,
    query: Result<Query<PageQuery>, QueryRejection>,
    body: Result<Json<CommentBody>, JsonRejection>,
) -> ApiResult<Value> {
    let item_id = path_id(item_id)?;
    let new_comment = json_body(body)?.validate()?;
    let page = Page::from_query(&page_query(query)?, state.comments_per_page())?;

    for id in [item_id, new_comment.item] {
        if state.store.item(id).await?.is_none() {
            return Err(ApiError::not_found(format!("item {}", id)));
        }
    }
    if new_comment.item != item_id {
        return Err(ApiError::unprocessable(format!(
            "body item {} does not match path item {}",
            new_comment.item, item_id
        )));
    }

    let comment = state.store.insert_comment(new_comment).await?;
    tracing::info!("Comment {} on item {} published by {}", comment.id, item_id, user.subject);

    let comments = state.store.comments_page(page).await?;
    let total_comments = state.store.count_comments().await?;

    Ok(ApiResponse::success(json!({
        "item": item_id,
        "comments": comments,
        "total_comments": total_comments,
    })))
}

/// DELETE /temp/comments/:id (`temp_delete:comments`)
pub async fn delete_temp_comment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i32>, PathRejection>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Value> {
    let id = path_id(id)?;
    let page = Page::from_query(&page_query(query)?, state.comments_per_page())?;

    if !state.store.delete_temp_comment(id).await? {
        return Err(ApiError::not_found(format!("temp comment {}", id)));
    }
    tracing::info!("Temp comment {} removed by {}", id, user.subject);

    let comments = state.store.temp_comments_page(page).await?;
    let total_comments = state.store.count_temp_comments().await?;

    Ok(ApiResponse::success(json!({
        "deleted": id,
        "comments": comments,
        "total_comments": total_comments,
    })))
}

/// DELETE /admin/comments/:id (`delete:comments`)
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i32>, PathRejection>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Value> {
    let id = path_id(id)?;
    let page = Page::from_query(&page_query(query)?, state.comments_per_page())?;

    if !state.store.delete_comment(id).await? {
        return Err(ApiError::not_found(format!("comment {}", id)));
    }
    tracing::info!("Comment {} removed by {}", id, user.subject);

    let current_comments = state.store.comments_page(page).await?;
    let total_comments = state.store.count_comments().await?;

    Ok(ApiResponse::success(json!({
        "deleted": id,
        "current_comments": current_comments,
        "total_comments": total_comments,
    })))
}
