use axum::extract::{
    rejection::{JsonRejection, PathRejection, QueryRejection},
    Json, Path, Query,
};
use serde::de::DeserializeOwned;

use crate::database::PageQuery;
use crate::error::ApiError;

/// Unwrap a JSON body. Unparseable JSON is a bad request, JSON of the wrong
/// shape is unprocessable.
pub fn json_body<T: DeserializeOwned>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(JsonRejection::JsonDataError(e)) => Err(ApiError::unprocessable(e.body_text())),
        Err(other) => Err(ApiError::bad_request(other.body_text())),
    }
}

/// Unwrap an integer path id; anything else addresses no resource
pub fn path_id(path: Result<Path<i32>, PathRejection>) -> Result<i32, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|e| ApiError::not_found(e.body_text()))
}

/// Unwrap the `?page=` query. A query string that does not deserialize
/// (a repeated key, say) is a bad request.
pub fn page_query(query: Result<Query<PageQuery>, QueryRejection>) -> Result<PageQuery, ApiError> {
    query
        .map(|Query(query)| query)
        .map_err(|e| ApiError::bad_request(e.body_text()))
}

/// Required body field, reported as a 422 with the field name
pub fn required<T>(value: Option<T>, field: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::missing_field(field))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_reports_field() {
        assert_eq!(required(Some(3), "category").unwrap(), 3);
        let err = required::<i32>(None, "category").unwrap_err();
        assert_eq!(err.status_code(), 422);
        assert_eq!(err.to_json()["field_errors"]["category"], "This field is required");
    }
}
