// middleware/response.rs - success envelope for handler results
//
//   Ok(data)       200 {"success": true, "data": data}
//   Created(data)  201 {"success": true, "data": data}
//   Deleted        204 with an empty body
//
// Errors never pass through here; they render via ApiError.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::ApiError;

#[derive(Debug)]
pub enum ApiResponse<T: Serialize> {
    Ok(T),
    Created(T),
    Deleted,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse::Ok(data)
    }

    /// Result of a POST that stored a new record
    pub fn created(data: T) -> Self {
        ApiResponse::Created(data)
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiResponse::Ok(_) => StatusCode::OK,
            ApiResponse::Created(_) => StatusCode::CREATED,
            ApiResponse::Deleted => StatusCode::NO_CONTENT,
        }
    }
}

impl ApiResponse<()> {
    /// Result of a DELETE; the client gets no body at all
    pub fn no_content() -> Self {
        ApiResponse::Deleted
    }
}

fn envelope<T: Serialize>(data: &T) -> Result<Value, ApiError> {
    let data = serde_json::to_value(data).map_err(|err| {
        tracing::error!("Failed to serialize response data: {}", err);
        ApiError::internal_server_error("Failed to serialize response data")
    })?;
    Ok(json!({ "success": true, "data": data }))
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let data = match self {
            ApiResponse::Ok(data) | ApiResponse::Created(data) => data,
            ApiResponse::Deleted => return status.into_response(),
        };
        match envelope(&data) {
            Ok(body) => (status, Json(body)).into_response(),
            Err(err) => err.into_response(),
        }
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;
