//! JSON extractor aligned with the API error envelope

use axum::{
    extract::rejection::JsonRejection as AxumJsonRejection,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json as AxumJson,
};
use serde::de::DeserializeOwned;

use super::error::{ApiErrorDetail, ApiErrorResponse, ApiErrorType};

/// Wrapper around `axum::Json` whose rejections render as the same error
/// envelope the handlers return, instead of axum's plain-text bodies.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

/// Body rejection carrying the status and message to render
#[derive(Debug)]
pub struct JsonRejection {
    status: StatusCode,
    message: String,
}

impl JsonRejection {
    fn from_axum(rejection: &AxumJsonRejection) -> Self {
        let message = match rejection {
            AxumJsonRejection::JsonDataError(err) => format!(
                "Request body does not match the expected shape: {}",
                err.body_text()
            ),
            AxumJsonRejection::JsonSyntaxError(err) => {
                format!("Request body is not valid JSON: {}", err.body_text())
            }
            AxumJsonRejection::MissingJsonContentType(_) => {
                "Expected 'Content-Type: application/json'".to_string()
            }
            AxumJsonRejection::BytesRejection(err) => {
                format!("Failed to read request body: {}", err.body_text())
            }
            _ => "Invalid JSON request".to_string(),
        };

        Self {
            status: rejection.status(),
            message,
        }
    }
}

impl IntoResponse for JsonRejection {
    fn into_response(self) -> Response {
        let response = ApiErrorResponse {
            error: ApiErrorDetail {
                message: self.message,
                error_type: ApiErrorType::InvalidRequestError,
                param: None,
                code: Some("json_parse_error".to_string()),
            },
        };

        (self.status, AxumJson(response)).into_response()
    }
}

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = JsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match AxumJson::<T>::from_request(req, state).await {
            Ok(AxumJson(value)) => Ok(Json(value)),
            Err(rejection) => Err(JsonRejection::from_axum(&rejection)),
        }
    }
}

impl<T> IntoResponse for Json<T>
where
    T: serde::Serialize,
{
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_keeps_axum_status() {
        let rejection = JsonRejection {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: "Request body does not match the expected shape".to_string(),
        };

        let response = rejection.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_rejection_body_uses_error_envelope() {
        let rejection = JsonRejection {
            status: StatusCode::BAD_REQUEST,
            message: "Request body is not valid JSON".to_string(),
        };

        // The envelope is built in into_response; mirror it here to pin the
        // wire format.
        let envelope = ApiErrorResponse {
            error: ApiErrorDetail {
                message: rejection.message.clone(),
                error_type: ApiErrorType::InvalidRequestError,
                param: None,
                code: Some("json_parse_error".to_string()),
            },
        };

        let json = serde_json::to_string(&envelope).unwrap();
        assert!(json.contains("invalid_request_error"));
        assert!(json.contains("json_parse_error"));
    }

    #[test]
    fn test_json_wraps_serializable_values() {
        let response = Json(serde_json::json!({ "total": 3 })).into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
