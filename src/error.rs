/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - RepoError / JSON rejection / AuthorizationError を統一的に変換
 *
 * Body shapes
 * - auth:   {"success": false, "error": "<code>", "description": "<text>"}
 * - others: {"success": false, "error": <status>, "message": "<text>"}
 */
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::auth::AuthorizationError;

#[derive(Debug, Serialize)]
pub struct AuthErrorResponse {
    pub success: bool,
    pub error: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: u16,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthorizationError),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {resource}")]
    NotFound { resource: &'static str },
    #[error("unprocessable: {0}")]
    Unprocessable(String),
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    pub fn unprocessable(reason: impl Into<String>) -> Self {
        Self::Unprocessable(reason.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Auth(err) => {
                let body = AuthErrorResponse {
                    success: false,
                    error: err.code(),
                    description: err.description(),
                };
                return (err.status(), Json(body)).into_response();
            }
            AppError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason),
            AppError::NotFound { resource } => {
                (StatusCode::NOT_FOUND, format!("{resource} not found"))
            }
            AppError::Unprocessable(reason) => {
                tracing::debug!(%reason, "unprocessable request");
                (StatusCode::UNPROCESSABLE_ENTITY, "unprocessable".to_string())
            }
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            ),
        };

        let body = ErrorResponse {
            success: false,
            error: status.as_u16(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Db(err) => {
                tracing::error!(error = %err, "database error");
                AppError::Internal
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::unprocessable(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::{Value, json};

    use super::*;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn auth_errors_render_code_and_description() {
        let (status, body) = render(AuthorizationError::PermissionDenied {
            required: "delete:actors".into(),
        }
        .into())
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(
            body,
            json!({
                "success": false,
                "error": "permission_denied",
                "description": "Permission not found."
            })
        );
    }

    #[tokio::test]
    async fn internal_details_are_not_leaked() {
        let (status, body) =
            render(RepoError::Db(sqlx::Error::PoolTimedOut).into()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "internal server error");
        assert_eq!(body["error"], 500);
    }

    #[tokio::test]
    async fn not_found_and_unprocessable_use_status_codes() {
        let (status, body) = render(AppError::not_found("actor")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"success": false, "error": 404, "message": "actor not found"}));

        let (status, body) = render(AppError::unprocessable("name is required")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["message"], "unprocessable");
    }
}
