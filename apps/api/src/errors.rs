use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::generation::sections::ShapeError;
use crate::llm_client::LlmError;
use crate::render::pdf::PdfError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// The provider refused the API key.
    #[error("Credential rejected: {0}")]
    Credential(String),

    /// Neither the caller nor the server supplied an API key.
    #[error("No API key configured")]
    MissingCredential,

    #[error("LLM error: {0}")]
    Llm(#[source] LlmError),

    /// One or more sections decoded to the wrong shape.
    #[error("Shape drift: {}", summarize_shape_errors(.0))]
    ShapeDrift(Vec<ShapeError>),

    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Maps a provider failure, singling out a rejected key.
    pub fn from_llm(err: LlmError) -> Self {
        if err.is_credential_rejection() {
            AppError::Credential(err.to_string())
        } else {
            AppError::Llm(err)
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!("请求格式错误：{}", rejection.body_text()))
    }
}

fn summarize_shape_errors(errors: &[ShapeError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Credential(msg) => {
                tracing::warn!("Credential rejected by provider: {msg}");
                (
                    StatusCode::BAD_REQUEST,
                    "CREDENTIAL_ERROR",
                    "DeepSeek API Key 无效，请检查后重试".to_string(),
                )
            }
            AppError::MissingCredential => {
                tracing::error!("No DeepSeek API key available for request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "MISSING_CREDENTIAL",
                    "服务器未配置 DeepSeek API Key，请联系管理员".to_string(),
                )
            }
            AppError::Llm(e) => {
                tracing::error!("LLM error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "LLM_ERROR", e.to_string())
            }
            AppError::ShapeDrift(errors) => {
                let summary = summarize_shape_errors(errors);
                tracing::error!("Shape drift in {} section(s): {summary}", errors.len());
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SHAPE_DRIFT",
                    format!("报告内容格式异常：{summary}"),
                )
            }
            AppError::Pdf(e) => {
                tracing::error!("PDF error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "PDF_ERROR", e.to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
            "code": code
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::sections::SectionKind;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_error_is_400_with_string_body() {
        let (status, body) = body_json(AppError::Validation("请填写学生姓名".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "请填写学生姓名");
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_missing_credential_is_500() {
        let (status, body) = body_json(AppError::MissingCredential).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("API Key"));
    }

    #[tokio::test]
    async fn test_rejected_key_maps_to_400() {
        let err = AppError::from_llm(LlmError::Api {
            status: 401,
            message: "Authentication Fails".into(),
        });
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "CREDENTIAL_ERROR");
    }

    #[tokio::test]
    async fn test_provider_error_surfaces_message() {
        let err = AppError::from_llm(LlmError::Api {
            status: 400,
            message: "context too long".into(),
        });
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("context too long"));
    }

    #[tokio::test]
    async fn test_shape_drift_lists_every_section() {
        let err = AppError::ShapeDrift(vec![
            ShapeError {
                section: SectionKind::Timeline,
                details: "expected an array".into(),
            },
            ShapeError {
                section: SectionKind::Summary,
                details: "missing field `coreCompetence`".into(),
            },
        ]);
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let message = body["error"].as_str().unwrap();
        assert!(message.contains("timeline section"));
        assert!(message.contains("summary section"));
    }
}
