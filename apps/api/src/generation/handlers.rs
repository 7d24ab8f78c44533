//! Axum route handlers for the Generation API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::generation::assembler::assemble_report;
use crate::intake::{normalize_input, validate_input};
use crate::models::report::{FullReportData, ReportInputData};
use crate::models::sample::sample_report;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub input: Option<ReportInputData>,
    /// Caller-supplied provider key; honoured only when the server allows it.
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub data: FullReportData,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/reports/generate
///
/// Normalize → validate → resolve credential → assemble all seven sections.
/// Validation and credential failures return before any provider call.
pub async fn handle_generate(
    State(state): State<AppState>,
    request: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    let Json(request) = request?;
    let input = request
        .input
        .ok_or_else(|| AppError::Validation("请填写学生基础信息".to_string()))?;
    let input = normalize_input(input);

    let validation = validate_input(&input);
    if !validation.passed {
        info!(
            "Rejected questionnaire with {} problem(s)",
            validation.missing.len()
        );
        return Err(AppError::Validation(validation.message()));
    }

    let credential = state
        .config
        .resolve_credential(request.api_key.as_deref())
        .ok_or(AppError::MissingCredential)?;

    let generated = assemble_report(state.llm.as_ref(), &input, &credential).await?;

    Ok(Json(GenerateResponse {
        success: true,
        data: FullReportData {
            input,
            generated,
            generated_at: Utc::now(),
        },
    }))
}

/// GET /api/v1/reports/demo
///
/// Returns the compiled-in sample report stamped with the current time.
/// Needs no credential and makes no provider call.
pub async fn handle_demo() -> Result<Json<GenerateResponse>, AppError> {
    let data = sample_report(Utc::now())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Sample report is corrupt: {e}")))?;
    Ok(Json(GenerateResponse {
        success: true,
        data,
    }))
}
