//! Axum route handlers for the Render API.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{Html, IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::report::FullReportData;
use crate::render::html::render_report_html;
use crate::render::pdf::{content_disposition, pdf_filename};
use crate::render::report_local_time;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    pub report_data: Option<FullReportData>,
}

impl RenderRequest {
    fn into_report(self) -> Result<FullReportData, AppError> {
        self.report_data
            .ok_or_else(|| AppError::Validation("请提供报告数据".to_string()))
    }
}

/// POST /api/v1/reports/pdf
///
/// Renders the report and prints it through the headless browser.
/// Responds with the PDF as an attachment named after the student.
pub async fn handle_pdf(
    State(state): State<AppState>,
    request: Result<Json<RenderRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = request?;
    let report = request.into_report()?;

    let html = render_report_html(&report);
    let pdf = state.pdf.render_pdf(&html).await?;

    let filename = pdf_filename(
        &report.input.student_info.name,
        report.input.student_info.grade,
        report_local_time(&Utc::now()).date_naive(),
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, content_disposition(&filename)),
        ],
        Bytes::from(pdf),
    )
        .into_response())
}

/// POST /api/v1/reports/preview
///
/// Returns the rendered HTML document for in-browser preview. No browser process involved.
pub async fn handle_preview(
    request: Result<Json<RenderRequest>, JsonRejection>,
) -> Result<Html<String>, AppError> {
    let Json(request) = request?;
    let report = request.into_report()?;
    Ok(Html(render_report_html(&report)))
}
