//! Compiled-in sample report used by demo mode and as a test fixture.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::report::{FullReportData, GeneratedReportContent, ReportInputData};

const SAMPLE_REPORT_JSON: &str = include_str!("../../fixtures/sample_report.json");

#[derive(Deserialize)]
struct SampleReport {
    input: ReportInputData,
    generated: GeneratedReportContent,
}

/// Builds the sample report stamped with `generated_at`.
pub fn sample_report(generated_at: DateTime<Utc>) -> Result<FullReportData, serde_json::Error> {
    let sample: SampleReport = serde_json::from_str(SAMPLE_REPORT_JSON)?;
    Ok(FullReportData {
        input: sample.input,
        generated: sample.generated,
        generated_at,
    })
}
