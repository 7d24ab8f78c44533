//! In-memory stand-ins for the provider and the browser, shared by unit and
//! endpoint tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::generation::prompts::{
    CAREER_MATCHES_PROMPT_TEMPLATE, EDUCATION_PROJECTS_PROMPT_TEMPLATE,
    PERSONALITY_PROMPT_TEMPLATE, PLANNING_ADVICE_PROMPT_TEMPLATE, SUMMARY_PROMPT_TEMPLATE,
    SUPPLY_CHAIN_PROMPT_TEMPLATE, TIMELINE_PROMPT_TEMPLATE,
};
use crate::generation::sections::SectionKind;
use crate::llm_client::{CompletionService, LlmError};
use crate::models::report::{FullReportData, GeneratedReportContent, ReportInputData};
use crate::models::sample::sample_report;
use crate::render::pdf::{PdfError, PdfRenderer};

pub fn sample_full_report() -> FullReportData {
    let generated_at = "2025-03-01T08:30:00Z".parse().unwrap();
    sample_report(generated_at).unwrap()
}

pub fn sample_input() -> ReportInputData {
    sample_full_report().input
}

pub fn sample_generated() -> GeneratedReportContent {
    sample_full_report().generated
}

/// Identifies the section a prompt was built for by its opening line.
pub fn section_of(prompt: &str) -> Option<SectionKind> {
    let opening = |text: &str| {
        text.lines()
            .find(|line| !line.trim().is_empty())
            .map(str::to_string)
    };
    let prompt_opening = opening(prompt)?;
    SectionKind::ALL.into_iter().find(|kind| {
        let template = match kind {
            SectionKind::PersonalityAnalysis => PERSONALITY_PROMPT_TEMPLATE,
            SectionKind::CareerMatches => CAREER_MATCHES_PROMPT_TEMPLATE,
            SectionKind::PlanningAdvice => PLANNING_ADVICE_PROMPT_TEMPLATE,
            SectionKind::EducationProjects => EDUCATION_PROJECTS_PROMPT_TEMPLATE,
            SectionKind::Timeline => TIMELINE_PROMPT_TEMPLATE,
            SectionKind::SupplyChainProjects => SUPPLY_CHAIN_PROMPT_TEMPLATE,
            SectionKind::Summary => SUMMARY_PROMPT_TEMPLATE,
        };
        opening(template).as_deref() == Some(prompt_opening.as_str())
    })
}

/// Scripted completion service. Responds per section, optionally fails one
/// section, and records every call.
#[derive(Default)]
pub struct MockCompletion {
    responses: HashMap<SectionKind, String>,
    failures: Mutex<HashMap<SectionKind, LlmError>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    completed: AtomicUsize,
    credentials: Mutex<Vec<String>>,
}

impl MockCompletion {
    /// Answers every section with the sample report's content, using the
    /// various wrapper shapes providers are seen to produce.
    pub fn well_formed() -> Self {
        let generated = sample_generated();
        let responses = HashMap::from([
            (
                SectionKind::PersonalityAnalysis,
                json!(generated.personality_analysis).to_string(),
            ),
            (
                SectionKind::CareerMatches,
                json!({ "careers": generated.career_matches }).to_string(),
            ),
            (
                SectionKind::PlanningAdvice,
                json!({
                    "developmentPaths": generated.development_paths,
                    "careerAdvice": generated.career_advice,
                    "familyCooperationAdvice": generated.family_cooperation_advice,
                })
                .to_string(),
            ),
            (
                SectionKind::EducationProjects,
                json!({ "projects": generated.education_projects }).to_string(),
            ),
            (
                SectionKind::Timeline,
                json!({ "data": generated.timeline }).to_string(),
            ),
            (
                SectionKind::SupplyChainProjects,
                json!(generated.supply_chain_projects).to_string(),
            ),
            (SectionKind::Summary, json!(generated.summary).to_string()),
        ]);
        Self {
            responses,
            ..Default::default()
        }
    }

    pub fn responding(mut self, kind: SectionKind, raw: &str) -> Self {
        self.responses.insert(kind, raw.to_string());
        self
    }

    pub fn failing(self, kind: SectionKind, err: LlmError) -> Self {
        self.failures.lock().unwrap().insert(kind, err);
        self
    }

    /// Successful sections wait this long before answering.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn credentials(&self) -> Vec<String> {
        self.credentials.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionService for MockCompletion {
    async fn complete_json(&self, credential: &str, prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.credentials
            .lock()
            .unwrap()
            .push(credential.to_string());

        let kind = section_of(prompt).expect("prompt matches no section template");
        let failure = self.failures.lock().unwrap().remove(&kind);
        if let Some(err) = failure {
            return Err(err);
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let raw = self.responses.get(&kind).cloned().ok_or(LlmError::EmptyContent)?;
        self.completed.fetch_add(1, Ordering::SeqCst);
        Ok(raw)
    }
}

/// Records the HTML it was asked to print and returns fixed bytes.
#[derive(Default)]
pub struct MockPdf {
    fail: bool,
    rendered: Mutex<Vec<String>>,
}

pub const MOCK_PDF_BYTES: &[u8] = b"%PDF-1.4\n%mock\n";

impl MockPdf {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn rendered(&self) -> Vec<String> {
        self.rendered.lock().unwrap().clone()
    }
}

#[async_trait]
impl PdfRenderer for MockPdf {
    async fn render_pdf(&self, html: &str) -> Result<Vec<u8>, PdfError> {
        self.rendered.lock().unwrap().push(html.to_string());
        if self.fail {
            return Err(PdfError::Launch("browser unavailable".to_string()));
        }
        Ok(MOCK_PDF_BYTES.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::prompts::build_prompt;

    #[test]
    fn test_every_prompt_is_recognised() {
        let input = sample_input();
        for kind in SectionKind::ALL {
            assert_eq!(section_of(&build_prompt(kind, &input)), Some(kind));
        }
    }
}
