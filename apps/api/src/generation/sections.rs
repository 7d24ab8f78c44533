//! Section Generators: one provider round-trip per report section.
//!
//! Each generator builds its prompt, asks the completion service for a JSON
//! payload, and decodes the payload into the section's typed record. The
//! outcome is two-layered:
//!
//! * the outer `Result` carries provider failures (transport, status, empty
//!   content), which abort the whole assembly immediately;
//! * the inner `Result` carries shape drift (well-formed JSON that does not
//!   match the requested schema), which the assembler collects across all
//!   sections before failing.
//!
//! Cardinality and length requests are not enforced. A section that decodes but
//! misses them is logged at `warn` and passed through.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::generation::prompts::build_prompt;
use crate::llm_client::{CompletionService, LlmError};
use crate::models::report::{
    CareerMatch, EducationCategory, EducationProject, PersonalityAnalysis, PlanningAdvice,
    ReportInputData, ReportSummary, SupplyChainCategory, SupplyChainProject, TimelineItem,
};

/// Fallback key some providers wrap any payload in.
const GENERIC_WRAPPER: &str = "data";
/// Upper bound on `matchReason`, in characters.
const MATCH_REASON_MAX_CHARS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    PersonalityAnalysis,
    CareerMatches,
    PlanningAdvice,
    EducationProjects,
    Timeline,
    SupplyChainProjects,
    Summary,
}

impl SectionKind {
    pub const ALL: [SectionKind; 7] = [
        SectionKind::PersonalityAnalysis,
        SectionKind::CareerMatches,
        SectionKind::PlanningAdvice,
        SectionKind::EducationProjects,
        SectionKind::Timeline,
        SectionKind::SupplyChainProjects,
        SectionKind::Summary,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SectionKind::PersonalityAnalysis => "personalityAnalysis",
            SectionKind::CareerMatches => "careerMatches",
            SectionKind::PlanningAdvice => "planningAdvice",
            SectionKind::EducationProjects => "educationProjects",
            SectionKind::Timeline => "timeline",
            SectionKind::SupplyChainProjects => "supplyChainProjects",
            SectionKind::Summary => "summary",
        }
    }

    /// Key the prompt asks the list to be wrapped in, for list sections.
    pub fn wrapper_key(self) -> Option<&'static str> {
        match self {
            SectionKind::CareerMatches => Some("careers"),
            SectionKind::EducationProjects | SectionKind::SupplyChainProjects => Some("projects"),
            SectionKind::Timeline => Some("timeline"),
            _ => None,
        }
    }
}

/// Well-formed provider output that does not match the section schema.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{} section: {details}", .section.name())]
pub struct ShapeError {
    pub section: SectionKind,
    pub details: String,
}

impl ShapeError {
    fn new(section: SectionKind, details: impl Into<String>) -> Self {
        Self {
            section,
            details: details.into(),
        }
    }
}

/// Provider failure outside, shape outcome inside.
pub type SectionOutcome<T> = Result<Result<T, ShapeError>, LlmError>;

// ────────────────────────────────────────────────────────────────────────────
// Generators
// ────────────────────────────────────────────────────────────────────────────

pub async fn generate_personality_analysis(
    llm: &dyn CompletionService,
    input: &ReportInputData,
    credential: &str,
) -> SectionOutcome<PersonalityAnalysis> {
    let raw = request(llm, SectionKind::PersonalityAnalysis, input, credential).await?;
    Ok(decode_personality_analysis(&raw))
}

pub async fn generate_career_matches(
    llm: &dyn CompletionService,
    input: &ReportInputData,
    credential: &str,
) -> SectionOutcome<Vec<CareerMatch>> {
    let raw = request(llm, SectionKind::CareerMatches, input, credential).await?;
    Ok(decode_career_matches(&raw))
}

pub async fn generate_planning_advice(
    llm: &dyn CompletionService,
    input: &ReportInputData,
    credential: &str,
) -> SectionOutcome<PlanningAdvice> {
    let raw = request(llm, SectionKind::PlanningAdvice, input, credential).await?;
    Ok(decode_planning_advice(&raw))
}

pub async fn generate_education_projects(
    llm: &dyn CompletionService,
    input: &ReportInputData,
    credential: &str,
) -> SectionOutcome<Vec<EducationProject>> {
    let raw = request(llm, SectionKind::EducationProjects, input, credential).await?;
    Ok(decode_education_projects(&raw))
}

pub async fn generate_timeline(
    llm: &dyn CompletionService,
    input: &ReportInputData,
    credential: &str,
) -> SectionOutcome<Vec<TimelineItem>> {
    let raw = request(llm, SectionKind::Timeline, input, credential).await?;
    Ok(decode_timeline(&raw))
}

pub async fn generate_supply_chain_projects(
    llm: &dyn CompletionService,
    input: &ReportInputData,
    credential: &str,
) -> SectionOutcome<Vec<SupplyChainProject>> {
    let raw = request(llm, SectionKind::SupplyChainProjects, input, credential).await?;
    Ok(decode_supply_chain_projects(&raw))
}

pub async fn generate_summary(
    llm: &dyn CompletionService,
    input: &ReportInputData,
    credential: &str,
) -> SectionOutcome<ReportSummary> {
    let raw = request(llm, SectionKind::Summary, input, credential).await?;
    Ok(decode_summary(&raw))
}

async fn request(
    llm: &dyn CompletionService,
    kind: SectionKind,
    input: &ReportInputData,
    credential: &str,
) -> Result<String, LlmError> {
    let prompt = build_prompt(kind, input);
    let raw = llm.complete_json(credential, &prompt).await?;
    debug!("{} section returned {} bytes", kind.name(), raw.len());
    Ok(raw)
}

// ────────────────────────────────────────────────────────────────────────────
// Decoders
// ────────────────────────────────────────────────────────────────────────────

pub fn decode_personality_analysis(raw: &str) -> Result<PersonalityAnalysis, ShapeError> {
    let kind = SectionKind::PersonalityAnalysis;
    let analysis: PersonalityAnalysis = decode_object(kind, raw)?;
    warn_below(kind, "strengths", analysis.strengths.len(), 3);
    warn_below(kind, "weaknesses", analysis.weaknesses.len(), 3);
    warn_below(kind, "summary", analysis.summary.len(), 3);
    Ok(analysis)
}

pub fn decode_career_matches(raw: &str) -> Result<Vec<CareerMatch>, ShapeError> {
    let kind = SectionKind::CareerMatches;
    let careers: Vec<CareerMatch> = decode_list(kind, raw)?;
    warn_outside(kind, "careers", careers.len(), 3, 3);
    for career in &careers {
        warn_outside(kind, "positions", career.positions.len(), 3, 5);
        let chars = career.match_reason.chars().count();
        if chars > MATCH_REASON_MAX_CHARS {
            warn!(
                "{} section: matchReason for '{}' is {} chars (max {})",
                kind.name(),
                career.direction,
                chars,
                MATCH_REASON_MAX_CHARS
            );
        }
    }
    Ok(careers)
}

pub fn decode_planning_advice(raw: &str) -> Result<PlanningAdvice, ShapeError> {
    let kind = SectionKind::PlanningAdvice;
    let advice: PlanningAdvice = decode_object(kind, raw)?;
    warn_outside(kind, "developmentPaths", advice.development_paths.len(), 3, 3);
    warn_outside(kind, "careerAdvice", advice.career_advice.len(), 3, 3);
    warn_outside(
        kind,
        "familyCooperationAdvice",
        advice.family_cooperation_advice.len(),
        1,
        2,
    );
    Ok(advice)
}

pub fn decode_education_projects(raw: &str) -> Result<Vec<EducationProject>, ShapeError> {
    let kind = SectionKind::EducationProjects;
    let projects: Vec<EducationProject> = decode_list(kind, raw)?;
    warn_outside(kind, "projects", projects.len(), 6, 8);
    for project in &projects {
        if !(1..=5).contains(&project.recommend_index) {
            warn!(
                "{} section: recommendIndex {} for '{}' is outside 1-5",
                kind.name(),
                project.recommend_index,
                project.name
            );
        }
        if EducationCategory::from_label(&project.category).is_none() {
            warn!(
                "{} section: unknown category '{}' for '{}'",
                kind.name(),
                project.category,
                project.name
            );
        }
    }
    Ok(projects)
}

pub fn decode_timeline(raw: &str) -> Result<Vec<TimelineItem>, ShapeError> {
    let kind = SectionKind::Timeline;
    let timeline: Vec<TimelineItem> = decode_list(kind, raw)?;
    warn_outside(kind, "stages", timeline.len(), 8, 12);
    for item in &timeline {
        warn_outside(kind, "tasks", item.tasks.len(), 3, 5);
    }
    Ok(timeline)
}

pub fn decode_supply_chain_projects(raw: &str) -> Result<Vec<SupplyChainProject>, ShapeError> {
    let kind = SectionKind::SupplyChainProjects;
    let projects: Vec<SupplyChainProject> = decode_list(kind, raw)?;
    warn_outside(kind, "projects", projects.len(), 8, 12);
    for project in &projects {
        if SupplyChainCategory::from_label(&project.category).is_none() {
            warn!(
                "{} section: unknown category '{}' for '{}'",
                kind.name(),
                project.category,
                project.name
            );
        }
    }
    Ok(projects)
}

pub fn decode_summary(raw: &str) -> Result<ReportSummary, ShapeError> {
    let kind = SectionKind::Summary;
    let summary: ReportSummary = decode_object(kind, raw)?;
    warn_below(kind, "actionSuggestions", summary.action_suggestions.len(), 3);
    Ok(summary)
}

fn parse_value(kind: SectionKind, raw: &str) -> Result<Value, ShapeError> {
    serde_json::from_str(raw).map_err(|e| ShapeError::new(kind, format!("invalid JSON: {e}")))
}

fn decode_object<T: DeserializeOwned>(kind: SectionKind, raw: &str) -> Result<T, ShapeError> {
    let value = parse_value(kind, raw)?;
    if !value.is_object() {
        return Err(ShapeError::new(kind, "expected a JSON object"));
    }
    serde_json::from_value(value).map_err(|e| ShapeError::new(kind, e.to_string()))
}

/// Accepts a bare array, or an object wrapping the array under the section's
/// wrapper key or the generic `data` key.
fn decode_list<T: DeserializeOwned>(kind: SectionKind, raw: &str) -> Result<Vec<T>, ShapeError> {
    let value = parse_value(kind, raw)?;
    let list = match value {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut map) => kind
            .wrapper_key()
            .into_iter()
            .chain(std::iter::once(GENERIC_WRAPPER))
            .find_map(|key| map.remove(key).filter(Value::is_array))
            .ok_or_else(|| {
                let keys: Vec<&str> = map.keys().map(String::as_str).collect();
                ShapeError::new(
                    kind,
                    format!("expected an array, got an object with keys [{}]", keys.join(", ")),
                )
            })?,
        _ => return Err(ShapeError::new(kind, "expected an array")),
    };
    serde_json::from_value(list).map_err(|e| ShapeError::new(kind, e.to_string()))
}

fn warn_below(kind: SectionKind, field: &str, count: usize, min: usize) {
    if count < min {
        warn!(
            "{} section: {} has {} items (requested at least {})",
            kind.name(),
            field,
            count,
            min
        );
    }
}

fn warn_outside(kind: SectionKind, field: &str, count: usize, min: usize, max: usize) {
    if count < min || count > max {
        warn!(
            "{} section: {} has {} items (requested {}-{})",
            kind.name(),
            field,
            count,
            min,
            max
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAREER: &str = r#"{"direction": "金融投资领域", "positions": ["分析师", "基金经理", "风控"], "matchReason": "逻辑强"}"#;

    #[test]
    fn test_career_matches_accept_bare_array() {
        let raw = format!("[{CAREER}]");
        let careers = decode_career_matches(&raw).unwrap();
        assert_eq!(careers.len(), 1);
        assert_eq!(careers[0].match_reason, "逻辑强");
    }

    #[test]
    fn test_career_matches_accept_named_wrapper() {
        let raw = format!(r#"{{"careers": [{CAREER}, {CAREER}]}}"#);
        assert_eq!(decode_career_matches(&raw).unwrap().len(), 2);
    }

    #[test]
    fn test_career_matches_accept_data_wrapper() {
        let raw = format!(r#"{{"data": [{CAREER}]}}"#);
        assert_eq!(decode_career_matches(&raw).unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_wrapper_is_shape_error() {
        let raw = format!(r#"{{"items": [{CAREER}]}}"#);
        let err = decode_career_matches(&raw).unwrap_err();
        assert_eq!(err.section, SectionKind::CareerMatches);
        assert!(err.details.contains("items"));
    }

    #[test]
    fn test_wrong_field_names_are_shape_error() {
        let raw = r#"[{"direction": "x", "jobs": ["a"], "matchReason": "y"}]"#;
        let err = decode_career_matches(raw).unwrap_err();
        assert!(err.details.contains("positions"), "{}", err.details);
    }

    #[test]
    fn test_invalid_json_is_shape_error() {
        let err = decode_summary("not json").unwrap_err();
        assert_eq!(err.section, SectionKind::Summary);
        assert!(err.details.starts_with("invalid JSON"));
    }

    #[test]
    fn test_object_section_rejects_array() {
        let err = decode_personality_analysis("[]").unwrap_err();
        assert_eq!(err.details, "expected a JSON object");
    }

    #[test]
    fn test_personality_with_few_items_still_decodes() {
        let raw = r#"{"coreType": "战略规划型", "strengths": ["a"], "weaknesses": [], "summary": ["s"]}"#;
        let analysis = decode_personality_analysis(raw).unwrap();
        assert_eq!(analysis.strengths.len(), 1);
        assert!(analysis.weaknesses.is_empty());
    }

    #[test]
    fn test_education_project_out_of_range_index_is_kept() {
        let raw = r#"{"projects": [{
            "name": "香港副学士",
            "tuitionRange": "15-25万/年",
            "advantages": ["a"],
            "disadvantages": ["b"],
            "recommendIndex": 7,
            "consultingFeeRange": "3-5万",
            "category": "其他"
        }]}"#;
        let projects = decode_education_projects(raw).unwrap();
        assert_eq!(projects[0].recommend_index, 7);
        assert_eq!(projects[0].category, "其他");
        assert!(projects[0].principle.is_none());
    }

    #[test]
    fn test_fractional_recommend_index_is_shape_error() {
        let raw = r#"[{
            "name": "x", "tuitionRange": "", "advantages": [], "disadvantages": [],
            "recommendIndex": 4.5, "consultingFeeRange": "", "category": "升学类"
        }]"#;
        assert!(decode_education_projects(raw).is_err());
    }

    #[test]
    fn test_timeline_accepts_timeline_wrapper() {
        let raw = r#"{"timeline": [{"stage": "高二上", "time": "9月-1月", "tasks": ["a", "b", "c"], "notes": "n"}]}"#;
        let timeline = decode_timeline(raw).unwrap();
        assert_eq!(timeline[0].stage, "高二上");
    }

    #[test]
    fn test_supply_chain_accepts_projects_wrapper() {
        let raw = r#"{"projects": [{"category": "语言培训", "name": "雅思1v1", "description": "d", "advantage": "a"}]}"#;
        let projects = decode_supply_chain_projects(raw).unwrap();
        assert_eq!(projects[0].name, "雅思1v1");
    }

    #[test]
    fn test_planning_advice_requires_all_three_lists() {
        let raw = r#"{"developmentPaths": [], "careerAdvice": []}"#;
        let err = decode_planning_advice(raw).unwrap_err();
        assert!(err.details.contains("familyCooperationAdvice"), "{}", err.details);
    }

    #[test]
    fn test_shape_error_display_names_section() {
        let err = ShapeError::new(SectionKind::Timeline, "expected an array");
        assert_eq!(err.to_string(), "timeline section: expected an array");
    }

    #[test]
    fn test_only_list_sections_have_wrappers() {
        let wrapped: Vec<_> = SectionKind::ALL
            .into_iter()
            .filter(|k| k.wrapper_key().is_some())
            .collect();
        assert_eq!(
            wrapped,
            vec![
                SectionKind::CareerMatches,
                SectionKind::EducationProjects,
                SectionKind::Timeline,
                SectionKind::SupplyChainProjects,
            ]
        );
    }
}
