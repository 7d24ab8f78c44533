//! Report data contract: questionnaire input, LLM-generated sections and the
//! assembled report document.
//!
//! JSON field names are camelCase to match the browser client. All records are
//! plain values: once a `FullReportData` is built it is never mutated.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Input schema
// ────────────────────────────────────────────────────────────────────────────

/// School year of the student. Serialized as the Chinese label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "初一")]
    JuniorHigh1,
    #[serde(rename = "初二")]
    JuniorHigh2,
    #[serde(rename = "初三")]
    JuniorHigh3,
    #[serde(rename = "高一")]
    SeniorHigh1,
    #[serde(rename = "高二")]
    SeniorHigh2,
    #[serde(rename = "高三")]
    SeniorHigh3,
    #[serde(rename = "大一")]
    Undergrad1,
    #[serde(rename = "大二")]
    Undergrad2,
    #[serde(rename = "大三")]
    Undergrad3,
    #[serde(rename = "大四")]
    Undergrad4,
}

impl Grade {
    #[cfg(test)]
    pub const ALL: [Grade; 10] = [
        Grade::JuniorHigh1,
        Grade::JuniorHigh2,
        Grade::JuniorHigh3,
        Grade::SeniorHigh1,
        Grade::SeniorHigh2,
        Grade::SeniorHigh3,
        Grade::Undergrad1,
        Grade::Undergrad2,
        Grade::Undergrad3,
        Grade::Undergrad4,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Grade::JuniorHigh1 => "初一",
            Grade::JuniorHigh2 => "初二",
            Grade::JuniorHigh3 => "初三",
            Grade::SeniorHigh1 => "高一",
            Grade::SeniorHigh2 => "高二",
            Grade::SeniorHigh3 => "高三",
            Grade::Undergrad1 => "大一",
            Grade::Undergrad2 => "大二",
            Grade::Undergrad3 => "大三",
            Grade::Undergrad4 => "大四",
        }
    }

    /// Planning horizon embedded in the timeline prompt.
    pub fn planning_scope(self) -> &'static str {
        match self {
            Grade::JuniorHigh1 => "初中三年+高中三年规划",
            Grade::JuniorHigh2 => "初中剩余时间+高中三年规划",
            Grade::JuniorHigh3 => "中考冲刺+高中三年规划",
            Grade::SeniorHigh1 => "高中三年+大学四年规划",
            Grade::SeniorHigh2 => "高中剩余时间+大学四年规划",
            Grade::SeniorHigh3 => "高考冲刺+大学四年规划",
            Grade::Undergrad1 => "大学四年规划",
            Grade::Undergrad2 => "大学剩余时间规划",
            Grade::Undergrad3 => "大学剩余时间+研究生规划",
            Grade::Undergrad4 => "毕业求职/研究生申请规划",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Performance {
    #[serde(rename = "优秀")]
    Excellent,
    #[serde(rename = "中等")]
    Average,
    #[serde(rename = "待提升")]
    NeedsImprovement,
}

impl fmt::Display for Performance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Performance::Excellent => "优秀",
            Performance::Average => "中等",
            Performance::NeedsImprovement => "待提升",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetDegree {
    #[serde(rename = "本科")]
    Bachelor,
    #[serde(rename = "硕士")]
    Master,
    #[serde(rename = "博士")]
    Doctorate,
}

impl fmt::Display for TargetDegree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TargetDegree::Bachelor => "本科",
            TargetDegree::Master => "硕士",
            TargetDegree::Doctorate => "博士",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentInfo {
    #[serde(default)]
    pub name: String,
    pub grade: Grade,
    pub current_performance: Performance,
    pub target_degree: TargetDegree,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalityTraits {
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentData {
    #[serde(default)]
    pub personality_type: String,
    #[serde(default)]
    pub personality_traits: PersonalityTraits,
    #[serde(default)]
    pub thinking_patterns: Vec<String>,
    #[serde(default)]
    pub interest_tendency: Vec<String>,
    #[serde(default)]
    pub subject_strengths: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyDemands {
    #[serde(default)]
    pub education_goal: String,
    #[serde(default)]
    pub career_expectation: String,
    #[serde(default)]
    pub location_preference: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyInfo {
    #[serde(default)]
    pub structure: String,
    #[serde(default)]
    pub parent_occupation: String,
    #[serde(default)]
    pub budget: String,
    #[serde(default)]
    pub resources: Vec<String>,
    #[serde(default)]
    pub demands: FamilyDemands,
}

/// Three yes/no flags, each with a free-text detail that only matters when the
/// flag is set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialCircumstances {
    #[serde(default)]
    pub has_academic_issues: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub academic_issues_detail: Option<String>,
    #[serde(default)]
    pub has_special_planning: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_planning_detail: Option<String>,
    #[serde(default)]
    pub lacks_resources: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lacks_resources_detail: Option<String>,
}

impl SpecialCircumstances {
    pub fn academic_issues(&self) -> Option<&str> {
        flagged_detail(self.has_academic_issues, &self.academic_issues_detail)
    }

    pub fn special_planning(&self) -> Option<&str> {
        flagged_detail(self.has_special_planning, &self.special_planning_detail)
    }

    pub fn resource_gaps(&self) -> Option<&str> {
        flagged_detail(self.lacks_resources, &self.lacks_resources_detail)
    }
}

/// Detail text when the flag is set; an unset flag hides whatever detail was sent.
fn flagged_detail(flag: bool, detail: &Option<String>) -> Option<&str> {
    if flag {
        Some(detail.as_deref().unwrap_or(""))
    } else {
        None
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultantInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub wechat: String,
}

/// The full questionnaire as submitted by the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportInputData {
    pub student_info: StudentInfo,
    #[serde(default)]
    pub assessment_data: AssessmentData,
    #[serde(default)]
    pub family_info: FamilyInfo,
    #[serde(default)]
    pub special_circumstances: SpecialCircumstances,
    #[serde(default)]
    pub consultant_info: ConsultantInfo,
}

// ────────────────────────────────────────────────────────────────────────────
// Generated sections
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalityAnalysis {
    pub core_type: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub summary: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerMatch {
    pub direction: String,
    /// 3–5 requested.
    pub positions: Vec<String>,
    pub match_reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevelopmentPath {
    pub education_direction: String,
    pub career_goal: String,
    pub resource_match: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerPlanningAdvice {
    pub field: String,
    pub short_term_path: String,
    pub long_term_path: String,
}

/// Output of the planning-advice section; split into three top-level fields
/// of the report on merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanningAdvice {
    pub development_paths: Vec<DevelopmentPath>,
    pub career_advice: Vec<CareerPlanningAdvice>,
    pub family_cooperation_advice: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationProject {
    pub name: String,
    pub tuition_range: String,
    pub advantages: Vec<String>,
    pub disadvantages: Vec<String>,
    /// 1–5 by prompt instruction only; not clamped here.
    pub recommend_index: i32,
    pub consulting_fee_range: String,
    /// Expected to be one of [`EducationCategory::ALL`]; other values are kept.
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineItem {
    pub stage: String,
    pub time: String,
    pub tasks: Vec<String>,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplyChainProject {
    /// Expected to be one of [`SupplyChainCategory::ALL`]; other values are kept.
    pub category: String,
    pub name: String,
    pub description: String,
    pub advantage: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub planning_logic: String,
    pub core_competence: String,
    pub action_suggestions: Vec<String>,
    pub service_commitment: Vec<String>,
}

/// The LLM-produced document. Every field is required: a report is either
/// complete or not produced at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedReportContent {
    pub personality_analysis: PersonalityAnalysis,
    pub career_matches: Vec<CareerMatch>,
    pub development_paths: Vec<DevelopmentPath>,
    pub career_advice: Vec<CareerPlanningAdvice>,
    pub family_cooperation_advice: Vec<String>,
    pub education_projects: Vec<EducationProject>,
    pub timeline: Vec<TimelineItem>,
    pub supply_chain_projects: Vec<SupplyChainProject>,
    pub summary: ReportSummary,
}

/// The report document: original input, generated content, generation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullReportData {
    pub input: ReportInputData,
    pub generated: GeneratedReportContent,
    pub generated_at: DateTime<Utc>,
}

// ────────────────────────────────────────────────────────────────────────────
// Category buckets
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EducationCategory {
    Admission,
    BackgroundBoost,
    Fallback,
}

impl EducationCategory {
    /// Fixed rendering order.
    pub const ALL: [EducationCategory; 3] = [
        EducationCategory::Admission,
        EducationCategory::BackgroundBoost,
        EducationCategory::Fallback,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EducationCategory::Admission => "升学类",
            EducationCategory::BackgroundBoost => "背景提升类",
            EducationCategory::Fallback => "兜底类",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupplyChainCategory {
    Language,
    StudyTour,
    Internship,
    ResearchCompetition,
}

impl SupplyChainCategory {
    /// Fixed rendering order.
    pub const ALL: [SupplyChainCategory; 4] = [
        SupplyChainCategory::Language,
        SupplyChainCategory::StudyTour,
        SupplyChainCategory::Internship,
        SupplyChainCategory::ResearchCompetition,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SupplyChainCategory::Language => "语言培训",
            SupplyChainCategory::StudyTour => "游学研学",
            SupplyChainCategory::Internship => "实习项目",
            SupplyChainCategory::ResearchCompetition => "科研/赛事",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}
