use serde::Serialize;

use crate::models::report::ReportInputData;

const MIN_STRENGTHS: usize = 3;
const MIN_WEAKNESSES: usize = 3;
const MIN_THINKING_PATTERNS: usize = 3;
const MIN_SUBJECT_STRENGTHS: usize = 2;

#[derive(Debug, Clone, Serialize)]
pub struct InputValidationResult {
    pub passed: bool,
    pub missing: Vec<String>,
}

impl InputValidationResult {
    /// All messages on one line each, as shown to the user.
    pub fn message(&self) -> String {
        self.missing.join("\n")
    }
}

/// Checks every required questionnaire field and array minimum.
///
/// All failures are collected; nothing stops at the first one. Blank strings
/// (after trimming) count as missing. A special-circumstance flag that is set
/// requires its detail text.
pub fn validate_input(input: &ReportInputData) -> InputValidationResult {
    let mut missing = Vec::new();

    let student = &input.student_info;
    require_text(&mut missing, &student.name, "请填写学生姓名");

    let assessment = &input.assessment_data;
    require_text(&mut missing, &assessment.personality_type, "请选择人格类型");
    require_count(
        &mut missing,
        &assessment.personality_traits.strengths,
        MIN_STRENGTHS,
        "性格优势至少需要3点",
    );
    require_count(
        &mut missing,
        &assessment.personality_traits.weaknesses,
        MIN_WEAKNESSES,
        "性格缺点至少需要3点",
    );
    require_count(
        &mut missing,
        &assessment.thinking_patterns,
        MIN_THINKING_PATTERNS,
        "思维模式至少需要3条",
    );
    require_count(&mut missing, &assessment.interest_tendency, 1, "请选择兴趣倾向");
    require_count(
        &mut missing,
        &assessment.subject_strengths,
        MIN_SUBJECT_STRENGTHS,
        "学科优势至少需要2科",
    );

    let family = &input.family_info;
    require_text(&mut missing, &family.structure, "请填写家庭结构");
    require_text(&mut missing, &family.parent_occupation, "请填写父母职业");
    require_text(&mut missing, &family.budget, "请选择经济预算");
    require_text(&mut missing, &family.demands.education_goal, "请填写升学目标");
    require_text(&mut missing, &family.demands.career_expectation, "请填写就业期望");
    require_text(&mut missing, &family.demands.location_preference, "请填写地域偏好");

    let special = &input.special_circumstances;
    require_flagged(&mut missing, special.academic_issues(), "请填写考学问题详情");
    require_flagged(&mut missing, special.special_planning(), "请填写特色规划详情");
    require_flagged(&mut missing, special.resource_gaps(), "请填写资源缺乏详情");

    let consultant = &input.consultant_info;
    require_text(&mut missing, &consultant.name, "请填写咨询老师姓名");
    require_text(&mut missing, &consultant.phone, "请填写咨询老师电话");

    InputValidationResult {
        passed: missing.is_empty(),
        missing,
    }
}

fn require_text(missing: &mut Vec<String>, value: &str, message: &str) {
    if value.trim().is_empty() {
        missing.push(message.to_string());
    }
}

/// Counts only non-blank entries toward the minimum.
fn require_count(missing: &mut Vec<String>, values: &[String], min: usize, message: &str) {
    let filled = values.iter().filter(|v| !v.trim().is_empty()).count();
    if filled < min {
        missing.push(message.to_string());
    }
}

fn require_flagged(missing: &mut Vec<String>, detail: Option<&str>, message: &str) {
    if let Some(detail) = detail {
        require_text(missing, detail, message);
    }
}
