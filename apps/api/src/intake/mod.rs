// Questionnaire intake: normalization and validation run before any provider call.

pub mod validation;

pub use validation::validate_input;

use crate::models::report::ReportInputData;

/// Applies the client-side defaults the form would have applied: a blank
/// consultant WeChat falls back to the phone number, and free-text fields are
/// trimmed.
pub fn normalize_input(mut input: ReportInputData) -> ReportInputData {
    let student = &mut input.student_info;
    student.name = student.name.trim().to_string();

    let consultant = &mut input.consultant_info;
    consultant.name = consultant.name.trim().to_string();
    consultant.phone = consultant.phone.trim().to_string();
    consultant.wechat = consultant.wechat.trim().to_string();
    if consultant.wechat.is_empty() {
        consultant.wechat = consultant.phone.clone();
    }

    input
}
