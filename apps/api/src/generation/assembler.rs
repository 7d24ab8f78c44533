//! Report Assembler: fans out the seven section generators and merges them.
//!
//! Flow: launch all sections concurrently → fail fast on the first provider
//! error → collect every shape error → merge positionally.
//!
//! The fan-out is a single `try_join!` owned by the caller's future. Nothing is
//! spawned, so dropping the caller (client disconnect) or a failing section
//! drops every in-flight provider request with it.

use std::time::Instant;

use tracing::info;

use crate::errors::AppError;
use crate::generation::sections::{
    generate_career_matches, generate_education_projects, generate_personality_analysis,
    generate_planning_advice, generate_summary, generate_supply_chain_projects,
    generate_timeline, ShapeError,
};
use crate::llm_client::CompletionService;
use crate::models::report::{GeneratedReportContent, ReportInputData};

/// Generates every section of the report for `input`.
///
/// Returns either a document with all sections present or an error; a partial
/// document is never produced.
pub async fn assemble_report(
    llm: &dyn CompletionService,
    input: &ReportInputData,
    credential: &str,
) -> Result<GeneratedReportContent, AppError> {
    let started = Instant::now();
    info!("Assembling report (grade {})", input.student_info.grade);

    let (personality, careers, planning, education, timeline, supply_chain, summary) = tokio::try_join!(
        generate_personality_analysis(llm, input, credential),
        generate_career_matches(llm, input, credential),
        generate_planning_advice(llm, input, credential),
        generate_education_projects(llm, input, credential),
        generate_timeline(llm, input, credential),
        generate_supply_chain_projects(llm, input, credential),
        generate_summary(llm, input, credential),
    )
    .map_err(AppError::from_llm)?;

    let mut shape_errors = Vec::new();
    let merged = match (
        take(personality, &mut shape_errors),
        take(careers, &mut shape_errors),
        take(planning, &mut shape_errors),
        take(education, &mut shape_errors),
        take(timeline, &mut shape_errors),
        take(supply_chain, &mut shape_errors),
        take(summary, &mut shape_errors),
    ) {
        (
            Some(personality_analysis),
            Some(career_matches),
            Some(planning),
            Some(education_projects),
            Some(timeline),
            Some(supply_chain_projects),
            Some(summary),
        ) => GeneratedReportContent {
            personality_analysis,
            career_matches,
            development_paths: planning.development_paths,
            career_advice: planning.career_advice,
            family_cooperation_advice: planning.family_cooperation_advice,
            education_projects,
            timeline,
            supply_chain_projects,
            summary,
        },
        _ => return Err(AppError::ShapeDrift(shape_errors)),
    };

    info!(
        "Report assembled in {}ms: {} careers, {} projects, {} stages, {} resources",
        started.elapsed().as_millis(),
        merged.career_matches.len(),
        merged.education_projects.len(),
        merged.timeline.len(),
        merged.supply_chain_projects.len()
    );

    Ok(merged)
}

fn take<T>(outcome: Result<T, ShapeError>, errors: &mut Vec<ShapeError>) -> Option<T> {
    match outcome {
        Ok(value) => Some(value),
        Err(e) => {
            errors.push(e);
            None
        }
    }
}
