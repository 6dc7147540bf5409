use crate::assessors::assessor_for_code;
use crate::delusional::{calculate_delusional_score, DelusionalScoreResult};
use crate::error::{MirrorError, Result};
use crate::questions::validate_responses;
use crate::scoring::calculate_scores;
use crate::scoring::tables::ScoringTables;
use crate::store::Store;
use crate::types::assessment::{AssessmentResult, AssessmentType, Response};
use crate::types::records::{AssessmentRecord, ExternalAssessmentResult};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SubmittedAssessment {
    pub record: AssessmentRecord,
    pub result: AssessmentResult,
}

#[derive(Debug, Clone)]
pub struct ExternalSubmission {
    /// Code handed out when the assessor was invited.
    pub assessor_code: String,
    /// Must agree with the type the assessor was invited for, if both are set.
    pub assessment_type: Option<AssessmentType>,
    pub responses: Vec<Response>,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmittedExternal {
    pub result: ExternalAssessmentResult,
    /// Refreshed score, absent when the user has no self-assessment of this
    /// type yet or the refresh failed.
    pub delusional: Option<DelusionalScoreResult>,
}

pub fn submit_assessment<S: Store>(
    store: &mut S,
    tables: &ScoringTables,
    user_id: &str,
    assessment_type: AssessmentType,
    responses: &[Response],
    now: DateTime<Utc>,
) -> Result<SubmittedAssessment> {
    validate_responses(responses)?;
    let result = calculate_scores(tables, responses, assessment_type);
    let record = store.insert_assessment(AssessmentRecord {
        id: String::new(),
        user_id: user_id.to_string(),
        assessment_type,
        category_scores: result.category_scores.clone(),
        overall_score: result.overall_score,
        overall_percentage: result.overall_percentage,
        badge: Some(result.badge.clone()),
        completed_at: now,
    })?;
    tracing::info!(
        user_id,
        %assessment_type,
        id = %record.id,
        overall_percentage = record.overall_percentage,
        "assessment saved"
    );
    Ok(SubmittedAssessment { record, result })
}

/// Scores and stores an invited assessor's view of the user who invited
/// them, closes the assessor's code, then refreshes the user's delusional
/// score. A failed refresh is logged and does not undo the stored result.
pub fn submit_external_assessment<S: Store>(
    store: &mut S,
    tables: &ScoringTables,
    submission: ExternalSubmission,
    now: DateTime<Utc>,
) -> Result<SubmittedExternal> {
    let assessor = assessor_for_code(store, &submission.assessor_code, now)?;
    let assessment_type = match (assessor.assessment_type, submission.assessment_type) {
        (Some(invited), Some(given)) if invited != given => {
            return Err(MirrorError::Assessor(format!(
                "code {} was issued for {invited}, not {given}",
                submission.assessor_code
            )));
        }
        (Some(kind), _) | (None, Some(kind)) => kind,
        (None, None) => {
            return Err(MirrorError::Assessor(format!(
                "code {} names no assessment type; pass one explicitly",
                submission.assessor_code
            )));
        }
    };

    validate_responses(&submission.responses)?;
    let scored = calculate_scores(tables, &submission.responses, assessment_type);
    let result = store.complete_external_assessment(
        &assessor.id,
        ExternalAssessmentResult {
            id: String::new(),
            assessor_id: assessor.id.clone(),
            user_id: assessor.user_id.clone(),
            assessment_type,
            category_scores: scored.category_scores,
            overall_score: scored.overall_score,
            overall_percentage: scored.overall_percentage,
            feedback: submission.feedback.filter(|text| !text.trim().is_empty()),
            completed_at: now,
            category_gap: None,
            delusional_score: None,
        },
        now,
    )?;
    tracing::info!(
        user_id = %result.user_id,
        assessor_id = %result.assessor_id,
        assessment_type = %result.assessment_type,
        id = %result.id,
        "external assessment saved"
    );

    let delusional =
        match calculate_delusional_score(store, &result.user_id, result.assessment_type) {
            Ok(score) => score,
            Err(error) => {
                tracing::warn!(
                    user_id = %result.user_id,
                    assessor_id = %result.assessor_id,
                    %error,
                    "delusional score refresh failed"
                );
                None
            }
        };

    Ok(SubmittedExternal { result, delusional })
}
