pub mod feedback;
pub mod summary;

use crate::error::Result;
use crate::store::Store;
use crate::types::assessment::{AssessmentType, CategoryScore};
use crate::types::records::{CategoryGap, ExternalAssessmentResult, PerceptionStatus};
use serde::Serialize;

pub const SELF_AWARE_MAX_GAP: f64 = 10.0;
pub const BLIND_SPOT_MAX_GAP: f64 = 25.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DelusionalScoreResult {
    pub overall_score: f64,
    pub status: PerceptionStatus,
    pub category_gaps: Vec<CategoryGap>,
    pub external_assessment_count: usize,
}

pub fn classify(gap: f64) -> PerceptionStatus {
    if gap <= SELF_AWARE_MAX_GAP {
        PerceptionStatus::SelfAware
    } else if gap <= BLIND_SPOT_MAX_GAP {
        PerceptionStatus::BlindSpot
    } else {
        PerceptionStatus::Delusional
    }
}

/// Compares each self-assessed category with the mean external percentage for
/// that category. External results that lack a category are left out of its
/// mean; a category nobody else scored is skipped.
pub fn category_gaps(
    self_scores: &[CategoryScore],
    external: &[ExternalAssessmentResult],
) -> Vec<CategoryGap> {
    self_scores
        .iter()
        .filter_map(|own| {
            let observed = external
                .iter()
                .filter_map(|result| {
                    result
                        .category_scores
                        .iter()
                        .find(|score| score.category == own.category)
                })
                .map(|score| score.percentage)
                .collect::<Vec<_>>();

            if observed.is_empty() {
                tracing::debug!(category = %own.category, "no external scores for category");
                return None;
            }

            let external_score = observed.iter().sum::<f64>() / observed.len() as f64;
            let gap = (own.percentage - external_score).abs();
            Some(CategoryGap {
                category: own.category.clone(),
                self_score: own.percentage,
                external_score,
                gap,
                status: classify(gap),
            })
        })
        .collect()
}

pub fn overall_gap(gaps: &[CategoryGap]) -> f64 {
    if gaps.is_empty() {
        0.0
    } else {
        gaps.iter().map(|gap| gap.gap).sum::<f64>() / gaps.len() as f64
    }
}

/// Recomputes the user's delusional score from the latest self-assessment of
/// `assessment_type` and every external result of the same type, then writes
/// the outcome back onto those external results. `None` means there is not
/// enough data on one side.
pub fn calculate_delusional_score<S: Store>(
    store: &mut S,
    user_id: &str,
    assessment_type: AssessmentType,
) -> Result<Option<DelusionalScoreResult>> {
    let Some(own) = store.latest_assessment(user_id, Some(assessment_type))? else {
        tracing::warn!(user_id, %assessment_type, "no self-assessment found");
        return Ok(None);
    };

    let external = store.external_results(user_id, Some(assessment_type))?;
    if external.is_empty() {
        tracing::warn!(user_id, %assessment_type, "no external assessments found");
        return Ok(None);
    }

    let gaps = category_gaps(&own.category_scores, &external);
    let overall_score = overall_gap(&gaps);

    let ids = external
        .iter()
        .map(|result| result.id.clone())
        .collect::<Vec<_>>();
    let updated = store
        .upsert_delusional_scores(&ids, &gaps, overall_score)
        .inspect_err(|error| {
            tracing::error!(user_id, %assessment_type, %error, "failed to save delusional scores");
        })?;
    tracing::info!(
        user_id,
        %assessment_type,
        overall_score,
        updated,
        "delusional score recalculated"
    );

    Ok(Some(DelusionalScoreResult {
        overall_score,
        status: classify(overall_score),
        category_gaps: gaps,
        external_assessment_count: external.len(),
    }))
}
