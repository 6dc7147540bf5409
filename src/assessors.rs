use crate::compatibility::invitation::invitation_code;
use crate::error::{MirrorError, Result};
use crate::store::Store;
use crate::types::assessment::AssessmentType;
use crate::types::records::{AssessorStatus, ExternalAssessor};
use chrono::{DateTime, Duration, Utc};

pub const ASSESSOR_TTL_DAYS: i64 = 30;

#[derive(Debug, Clone)]
pub struct NewAssessor {
    pub email: String,
    /// How the assessor knows the user, e.g. "friend" or "sibling".
    pub relationship: String,
    pub assessment_type: Option<AssessmentType>,
}

pub fn assessment_type_name(assessment_type: Option<AssessmentType>) -> &'static str {
    match assessment_type {
        Some(AssessmentType::HighValueMan) => "High-Value Man Assessment",
        Some(AssessmentType::WifeMaterial) => "Wife Material Assessment",
        Some(AssessmentType::BridalPrice) => "Bridal Price Estimator",
        None => "Assessment",
    }
}

/// Invites someone to rate `user_id`. The returned code is what the assessor
/// answers with; it is valid for [`ASSESSOR_TTL_DAYS`].
pub fn invite_assessor<S: Store>(
    store: &mut S,
    user_id: &str,
    new: NewAssessor,
    now: DateTime<Utc>,
) -> Result<ExternalAssessor> {
    let email = new.email.trim();
    if email.is_empty() {
        return Err(MirrorError::Assessor("an email is required".to_string()));
    }
    let relationship = new.relationship.trim();
    if relationship.is_empty() {
        return Err(MirrorError::Assessor("a relationship is required".to_string()));
    }

    let assessor = store.insert_assessor(ExternalAssessor {
        id: String::new(),
        user_id: user_id.to_string(),
        email: email.to_string(),
        relationship: relationship.to_string(),
        invitation_code: invitation_code(user_id, Some(email), now),
        status: AssessorStatus::Pending,
        assessment_type: new.assessment_type,
        created_at: now,
        expires_at: now + Duration::days(ASSESSOR_TTL_DAYS),
        updated_at: now,
    })?;
    tracing::info!(
        user_id,
        id = %assessor.id,
        code = %assessor.invitation_code,
        "assessor invited"
    );
    Ok(assessor)
}

/// Gives a pending assessor a fresh expiry window.
pub fn resend_assessor<S: Store>(
    store: &mut S,
    user_id: &str,
    assessor_id: &str,
    now: DateTime<Utc>,
) -> Result<ExternalAssessor> {
    let pending = store
        .assessors(user_id)?
        .into_iter()
        .find(|assessor| assessor.id == assessor_id)
        .ok_or_else(|| MirrorError::Assessor(format!("{user_id} has no assessor {assessor_id}")))?;
    if pending.status == AssessorStatus::Completed {
        return Err(MirrorError::Assessor(format!(
            "assessor {assessor_id} has already completed the assessment"
        )));
    }

    let expires_at = now + Duration::days(ASSESSOR_TTL_DAYS);
    let extended = store
        .extend_assessor(assessor_id, user_id, expires_at, now)?
        .ok_or_else(|| MirrorError::Assessor(format!("{user_id} has no assessor {assessor_id}")))?;
    tracing::info!(user_id, assessor_id, expires_at = %extended.expires_at, "assessor invitation renewed");
    Ok(extended)
}

pub fn remove_assessor<S: Store>(
    store: &mut S,
    user_id: &str,
    assessor_id: &str,
) -> Result<ExternalAssessor> {
    let removed = store
        .remove_assessor(assessor_id, user_id)?
        .ok_or_else(|| MirrorError::Assessor(format!("{user_id} has no assessor {assessor_id}")))?;
    tracing::info!(user_id, assessor_id, "assessor removed");
    Ok(removed)
}

/// The assessor a code belongs to, if it can still be answered at `now`.
pub fn assessor_for_code<S: Store>(
    store: &S,
    code: &str,
    now: DateTime<Utc>,
) -> Result<ExternalAssessor> {
    let assessor = store
        .assessor_by_code(code)?
        .ok_or_else(|| MirrorError::Assessor("Invalid assessor code".to_string()))?;
    if assessor.status == AssessorStatus::Completed {
        return Err(MirrorError::Assessor(
            "This assessment has already been completed".to_string(),
        ));
    }
    if assessor.expires_at <= now {
        tracing::warn!(code, expires_at = %assessor.expires_at, "assessor code expired");
        return Err(MirrorError::Assessor("This invitation has expired".to_string()));
    }
    Ok(assessor)
}
