pub mod file;

use crate::error::Result;
use crate::types::assessment::AssessmentType;
use crate::types::records::{
    AssessmentRecord, CategoryGap, CompatibilityRecord, ExternalAssessmentResult,
    ExternalAssessor, InvitationStatus, PartnerInvitation, Relationship, RelationshipStatus,
};
use chrono::{DateTime, Utc};

pub use file::FileStore;

/// Persistence seam for every engine. Insert methods assign the record `id`
/// and return the stored row. Reads are `&self` so two of them can run on
/// separate threads against the same store.
pub trait Store: Sync {
    fn insert_assessment(&mut self, record: AssessmentRecord) -> Result<AssessmentRecord>;

    /// Most recent self-assessment by `completed_at`, optionally of one type.
    fn latest_assessment(
        &self,
        user_id: &str,
        assessment_type: Option<AssessmentType>,
    ) -> Result<Option<AssessmentRecord>>;

    /// Stores the result an assessor filed and marks that assessor completed,
    /// in one write.
    fn complete_external_assessment(
        &mut self,
        assessor_id: &str,
        result: ExternalAssessmentResult,
        completed_at: DateTime<Utc>,
    ) -> Result<ExternalAssessmentResult>;

    /// External results about `user_id`, newest first.
    fn external_results(
        &self,
        user_id: &str,
        assessment_type: Option<AssessmentType>,
    ) -> Result<Vec<ExternalAssessmentResult>>;

    /// Writes the same gap list and score onto every listed result in one
    /// batch. Either every id is updated or none is.
    fn upsert_delusional_scores(
        &mut self,
        result_ids: &[String],
        category_gap: &[CategoryGap],
        delusional_score: f64,
    ) -> Result<usize>;

    fn insert_assessor(&mut self, assessor: ExternalAssessor) -> Result<ExternalAssessor>;

    /// Assessors invited by `user_id`, newest first.
    fn assessors(&self, user_id: &str) -> Result<Vec<ExternalAssessor>>;

    fn assessor_by_code(&self, code: &str) -> Result<Option<ExternalAssessor>>;

    /// Moves the expiry of one of `user_id`'s assessors. `None` when the
    /// assessor does not belong to that user.
    fn extend_assessor(
        &mut self,
        id: &str,
        user_id: &str,
        expires_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<ExternalAssessor>>;

    /// Deletes one of `user_id`'s assessors and returns it.
    fn remove_assessor(&mut self, id: &str, user_id: &str) -> Result<Option<ExternalAssessor>>;

    fn insert_invitation(&mut self, invitation: PartnerInvitation) -> Result<PartnerInvitation>;

    fn invitation_by_code(&self, code: &str) -> Result<Option<PartnerInvitation>>;

    fn set_invitation_status(&mut self, id: &str, status: InvitationStatus) -> Result<()>;

    /// Creates the relationship and marks the invitation accepted in one write.
    fn accept_invitation(
        &mut self,
        invitation_id: &str,
        relationship: Relationship,
    ) -> Result<Relationship>;

    fn set_relationship_status(&mut self, id: &str, status: RelationshipStatus) -> Result<()>;

    fn relationship(&self, id: &str) -> Result<Option<Relationship>>;

    /// Newest active relationship in which `user_id` is either party.
    fn latest_active_relationship(&self, user_id: &str) -> Result<Option<Relationship>>;

    fn active_relationship_between(&self, a: &str, b: &str) -> Result<Option<Relationship>>;

    fn upsert_compatibility(&mut self, record: CompatibilityRecord) -> Result<CompatibilityRecord>;

    fn compatibility(&self, relationship_id: &str) -> Result<Option<CompatibilityRecord>>;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Store;
    use crate::types::records::{AssessorStatus, ExternalAssessmentResult, ExternalAssessor};
    use chrono::Duration;

    /// Files `result` through a fresh assessor invited by the rated user.
    pub(crate) fn file_external_result<S: Store>(
        store: &mut S,
        result: ExternalAssessmentResult,
    ) -> ExternalAssessmentResult {
        let issued = store.assessors(&result.user_id).expect("assessors should read").len();
        let assessor = store
            .insert_assessor(ExternalAssessor {
                id: String::new(),
                user_id: result.user_id.clone(),
                email: format!("{}@example.com", result.assessor_id),
                relationship: "friend".to_string(),
                invitation_code: format!("{}:{}:{issued}", result.user_id, result.assessor_id),
                status: AssessorStatus::Pending,
                assessment_type: Some(result.assessment_type),
                created_at: result.completed_at,
                expires_at: result.completed_at + Duration::days(30),
                updated_at: result.completed_at,
            })
            .expect("assessor should insert");
        let completed_at = result.completed_at;
        store
            .complete_external_assessment(&assessor.id, result, completed_at)
            .expect("result should be filed")
    }
}
