use super::Store;
use crate::error::{MirrorError, Result};
use crate::types::assessment::AssessmentType;
use crate::types::records::{
    AssessmentRecord, AssessorStatus, CategoryGap, CompatibilityRecord, ExternalAssessmentResult,
    ExternalAssessor, InvitationStatus, PartnerInvitation, Relationship, RelationshipStatus,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Serialize, Deserialize)]
struct Persisted {
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    assessments: Vec<AssessmentRecord>,
    #[serde(default)]
    external_results: Vec<ExternalAssessmentResult>,
    #[serde(default)]
    assessors: Vec<ExternalAssessor>,
    #[serde(default)]
    invitations: Vec<PartnerInvitation>,
    #[serde(default)]
    relationships: Vec<Relationship>,
    #[serde(default)]
    compatibility_scores: Vec<CompatibilityRecord>,
}

/// Whole-database JSON file. Every mutation rewrites the file through a
/// temporary sibling and a rename, so a failed write leaves the previous
/// contents in place.
pub struct FileStore {
    path: PathBuf,
    data: Persisted,
}

impl FileStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let data = if path.exists() {
            let bytes = fs::read(&path)?;
            serde_json::from_slice(&bytes)?
        } else {
            Persisted::default()
        };

        tracing::debug!(
            path = %path.display(),
            assessments = data.assessments.len(),
            external_results = data.external_results.len(),
            "opened store"
        );
        Ok(Self { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.data.next_id += 1;
        format!("{prefix}-{}", self.data.next_id)
    }

    fn persist(&self) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(&self.data)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path).map_err(|error| {
            let _ = fs::remove_file(&tmp);
            MirrorError::Store(format!("{}: {error}", self.path.display()))
        })?;
        Ok(())
    }

    /// Applies a mutation and persists it; on a failed write the in-memory
    /// state is rolled back to match the file.
    fn commit<T>(&mut self, mutate: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let snapshot = serde_json::to_vec(&self.data)?;
        let outcome = mutate(self).and_then(|value| self.persist().map(|()| value));
        if outcome.is_err() {
            self.data = serde_json::from_slice(&snapshot)?;
        }
        outcome
    }
}

impl Store for FileStore {
    fn insert_assessment(&mut self, mut record: AssessmentRecord) -> Result<AssessmentRecord> {
        self.commit(|store| {
            record.id = store.next_id("assessment");
            store.data.assessments.push(record.clone());
            Ok(record)
        })
    }

    fn latest_assessment(
        &self,
        user_id: &str,
        assessment_type: Option<AssessmentType>,
    ) -> Result<Option<AssessmentRecord>> {
        Ok(self
            .data
            .assessments
            .iter()
            .filter(|record| record.user_id == user_id)
            .filter(|record| assessment_type.map_or(true, |kind| record.assessment_type == kind))
            .max_by_key(|record| record.completed_at)
            .cloned())
    }

    fn complete_external_assessment(
        &mut self,
        assessor_id: &str,
        mut result: ExternalAssessmentResult,
        completed_at: DateTime<Utc>,
    ) -> Result<ExternalAssessmentResult> {
        self.commit(|store| {
            let assessor = store
                .data
                .assessors
                .iter_mut()
                .find(|assessor| assessor.id == assessor_id)
                .ok_or_else(|| MirrorError::Store(format!("assessor not found: {assessor_id}")))?;
            assessor.status = AssessorStatus::Completed;
            assessor.updated_at = completed_at;

            result.id = store.next_id("external");
            store.data.external_results.push(result.clone());
            Ok(result)
        })
    }

    fn external_results(
        &self,
        user_id: &str,
        assessment_type: Option<AssessmentType>,
    ) -> Result<Vec<ExternalAssessmentResult>> {
        let mut results = self
            .data
            .external_results
            .iter()
            .filter(|result| result.user_id == user_id)
            .filter(|result| assessment_type.map_or(true, |kind| result.assessment_type == kind))
            .cloned()
            .collect::<Vec<_>>();
        results.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        Ok(results)
    }

    fn upsert_delusional_scores(
        &mut self,
        result_ids: &[String],
        category_gap: &[CategoryGap],
        delusional_score: f64,
    ) -> Result<usize> {
        if let Some(missing) = result_ids
            .iter()
            .find(|id| !self.data.external_results.iter().any(|result| &result.id == *id))
        {
            return Err(MirrorError::Store(format!(
                "external assessment result not found: {missing}"
            )));
        }

        self.commit(|store| {
            let mut updated = 0;
            for result in store
                .data
                .external_results
                .iter_mut()
                .filter(|result| result_ids.contains(&result.id))
            {
                result.category_gap = Some(category_gap.to_vec());
                result.delusional_score = Some(delusional_score);
                updated += 1;
            }
            Ok(updated)
        })
    }

    fn insert_assessor(&mut self, mut assessor: ExternalAssessor) -> Result<ExternalAssessor> {
        if self
            .data
            .assessors
            .iter()
            .any(|existing| existing.invitation_code == assessor.invitation_code)
        {
            return Err(MirrorError::Store(format!(
                "assessor code already issued: {}",
                assessor.invitation_code
            )));
        }
        self.commit(|store| {
            assessor.id = store.next_id("assessor");
            store.data.assessors.push(assessor.clone());
            Ok(assessor)
        })
    }

    fn assessors(&self, user_id: &str) -> Result<Vec<ExternalAssessor>> {
        let mut assessors = self
            .data
            .assessors
            .iter()
            .filter(|assessor| assessor.user_id == user_id)
            .cloned()
            .collect::<Vec<_>>();
        assessors.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(assessors)
    }

    fn assessor_by_code(&self, code: &str) -> Result<Option<ExternalAssessor>> {
        Ok(self
            .data
            .assessors
            .iter()
            .find(|assessor| assessor.invitation_code == code)
            .cloned())
    }

    fn extend_assessor(
        &mut self,
        id: &str,
        user_id: &str,
        expires_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<ExternalAssessor>> {
        if !self
            .data
            .assessors
            .iter()
            .any(|assessor| assessor.id == id && assessor.user_id == user_id)
        {
            return Ok(None);
        }
        self.commit(|store| {
            let assessor = store
                .data
                .assessors
                .iter_mut()
                .find(|assessor| assessor.id == id && assessor.user_id == user_id)
                .ok_or_else(|| MirrorError::Store(format!("assessor not found: {id}")))?;
            assessor.expires_at = expires_at;
            assessor.updated_at = updated_at;
            Ok(Some(assessor.clone()))
        })
    }

    fn remove_assessor(&mut self, id: &str, user_id: &str) -> Result<Option<ExternalAssessor>> {
        let Some(index) = self
            .data
            .assessors
            .iter()
            .position(|assessor| assessor.id == id && assessor.user_id == user_id)
        else {
            return Ok(None);
        };
        self.commit(|store| Ok(Some(store.data.assessors.remove(index))))
    }

    fn insert_invitation(&mut self, mut invitation: PartnerInvitation) -> Result<PartnerInvitation> {
        if self
            .data
            .invitations
            .iter()
            .any(|existing| existing.invitation_code == invitation.invitation_code)
        {
            return Err(MirrorError::Store(format!(
                "invitation code already issued: {}",
                invitation.invitation_code
            )));
        }
        self.commit(|store| {
            invitation.id = store.next_id("invitation");
            store.data.invitations.push(invitation.clone());
            Ok(invitation)
        })
    }

    fn invitation_by_code(&self, code: &str) -> Result<Option<PartnerInvitation>> {
        Ok(self
            .data
            .invitations
            .iter()
            .find(|invitation| invitation.invitation_code == code)
            .cloned())
    }

    fn set_invitation_status(&mut self, id: &str, status: InvitationStatus) -> Result<()> {
        self.commit(|store| {
            let invitation = store
                .data
                .invitations
                .iter_mut()
                .find(|invitation| invitation.id == id)
                .ok_or_else(|| MirrorError::Store(format!("invitation not found: {id}")))?;
            invitation.status = status;
            Ok(())
        })
    }

    fn accept_invitation(
        &mut self,
        invitation_id: &str,
        mut relationship: Relationship,
    ) -> Result<Relationship> {
        self.commit(|store| {
            let invitation = store
                .data
                .invitations
                .iter_mut()
                .find(|invitation| invitation.id == invitation_id)
                .ok_or_else(|| {
                    MirrorError::Store(format!("invitation not found: {invitation_id}"))
                })?;
            invitation.status = InvitationStatus::Accepted;

            relationship.id = store.next_id("relationship");
            store.data.relationships.push(relationship.clone());
            Ok(relationship)
        })
    }

    fn set_relationship_status(&mut self, id: &str, status: RelationshipStatus) -> Result<()> {
        self.commit(|store| {
            let relationship = store
                .data
                .relationships
                .iter_mut()
                .find(|relationship| relationship.id == id)
                .ok_or_else(|| MirrorError::Store(format!("relationship not found: {id}")))?;
            relationship.status = status;
            Ok(())
        })
    }

    fn relationship(&self, id: &str) -> Result<Option<Relationship>> {
        Ok(self
            .data
            .relationships
            .iter()
            .find(|relationship| relationship.id == id)
            .cloned())
    }

    fn latest_active_relationship(&self, user_id: &str) -> Result<Option<Relationship>> {
        Ok(self
            .data
            .relationships
            .iter()
            .filter(|relationship| relationship.status == RelationshipStatus::Active)
            .filter(|relationship| relationship.includes(user_id))
            .max_by_key(|relationship| relationship.created_at)
            .cloned())
    }

    fn active_relationship_between(&self, a: &str, b: &str) -> Result<Option<Relationship>> {
        Ok(self
            .data
            .relationships
            .iter()
            .filter(|relationship| relationship.status == RelationshipStatus::Active)
            .find(|relationship| relationship.includes(a) && relationship.includes(b))
            .cloned())
    }

    fn upsert_compatibility(&mut self, record: CompatibilityRecord) -> Result<CompatibilityRecord> {
        self.commit(|store| {
            let rows = &mut store.data.compatibility_scores;
            match rows
                .iter_mut()
                .find(|row| row.relationship_id == record.relationship_id)
            {
                Some(existing) => *existing = record.clone(),
                None => rows.push(record.clone()),
            }
            Ok(record)
        })
    }

    fn compatibility(&self, relationship_id: &str) -> Result<Option<CompatibilityRecord>> {
        Ok(self
            .data
            .compatibility_scores
            .iter()
            .find(|row| row.relationship_id == relationship_id)
            .cloned())
    }
}
