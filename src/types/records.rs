use crate::types::assessment::{AssessmentType, CategoryScore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A completed self-assessment as it is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub id: String,
    pub user_id: String,
    pub assessment_type: AssessmentType,
    pub category_scores: Vec<CategoryScore>,
    pub overall_score: f64,
    pub overall_percentage: f64,
    #[serde(default)]
    pub badge: Option<String>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PerceptionStatus {
    SelfAware,
    BlindSpot,
    Delusional,
}

impl PerceptionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SelfAware => "self-aware",
            Self::BlindSpot => "blind-spot",
            Self::Delusional => "delusional",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryGap {
    pub category: String,
    pub self_score: f64,
    pub external_score: f64,
    pub gap: f64,
    pub status: PerceptionStatus,
}

/// A questionnaire an assessor filled in about `user_id`. `category_gap` and
/// `delusional_score` are written back by the delusional-score engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalAssessmentResult {
    pub id: String,
    pub assessor_id: String,
    pub user_id: String,
    pub assessment_type: AssessmentType,
    pub category_scores: Vec<CategoryScore>,
    pub overall_score: f64,
    pub overall_percentage: f64,
    #[serde(default)]
    pub feedback: Option<String>,
    pub completed_at: DateTime<Utc>,
    #[serde(default)]
    pub category_gap: Option<Vec<CategoryGap>>,
    #[serde(default)]
    pub delusional_score: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssessorStatus {
    Pending,
    Completed,
}

/// Someone a user invited to rate them. The assessor answers through
/// `invitation_code`; one code yields one external result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalAssessor {
    pub id: String,
    pub user_id: String,
    pub email: String,
    pub relationship: String,
    pub invitation_code: String,
    pub status: AssessorStatus,
    #[serde(default)]
    pub assessment_type: Option<AssessmentType>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Declined,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerInvitation {
    pub id: String,
    pub sender_id: String,
    pub invitation_code: String,
    #[serde(default)]
    pub email: Option<String>,
    pub status: InvitationStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: String,
    pub user1_id: String,
    pub user2_id: String,
    pub status: RelationshipStatus,
    pub created_at: DateTime<Utc>,
}

impl Relationship {
    pub fn includes(&self, user_id: &str) -> bool {
        self.user1_id == user_id || self.user2_id == user_id
    }
}

/// One compared category. The three score fields carry the same value; all
/// of them are part of the stored and returned shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCompatibility {
    pub category: String,
    pub user1_score: f64,
    pub user2_score: f64,
    pub compatibility_score: f64,
    pub compatibility_percentage: f64,
    pub match_percentage: f64,
}

impl CategoryCompatibility {
    pub fn new(category: impl Into<String>, user1_score: f64, user2_score: f64) -> Self {
        let score = (100.0 - (user1_score - user2_score).abs()).max(0.0);
        Self {
            category: category.into(),
            user1_score,
            user2_score,
            compatibility_score: score,
            compatibility_percentage: score,
            match_percentage: score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: String,
    pub suggestion: String,
}

/// One row per relationship; recomputation overwrites it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityRecord {
    pub relationship_id: String,
    pub category_scores: Vec<CategoryCompatibility>,
    pub overall_score: f64,
    pub overall_percentage: f64,
    pub recommendations: Vec<Recommendation>,
    pub analysis_date: DateTime<Utc>,
}
