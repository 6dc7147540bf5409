use crate::bridal_price::BridalPriceResult;
use crate::compatibility::handler::ApiResponse;
use crate::delusional::summary::ExternalSummary;
use crate::delusional::DelusionalScoreResult;
use crate::questions::Question;
use crate::scoring::suggestions::Suggestion;
use crate::scoring::tables::BadgeThreshold;
use crate::submit::{SubmittedAssessment, SubmittedExternal};
use crate::types::assessment::{AssessmentResult, AssessmentType};
use crate::types::records::{
    CompatibilityRecord, ExternalAssessor, PartnerInvitation, PerceptionStatus, Relationship,
};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct QuestionGroup {
    pub category: &'static str,
    pub description: Option<&'static str>,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionSheet {
    pub assessment_type: AssessmentType,
    pub groups: Vec<QuestionGroup>,
    pub badges: &'static [BadgeThreshold],
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    pub result: AssessmentResult,
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryFeedback {
    pub category: String,
    pub gap: f64,
    pub status: PerceptionStatus,
    pub feedback: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DelusionalReport {
    pub user_id: String,
    pub assessment_type: AssessmentType,
    #[serde(flatten)]
    pub score: DelusionalScoreResult,
    pub category_feedback: Vec<CategoryFeedback>,
    pub overall_feedback: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategorySuggestion {
    pub category: String,
    pub match_percentage: f64,
    pub suggestion: &'static str,
}

/// The handler response plus the presentation extras shown in Markdown.
#[derive(Debug, Clone, Serialize)]
pub struct CompatibilityReport {
    pub response: ApiResponse,
    pub badge: Option<&'static str>,
    pub category_suggestions: Vec<CategorySuggestion>,
}

/// A stored compatibility record, read back without recalculating.
#[derive(Debug, Clone, Serialize)]
pub struct StoredCompatibility {
    #[serde(flatten)]
    pub record: CompatibilityRecord,
    pub badge: &'static str,
    pub category_suggestions: Vec<CategorySuggestion>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssessorEntry {
    #[serde(flatten)]
    pub assessor: ExternalAssessor,
    pub assessment_name: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssessorList {
    pub user_id: String,
    pub assessors: Vec<AssessorEntry>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Report {
    Questions(QuestionSheet),
    Score(ScoreReport),
    BridalPrice(BridalPriceResult),
    Submitted(SubmittedAssessment),
    External(SubmittedExternal),
    Delusional(DelusionalReport),
    Summary(ExternalSummary),
    Invitation(PartnerInvitation),
    Relationship(Relationship),
    Assessor(AssessorEntry),
    Assessors(AssessorList),
    Compatibility(CompatibilityReport),
    StoredCompatibility(StoredCompatibility),
}
