use super::{compare, ComparisonError};
use crate::store::Store;
use crate::types::records::{AssessmentRecord, CompatibilityRecord, Relationship};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityRequest {
    #[serde(default)]
    pub invitation_code: Option<String>,
    #[serde(default)]
    pub relationship_id: Option<String>,
}

#[derive(Debug, Error)]
pub enum CompatibilityError {
    #[error("Unauthenticated")]
    Unauthenticated,

    #[error("Must provide invitation_code or relationship_id")]
    MissingTarget,

    #[error("Invalid invitation code")]
    InvalidInvitation(Option<String>),

    #[error("No relationship found for invitation")]
    NoRelationship(Option<String>),

    #[error("Invalid relationship_id")]
    InvalidRelationship(Option<String>),

    #[error("Forbidden – you are not part of this relationship")]
    Forbidden,

    #[error("Error fetching assessments")]
    Fetch(String),

    #[error("Both users must have completed assessments")]
    MissingAssessments,

    #[error("Invalid or empty category scores")]
    EmptyScores,

    #[error("No matching categories found")]
    NoSharedCategories,

    #[error("Error saving compatibility score")]
    Save(String),
}

impl CompatibilityError {
    pub fn status(&self) -> u16 {
        match self {
            Self::Unauthenticated => 401,
            Self::Forbidden => 403,
            Self::NoRelationship(_) => 404,
            Self::Fetch(_) | Self::Save(_) => 500,
            Self::MissingTarget
            | Self::InvalidInvitation(_)
            | Self::InvalidRelationship(_)
            | Self::MissingAssessments
            | Self::EmptyScores
            | Self::NoSharedCategories => 400,
        }
    }

    /// Underlying failure, when there was one, for the `error` field.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::InvalidInvitation(detail)
            | Self::NoRelationship(detail)
            | Self::InvalidRelationship(detail) => detail.as_deref(),
            Self::Fetch(detail) | Self::Save(detail) => Some(detail.as_str()),
            _ => None,
        }
    }
}

impl From<ComparisonError> for CompatibilityError {
    fn from(error: ComparisonError) -> Self {
        match error {
            ComparisonError::EmptyScores => Self::EmptyScores,
            ComparisonError::NoSharedCategories => Self::NoSharedCategories,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl From<Result<CompatibilityRecord, CompatibilityError>> for ApiResponse {
    fn from(outcome: Result<CompatibilityRecord, CompatibilityError>) -> Self {
        match outcome {
            Ok(record) => Self {
                status: 200,
                body: json!({ "success": true, "compatibilityScore": record }),
            },
            Err(error) => {
                let mut body = json!({ "success": false, "message": error.to_string() });
                if let Some(detail) = error.detail() {
                    body["error"] = Value::String(detail.to_string());
                }
                Self {
                    status: error.status(),
                    body,
                }
            }
        }
    }
}

fn resolve_relationship<S: Store>(
    store: &S,
    request: &CompatibilityRequest,
) -> Result<Relationship, CompatibilityError> {
    if let Some(code) = request.invitation_code.as_deref().filter(|code| !code.is_empty()) {
        let invitation = store
            .invitation_by_code(code)
            .map_err(|error| CompatibilityError::InvalidInvitation(Some(error.to_string())))?
            .ok_or(CompatibilityError::InvalidInvitation(None))?;
        return store
            .latest_active_relationship(&invitation.sender_id)
            .map_err(|error| CompatibilityError::NoRelationship(Some(error.to_string())))?
            .ok_or(CompatibilityError::NoRelationship(None));
    }

    if let Some(id) = request.relationship_id.as_deref().filter(|id| !id.is_empty()) {
        return store
            .relationship(id)
            .map_err(|error| CompatibilityError::InvalidRelationship(Some(error.to_string())))?
            .ok_or(CompatibilityError::InvalidRelationship(None));
    }

    Err(CompatibilityError::MissingTarget)
}

/// Latest assessment of each partner, any type, read on two scoped threads.
fn latest_pair<S: Store>(
    store: &S,
    relationship: &Relationship,
) -> Result<(AssessmentRecord, AssessmentRecord), CompatibilityError> {
    let (first, second) = std::thread::scope(|scope| {
        let first = scope.spawn(|| store.latest_assessment(&relationship.user1_id, None));
        let second = scope.spawn(|| store.latest_assessment(&relationship.user2_id, None));
        (first.join(), second.join())
    });

    let settle = |joined: std::thread::Result<crate::error::Result<Option<AssessmentRecord>>>| {
        joined
            .map_err(|_| CompatibilityError::Fetch("assessment reader panicked".to_string()))?
            .map_err(|error| CompatibilityError::Fetch(error.to_string()))
    };
    let first = settle(first)?;
    let second = settle(second)?;

    match (first, second) {
        (Some(first), Some(second)) => Ok((first, second)),
        _ => Err(CompatibilityError::MissingAssessments),
    }
}

/// Computes and stores the compatibility record for the relationship named
/// by `request`, on behalf of `caller`.
pub fn calculate_compatibility<S: Store>(
    store: &mut S,
    caller: Option<&str>,
    request: &CompatibilityRequest,
    recommendation_threshold: f64,
    now: DateTime<Utc>,
) -> Result<CompatibilityRecord, CompatibilityError> {
    let caller = caller
        .filter(|caller| !caller.is_empty())
        .ok_or(CompatibilityError::Unauthenticated)?;

    let relationship = resolve_relationship(&*store, request)?;
    if !relationship.includes(caller) {
        tracing::warn!(caller, relationship_id = %relationship.id, "caller outside relationship");
        return Err(CompatibilityError::Forbidden);
    }

    let (first, second) = latest_pair(&*store, &relationship)?;
    let comparison = compare(
        &first.category_scores,
        &second.category_scores,
        recommendation_threshold,
    )?;

    let record = CompatibilityRecord {
        relationship_id: relationship.id.clone(),
        category_scores: comparison.category_scores,
        overall_score: comparison.overall,
        overall_percentage: comparison.overall,
        recommendations: comparison.recommendations,
        analysis_date: now,
    };

    let saved = store.upsert_compatibility(record).map_err(|error| {
        tracing::error!(relationship_id = %relationship.id, %error, "failed to save compatibility score");
        CompatibilityError::Save(error.to_string())
    })?;
    tracing::info!(
        relationship_id = %saved.relationship_id,
        overall = saved.overall_percentage,
        "compatibility score saved"
    );
    Ok(saved)
}

pub fn handle<S: Store>(
    store: &mut S,
    caller: Option<&str>,
    request: &CompatibilityRequest,
    recommendation_threshold: f64,
    now: DateTime<Utc>,
) -> ApiResponse {
    calculate_compatibility(store, caller, request, recommendation_threshold, now).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compatibility::invitation::{accept_invitation, create_invitation};
    use crate::compatibility::DEFAULT_RECOMMENDATION_THRESHOLD;
    use crate::store::FileStore;
    use crate::types::assessment::{AssessmentType, CategoryScore};
    use chrono::Duration;
    use tempfile::TempDir;

    fn assessment(user: &str, scores: &[(&str, f64)], minutes_ago: i64) -> AssessmentRecord {
        AssessmentRecord {
            id: String::new(),
            user_id: user.to_string(),
            assessment_type: AssessmentType::HighValueMan,
            category_scores: scores
                .iter()
                .map(|(category, percentage)| CategoryScore {
                    category: category.to_string(),
                    score: 0.0,
                    percentage: *percentage,
                    weight: 1.0,
                })
                .collect(),
            overall_score: 0.0,
            overall_percentage: 0.0,
            badge: None,
            completed_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    struct Fixture {
        _dir: TempDir,
        store: FileStore,
        code: String,
        relationship_id: String,
    }

    fn paired() -> Fixture {
        let dir = TempDir::new().expect("temp dir should be created");
        let mut store = FileStore::open(dir.path().join("db.json")).expect("store should open");
        let now = Utc::now();
        let invitation =
            create_invitation(&mut store, "alice", None, now).expect("invite should succeed");
        let relationship = accept_invitation(&mut store, &invitation.invitation_code, "bob", now)
            .expect("accept should succeed");
        Fixture {
            _dir: dir,
            store,
            code: invitation.invitation_code,
            relationship_id: relationship.id,
        }
    }

    fn by_id(id: &str) -> CompatibilityRequest {
        CompatibilityRequest {
            relationship_id: Some(id.to_string()),
            ..CompatibilityRequest::default()
        }
    }

    fn run(fixture: &mut Fixture, caller: Option<&str>, request: &CompatibilityRequest) -> ApiResponse {
        handle(
            &mut fixture.store,
            caller,
            request,
            DEFAULT_RECOMMENDATION_THRESHOLD,
            Utc::now(),
        )
    }

    #[test]
    fn computes_and_upserts_by_relationship() {
        let mut fixture = paired();
        fixture
            .store
            .insert_assessment(assessment("alice", &[("Mental Traits", 10.0)], 30))
            .expect("insert");
        fixture
            .store
            .insert_assessment(assessment(
                "alice",
                &[("Mental Traits", 80.0), ("Financial Traits", 60.0)],
                1,
            ))
            .expect("insert");
        fixture
            .store
            .insert_assessment(assessment(
                "bob",
                &[("mental traits ", 70.0), ("Financial Traits", 20.0)],
                1,
            ))
            .expect("insert");

        let request = by_id(&fixture.relationship_id);
        let response = run(&mut fixture, Some("bob"), &request);
        assert_eq!(response.status, 200, "{}", response.body);
        assert_eq!(response.body["success"], true);
        let record = &response.body["compatibilityScore"];
        assert_eq!(record["overall_percentage"], 75.0);
        assert_eq!(record["category_scores"][0]["category"], "mental traits");
        assert_eq!(record["category_scores"][0]["match_percentage"], 90.0);
        assert_eq!(record["category_scores"][0]["compatibility_score"], 90.0);
        assert_eq!(record["category_scores"][0]["compatibility_percentage"], 90.0);
        assert_eq!(record["category_scores"][1]["compatibility_score"], 60.0);
        assert_eq!(record["recommendations"][0]["category"], "financial traits");

        let stored = fixture
            .store
            .compatibility(&fixture.relationship_id)
            .expect("read")
            .expect("record should exist");
        assert_eq!(stored.overall_score, 75.0);

        let by_code = CompatibilityRequest {
            invitation_code: Some(fixture.code.clone()),
            ..CompatibilityRequest::default()
        };
        let again = run(&mut fixture, Some("alice"), &by_code);
        assert_eq!(again.status, 200);
    }

    #[test]
    fn rejects_missing_caller_and_target() {
        let mut fixture = paired();
        let request = by_id(&fixture.relationship_id);
        let response = run(&mut fixture, None, &request);
        assert_eq!(response.status, 401);
        assert_eq!(response.body["message"], "Unauthenticated");

        let response = run(&mut fixture, Some("alice"), &CompatibilityRequest::default());
        assert_eq!(response.status, 400);
        assert_eq!(
            response.body["message"],
            "Must provide invitation_code or relationship_id"
        );
        assert_eq!(response.body["success"], false);
        assert!(response.body.get("error").is_none());
    }

    #[test]
    fn unknown_targets_and_outsiders() {
        let mut fixture = paired();
        let response = run(&mut fixture, Some("alice"), &by_id("relationship-999"));
        assert_eq!(response.status, 400);
        assert_eq!(response.body["message"], "Invalid relationship_id");

        let bad_code = CompatibilityRequest {
            invitation_code: Some("ffffffffff".to_string()),
            ..CompatibilityRequest::default()
        };
        let response = run(&mut fixture, Some("alice"), &bad_code);
        assert_eq!(response.status, 400);
        assert_eq!(response.body["message"], "Invalid invitation code");

        let request = by_id(&fixture.relationship_id);
        let response = run(&mut fixture, Some("mallory"), &request);
        assert_eq!(response.status, 403);
        assert_eq!(
            response.body["message"],
            "Forbidden – you are not part of this relationship"
        );
    }

    #[test]
    fn invitation_without_active_relationship_is_not_found() {
        let dir = TempDir::new().expect("temp dir should be created");
        let mut store = FileStore::open(dir.path().join("db.json")).expect("store should open");
        let invitation =
            create_invitation(&mut store, "carol", None, Utc::now()).expect("invite should succeed");
        let request = CompatibilityRequest {
            invitation_code: Some(invitation.invitation_code),
            ..CompatibilityRequest::default()
        };
        let response = handle(
            &mut store,
            Some("carol"),
            &request,
            DEFAULT_RECOMMENDATION_THRESHOLD,
            Utc::now(),
        );
        assert_eq!(response.status, 404);
        assert_eq!(response.body["message"], "No relationship found for invitation");
    }

    #[test]
    fn both_partners_need_usable_assessments() {
        let mut fixture = paired();
        let request = by_id(&fixture.relationship_id);
        fixture
            .store
            .insert_assessment(assessment("alice", &[("Mental Traits", 50.0)], 1))
            .expect("insert");
        let response = run(&mut fixture, Some("alice"), &request);
        assert_eq!(response.status, 400);
        assert_eq!(
            response.body["message"],
            "Both users must have completed assessments"
        );

        fixture
            .store
            .insert_assessment(assessment("bob", &[("Mental Traits", 140.0)], 1))
            .expect("insert");
        let response = run(&mut fixture, Some("alice"), &request);
        assert_eq!(response.body["message"], "Invalid or empty category scores");

        fixture
            .store
            .insert_assessment(assessment("bob", &[("Physical Traits", 40.0)], 0))
            .expect("insert");
        let response = run(&mut fixture, Some("alice"), &request);
        assert_eq!(response.status, 400);
        assert_eq!(response.body["message"], "No matching categories found");
        assert!(fixture
            .store
            .compatibility(&fixture.relationship_id)
            .expect("read")
            .is_none());
    }

    #[test]
    fn statuses_map_to_error_classes() {
        assert_eq!(CompatibilityError::Fetch("x".into()).status(), 500);
        assert_eq!(CompatibilityError::Save("x".into()).status(), 500);
        assert_eq!(CompatibilityError::NoRelationship(None).status(), 404);
        assert_eq!(CompatibilityError::Fetch("disk".into()).detail(), Some("disk"));
        assert_eq!(CompatibilityError::Forbidden.detail(), None);
    }
}
