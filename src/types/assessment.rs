use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three questionnaire variants. Every lookup table is keyed by this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum AssessmentType {
    HighValueMan,
    WifeMaterial,
    BridalPrice,
}

impl AssessmentType {
    pub const ALL: [AssessmentType; 3] = [
        AssessmentType::HighValueMan,
        AssessmentType::WifeMaterial,
        AssessmentType::BridalPrice,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::HighValueMan => "high-value-man",
            Self::WifeMaterial => "wife-material",
            Self::BridalPrice => "bridal-price",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl fmt::Display for AssessmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The six fixed trait groupings. Persisted scores carry the display name as
/// a plain string, so lookups go through [`Category::from_name`] and tolerate
/// names outside this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Mental,
    Emotional,
    Physical,
    Financial,
    FamilyCultural,
    ConflictResolution,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Mental,
        Category::Emotional,
        Category::Physical,
        Category::Financial,
        Category::FamilyCultural,
        Category::ConflictResolution,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Mental => "Mental Traits",
            Self::Emotional => "Emotional Traits",
            Self::Physical => "Physical Traits",
            Self::Financial => "Financial Traits",
            Self::FamilyCultural => "Family & Cultural Compatibility",
            Self::ConflictResolution => "Conflict Resolution Style",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Mental => "How you think and process information",
            Self::Emotional => "How you manage and express feelings",
            Self::Physical => "How you maintain your appearance and health",
            Self::Financial => "How you handle money and resources",
            Self::FamilyCultural => "How you navigate family dynamics",
            Self::ConflictResolution => "How you handle disagreements",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.name() == name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn default_weight() -> f64 {
    1.0
}

/// One answered question. `score` is a Likert value in 1..=5.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub question_id: String,
    pub category: String,
    pub score: u8,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: String,
    #[serde(default)]
    pub score: f64,
    pub percentage: f64,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
    pub category_scores: Vec<CategoryScore>,
    pub overall_score: f64,
    pub overall_percentage: f64,
    pub lowest_categories: Vec<CategoryScore>,
    pub assessment_type: AssessmentType,
    pub badge: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub gender: Gender,
    pub region: Option<String>,
    pub cultural_context: Option<String>,
}

/// Picks the questionnaire a profile may take. A requested type is honoured
/// only when it matches the profile's gender.
pub fn resolve_assessment_type(
    profile: &Profile,
    requested: Option<AssessmentType>,
) -> Option<AssessmentType> {
    if let Some(requested) = requested {
        return match (requested, profile.gender) {
            (AssessmentType::HighValueMan, Gender::Male) => Some(requested),
            (AssessmentType::WifeMaterial | AssessmentType::BridalPrice, Gender::Female) => {
                Some(requested)
            }
            _ => None,
        };
    }

    match profile.gender {
        Gender::Male => Some(AssessmentType::HighValueMan),
        Gender::Female => {
            let african = profile.region.as_deref() == Some("africa")
                && profile.cultural_context.as_deref() == Some("african");
            if african {
                Some(AssessmentType::BridalPrice)
            } else {
                Some(AssessmentType::WifeMaterial)
            }
        }
        Gender::Other => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(gender: Gender, region: Option<&str>, context: Option<&str>) -> Profile {
        Profile {
            gender,
            region: region.map(str::to_string),
            cultural_context: context.map(str::to_string),
        }
    }

    #[test]
    fn assessment_type_serializes_kebab_case() {
        let json = serde_json::to_string(&AssessmentType::HighValueMan).expect("serialize");
        assert_eq!(json, "\"high-value-man\"");
        let parsed: AssessmentType = serde_json::from_str("\"bridal-price\"").expect("parse");
        assert_eq!(parsed, AssessmentType::BridalPrice);
        assert_eq!(
            AssessmentType::from_name("wife-material"),
            Some(AssessmentType::WifeMaterial)
        );
    }

    #[test]
    fn category_lookup_round_trips_names() {
        for category in Category::ALL {
            assert_eq!(Category::from_name(category.name()), Some(category));
        }
        assert_eq!(Category::from_name("mental traits"), None);
    }

    #[test]
    fn response_weight_defaults_to_one() {
        let response: Response = serde_json::from_str(
            r#"{"questionId":"q1","category":"Mental Traits","score":4}"#,
        )
        .expect("response should parse");
        assert_eq!(response.weight, 1.0);
    }

    #[test]
    fn category_score_tolerates_missing_score_and_weight() {
        let score: CategoryScore =
            serde_json::from_str(r#"{"category":"Mental Traits","percentage":55.0}"#)
                .expect("category score should parse");
        assert_eq!(score.score, 0.0);
        assert_eq!(score.weight, 1.0);
    }

    #[test]
    fn defaults_follow_gender_and_region() {
        assert_eq!(
            resolve_assessment_type(&profile(Gender::Male, None, None), None),
            Some(AssessmentType::HighValueMan)
        );
        assert_eq!(
            resolve_assessment_type(&profile(Gender::Female, Some("europe"), None), None),
            Some(AssessmentType::WifeMaterial)
        );
        assert_eq!(
            resolve_assessment_type(
                &profile(Gender::Female, Some("africa"), Some("african")),
                None
            ),
            Some(AssessmentType::BridalPrice)
        );
        assert_eq!(
            resolve_assessment_type(&profile(Gender::Other, None, None), None),
            None
        );
    }

    #[test]
    fn requested_type_must_match_gender() {
        let male = profile(Gender::Male, None, None);
        let female = profile(Gender::Female, None, None);
        assert_eq!(
            resolve_assessment_type(&male, Some(AssessmentType::WifeMaterial)),
            None
        );
        assert_eq!(
            resolve_assessment_type(&female, Some(AssessmentType::BridalPrice)),
            Some(AssessmentType::BridalPrice)
        );
        assert_eq!(
            resolve_assessment_type(&female, Some(AssessmentType::HighValueMan)),
            None
        );
    }
}
