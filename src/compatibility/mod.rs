pub mod handler;
pub mod invitation;
pub mod relationship;

use crate::types::assessment::{Category, CategoryScore};
use crate::types::records::{CategoryCompatibility, Recommendation};

pub const DEFAULT_RECOMMENDATION_THRESHOLD: f64 = 70.0;

const BADGES: [(f64, &str); 7] = [
    (90.0, "Perfect Match"),
    (80.0, "Highly Compatible"),
    (70.0, "Good Match"),
    (60.0, "Compatible"),
    (50.0, "Moderate Compatibility"),
    (40.0, "Some Challenges"),
    (30.0, "Significant Differences"),
];
const LOWEST_BADGE: &str = "Major Incompatibilities";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonError {
    /// One side had no category with a finite percentage in 0..=100.
    EmptyScores,
    NoSharedCategories,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub category_scores: Vec<CategoryCompatibility>,
    pub overall: f64,
    pub recommendations: Vec<Recommendation>,
}

pub fn normalize_category(name: &str) -> String {
    name.trim().to_lowercase()
}

fn usable_scores(scores: &[CategoryScore]) -> Vec<(String, f64)> {
    scores
        .iter()
        .filter(|score| score.percentage.is_finite() && (0.0..=100.0).contains(&score.percentage))
        .map(|score| (normalize_category(&score.category), score.percentage))
        .collect()
}

/// Per-category agreement between two partners' latest scores. Categories are
/// matched on normalized names; only those both partners have are compared,
/// in user1's order and then user2's.
pub fn compare(
    user1: &[CategoryScore],
    user2: &[CategoryScore],
    recommendation_threshold: f64,
) -> Result<Comparison, ComparisonError> {
    let first = usable_scores(user1);
    let second = usable_scores(user2);
    if first.is_empty() || second.is_empty() {
        return Err(ComparisonError::EmptyScores);
    }

    let mut categories: Vec<&str> = Vec::new();
    for (name, _) in first.iter().chain(&second) {
        if !categories.contains(&name.as_str()) {
            categories.push(name.as_str());
        }
    }

    let category_scores = categories
        .into_iter()
        .filter_map(|category| {
            let (_, a) = first.iter().find(|(name, _)| name == category)?;
            let (_, b) = second.iter().find(|(name, _)| name == category)?;
            Some(CategoryCompatibility::new(category, *a, *b))
        })
        .collect::<Vec<_>>();

    if category_scores.is_empty() {
        return Err(ComparisonError::NoSharedCategories);
    }

    let overall = category_scores
        .iter()
        .map(|score| score.compatibility_percentage)
        .sum::<f64>()
        / category_scores.len() as f64;

    let recommendations = category_scores
        .iter()
        .filter(|score| score.compatibility_percentage < recommendation_threshold)
        .map(|score| Recommendation {
            category: score.category.clone(),
            suggestion: format!(
                "Your views differ the most in {}. Try the guided exercise in that module together.",
                score.category
            ),
        })
        .collect();

    tracing::debug!(
        compared = category_scores.len(),
        overall,
        "compared category scores"
    );

    Ok(Comparison {
        category_scores,
        overall,
        recommendations,
    })
}

pub fn compatibility_badge(percentage: f64) -> &'static str {
    BADGES
        .iter()
        .find(|(min, _)| percentage >= *min)
        .map_or(LOWEST_BADGE, |(_, badge)| *badge)
}

/// Advice for one compared category. Accepts display or normalized names.
pub fn category_suggestion(category: &str, score: f64) -> &'static str {
    let known = Category::ALL
        .into_iter()
        .find(|known| known.name().eq_ignore_ascii_case(category.trim()));
    let [high, medium, low] = match known {
        Some(Category::Mental) => [
            "You both have similar thought processes and intellectual approaches.",
            "Your thinking styles differ somewhat. Focus on understanding each other's perspectives.",
            "Your mental approaches differ significantly. Consider working on communication techniques.",
        ],
        Some(Category::Emotional) => [
            "You're emotionally in sync and likely understand each other's feelings well.",
            "You have some emotional differences. Practice active listening and validation.",
            "Your emotional styles differ greatly. Consider learning about emotional intelligence together.",
        ],
        Some(Category::Physical) => [
            "You have similar physical priorities and expectations.",
            "Your physical preferences have some differences. Open communication is important.",
            "Your physical expectations differ significantly. Have honest conversations about needs.",
        ],
        Some(Category::Financial) => [
            "You share similar financial values and approaches to money.",
            "Your financial styles have some differences. Consider creating shared financial goals.",
            "Your approaches to finances differ greatly. Consider financial counseling.",
        ],
        Some(Category::FamilyCultural) => [
            "You share similar family values and cultural expectations.",
            "Your family and cultural backgrounds have some differences. Respect and learn from each other.",
            "Your family and cultural approaches differ significantly. Work on building bridges between traditions.",
        ],
        Some(Category::ConflictResolution) => [
            "You resolve conflicts in similar ways, which minimizes friction.",
            "Your conflict styles have some differences. Learn each other's needs during disagreements.",
            "Your approaches to conflict differ greatly. Consider learning conflict resolution techniques.",
        ],
        None => [
            "You are highly compatible in this area.",
            "You have moderate compatibility in this area.",
            "You have significant differences in this area.",
        ],
    };

    if score >= 75.0 {
        high
    } else if score >= 50.0 {
        medium
    } else {
        low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(category: &str, percentage: f64) -> CategoryScore {
        CategoryScore {
            category: category.to_string(),
            score: 0.0,
            percentage,
            weight: 1.0,
        }
    }

    #[test]
    fn identical_percentages_match_fully() {
        let comparison = compare(
            &[score("Mental Traits", 64.0), score("Financial Traits", 12.5)],
            &[score("Mental Traits", 64.0), score("Financial Traits", 12.5)],
            DEFAULT_RECOMMENDATION_THRESHOLD,
        )
        .expect("comparison should succeed");
        assert!(comparison
            .category_scores
            .iter()
            .all(|category| category.match_percentage == 100.0));
        assert_eq!(comparison.overall, 100.0);
        assert!(comparison.recommendations.is_empty());
    }

    #[test]
    fn names_are_normalized_and_only_shared_categories_compared() {
        let comparison = compare(
            &[score("  Mental Traits ", 80.0), score("Physical Traits", 50.0)],
            &[score("mental traits", 50.0), score("Emotional Traits", 90.0)],
            DEFAULT_RECOMMENDATION_THRESHOLD,
        )
        .expect("comparison should succeed");

        assert_eq!(comparison.category_scores.len(), 1);
        let mental = &comparison.category_scores[0];
        assert_eq!(mental.category, "mental traits");
        assert_eq!(mental.user1_score, 80.0);
        assert_eq!(mental.user2_score, 50.0);
        assert_eq!(mental.match_percentage, 70.0);
        assert_eq!(comparison.overall, 70.0);
        // 70 is not below the threshold.
        assert!(comparison.recommendations.is_empty());
    }

    #[test]
    fn categories_below_threshold_get_recommendations() {
        let comparison = compare(
            &[score("Mental Traits", 90.0), score("Financial Traits", 100.0)],
            &[score("Mental Traits", 30.0), score("Financial Traits", 95.0)],
            DEFAULT_RECOMMENDATION_THRESHOLD,
        )
        .expect("comparison should succeed");

        assert_eq!(comparison.category_scores[0].match_percentage, 40.0);
        assert_eq!(comparison.overall, 67.5);
        assert_eq!(comparison.recommendations.len(), 1);
        assert_eq!(
            comparison.recommendations[0].suggestion,
            "Your views differ the most in mental traits. Try the guided exercise in that module together."
        );
    }

    #[test]
    fn order_is_user1_then_user2() {
        let comparison = compare(
            &[score("B", 10.0), score("A", 10.0)],
            &[score("C", 10.0), score("A", 10.0), score("B", 10.0)],
            DEFAULT_RECOMMENDATION_THRESHOLD,
        )
        .expect("comparison should succeed");
        let order = comparison
            .category_scores
            .iter()
            .map(|category| category.category.as_str())
            .collect::<Vec<_>>();
        assert_eq!(order, ["b", "a"]);
    }

    #[test]
    fn invalid_percentages_are_dropped() {
        let result = compare(
            &[score("Mental Traits", f64::NAN), score("Physical Traits", 120.0)],
            &[score("Mental Traits", 50.0)],
            DEFAULT_RECOMMENDATION_THRESHOLD,
        );
        assert_eq!(result, Err(ComparisonError::EmptyScores));

        let result = compare(
            &[score("Mental Traits", -1.0), score("Physical Traits", 40.0)],
            &[score("Mental Traits", 50.0)],
            DEFAULT_RECOMMENDATION_THRESHOLD,
        );
        assert_eq!(result, Err(ComparisonError::NoSharedCategories));
    }

    #[test]
    fn badge_cutoffs_are_inclusive() {
        assert_eq!(compatibility_badge(100.0), "Perfect Match");
        assert_eq!(compatibility_badge(90.0), "Perfect Match");
        assert_eq!(compatibility_badge(89.9), "Highly Compatible");
        assert_eq!(compatibility_badge(70.0), "Good Match");
        assert_eq!(compatibility_badge(30.0), "Significant Differences");
        assert_eq!(compatibility_badge(29.9), "Major Incompatibilities");
    }

    #[test]
    fn suggestions_bucket_by_score() {
        assert_eq!(
            category_suggestion("financial traits", 75.0),
            "You share similar financial values and approaches to money."
        );
        assert_eq!(
            category_suggestion("Financial Traits", 74.9),
            "Your financial styles have some differences. Consider creating shared financial goals."
        );
        assert_eq!(
            category_suggestion("Spirituality", 10.0),
            "You have significant differences in this area."
        );
    }
}
