pub mod suggestions;
pub mod tables;

use crate::types::assessment::{AssessmentResult, AssessmentType, CategoryScore, Response};
use tables::ScoringTables;

pub const LIKERT_MAX: f64 = 5.0;
const LOWEST_CATEGORY_COUNT: usize = 2;

struct CategoryTally {
    category: String,
    total: f64,
    answered: usize,
}

/// Group responses by category, keeping the order in which categories first
/// appear.
fn tally_by_category(responses: &[Response]) -> Vec<CategoryTally> {
    let mut tallies: Vec<CategoryTally> = Vec::new();
    for response in responses {
        let contribution = f64::from(response.score) * response.weight;
        match tallies
            .iter_mut()
            .find(|tally| tally.category == response.category)
        {
            Some(tally) => {
                tally.total += contribution;
                tally.answered += 1;
            }
            None => tallies.push(CategoryTally {
                category: response.category.clone(),
                total: contribution,
                answered: 1,
            }),
        }
    }
    tallies
}

fn ratio_percentage(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator * 100.0
    }
}

pub fn calculate_scores(
    tables: &ScoringTables,
    responses: &[Response],
    assessment_type: AssessmentType,
) -> AssessmentResult {
    let type_tables = tables.for_type(assessment_type);
    let tallies = tally_by_category(responses);

    let mut total_weighted = 0.0;
    let mut total_max_weighted = 0.0;
    let category_scores = tallies
        .iter()
        .map(|tally| {
            let max_possible = tally.answered as f64 * LIKERT_MAX;
            let weight = type_tables.weights.for_name(&tally.category);
            total_weighted += tally.total * weight;
            total_max_weighted += max_possible * weight;
            CategoryScore {
                category: tally.category.clone(),
                score: tally.total,
                percentage: ratio_percentage(tally.total, max_possible),
                weight,
            }
        })
        .collect::<Vec<_>>();

    let overall_percentage = ratio_percentage(total_weighted, total_max_weighted);
    let badge = tables::badge_for_score(tables, overall_percentage, assessment_type).to_string();
    let lowest_categories = lowest_categories(&category_scores, LOWEST_CATEGORY_COUNT);

    tracing::debug!(
        assessment_type = %assessment_type,
        categories = category_scores.len(),
        overall_percentage,
        badge = %badge,
        "scored assessment"
    );

    AssessmentResult {
        category_scores,
        overall_score: total_weighted,
        overall_percentage,
        lowest_categories,
        assessment_type,
        badge,
    }
}

/// The `count` weakest categories. The sort is stable, so ties keep their
/// input category order.
pub fn lowest_categories(scores: &[CategoryScore], count: usize) -> Vec<CategoryScore> {
    let mut sorted = scores.to_vec();
    sorted.sort_by(|a, b| a.percentage.total_cmp(&b.percentage));
    sorted.truncate(count);
    sorted
}
