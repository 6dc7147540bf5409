use crate::types::assessment::AssessmentType;
use crate::types::records::ExternalAssessmentResult;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAverage {
    pub category: String,
    pub average_score: f64,
    pub average_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExternalSummary {
    pub assessment_type: AssessmentType,
    pub count: usize,
    pub average_score: f64,
    pub average_percentage: f64,
    pub category_averages: Vec<CategoryAverage>,
}

/// Averages across a user's external results. The summary takes its type
/// from the first result; categories keep their first-seen order.
pub fn summarize(results: &[ExternalAssessmentResult]) -> Option<ExternalSummary> {
    let first = results.first()?;
    let count = results.len() as f64;

    let mut totals: Vec<(String, f64, f64, usize)> = Vec::new();
    for score in results.iter().flat_map(|result| &result.category_scores) {
        match totals.iter_mut().find(|(name, ..)| *name == score.category) {
            Some((_, total_score, total_percentage, seen)) => {
                *total_score += score.score;
                *total_percentage += score.percentage;
                *seen += 1;
            }
            None => totals.push((score.category.clone(), score.score, score.percentage, 1)),
        }
    }

    Some(ExternalSummary {
        assessment_type: first.assessment_type,
        count: results.len(),
        average_score: results.iter().map(|result| result.overall_score).sum::<f64>() / count,
        average_percentage: results
            .iter()
            .map(|result| result.overall_percentage)
            .sum::<f64>()
            / count,
        category_averages: totals
            .into_iter()
            .map(|(category, total_score, total_percentage, seen)| CategoryAverage {
                category,
                average_score: total_score / seen as f64,
                average_percentage: total_percentage / seen as f64,
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::assessment::CategoryScore;
    use chrono::Utc;

    fn result(overall: f64, scores: &[(&str, f64, f64)]) -> ExternalAssessmentResult {
        ExternalAssessmentResult {
            id: String::new(),
            assessor_id: "friend".to_string(),
            user_id: "u1".to_string(),
            assessment_type: AssessmentType::WifeMaterial,
            category_scores: scores
                .iter()
                .map(|(category, score, percentage)| CategoryScore {
                    category: category.to_string(),
                    score: *score,
                    percentage: *percentage,
                    weight: 1.0,
                })
                .collect(),
            overall_score: overall,
            overall_percentage: overall,
            feedback: None,
            completed_at: Utc::now(),
            category_gap: None,
            delusional_score: None,
        }
    }

    #[test]
    fn empty_results_have_no_summary() {
        assert!(summarize(&[]).is_none());
    }

    #[test]
    fn averages_overall_and_per_category() {
        let summary = summarize(&[
            result(40.0, &[("Mental Traits", 10.0, 40.0), ("Physical Traits", 20.0, 80.0)]),
            result(60.0, &[("Mental Traits", 20.0, 80.0)]),
        ])
        .expect("summary should exist");

        assert_eq!(summary.assessment_type, AssessmentType::WifeMaterial);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.average_score, 50.0);
        assert_eq!(summary.average_percentage, 50.0);
        assert_eq!(summary.category_averages.len(), 2);
        assert_eq!(summary.category_averages[0].category, "Mental Traits");
        assert_eq!(summary.category_averages[0].average_score, 15.0);
        assert_eq!(summary.category_averages[0].average_percentage, 60.0);
        assert_eq!(summary.category_averages[1].average_percentage, 80.0);
    }
}
