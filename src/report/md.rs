use crate::bridal_price::BridalPriceResult;
use crate::delusional::summary::ExternalSummary;
use crate::submit::{SubmittedAssessment, SubmittedExternal};
use crate::types::assessment::AssessmentResult;
use crate::types::report::{
    AssessorEntry, AssessorList, CategorySuggestion, CompatibilityReport, DelusionalReport,
    QuestionSheet, Report, ScoreReport, StoredCompatibility,
};

pub fn to_markdown(report: &Report) -> String {
    let mut output = String::new();
    match report {
        Report::Questions(sheet) => questions(&mut output, sheet),
        Report::Score(score) => score_report(&mut output, score),
        Report::BridalPrice(result) => bridal_price(&mut output, result),
        Report::Submitted(submitted) => submitted_assessment(&mut output, submitted),
        Report::External(submitted) => external(&mut output, submitted),
        Report::Delusional(report) => delusional(&mut output, report),
        Report::Summary(summary) => external_summary(&mut output, summary),
        Report::Invitation(invitation) => {
            output.push_str("# Partner Invitation\n\n");
            output.push_str(&format!("- code: `{}`\n", invitation.invitation_code));
            output.push_str(&format!("- status: {:?}\n", invitation.status).to_lowercase());
            output.push_str(&format!("- sender: {}\n", invitation.sender_id));
            if let Some(email) = &invitation.email {
                output.push_str(&format!("- email: {email}\n"));
            }
            output.push_str(&format!("- expires: {}\n", invitation.expires_at.to_rfc3339()));
        }
        Report::Relationship(relationship) => {
            output.push_str("# Relationship\n\n");
            output.push_str(&format!("- id: {}\n", relationship.id));
            output.push_str(&format!(
                "- partners: {} & {}\n",
                relationship.user1_id, relationship.user2_id
            ));
            output.push_str(&format!("- status: {:?}\n", relationship.status).to_lowercase());
        }
        Report::Assessor(entry) => {
            output.push_str("# Assessor\n\n");
            assessor_line(&mut output, entry);
        }
        Report::Assessors(list) => assessors(&mut output, list),
        Report::Compatibility(report) => compatibility(&mut output, report),
        Report::StoredCompatibility(stored) => stored_compatibility(&mut output, stored),
    }
    output
}

fn questions(output: &mut String, sheet: &QuestionSheet) {
    output.push_str(&format!("# Questions: {}\n\n", sheet.assessment_type));
    for group in &sheet.groups {
        output.push_str(&format!("## {}\n\n", group.category));
        if let Some(description) = group.description {
            output.push_str(&format!("_{description}_\n\n"));
        }
        for question in &group.questions {
            output.push_str(&format!("- `{}` {}\n", question.id, question.text));
        }
        output.push('\n');
    }

    output.push_str("## Badges\n\n");
    for threshold in sheet.badges {
        output.push_str(&format!("- {}: {}%+\n", threshold.badge, threshold.min));
    }
}

fn assessment_result(output: &mut String, result: &AssessmentResult) {
    output.push_str(&format!(
        "Overall: {:.1}% ({})\n\n",
        result.overall_percentage, result.badge
    ));
    output.push_str("## Category Scores\n\n");
    for score in &result.category_scores {
        output.push_str(&format!(
            "- {}: {:.1}% (score {}, weight {})\n",
            score.category, score.percentage, score.score, score.weight
        ));
    }
    output.push('\n');
}

fn score_report(output: &mut String, report: &ScoreReport) {
    output.push_str(&format!(
        "# Assessment Result: {}\n\n",
        report.result.assessment_type
    ));
    assessment_result(output, &report.result);

    output.push_str("## Focus Areas\n\n");
    if report.suggestions.is_empty() {
        output.push_str("- none\n");
    } else {
        for suggestion in &report.suggestions {
            output.push_str(&format!(
                "- {} ({}): {} [{}]\n",
                suggestion.title, suggestion.category, suggestion.action, suggestion.timeline
            ));
        }
    }
}

fn bridal_price(output: &mut String, result: &BridalPriceResult) {
    output.push_str("# Bridal Price\n\n");
    output.push_str(&format!("Total: {}\n\n", result.formatted_price));
    output.push_str(&format!(
        "Region: {} (x{}), base value {}\n\n",
        result.region, result.region_multiplier, result.base_value
    ));
    output.push_str("## Category Values\n\n");
    for value in &result.category_values {
        output.push_str(&format!(
            "- {}: {} at {:.1}%\n",
            value.category, value.formatted_value, value.percentage
        ));
    }
}

fn submitted_assessment(output: &mut String, submitted: &SubmittedAssessment) {
    output.push_str(&format!(
        "# Saved Assessment {}\n\n",
        submitted.record.id
    ));
    assessment_result(output, &submitted.result);
}

fn external(output: &mut String, submitted: &SubmittedExternal) {
    output.push_str(&format!("# Saved External Assessment {}\n\n", submitted.result.id));
    output.push_str(&format!(
        "{} rated {}: {:.1}%\n\n",
        submitted.result.assessor_id, submitted.result.user_id, submitted.result.overall_percentage
    ));
    match &submitted.delusional {
        Some(score) => output.push_str(&format!(
            "Delusional score: {:.1} ({})\n",
            score.overall_score,
            score.status.as_str()
        )),
        None => output.push_str("Delusional score: not available yet\n"),
    }
}

fn delusional(output: &mut String, report: &DelusionalReport) {
    output.push_str(&format!(
        "# Delusional Score: {} ({})\n\n",
        report.user_id, report.assessment_type
    ));
    output.push_str(&format!(
        "Overall gap: {:.1} ({}) from {} external assessment(s)\n\n",
        report.score.overall_score,
        report.score.status.as_str(),
        report.score.external_assessment_count
    ));
    output.push_str(&format!("{}\n\n", report.overall_feedback));
    output.push_str("## Categories\n\n");
    if report.category_feedback.is_empty() {
        output.push_str("- none\n");
    }
    for feedback in &report.category_feedback {
        output.push_str(&format!(
            "- [{}] {} (gap {:.1}): {}\n",
            feedback.status.as_str(),
            feedback.category,
            feedback.gap,
            feedback.feedback
        ));
    }
}

fn external_summary(output: &mut String, summary: &ExternalSummary) {
    output.push_str(&format!(
        "# External Assessments: {}\n\n",
        summary.assessment_type
    ));
    output.push_str(&format!(
        "{} assessment(s), average {:.1}%\n\n",
        summary.count, summary.average_percentage
    ));
    for category in &summary.category_averages {
        output.push_str(&format!(
            "- {}: {:.1}%\n",
            category.category, category.average_percentage
        ));
    }
}

fn assessor_line(output: &mut String, entry: &AssessorEntry) {
    let assessor = &entry.assessor;
    output.push_str(&format!(
        "- `{}` {} ({}), {}: {:?}, expires {}\n",
        assessor.invitation_code,
        assessor.email,
        assessor.relationship,
        entry.assessment_name,
        assessor.status,
        assessor.expires_at.to_rfc3339()
    ));
}

fn assessors(output: &mut String, list: &AssessorList) {
    output.push_str(&format!("# Assessors: {}\n\n", list.user_id));
    if list.assessors.is_empty() {
        output.push_str("- none\n");
    }
    for entry in &list.assessors {
        assessor_line(output, entry);
    }
}

fn category_lines(output: &mut String, categories: &[CategorySuggestion]) {
    output.push_str("## Categories\n\n");
    for category in categories {
        output.push_str(&format!(
            "- {}: {:.1}%. {}\n",
            category.category, category.match_percentage, category.suggestion
        ));
    }
}

fn stored_compatibility(output: &mut String, stored: &StoredCompatibility) {
    output.push_str(&format!(
        "# Compatibility: {}\n\n",
        stored.record.relationship_id
    ));
    output.push_str(&format!(
        "Overall: {:.1}% ({}), analysed {}\n\n",
        stored.record.overall_percentage,
        stored.badge,
        stored.record.analysis_date.to_rfc3339()
    ));
    category_lines(output, &stored.category_suggestions);
    if !stored.record.recommendations.is_empty() {
        output.push_str("\n## Recommendations\n\n");
        for recommendation in &stored.record.recommendations {
            output.push_str(&format!("- {}\n", recommendation.suggestion));
        }
    }
}

fn compatibility(output: &mut String, report: &CompatibilityReport) {
    output.push_str("# Compatibility\n\n");
    let body = &report.response.body;
    if !report.response.is_success() {
        output.push_str(&format!(
            "Failed ({}): {}\n",
            report.response.status,
            body["message"].as_str().unwrap_or_default()
        ));
        return;
    }

    let overall = body["compatibilityScore"]["overall_percentage"]
        .as_f64()
        .unwrap_or_default();
    output.push_str(&format!(
        "Overall: {:.1}% ({})\n\n",
        overall,
        report.badge.unwrap_or_default()
    ));
    category_lines(output, &report.category_suggestions);

    if let Some(recommendations) = body["compatibilityScore"]["recommendations"].as_array() {
        if !recommendations.is_empty() {
            output.push_str("\n## Recommendations\n\n");
            for recommendation in recommendations {
                output.push_str(&format!(
                    "- {}\n",
                    recommendation["suggestion"].as_str().unwrap_or_default()
                ));
            }
        }
    }
}
