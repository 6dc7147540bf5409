use crate::types::assessment::{Category, CategoryScore};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub category: &'static str,
    pub title: &'static str,
    pub action: &'static str,
    pub timeline: &'static str,
}

const fn suggestion(
    category: &'static str,
    title: &'static str,
    action: &'static str,
    timeline: &'static str,
) -> Suggestion {
    Suggestion {
        category,
        title,
        action,
        timeline,
    }
}

fn for_category(category: Category) -> [Suggestion; 2] {
    let name = category.name();
    match category {
        Category::Mental => [
            suggestion(name, "Improve self-reflection", "Journal daily about your thoughts and reactions", "30 days"),
            suggestion(name, "Enhance listening skills", "Practice active listening without interrupting", "21 days"),
        ],
        Category::Emotional => [
            suggestion(name, "Build emotional awareness", "Name your emotions when they arise", "14 days"),
            suggestion(
                name,
                "Express appreciation daily",
                "Share one thing you appreciate about your partner each day",
                "30 days",
            ),
        ],
        Category::Physical => [
            suggestion(name, "Establish a fitness routine", "Exercise for 30 minutes 3 times per week", "60 days"),
            suggestion(name, "Enhance personal grooming", "Update your grooming routine", "14 days"),
        ],
        Category::Financial => [
            suggestion(name, "Create a budget", "Track all expenses for a month", "30 days"),
            suggestion(
                name,
                "Build financial transparency",
                "Have weekly money discussions with your partner",
                "60 days",
            ),
        ],
        Category::FamilyCultural => [
            suggestion(
                name,
                "Understand partner family values",
                "Have a conversation about family traditions",
                "30 days",
            ),
            suggestion(
                name,
                "Set healthy boundaries",
                "Establish clear family boundaries with your partner",
                "60 days",
            ),
        ],
        Category::ConflictResolution => [
            suggestion(name, "Practice de-escalation", "Use \"I\" statements during disagreements", "30 days"),
            suggestion(
                name,
                "Learn conflict resolution skills",
                "Read a book on healthy conflict resolution",
                "45 days",
            ),
        ],
    }
}

/// Improvement steps for the weakest categories. Unknown categories have none.
pub fn improvement_suggestions(lowest: &[CategoryScore]) -> Vec<Suggestion> {
    lowest
        .iter()
        .filter_map(|score| Category::from_name(&score.category))
        .flat_map(for_category)
        .collect()
}
