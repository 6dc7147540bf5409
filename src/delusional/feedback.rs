use super::classify;
use crate::types::assessment::Category;
use crate::types::records::{CategoryGap, PerceptionStatus};

fn perception(self_score: f64, external_score: f64) -> &'static str {
    if self_score > external_score {
        "higher than"
    } else {
        "lower than"
    }
}

/// Canned feedback for one category gap, bucketed with the status thresholds.
pub fn category_feedback(gap: &CategoryGap) -> String {
    let status = classify(gap.gap);
    let direction = perception(gap.self_score, gap.external_score);

    let Some(category) = Category::from_name(&gap.category) else {
        return match status {
            PerceptionStatus::SelfAware => {
                "Your self-perception in this area matches how others see you.".to_string()
            }
            PerceptionStatus::BlindSpot => "There's a moderate gap between your self-perception and others' perception in this area.".to_string(),
            PerceptionStatus::Delusional => "There's a significant gap between how you see yourself and how others perceive you in this area.".to_string(),
        };
    };

    match (category, status) {
        (Category::Mental, PerceptionStatus::SelfAware) => {
            "You have a clear understanding of your mental traits.".to_string()
        }
        (Category::Mental, PerceptionStatus::BlindSpot) => format!(
            "You rate yourself {direction} others see your mental flexibility and accountability."
        ),
        (Category::Mental, PerceptionStatus::Delusional) => "There's a significant gap between how you view your mental traits and how others perceive them. Consider seeking specific feedback in this area.".to_string(),

        (Category::Emotional, PerceptionStatus::SelfAware) => {
            "Your emotional self-awareness matches how others see you.".to_string()
        }
        (Category::Emotional, PerceptionStatus::BlindSpot) => format!(
            "You assess your emotional intelligence {direction} others experience it. Consider reflecting on your emotional expressions."
        ),
        (Category::Emotional, PerceptionStatus::Delusional) => "There's a major disconnect between your perception of your emotional traits and how others experience them. This is an important area for growth.".to_string(),

        (Category::Physical, PerceptionStatus::SelfAware) => {
            "Your physical self-perception aligns with external perceptions.".to_string()
        }
        (Category::Physical, PerceptionStatus::BlindSpot) => format!(
            "You view your physical presentation {direction} others observe it. Consider how your appearance and presence comes across to others."
        ),
        (Category::Physical, PerceptionStatus::Delusional) => "There's a significant mismatch between how you see your physical traits and how others perceive them. This could be affecting your relationships.".to_string(),

        (Category::Financial, PerceptionStatus::SelfAware) => {
            "Your financial self-assessment matches external perception.".to_string()
        }
        (Category::Financial, PerceptionStatus::BlindSpot) => format!(
            "You rate your financial habits {direction} others perceive them. Consider if you're being realistic about your financial discipline."
        ),
        (Category::Financial, PerceptionStatus::Delusional) => "There's a major disconnect between how you view your financial traits and how others see them. This area might need serious recalibration.".to_string(),

        (Category::FamilyCultural, PerceptionStatus::SelfAware) => {
            "Your assessment of your cultural adaptability matches others' perceptions.".to_string()
        }
        (Category::FamilyCultural, PerceptionStatus::BlindSpot) => format!(
            "You rate your family and cultural compatibility {direction} others see it. Consider how your actions may be interpreted differently."
        ),
        (Category::FamilyCultural, PerceptionStatus::Delusional) => "There's a significant gap between how you view your cultural adaptability and how others experience it. This could be causing relationship friction.".to_string(),

        (Category::ConflictResolution, PerceptionStatus::SelfAware) => {
            "Your conflict resolution self-assessment aligns with how others see you.".to_string()
        }
        (Category::ConflictResolution, PerceptionStatus::BlindSpot) => format!(
            "You perceive your conflict resolution abilities {direction} others experience them. Reflect on how you handle disagreements."
        ),
        (Category::ConflictResolution, PerceptionStatus::Delusional) => "There's a major disconnect between how you view your conflict resolution style and how others experience it. This is a critical area for improvement.".to_string(),
    }
}

pub fn overall_feedback(score: f64) -> &'static str {
    match classify(score) {
        PerceptionStatus::SelfAware => "You have exceptional self-awareness! Your perception of yourself closely aligns with how others see you, which is a strong foundation for personal growth and authentic relationships.",
        PerceptionStatus::BlindSpot => "You have some blind spots in how you see yourself compared to how others perceive you. This is normal, and being aware of these gaps is the first step toward greater self-awareness.",
        PerceptionStatus::Delusional => "There are significant differences between your self-perception and how others see you. This disconnect could be affecting your relationships and personal growth. Consider open conversations with trusted friends for honest feedback.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gap(category: &str, self_score: f64, external_score: f64) -> CategoryGap {
        let gap = (self_score - external_score).abs();
        CategoryGap {
            category: category.to_string(),
            self_score,
            external_score,
            gap,
            status: classify(gap),
        }
    }

    #[test]
    fn direction_follows_sign_of_self_minus_external() {
        let over = category_feedback(&gap("Mental Traits", 80.0, 60.0));
        assert!(over.contains("higher than"), "{over}");
        let under = category_feedback(&gap("Mental Traits", 60.0, 80.0));
        assert!(under.contains("lower than"), "{under}");
    }

    #[test]
    fn bucket_matches_status_thresholds() {
        assert_eq!(
            category_feedback(&gap("Financial Traits", 60.0, 50.0)),
            "Your financial self-assessment matches external perception."
        );
        assert!(category_feedback(&gap("Financial Traits", 80.0, 50.0)).starts_with("There's a major disconnect"));
    }

    #[test]
    fn unknown_category_gets_generic_text() {
        assert_eq!(
            category_feedback(&gap("Spiritual Traits", 70.0, 50.0)),
            "There's a moderate gap between your self-perception and others' perception in this area."
        );
    }

    #[test]
    fn overall_feedback_by_bucket() {
        assert!(overall_feedback(10.0).starts_with("You have exceptional self-awareness"));
        assert!(overall_feedback(10.5).starts_with("You have some blind spots"));
        assert!(overall_feedback(40.0).starts_with("There are significant differences"));
    }
}
