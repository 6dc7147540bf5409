use crate::types::assessment::{AssessmentType, Category};
use serde::Serialize;

pub const DEFAULT_CATEGORY_WEIGHT: f64 = 1.0;

/// Per-category multipliers for one assessment type, indexed by [`Category`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryWeights([f64; 6]);

impl CategoryWeights {
    pub const fn new(weights: [f64; 6]) -> Self {
        Self(weights)
    }

    pub fn get(&self, category: Category) -> f64 {
        self.0[category.index()]
    }

    pub fn set(&mut self, category: Category, weight: f64) {
        self.0[category.index()] = weight;
    }

    /// Weight for a stored category name; names outside the fixed six weigh 1.0.
    pub fn for_name(&self, name: &str) -> f64 {
        Category::from_name(name)
            .map(|category| self.get(category))
            .unwrap_or(DEFAULT_CATEGORY_WEIGHT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BadgeThreshold {
    pub min: f64,
    pub badge: &'static str,
}

/// Descending cutoffs; the last entry has `min == 0` so every non-negative
/// percentage matches something.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BadgeTable(&'static [BadgeThreshold]);

impl BadgeTable {
    pub fn badge_for(&self, percentage: f64) -> &'static str {
        self.0
            .iter()
            .find(|threshold| percentage >= threshold.min)
            .or_else(|| self.0.last())
            .map_or("Unrated", |threshold| threshold.badge)
    }

    pub fn thresholds(&self) -> &'static [BadgeThreshold] {
        self.0
    }
}

const HIGH_VALUE_MAN_BADGES: &[BadgeThreshold] = &[
    BadgeThreshold { min: 90.0, badge: "Elite Provider" },
    BadgeThreshold { min: 80.0, badge: "High-Value Leader" },
    BadgeThreshold { min: 70.0, badge: "Balanced Provider" },
    BadgeThreshold { min: 60.0, badge: "Developing Provider" },
    BadgeThreshold { min: 0.0, badge: "Needs Improvement" },
];

const BRIDAL_PRICE_BADGES: &[BadgeThreshold] = &[
    BadgeThreshold { min: 90.0, badge: "Premium Bride" },
    BadgeThreshold { min: 80.0, badge: "High-Value Partner" },
    BadgeThreshold { min: 70.0, badge: "Traditional Value" },
    BadgeThreshold { min: 60.0, badge: "Growing Potential" },
    BadgeThreshold { min: 0.0, badge: "Needs Development" },
];

const WIFE_MATERIAL_BADGES: &[BadgeThreshold] = &[
    BadgeThreshold { min: 90.0, badge: "Exceptional Partner" },
    BadgeThreshold { min: 80.0, badge: "Strong Life Partner" },
    BadgeThreshold { min: 70.0, badge: "Balanced Partner" },
    BadgeThreshold { min: 60.0, badge: "Growing Partner" },
    BadgeThreshold { min: 0.0, badge: "Needs Growth" },
];

// Order: Mental, Emotional, Physical, Financial, Family & Cultural, Conflict.
const HIGH_VALUE_MAN_WEIGHTS: CategoryWeights = CategoryWeights::new([1.3, 1.0, 0.8, 1.5, 1.0, 1.2]);
const BRIDAL_PRICE_WEIGHTS: CategoryWeights = CategoryWeights::new([1.0, 1.2, 1.0, 0.9, 1.5, 1.2]);
const WIFE_MATERIAL_WEIGHTS: CategoryWeights = CategoryWeights::new([1.0, 1.2, 1.5, 0.8, 1.3, 1.2]);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeTables {
    pub weights: CategoryWeights,
    pub badges: BadgeTable,
}

/// Immutable lookup tables for all three assessment types. Built once from the
/// defaults (optionally overridden by config) and passed to the calculator.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringTables {
    high_value_man: TypeTables,
    wife_material: TypeTables,
    bridal_price: TypeTables,
}

impl Default for ScoringTables {
    fn default() -> Self {
        Self {
            high_value_man: TypeTables {
                weights: HIGH_VALUE_MAN_WEIGHTS,
                badges: BadgeTable(HIGH_VALUE_MAN_BADGES),
            },
            wife_material: TypeTables {
                weights: WIFE_MATERIAL_WEIGHTS,
                badges: BadgeTable(WIFE_MATERIAL_BADGES),
            },
            bridal_price: TypeTables {
                weights: BRIDAL_PRICE_WEIGHTS,
                badges: BadgeTable(BRIDAL_PRICE_BADGES),
            },
        }
    }
}

impl ScoringTables {
    pub fn for_type(&self, assessment_type: AssessmentType) -> &TypeTables {
        match assessment_type {
            AssessmentType::HighValueMan => &self.high_value_man,
            AssessmentType::WifeMaterial => &self.wife_material,
            AssessmentType::BridalPrice => &self.bridal_price,
        }
    }

    pub fn with_weight(
        mut self,
        assessment_type: AssessmentType,
        category: Category,
        weight: f64,
    ) -> Self {
        let tables = match assessment_type {
            AssessmentType::HighValueMan => &mut self.high_value_man,
            AssessmentType::WifeMaterial => &mut self.wife_material,
            AssessmentType::BridalPrice => &mut self.bridal_price,
        };
        tables.weights.set(category, weight);
        self
    }
}

pub fn badge_for_score(tables: &ScoringTables, score: f64, assessment_type: AssessmentType) -> &'static str {
    tables.for_type(assessment_type).badges.badge_for(score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_match_published_tables() {
        let tables = ScoringTables::default();
        let hvm = tables.for_type(AssessmentType::HighValueMan).weights;
        assert_eq!(hvm.get(Category::Financial), 1.5);
        assert_eq!(hvm.get(Category::Physical), 0.8);
        let bride = tables.for_type(AssessmentType::BridalPrice).weights;
        assert_eq!(bride.get(Category::FamilyCultural), 1.5);
        let wife = tables.for_type(AssessmentType::WifeMaterial).weights;
        assert_eq!(wife.get(Category::Physical), 1.5);
        assert_eq!(wife.get(Category::Financial), 0.8);
    }

    #[test]
    fn unknown_category_weighs_one() {
        let tables = ScoringTables::default();
        let weights = tables.for_type(AssessmentType::HighValueMan).weights;
        assert_eq!(weights.for_name("Spiritual Traits"), DEFAULT_CATEGORY_WEIGHT);
        assert_eq!(weights.for_name("Mental Traits"), 1.3);
    }

    #[test]
    fn badge_cutoffs_are_inclusive() {
        let tables = ScoringTables::default();
        assert_eq!(badge_for_score(&tables, 90.0, AssessmentType::HighValueMan), "Elite Provider");
        assert_eq!(
            badge_for_score(&tables, 89.99, AssessmentType::HighValueMan),
            "High-Value Leader"
        );
        assert_eq!(badge_for_score(&tables, 0.0, AssessmentType::BridalPrice), "Needs Development");
        assert_eq!(badge_for_score(&tables, 75.0, AssessmentType::WifeMaterial), "Balanced Partner");
    }

    #[test]
    fn badge_selection_is_monotonic() {
        let tables = ScoringTables::default();
        for kind in AssessmentType::ALL {
            let thresholds = tables.for_type(kind).badges.thresholds();
            let rank = |badge: &str| {
                thresholds
                    .iter()
                    .position(|threshold| threshold.badge == badge)
                    .expect("badge should come from the table")
            };
            let mut previous = rank(badge_for_score(&tables, 0.0, kind));
            for step in 1..=1000 {
                let percentage = f64::from(step) / 10.0;
                let current = rank(badge_for_score(&tables, percentage, kind));
                // Lower position means a higher tier.
                assert!(current <= previous, "{kind} badge dropped at {percentage}");
                previous = current;
            }
        }
    }

    #[test]
    fn weight_override_only_touches_one_type() {
        let tables = ScoringTables::default().with_weight(
            AssessmentType::WifeMaterial,
            Category::Mental,
            2.0,
        );
        assert_eq!(
            tables.for_type(AssessmentType::WifeMaterial).weights.get(Category::Mental),
            2.0
        );
        assert_eq!(
            tables.for_type(AssessmentType::BridalPrice).weights.get(Category::Mental),
            1.0
        );
    }
}
