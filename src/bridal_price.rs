use crate::types::assessment::CategoryScore;
use serde::Serialize;
use std::collections::BTreeMap;

pub const DEFAULT_BASE_VALUE: f64 = 10_000.0;
pub const DEFAULT_REGION: &str = "global";
pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";
const UNKNOWN_REGION_MULTIPLIER: f64 = 1.0;

const DEFAULT_REGIONS: [(&str, f64); 11] = [
    ("africa", 1.2),
    ("west_africa", 1.3),
    ("east_africa", 1.1),
    ("north_africa", 1.0),
    ("southern_africa", 1.15),
    ("asia", 0.9),
    ("europe", 0.8),
    ("north_america", 0.85),
    ("south_america", 0.75),
    ("oceania", 0.7),
    ("global", 1.0),
];

#[derive(Debug, Clone, PartialEq)]
pub struct RegionTable(BTreeMap<String, f64>);

impl Default for RegionTable {
    fn default() -> Self {
        Self(
            DEFAULT_REGIONS
                .iter()
                .map(|(region, multiplier)| (region.to_string(), *multiplier))
                .collect(),
        )
    }
}

impl RegionTable {
    pub fn with_region(mut self, region: &str, multiplier: f64) -> Self {
        self.0.insert(region.to_string(), multiplier);
        self
    }

    pub fn multiplier(&self, region: &str) -> f64 {
        self.0
            .get(region)
            .copied()
            .unwrap_or(UNKNOWN_REGION_MULTIPLIER)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValuationOptions {
    pub base_value: Option<f64>,
    pub region: Option<String>,
    pub partner_income: Option<f64>,
    pub bridal_price_percentage: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryValue {
    pub category: String,
    pub value: f64,
    pub percentage: f64,
    pub formatted_value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BridalPriceResult {
    pub total_price: f64,
    pub formatted_price: String,
    pub category_values: Vec<CategoryValue>,
    pub currency_symbol: String,
    pub region_multiplier: f64,
    pub region: String,
    pub base_value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BridalPriceValuator {
    regions: RegionTable,
    currency_symbol: String,
    default_base_value: f64,
    default_region: String,
}

impl Default for BridalPriceValuator {
    fn default() -> Self {
        Self::new(
            RegionTable::default(),
            DEFAULT_CURRENCY_SYMBOL,
            DEFAULT_BASE_VALUE,
            DEFAULT_REGION,
        )
    }
}

fn is_set(value: Option<f64>) -> Option<f64> {
    value.filter(|amount| *amount != 0.0 && !amount.is_nan())
}

impl BridalPriceValuator {
    pub fn new(
        regions: RegionTable,
        currency_symbol: &str,
        default_base_value: f64,
        default_region: &str,
    ) -> Self {
        Self {
            regions,
            currency_symbol: currency_symbol.to_string(),
            default_base_value,
            default_region: default_region.to_string(),
        }
    }

    /// Splits the base value across categories by weight share, scaled by the
    /// category percentage and the region multiplier.
    ///
    /// With both a partner income and a percentage, the total is replaced by
    /// `income * percentage/100 * weighted_score`; the per-category values are
    /// still the base-value split, so they no longer add up to the total.
    pub fn value(&self, scores: &[CategoryScore], options: &ValuationOptions) -> BridalPriceResult {
        let base_value = options.base_value.unwrap_or(self.default_base_value);
        let region = options
            .region
            .clone()
            .unwrap_or_else(|| self.default_region.clone());
        let region_multiplier = self.regions.multiplier(&region);
        let total_weight: f64 = scores.iter().map(|score| score.weight).sum();

        let category_values = scores
            .iter()
            .map(|score| {
                let share = if total_weight == 0.0 {
                    0.0
                } else {
                    score.weight / total_weight
                };
                let value = base_value * share * (score.percentage / 100.0) * region_multiplier;
                CategoryValue {
                    category: score.category.clone(),
                    value,
                    percentage: score.percentage,
                    formatted_value: format_currency(value, &self.currency_symbol),
                }
            })
            .collect::<Vec<_>>();

        let mut total_price: f64 = category_values.iter().map(|value| value.value).sum();

        if let (Some(income), Some(percentage)) = (
            is_set(options.partner_income),
            is_set(options.bridal_price_percentage),
        ) {
            let weighted: f64 = scores.iter().map(|score| score.percentage * score.weight).sum();
            let max_weighted: f64 = scores.iter().map(|score| 100.0 * score.weight).sum();
            let overall = if max_weighted == 0.0 {
                0.0
            } else {
                weighted / max_weighted
            };
            total_price = income * (percentage / 100.0) * overall;
            tracing::debug!(income, percentage, overall, "income-based bridal price");
        }

        tracing::debug!(region = %region, region_multiplier, total_price, "valued bridal price");

        BridalPriceResult {
            total_price,
            formatted_price: format_currency(total_price, &self.currency_symbol),
            category_values,
            currency_symbol: self.currency_symbol.clone(),
            region_multiplier,
            region,
            base_value,
        }
    }
}

/// Whole-unit currency string: rounded half away from zero, thousands grouped
/// with commas, symbol after any minus sign.
pub fn format_currency(amount: f64, symbol: &str) -> String {
    let rounded = amount.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if negative {
        format!("-{symbol}{grouped}")
    } else {
        format!("{symbol}{grouped}")
    }
}
