use crate::bridal_price::{
    BridalPriceValuator, RegionTable, DEFAULT_BASE_VALUE, DEFAULT_CURRENCY_SYMBOL, DEFAULT_REGION,
};
use crate::compatibility::DEFAULT_RECOMMENDATION_THRESHOLD;
use crate::error::MirrorError;
use crate::scoring::tables::ScoringTables;
use crate::types::assessment::{AssessmentType, Category};
use serde::Deserialize;
use std::collections::BTreeMap;

pub const DEFAULT_STORE_FILE: &str = "lovemirror.json";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MirrorConfig {
    pub store: Option<StoreConfig>,
    /// Assessment type name → category display name → weight.
    pub weights: Option<BTreeMap<String, BTreeMap<String, f64>>>,
    pub bridal_price: Option<BridalPriceConfig>,
    pub compatibility: Option<CompatibilityConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub file: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BridalPriceConfig {
    pub base_value: Option<f64>,
    pub default_region: Option<String>,
    pub currency_symbol: Option<String>,
    pub regions: Option<BTreeMap<String, f64>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompatibilityConfig {
    pub recommendation_threshold: Option<f64>,
}

impl MirrorConfig {
    pub fn deserialize_table(table: toml::Table) -> Result<Self, MirrorError> {
        toml::Value::Table(table)
            .try_into()
            .map_err(|e: toml::de::Error| MirrorError::ConfigParse(e.to_string()))
    }

    pub fn store_file(&self) -> &str {
        self.store
            .as_ref()
            .and_then(|store| store.file.as_deref())
            .unwrap_or(DEFAULT_STORE_FILE)
    }

    /// Built-in tables with any `[weights.*]` overrides applied. Entries that
    /// `validate` would reject are skipped.
    pub fn scoring_tables(&self) -> ScoringTables {
        let mut tables = ScoringTables::default();
        for (type_name, categories) in self.weights.iter().flatten() {
            let Some(assessment_type) = AssessmentType::from_name(type_name) else {
                continue;
            };
            for (category_name, weight) in categories {
                if let Some(category) = Category::from_name(category_name) {
                    tables = tables.with_weight(assessment_type, category, *weight);
                }
            }
        }
        tables
    }

    pub fn bridal_price_valuator(&self) -> BridalPriceValuator {
        let section = self.bridal_price.as_ref();
        let regions = section
            .and_then(|section| section.regions.as_ref())
            .into_iter()
            .flatten()
            .fold(RegionTable::default(), |table, (region, multiplier)| {
                table.with_region(region, *multiplier)
            });

        BridalPriceValuator::new(
            regions,
            section
                .and_then(|section| section.currency_symbol.as_deref())
                .unwrap_or(DEFAULT_CURRENCY_SYMBOL),
            section
                .and_then(|section| section.base_value)
                .unwrap_or(DEFAULT_BASE_VALUE),
            section
                .and_then(|section| section.default_region.as_deref())
                .unwrap_or(DEFAULT_REGION),
        )
    }

    pub fn recommendation_threshold(&self) -> f64 {
        self.compatibility
            .as_ref()
            .and_then(|compatibility| compatibility.recommendation_threshold)
            .unwrap_or(DEFAULT_RECOMMENDATION_THRESHOLD)
    }

    pub fn validate(&self) -> Result<(), MirrorError> {
        if self.store_file().trim().is_empty() {
            return Err(MirrorError::ConfigParse(
                "store.file must not be empty".to_string(),
            ));
        }

        for (type_name, categories) in self.weights.iter().flatten() {
            if AssessmentType::from_name(type_name).is_none() {
                return Err(MirrorError::ConfigParse(format!(
                    "weights contains unknown assessment type: {type_name}"
                )));
            }
            let unknown = categories
                .keys()
                .filter(|name| Category::from_name(name).is_none())
                .cloned()
                .collect::<Vec<_>>();
            if !unknown.is_empty() {
                return Err(MirrorError::ConfigParse(format!(
                    "weights.{type_name} contains unknown categor(ies): {}",
                    unknown.join(", ")
                )));
            }
            if let Some((name, _)) = categories
                .iter()
                .find(|(_, weight)| !(weight.is_finite() && **weight > 0.0))
            {
                return Err(MirrorError::ConfigParse(format!(
                    "weights.{type_name}.\"{name}\" must be greater than 0"
                )));
            }
        }

        if let Some(bridal_price) = &self.bridal_price {
            if let Some(base_value) = bridal_price.base_value {
                if !(base_value.is_finite() && base_value > 0.0) {
                    return Err(MirrorError::ConfigParse(
                        "bridal_price.base_value must be greater than 0".to_string(),
                    ));
                }
            }
            if let Some((region, _)) = bridal_price
                .regions
                .iter()
                .flatten()
                .find(|(_, multiplier)| !(multiplier.is_finite() && **multiplier > 0.0))
            {
                return Err(MirrorError::ConfigParse(format!(
                    "bridal_price.regions.{region} must be greater than 0"
                )));
            }
        }

        if let Some(threshold) = self
            .compatibility
            .as_ref()
            .and_then(|compatibility| compatibility.recommendation_threshold)
        {
            if !(0.0..=100.0).contains(&threshold) {
                return Err(MirrorError::ConfigParse(
                    "compatibility.recommendation_threshold must be between 0 and 100".to_string(),
                ));
            }
        }

        Ok(())
    }
}
