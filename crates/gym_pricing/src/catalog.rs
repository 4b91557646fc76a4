//! Plan and feature catalogs.
//!
//! Catalogs keep their declaration order so shells can present numbered
//! menus that stay stable across runs.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{PricingError, PricingResult};

/// A membership plan with its price per member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub name: String,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl Plan {
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            price,
            description: String::new(),
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }
}

/// An add-on feature with its price per member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    pub price: Decimal,
    /// Premium features trigger the surcharge.
    #[serde(default)]
    pub premium: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl Feature {
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            price,
            premium: false,
            description: String::new(),
        }
    }

    /// Create a feature tagged as premium.
    pub fn premium(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            premium: true,
            ..Self::new(name, price)
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }
}

/// Ordered mapping from plan name to base price.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanCatalog {
    plans: Vec<Plan>,
}

impl PlanCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_plan(mut self, plan: Plan) -> Self {
        self.plans.push(plan);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Plan> {
        self.plans.iter().find(|p| p.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn price(&self, name: &str) -> Option<Decimal> {
        self.get(name).map(|p| p.price)
    }

    /// Look up a plan by its 1-based menu position.
    pub fn by_position(&self, position: usize) -> Option<&Plan> {
        position.checked_sub(1).and_then(|i| self.plans.get(i))
    }

    pub fn names(&self) -> Vec<&str> {
        self.plans.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Plan> {
        self.plans.iter()
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    /// Check for an empty catalog, duplicate names and non-positive prices.
    pub fn validate(&self) -> PricingResult<()> {
        if self.plans.is_empty() {
            return Err(PricingError::InvalidConfiguration(
                "plan catalog is empty".to_string(),
            ));
        }

        check_unique("plan", self.plans.iter().map(|p| p.name.as_str()))?;

        for plan in &self.plans {
            if plan.price <= Decimal::ZERO {
                return Err(PricingError::InvalidConfiguration(format!(
                    "plan '{}' must have a positive price, got {}",
                    plan.name, plan.price
                )));
            }
        }

        Ok(())
    }
}

/// Ordered mapping from feature name to add-on price.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureCatalog {
    features: Vec<Feature>,
}

impl FeatureCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features.push(feature);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn price(&self, name: &str) -> Option<Decimal> {
        self.get(name).map(|f| f.price)
    }

    pub fn is_premium(&self, name: &str) -> bool {
        self.get(name).map_or(false, |f| f.premium)
    }

    /// Names of the features tagged premium, in catalog order.
    pub fn premium_names(&self) -> Vec<&str> {
        self.features
            .iter()
            .filter(|f| f.premium)
            .map(|f| f.name.as_str())
            .collect()
    }

    /// Look up a feature by its 1-based menu position.
    pub fn by_position(&self, position: usize) -> Option<&Feature> {
        position.checked_sub(1).and_then(|i| self.features.get(i))
    }

    pub fn names(&self) -> Vec<&str> {
        self.features.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Check for duplicate names and negative prices. An empty feature
    /// catalog is allowed.
    pub fn validate(&self) -> PricingResult<()> {
        check_unique("feature", self.features.iter().map(|f| f.name.as_str()))?;

        for feature in &self.features {
            if feature.price < Decimal::ZERO {
                return Err(PricingError::InvalidConfiguration(format!(
                    "feature '{}' must not have a negative price, got {}",
                    feature.name, feature.price
                )));
            }
        }

        Ok(())
    }
}

fn check_unique<'a>(kind: &str, names: impl Iterator<Item = &'a str>) -> PricingResult<()> {
    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            return Err(PricingError::InvalidConfiguration(format!(
                "{} name must not be empty",
                kind
            )));
        }
        if !seen.insert(name) {
            return Err(PricingError::InvalidConfiguration(format!(
                "duplicate {} '{}'",
                kind, name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn features() -> FeatureCatalog {
        FeatureCatalog::new()
            .with_feature(Feature::new("personal_training", dec!(35)))
            .with_feature(Feature::premium("specialized_training", dec!(50)))
    }

    #[test]
    fn test_plan_lookup() {
        let plans = PlanCatalog::new()
            .with_plan(Plan::new("basic", dec!(50)))
            .with_plan(Plan::new("family", dec!(150)));

        assert_eq!(plans.price("family"), Some(dec!(150)));
        assert!(!plans.contains("gold"));
        assert_eq!(plans.by_position(1).map(|p| p.name.as_str()), Some("basic"));
        assert!(plans.by_position(0).is_none());
        assert!(plans.by_position(3).is_none());
        assert_eq!(plans.names(), vec!["basic", "family"]);
    }

    #[test]
    fn test_premium_tagging() {
        let features = features();
        assert!(features.is_premium("specialized_training"));
        assert!(!features.is_premium("personal_training"));
        assert!(!features.is_premium("unknown"));
        assert_eq!(features.premium_names(), vec!["specialized_training"]);
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let plans = PlanCatalog::new()
            .with_plan(Plan::new("basic", dec!(50)))
            .with_plan(Plan::new("basic", dec!(60)));
        assert!(plans.validate().is_err());

        let features = features().with_feature(Feature::new("personal_training", dec!(1)));
        assert!(features.validate().is_err());
    }

    #[test]
    fn test_validate_prices() {
        let free_plan = PlanCatalog::new().with_plan(Plan::new("free", Decimal::ZERO));
        assert!(free_plan.validate().is_err());

        let free_feature = FeatureCatalog::new().with_feature(Feature::new("locker", Decimal::ZERO));
        assert!(free_feature.validate().is_ok());

        assert!(PlanCatalog::new().validate().is_err());
        assert!(FeatureCatalog::new().validate().is_ok());
    }
}
