//! Pricing request.

use serde::{Deserialize, Serialize};

/// Input to a single cost calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingRequest {
    pub plan: String,
    /// Selected features, duplicates removed, first occurrence kept
    pub features: Vec<String>,
    pub num_members: i64,
    /// `Some(false)` cancels the request
    #[serde(default)]
    pub confirmed: Option<bool>,
    /// Explicit group discount choice
    #[serde(default)]
    pub apply_group_discount: Option<bool>,
}

impl PricingRequest {
    pub fn new(plan: impl Into<String>, num_members: i64) -> Self {
        Self {
            plan: plan.into(),
            features: Vec::new(),
            num_members,
            confirmed: None,
            apply_group_discount: None,
        }
    }

    /// Add a feature; repeated names are ignored.
    pub fn feature(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.features.contains(&name) {
            self.features.push(name);
        }
        self
    }

    pub fn features<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().fold(self, |req, name| req.feature(name))
    }

    pub fn confirmed(mut self, confirmed: bool) -> Self {
        self.confirmed = Some(confirmed);
        self
    }

    pub fn group_discount(mut self, apply: bool) -> Self {
        self.apply_group_discount = Some(apply);
        self
    }
}
