//! Pricing rules: surcharge, discounts, member bounds and rounding.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{PricingError, PricingResult};

/// All rate and threshold constants used by the calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRules {
    /// Allowed member counts
    #[serde(default)]
    pub members: MemberBounds,
    /// Surcharge rate applied when any premium feature is selected
    pub premium_surcharge_rate: Decimal,
    /// Percentage group discount
    pub group_discount: GroupDiscount,
    /// Fixed amount off for a member-count band
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flat_discount: Option<FlatDiscountBand>,
    /// Tiered special offers
    #[serde(default)]
    pub special_offers: Vec<SpecialOffer>,
    /// Final rounding
    #[serde(default)]
    pub rounding: RoundingMode,
    /// Whether a missing confirmation counts as a cancel
    #[serde(default)]
    pub require_confirmation: bool,
}

impl PricingRules {
    pub fn validate(&self) -> PricingResult<()> {
        self.members.validate()?;
        check_rate("premium_surcharge_rate", self.premium_surcharge_rate)?;
        self.group_discount.validate()?;

        if let Some(band) = &self.flat_discount {
            band.validate()?;
        }

        for offer in &self.special_offers {
            offer.validate()?;
        }

        Ok(())
    }
}

fn check_rate(name: &str, rate: Decimal) -> PricingResult<()> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(PricingError::InvalidConfiguration(format!(
            "{} must be between 0 and 1, got {}",
            name, rate
        )));
    }
    Ok(())
}

/// Inclusive bounds on the member count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberBounds {
    #[serde(default = "default_min_members")]
    pub min: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}

fn default_min_members() -> u32 {
    1
}

impl Default for MemberBounds {
    fn default() -> Self {
        Self {
            min: default_min_members(),
            max: None,
        }
    }
}

impl MemberBounds {
    pub fn at_most(max: u32) -> Self {
        Self {
            max: Some(max),
            ..Self::default()
        }
    }

    pub fn contains(&self, count: i64) -> bool {
        count >= i64::from(self.min) && self.max.map_or(true, |max| count <= i64::from(max))
    }

    fn validate(&self) -> PricingResult<()> {
        if self.min < 1 {
            return Err(PricingError::InvalidConfiguration(
                "minimum member count must be at least 1".to_string(),
            ));
        }
        if let Some(max) = self.max {
            if max < self.min {
                return Err(PricingError::InvalidConfiguration(format!(
                    "maximum member count {} is below minimum {}",
                    max, self.min
                )));
            }
        }
        Ok(())
    }
}

/// How the group discount is triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupDiscountTrigger {
    /// Applies at or above the member threshold unless the caller overrides it
    #[default]
    Automatic,
    /// Applies only when the caller asks for it
    OnRequest,
}

/// Percentage discount for groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDiscount {
    pub rate: Decimal,
    #[serde(default = "default_group_min_members")]
    pub min_members: u32,
    #[serde(default)]
    pub trigger: GroupDiscountTrigger,
}

fn default_group_min_members() -> u32 {
    2
}

impl GroupDiscount {
    pub fn automatic(rate: Decimal, min_members: u32) -> Self {
        Self {
            rate,
            min_members,
            trigger: GroupDiscountTrigger::Automatic,
        }
    }

    pub fn on_request(rate: Decimal) -> Self {
        Self {
            rate,
            min_members: default_group_min_members(),
            trigger: GroupDiscountTrigger::OnRequest,
        }
    }

    /// Decide whether the discount applies. An explicit flag wins over the
    /// automatic threshold check.
    pub fn applies(&self, num_members: i64, requested: Option<bool>) -> bool {
        match (self.trigger, requested) {
            (_, Some(flag)) => flag,
            (GroupDiscountTrigger::Automatic, None) => num_members >= i64::from(self.min_members),
            (GroupDiscountTrigger::OnRequest, None) => false,
        }
    }

    fn validate(&self) -> PricingResult<()> {
        check_rate("group_discount.rate", self.rate)
    }
}

/// Fixed amount off when the member count falls inside `[min_members, max_members]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatDiscountBand {
    pub min_members: u32,
    pub max_members: u32,
    pub amount: Decimal,
}

impl FlatDiscountBand {
    pub fn new(min_members: u32, max_members: u32, amount: Decimal) -> Self {
        Self {
            min_members,
            max_members,
            amount,
        }
    }

    pub fn applies(&self, num_members: i64) -> bool {
        num_members >= i64::from(self.min_members) && num_members <= i64::from(self.max_members)
    }

    fn validate(&self) -> PricingResult<()> {
        if self.min_members > self.max_members {
            return Err(PricingError::InvalidConfiguration(format!(
                "flat discount band {}..={} is inverted",
                self.min_members, self.max_members
            )));
        }
        if self.amount < Decimal::ZERO {
            return Err(PricingError::InvalidConfiguration(format!(
                "flat discount amount must not be negative, got {}",
                self.amount
            )));
        }
        Ok(())
    }
}

/// Flat amount off once the running total strictly exceeds `threshold`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialOffer {
    pub threshold: Decimal,
    pub amount: Decimal,
}

impl SpecialOffer {
    pub fn new(threshold: Decimal, amount: Decimal) -> Self {
        Self { threshold, amount }
    }

    /// Pick the offer with the highest threshold strictly below `total`.
    /// At most one offer ever applies, whatever order they were declared in.
    pub fn best_for(offers: &[SpecialOffer], total: Decimal) -> Option<&SpecialOffer> {
        offers
            .iter()
            .filter(|o| total > o.threshold)
            .max_by(|a, b| a.threshold.cmp(&b.threshold))
    }

    fn validate(&self) -> PricingResult<()> {
        if self.threshold < Decimal::ZERO || self.amount < Decimal::ZERO {
            return Err(PricingError::InvalidConfiguration(format!(
                "special offer (> {} → -{}) must not use negative values",
                self.threshold, self.amount
            )));
        }
        Ok(())
    }
}

/// How the final amount becomes an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Add one half and truncate
    #[default]
    HalfUp,
    /// Round up to the next whole unit
    Ceiling,
}

impl RoundingMode {
    /// Round a non-negative amount to a whole number.
    pub fn apply(&self, amount: Decimal) -> Decimal {
        match self {
            RoundingMode::HalfUp => {
                amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            }
            RoundingMode::Ceiling => amount.ceil(),
        }
    }
}
