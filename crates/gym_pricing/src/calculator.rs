//! Cost calculation.
//!
//! The calculator runs a fixed pipeline: confirmation, member count, plan and
//! feature validation, then per-member subtotal, member multiplication,
//! premium surcharge, group discount, flat band discount, special offer,
//! clamping and rounding. The order is part of the pricing contract; moving
//! the surcharge after the group discount, or the special offer before it,
//! changes prices.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::Feature;
use crate::error::Rejection;
use crate::observer::{NoopObserver, PricingObserver};
use crate::profile::PricingProfile;
use crate::request::PricingRequest;
use crate::rules::{RoundingMode, SpecialOffer};

/// Kind of adjustment applied to the running total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    PremiumSurcharge,
    GroupDiscount,
    FlatDiscount,
    SpecialOffer,
    FloorToZero,
}

impl AdjustmentKind {
    pub fn label(&self) -> &'static str {
        match self {
            AdjustmentKind::PremiumSurcharge => "Premium feature surcharge",
            AdjustmentKind::GroupDiscount => "Group discount",
            AdjustmentKind::FlatDiscount => "Small group discount",
            AdjustmentKind::SpecialOffer => "Special offer",
            AdjustmentKind::FloorToZero => "Floored to zero",
        }
    }
}

/// One applied surcharge or discount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    pub kind: AdjustmentKind,
    /// Signed change to the running total (discounts are negative)
    pub amount: Decimal,
    /// Running total after this adjustment
    pub running_total: Decimal,
}

/// A successful calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub profile_id: String,
    pub plan: String,
    pub features: Vec<String>,
    pub num_members: u64,
    /// Plan price plus feature prices for one member
    pub per_member_subtotal: Decimal,
    /// Subtotal times member count, before any adjustment
    pub gross_total: Decimal,
    pub adjustments: Vec<Adjustment>,
    /// Amount after adjustments and clamping, before rounding
    pub final_amount: Decimal,
    pub rounding: RoundingMode,
    pub cost: u64,
}

impl Quote {
    pub fn has_adjustment(&self, kind: AdjustmentKind) -> bool {
        self.adjustments.iter().any(|a| a.kind == kind)
    }

    /// Generate a human-readable breakdown.
    pub fn report(&self) -> String {
        let mut report = String::new();

        report.push_str(&format!("Profile: {}\n", self.profile_id));
        report.push_str(&format!("Plan: {}\n", self.plan));
        if self.features.is_empty() {
            report.push_str("Features: None\n");
        } else {
            report.push_str(&format!("Features: {}\n", self.features.join(", ")));
        }
        report.push_str(&format!("Members: {}\n", self.num_members));
        report.push_str(&format!("Per member: ${}\n", self.per_member_subtotal.normalize()));
        report.push_str(&format!("Gross total: ${}\n", self.gross_total.normalize()));

        for adj in &self.adjustments {
            report.push_str(&format!(
                "  {}: {}{} (running total ${})\n",
                adj.kind.label(),
                if adj.amount.is_sign_negative() { "-$" } else { "+$" },
                adj.amount.abs().normalize(),
                adj.running_total.normalize()
            ));
        }

        report.push_str(&format!("Total Membership Cost: ${}\n", self.cost));
        report
    }
}

/// Prices membership requests against a single profile.
#[derive(Debug, Clone)]
pub struct CostCalculator {
    profile: PricingProfile,
}

impl Default for CostCalculator {
    fn default() -> Self {
        Self::new(PricingProfile::standard())
    }
}

impl CostCalculator {
    pub fn new(profile: PricingProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &PricingProfile {
        &self.profile
    }

    /// Price a plan, features and member count, returning
    /// [`Rejection::SENTINEL`] when no cost can be computed.
    pub fn calculate_cost<S: AsRef<str>>(&self, plan: &str, features: &[S], num_members: i64) -> i64 {
        let request = PricingRequest::new(plan, num_members)
            .features(features.iter().map(|f| f.as_ref().to_string()));
        self.calculate(&request)
    }

    /// Integer form of [`CostCalculator::quote`].
    pub fn calculate(&self, request: &PricingRequest) -> i64 {
        match self.quote(request) {
            Ok(quote) => i64::try_from(quote.cost).unwrap_or(Rejection::SENTINEL),
            Err(_) => Rejection::SENTINEL,
        }
    }

    pub fn quote(&self, request: &PricingRequest) -> Result<Quote, Rejection> {
        self.quote_with(request, &mut NoopObserver)
    }

    /// Price a request, reporting each adjustment to `observer` as it is applied.
    pub fn quote_with(
        &self,
        request: &PricingRequest,
        observer: &mut dyn PricingObserver,
    ) -> Result<Quote, Rejection> {
        let result = self
            .validate(request)
            .and_then(|(plan_price, features)| self.price(request, plan_price, &features, observer));

        match result {
            Ok(quote) => {
                debug!(
                    "Priced '{}' x{} under '{}': {}",
                    quote.plan, quote.num_members, quote.profile_id, quote.cost
                );
                Ok(quote)
            }
            Err(rejection) => {
                debug!(reason = rejection.code(), "Pricing request rejected: {}", rejection);
                observer.request_rejected(&rejection);
                Err(rejection)
            }
        }
    }

    /// Validation steps in contract order. Returns the plan price and the
    /// de-duplicated selected features.
    fn validate(&self, request: &PricingRequest) -> Result<(Decimal, Vec<&Feature>), Rejection> {
        let rules = &self.profile.rules;

        let confirmed = match request.confirmed {
            Some(flag) => flag,
            None => !rules.require_confirmation,
        };
        if !confirmed {
            return Err(Rejection::NotConfirmed);
        }

        if !rules.members.contains(request.num_members) {
            return Err(Rejection::InvalidMemberCount {
                count: request.num_members,
                min: rules.members.min,
                max: rules.members.max,
            });
        }

        let plan_price = self
            .profile
            .plans
            .price(&request.plan)
            .ok_or_else(|| Rejection::InvalidPlan(request.plan.clone()))?;

        let mut features: Vec<&Feature> = Vec::with_capacity(request.features.len());
        for name in &request.features {
            let feature = self
                .profile
                .features
                .get(name)
                .ok_or_else(|| Rejection::InvalidFeature(name.clone()))?;
            if !features.iter().any(|f| f.name == feature.name) {
                features.push(feature);
            }
        }

        Ok((plan_price, features))
    }

    fn price(
        &self,
        request: &PricingRequest,
        plan_price: Decimal,
        features: &[&Feature],
        observer: &mut dyn PricingObserver,
    ) -> Result<Quote, Rejection> {
        let rules = &self.profile.rules;
        let num_members = request.num_members;
        let too_large = || Rejection::InvalidMemberCount {
            count: num_members,
            min: rules.members.min,
            max: rules.members.max,
        };

        let mut adjustments = Vec::new();
        let mut apply = |kind: AdjustmentKind, amount: Decimal, total: &mut Decimal| {
            *total = total.checked_add(amount).ok_or_else(too_large)?;
            let adjustment = Adjustment {
                kind,
                amount,
                running_total: *total,
            };
            debug!("{}: {} (running total {})", kind.label(), amount, total);
            observer.adjustment_applied(&adjustment);
            adjustments.push(adjustment);
            Ok::<(), Rejection>(())
        };

        let per_member_subtotal = features
            .iter()
            .try_fold(plan_price, |acc, f| acc.checked_add(f.price))
            .ok_or_else(too_large)?;
        let gross_total = per_member_subtotal
            .checked_mul(Decimal::from(num_members))
            .ok_or_else(too_large)?;
        let mut total = gross_total;

        if features.iter().any(|f| f.premium) {
            let surcharge = total
                .checked_mul(rules.premium_surcharge_rate)
                .ok_or_else(too_large)?;
            apply(AdjustmentKind::PremiumSurcharge, surcharge, &mut total)?;
        }

        if rules
            .group_discount
            .applies(num_members, request.apply_group_discount)
        {
            let discount = total
                .checked_mul(rules.group_discount.rate)
                .ok_or_else(too_large)?;
            apply(AdjustmentKind::GroupDiscount, -discount, &mut total)?;
        }

        if let Some(band) = rules.flat_discount.as_ref().filter(|b| b.applies(num_members)) {
            apply(AdjustmentKind::FlatDiscount, -band.amount, &mut total)?;
        }

        if let Some(offer) = SpecialOffer::best_for(&rules.special_offers, total) {
            apply(AdjustmentKind::SpecialOffer, -offer.amount, &mut total)?;
        }

        if total < Decimal::ZERO {
            let shortfall = -total;
            apply(AdjustmentKind::FloorToZero, shortfall, &mut total)?;
        }

        let rounded = rules.rounding.apply(total);
        let cost = rounded
            .to_u64()
            .filter(|c| i64::try_from(*c).is_ok())
            .ok_or_else(too_large)?;

        Ok(Quote {
            profile_id: self.profile.id.clone(),
            plan: request.plan.clone(),
            features: features.iter().map(|f| f.name.clone()).collect(),
            num_members: num_members.unsigned_abs(),
            per_member_subtotal,
            gross_total,
            adjustments,
            final_amount: total,
            rounding: rules.rounding,
            cost,
        })
    }
}
