//! # gym_pricing
//!
//! Membership pricing for gyms: plan and feature catalogs, pricing rules
//! bundled into named profiles, and the cost calculator.
//!
//! This crate provides:
//! - **Catalogs**: ordered plan and feature price lists, with premium tagging
//! - **Rules**: surcharge, group discount, flat band discount, special offers, rounding
//! - **Profiles**: named, validated rule sets loaded from YAML/TOML or built in
//! - **Calculator**: the ordered pricing pipeline with structured adjustment events
//!
//! ## Example
//!
//! ```rust
//! use gym_pricing::{CostCalculator, PricingProfile, PricingRequest};
//!
//! let calculator = CostCalculator::new(PricingProfile::standard());
//!
//! assert_eq!(calculator.calculate_cost("basic", &["personal_training"], 1), 85);
//! assert_eq!(calculator.calculate_cost::<&str>("gold", &[], 1), -1);
//!
//! let request = PricingRequest::new("premium", 2).feature("specialized_training");
//! let quote = calculator.quote(&request).unwrap();
//! assert_eq!(quote.cost, 291);
//! ```

pub mod calculator;
pub mod catalog;
pub mod error;
pub mod observer;
pub mod profile;
pub mod request;
pub mod rules;

pub use calculator::{Adjustment, AdjustmentKind, CostCalculator, Quote};
pub use catalog::{Feature, FeatureCatalog, Plan, PlanCatalog};
pub use error::{PricingError, PricingResult, Rejection};
pub use observer::{NoopObserver, PricingObserver};
pub use profile::{PricingProfile, ProfileSet, DEFAULT_PROFILE};
pub use request::PricingRequest;
pub use rules::{
    FlatDiscountBand, GroupDiscount, GroupDiscountTrigger, MemberBounds, PricingRules, RoundingMode,
    SpecialOffer,
};
