//! Error types for pricing.
//!
//! Two families live here. [`Rejection`] is the expected outcome of a
//! request that cannot be priced; it never indicates a fault. [`PricingError`]
//! covers configuration problems such as unreadable or inconsistent profiles.

use thiserror::Error;

/// Result type alias for configuration and profile operations.
pub type PricingResult<T> = Result<T, PricingError>;

/// Errors that can occur while loading or validating pricing configuration.
#[derive(Error, Debug)]
pub enum PricingError {
    #[error("Invalid pricing configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Pricing profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Unsupported profile format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Why a pricing request produced no cost.
///
/// Every variant collapses to the same [`Rejection::SENTINEL`] at the
/// integer boundary; the variant itself carries the detail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("Request was not confirmed")]
    NotConfirmed,

    #[error("Invalid member count {count} (allowed: {})", describe_bounds(.min, .max))]
    InvalidMemberCount { count: i64, min: u32, max: Option<u32> },

    #[error("Invalid plan: {0}")]
    InvalidPlan(String),

    #[error("Invalid feature: {0}")]
    InvalidFeature(String),
}

impl Rejection {
    /// Integer result reported when no cost was computed.
    pub const SENTINEL: i64 = -1;

    /// Short machine-readable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::NotConfirmed => "not_confirmed",
            Rejection::InvalidMemberCount { .. } => "invalid_member_count",
            Rejection::InvalidPlan(_) => "invalid_plan",
            Rejection::InvalidFeature(_) => "invalid_feature",
        }
    }
}

fn describe_bounds(min: &u32, max: &Option<u32>) -> String {
    match max {
        Some(max) => format!("{}..={}", min, max),
        None => format!("{} or more", min),
    }
}
