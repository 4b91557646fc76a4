//! Named pricing profiles.
//!
//! A profile bundles the plan catalog, the feature catalog and the pricing
//! rules. Profiles are loaded from YAML or TOML files, or taken from the
//! built-in set, and are handed to the calculator as read-only values.

use std::path::Path;

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::{Feature, FeatureCatalog, Plan, PlanCatalog};
use crate::error::{PricingError, PricingResult};
use crate::rules::{
    FlatDiscountBand, GroupDiscount, MemberBounds, PricingRules, RoundingMode, SpecialOffer,
};

/// Identifier of the default built-in profile.
pub const DEFAULT_PROFILE: &str = "standard";

/// A complete pricing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingProfile {
    /// Unique profile identifier
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// What this profile is for
    #[serde(default)]
    pub description: String,
    pub plans: PlanCatalog,
    #[serde(default)]
    pub features: FeatureCatalog,
    pub rules: PricingRules,
}

impl PricingProfile {
    /// The walk-in price list: automatic group discount, round half up.
    pub fn standard() -> Self {
        Self {
            id: DEFAULT_PROFILE.to_string(),
            name: "Standard".to_string(),
            description: "Walk-in pricing with automatic group discount".to_string(),
            plans: PlanCatalog::new()
                .with_plan(Plan::new("basic", dec!(50)).with_description("Gym floor and lockers"))
                .with_plan(Plan::new("premium", dec!(100)).with_description("All areas, including pool and sauna"))
                .with_plan(Plan::new("family", dec!(150)).with_description("Premium access for a household")),
            features: FeatureCatalog::new()
                .with_feature(Feature::new("personal_training", dec!(35)).with_description("Weekly session with a trainer"))
                .with_feature(Feature::new("group_classes", dec!(20)).with_description("Unlimited scheduled classes"))
                .with_feature(
                    Feature::premium("specialized_training", dec!(50))
                        .with_description("Sport-specific coaching programs"),
                )
                .with_feature(
                    Feature::premium("exclusive_access", dec!(40)).with_description("Members lounge and early hours"),
                ),
            rules: PricingRules {
                members: MemberBounds::default(),
                premium_surcharge_rate: dec!(0.15),
                group_discount: GroupDiscount::automatic(dec!(0.10), 2),
                flat_discount: None,
                special_offers: vec![
                    SpecialOffer::new(dec!(400), dec!(50)),
                    SpecialOffer::new(dec!(200), dec!(20)),
                ],
                rounding: RoundingMode::HalfUp,
                require_confirmation: false,
            },
        }
    }

    /// Counter sales: group discount on request, flat band discount for
    /// small groups, capped member count, ceiling rounding, and an explicit
    /// confirmation before anything is priced.
    pub fn front_desk() -> Self {
        Self {
            id: "front-desk".to_string(),
            name: "Front Desk".to_string(),
            description: "Counter pricing with confirmation and small-group savings".to_string(),
            plans: PlanCatalog::new()
                .with_plan(Plan::new("basic", dec!(40)))
                .with_plan(Plan::new("premium", dec!(80)))
                .with_plan(Plan::new("family", dec!(120))),
            features: FeatureCatalog::new()
                .with_feature(Feature::new("personal_training", dec!(30)))
                .with_feature(Feature::new("group_classes", dec!(15)))
                .with_feature(Feature::premium("specialized_training", dec!(45)))
                .with_feature(Feature::premium("exclusive_access", dec!(35)))
                .with_feature(Feature::new("nutrition_coaching", dec!(25)).with_description("Monthly diet plan review")),
            rules: PricingRules {
                members: MemberBounds::at_most(5),
                premium_surcharge_rate: dec!(0.15),
                group_discount: GroupDiscount::on_request(dec!(0.10)),
                flat_discount: Some(FlatDiscountBand::new(2, 3, dec!(10))),
                special_offers: vec![
                    SpecialOffer::new(dec!(400), dec!(50)),
                    SpecialOffer::new(dec!(200), dec!(20)),
                ],
                rounding: RoundingMode::Ceiling,
                require_confirmation: true,
            },
        }
    }

    /// All built-in profiles.
    pub fn builtins() -> Vec<Self> {
        vec![Self::standard(), Self::front_desk()]
    }

    /// Look up a built-in profile by id.
    pub fn builtin(id: &str) -> Option<Self> {
        Self::builtins().into_iter().find(|p| p.id == id)
    }

    /// Load and validate a profile from a YAML or TOML file.
    pub fn from_file(path: &Path) -> PricingResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();

        let profile = match ext {
            "yaml" | "yml" => Self::from_yaml(&content)?,
            "toml" => Self::from_toml(&content)?,
            other => {
                return Err(PricingError::UnsupportedFormat(format!(
                    "{} (extension '{}')",
                    path.display(),
                    other
                )))
            }
        };

        debug!("Loaded pricing profile '{}' from {}", profile.id, path.display());
        Ok(profile)
    }

    /// Parse and validate a profile from a YAML string.
    pub fn from_yaml(yaml: &str) -> PricingResult<Self> {
        let profile: Self = serde_yaml::from_str(yaml)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Parse and validate a profile from a TOML string.
    pub fn from_toml(content: &str) -> PricingResult<Self> {
        let profile: Self = toml::from_str(content)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Serialize the profile to YAML.
    pub fn to_yaml(&self) -> PricingResult<String> {
        serde_yaml::to_string(self).map_err(PricingError::from)
    }

    pub fn validate(&self) -> PricingResult<()> {
        if self.id.trim().is_empty() {
            return Err(PricingError::InvalidConfiguration(
                "profile id must not be empty".to_string(),
            ));
        }

        self.plans.validate()?;
        self.features.validate()?;
        self.rules.validate()
    }
}

/// A collection of profiles addressable by id.
#[derive(Debug, Clone, Default)]
pub struct ProfileSet {
    pub name: String,
    pub profiles: Vec<PricingProfile>,
}

impl ProfileSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            profiles: Vec::new(),
        }
    }

    /// A set holding every built-in profile.
    pub fn with_builtins() -> Self {
        let mut set = Self::new("builtin");
        for profile in PricingProfile::builtins() {
            set.add(profile);
        }
        set
    }

    /// Add a profile, replacing any existing profile with the same id.
    pub fn add(&mut self, profile: PricingProfile) {
        self.profiles.retain(|p| p.id != profile.id);
        self.profiles.push(profile);
    }

    pub fn get(&self, id: &str) -> PricingResult<&PricingProfile> {
        self.profiles
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| PricingError::ProfileNotFound(id.to_string()))
    }

    pub fn ids(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.id.as_str()).collect()
    }

    /// Load every YAML or TOML profile in a directory. Files that fail to
    /// parse or validate are skipped with a warning.
    pub fn from_directory(path: &Path) -> PricingResult<Self> {
        let mut set = Self::new(path.file_name().unwrap_or_default().to_string_lossy());

        if path.is_dir() {
            let mut entries: Vec<_> = std::fs::read_dir(path)?
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| {
                    p.extension()
                        .map_or(false, |e| e == "yaml" || e == "yml" || e == "toml")
                })
                .collect();
            entries.sort();

            for file in entries {
                match PricingProfile::from_file(&file) {
                    Ok(profile) => set.add(profile),
                    Err(e) => warn!("Skipping profile {}: {}", file.display(), e),
                }
            }
        }

        Ok(set)
    }

    /// Merge another set into this one; profiles from `other` win on id clashes.
    pub fn merge(&mut self, other: ProfileSet) {
        for profile in other.profiles {
            self.add(profile);
        }
    }
}
