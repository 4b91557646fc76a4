//! Catalog command - Show plans, features and rules of a profile.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use rust_decimal::Decimal;

use gym_pricing::{GroupDiscountTrigger, PricingProfile, RoundingMode};

use super::ProfileOpts;

#[derive(Args)]
pub struct CatalogArgs {
    /// Print the profile as YAML instead
    #[arg(long)]
    yaml: bool,
}

pub async fn execute(args: CatalogArgs, profile: &ProfileOpts) -> Result<()> {
    let profile = profile.load()?;

    if args.yaml {
        print!("{}", profile.to_yaml()?);
        return Ok(());
    }

    let stdout = std::io::stdout();
    write_catalog(&profile, &mut stdout.lock())?;
    Ok(())
}

fn write_catalog(profile: &PricingProfile, out: &mut impl Write) -> Result<()> {
    let rules = &profile.rules;

    writeln!(out, "📋 {} ({})", profile.name, profile.id)?;
    if !profile.description.is_empty() {
        writeln!(out, "   {}", profile.description)?;
    }

    writeln!(out, "\nPlans:")?;
    for plan in profile.plans.iter() {
        writeln!(
            out,
            "  - {}: ${}{}",
            plan.name,
            plan.price.normalize(),
            describe(&plan.description)
        )?;
    }

    writeln!(out, "\nFeatures:")?;
    if profile.features.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for feature in profile.features.iter() {
        let marker = if feature.premium { " ⭐ premium" } else { "" };
        writeln!(
            out,
            "  - {}: ${}{}{}",
            feature.name,
            feature.price.normalize(),
            marker,
            describe(&feature.description)
        )?;
    }

    writeln!(out, "\nRules:")?;
    match rules.members.max {
        Some(max) => writeln!(out, "  Members: {} to {}", rules.members.min, max)?,
        None => writeln!(out, "  Members: {} or more", rules.members.min)?,
    }
    writeln!(
        out,
        "  Premium surcharge: {}%",
        (rules.premium_surcharge_rate * Decimal::ONE_HUNDRED).normalize()
    )?;

    let group = &rules.group_discount;
    let trigger = match group.trigger {
        GroupDiscountTrigger::Automatic => format!("from {} members", group.min_members),
        GroupDiscountTrigger::OnRequest => "on request".to_string(),
    };
    writeln!(
        out,
        "  Group discount: {}% {}",
        (group.rate * Decimal::ONE_HUNDRED).normalize(),
        trigger
    )?;

    if let Some(band) = &rules.flat_discount {
        writeln!(
            out,
            "  Small group discount: ${} off for {} to {} members",
            band.amount.normalize(),
            band.min_members,
            band.max_members
        )?;
    }

    let mut offers: Vec<_> = rules.special_offers.iter().collect();
    offers.sort_by(|a, b| b.threshold.cmp(&a.threshold));
    for offer in offers {
        writeln!(
            out,
            "  Special offer: ${} off above ${}",
            offer.amount.normalize(),
            offer.threshold.normalize()
        )?;
    }

    let rounding = match rules.rounding {
        RoundingMode::HalfUp => "nearest dollar, halves up",
        RoundingMode::Ceiling => "next whole dollar",
    };
    writeln!(out, "  Rounding: {}", rounding)?;
    writeln!(
        out,
        "  Confirmation: {}",
        if rules.require_confirmation { "required" } else { "optional" }
    )?;

    Ok(())
}

/// Suffix shown after a catalog entry with a description.
pub(crate) fn describe(description: &str) -> String {
    if description.is_empty() {
        String::new()
    } else {
        format!(" - {}", description)
    }
}
