//! Quote command - Price a single membership request.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tracing::info;

use gym_pricing::{CostCalculator, PricingRequest, Quote, Rejection};

use super::{normalize_name, ConsoleObserver, ProfileOpts};

#[derive(Args)]
pub struct QuoteArgs {
    /// Membership plan
    #[arg(short, long)]
    plan: String,

    /// Add-on feature (repeat or separate with commas)
    #[arg(short = 'f', long = "feature", value_delimiter = ',')]
    features: Vec<String>,

    /// Number of members
    #[arg(short, long, allow_hyphen_values = true)]
    members: i64,

    /// Confirm the request
    #[arg(long, conflicts_with = "no")]
    yes: bool,

    /// Decline the request
    #[arg(long)]
    no: bool,

    /// Apply (true) or skip (false) the group discount explicitly
    #[arg(long)]
    group_discount: Option<bool>,

    /// Print the quote as JSON
    #[arg(long)]
    json: bool,

    /// Print the full price breakdown instead of live notifications
    #[arg(long, conflicts_with = "json")]
    breakdown: bool,
}

impl QuoteArgs {
    fn request(&self) -> PricingRequest {
        let features = self
            .features
            .iter()
            .map(|f| normalize_name(f))
            .filter(|f| !f.is_empty());

        let mut request = PricingRequest::new(normalize_name(&self.plan), self.members).features(features);

        if self.yes {
            request = request.confirmed(true);
        } else if self.no {
            request = request.confirmed(false);
        }
        if let Some(apply) = self.group_discount {
            request = request.group_discount(apply);
        }

        request
    }
}

/// JSON body printed for a rejected request.
#[derive(Serialize)]
struct RejectedQuote<'a> {
    cost: i64,
    reason: &'a str,
    message: String,
}

pub async fn execute(args: QuoteArgs, profile: &ProfileOpts) -> Result<()> {
    let calculator = CostCalculator::new(profile.load()?);
    let request = args.request();

    info!(
        "Quoting plan '{}' for {} member(s) under profile '{}'",
        request.plan,
        request.num_members,
        calculator.profile().id
    );

    let outcome = if args.json || args.breakdown {
        calculator.quote(&request)
    } else {
        let mut observer = ConsoleObserver::new(std::io::stdout());
        calculator.quote_with(&request, &mut observer)
    };

    if args.json {
        println!("{}", render_json(&outcome)?);
    }

    let quote = outcome?;
    if args.breakdown {
        print!("{}", quote.report());
    } else if !args.json {
        println!();
        println!("Total Membership Cost: ${}", quote.cost);
    }

    Ok(())
}

fn render_json(outcome: &Result<Quote, Rejection>) -> Result<String> {
    let json = match outcome {
        Ok(quote) => serde_json::to_string_pretty(quote)?,
        Err(rejection) => serde_json::to_string_pretty(&RejectedQuote {
            cost: Rejection::SENTINEL,
            reason: rejection.code(),
            message: rejection.to_string(),
        })?,
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: QuoteArgs,
    }

    fn parse(argv: &[&str]) -> QuoteArgs {
        TestCli::try_parse_from(std::iter::once("quote").chain(argv.iter().copied()))
            .unwrap()
            .args
    }

    #[test]
    fn test_request_from_args() {
        let args = parse(&[
            "--plan",
            " Premium ",
            "-f",
            "specialized_training,Personal_Training",
            "--feature",
            "specialized_training",
            "--members",
            "2",
            "--yes",
        ]);
        let request = args.request();

        assert_eq!(request.plan, "premium");
        assert_eq!(request.features, vec!["specialized_training", "personal_training"]);
        assert_eq!(request.confirmed, Some(true));
        assert_eq!(request.apply_group_discount, None);
    }

    #[test]
    fn test_negative_members_reach_calculator() {
        let args = parse(&["--plan", "basic", "--members", "-5", "--group-discount", "false"]);
        let request = args.request();

        assert_eq!(request.num_members, -5);
        assert_eq!(request.apply_group_discount, Some(false));
        assert_eq!(CostCalculator::default().calculate(&request), -1);
    }

    #[test]
    fn test_yes_and_no_conflict() {
        let result = TestCli::try_parse_from(["quote", "-p", "basic", "-m", "1", "--yes", "--no"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_breakdown_conflicts_with_json() {
        let args = parse(&["-p", "basic", "-m", "2", "--breakdown"]);
        assert!(args.breakdown);

        let result = TestCli::try_parse_from(["quote", "-p", "basic", "-m", "2", "--breakdown", "--json"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_breakdown_report() {
        let args = parse(&["-p", "premium", "-f", "specialized_training", "-m", "2", "--breakdown"]);
        let quote = CostCalculator::default().quote(&args.request()).unwrap();
        let report = quote.report();

        assert!(report.contains("Gross total: $300"));
        assert!(report.contains("Premium feature surcharge: +$45 (running total $345)"));
        assert!(report.contains("Total Membership Cost: $291"));
    }

    #[test]
    fn test_render_json_rejection() {
        let outcome: Result<Quote, Rejection> = Err(Rejection::InvalidPlan("gold".into()));
        let json: serde_json::Value = serde_json::from_str(&render_json(&outcome).unwrap()).unwrap();

        assert_eq!(json["cost"], -1);
        assert_eq!(json["reason"], "invalid_plan");
    }

    #[test]
    fn test_render_json_quote() {
        let outcome = CostCalculator::default().quote(&PricingRequest::new("basic", 2));
        let json: serde_json::Value = serde_json::from_str(&render_json(&outcome).unwrap()).unwrap();

        assert_eq!(json["cost"], 90);
        assert_eq!(json["adjustments"][0]["kind"], "group_discount");
    }
}
