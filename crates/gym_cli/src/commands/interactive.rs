//! Interactive command - Collect a request at the prompt and price it.
//!
//! Selections are validated as soon as they are entered, so an unknown plan
//! ends the session before features are asked for.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::info;

use gym_pricing::{CostCalculator, GroupDiscountTrigger, PricingRequest, Rejection};

use super::catalog::describe;
use super::{normalize_name, ConsoleObserver, ProfileOpts};

#[derive(Args)]
pub struct InteractiveArgs {
    /// Ask for confirmation even when the profile does not require it
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    confirm: bool,
}

/// Problems with prompt input that never reach the calculator.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Invalid number of members: '{0}'")]
    UnreadableMemberCount(String),

    #[error("Input closed before the request was complete")]
    InputClosed,
}

pub async fn execute(args: InteractiveArgs, profile: &ProfileOpts) -> Result<()> {
    let calculator = CostCalculator::new(profile.load()?);
    info!("Starting interactive session with profile '{}'", calculator.profile().id);

    let input = BufReader::new(tokio::io::stdin());
    let mut session = PromptSession::new(&calculator, input, std::io::stdout())
        .ask_confirmation(args.confirm);
    session.run().await?;

    Ok(())
}

/// A single prompt-driven pricing session.
pub struct PromptSession<'a, R, W> {
    calculator: &'a CostCalculator,
    lines: Lines<R>,
    out: W,
    ask_confirmation: bool,
}

impl<'a, R, W> PromptSession<'a, R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(calculator: &'a CostCalculator, input: R, out: W) -> Self {
        Self {
            calculator,
            lines: input.lines(),
            out,
            ask_confirmation: true,
        }
    }

    /// Skip the confirmation prompt unless the profile requires it.
    pub fn ask_confirmation(mut self, ask: bool) -> Self {
        self.ask_confirmation = ask;
        self
    }

    /// Run the session and return the computed cost.
    pub async fn run(&mut self) -> Result<u64> {
        let calculator = self.calculator;
        let profile = calculator.profile();
        writeln!(self.out, "=== Gym Membership System ===")?;
        writeln!(self.out, "Profile: {}", profile.name)?;

        let plan = self.select_plan().await?;
        let features = self.select_features().await?;
        let num_members = self.read_member_count().await?;

        let mut request = PricingRequest::new(&plan, num_members).features(features);

        if profile.rules.group_discount.trigger == GroupDiscountTrigger::OnRequest
            && num_members >= i64::from(profile.rules.group_discount.min_members)
        {
            let answer = self.prompt("\nApply group discount? (y/n): ").await?;
            request = request.group_discount(is_yes(&answer));
        }

        if self.ask_confirmation || profile.rules.require_confirmation {
            writeln!(self.out, "\n--- Confirmation ---")?;
            writeln!(self.out, "Plan: {}", request.plan)?;
            if request.features.is_empty() {
                writeln!(self.out, "Features: None")?;
            } else {
                writeln!(self.out, "Features: {}", request.features.join(", "))?;
            }
            writeln!(self.out, "Members: {}", request.num_members)?;

            let answer = self.prompt("\nConfirm these details? (y/n): ").await?;
            request = request.confirmed(is_yes(&answer));
        }

        writeln!(self.out)?;
        let quote = {
            let mut observer = ConsoleObserver::new(&mut self.out);
            calculator.quote_with(&request, &mut observer)?
        };

        writeln!(self.out, "\nTotal Membership Cost: ${}", quote.cost)?;
        Ok(quote.cost)
    }

    async fn select_plan(&mut self) -> Result<String> {
        let calculator = self.calculator;
        let plans = &calculator.profile().plans;

        writeln!(self.out, "\nAvailable Plans:")?;
        for (i, plan) in plans.iter().enumerate() {
            writeln!(
                self.out,
                "  {}. {}: ${}{}",
                i + 1,
                plan.name,
                plan.price.normalize(),
                describe(&plan.description)
            )?;
        }

        let answer = self.prompt("\nSelect a membership plan: ").await?;
        let choice = normalize_name(&answer);

        let selected = match choice.parse::<usize>() {
            Ok(position) => plans.by_position(position),
            Err(_) => plans.get(&choice),
        };

        match selected {
            Some(plan) => Ok(plan.name.clone()),
            None => Err(Rejection::InvalidPlan(choice).into()),
        }
    }

    async fn select_features(&mut self) -> Result<Vec<String>> {
        let calculator = self.calculator;
        let features = &calculator.profile().features;
        if features.is_empty() {
            return Ok(Vec::new());
        }

        writeln!(self.out, "\nAvailable Features:")?;
        for (i, feature) in features.iter().enumerate() {
            let marker = if feature.premium { " (premium)" } else { "" };
            writeln!(
                self.out,
                "  {}. {}: ${}{}{}",
                i + 1,
                feature.name,
                feature.price.normalize(),
                marker,
                describe(&feature.description)
            )?;
        }

        writeln!(self.out, "\nEnter features separated by comma (or press Enter for none):")?;
        let answer = self.prompt("> ").await?;

        let mut selected = Vec::new();
        for choice in answer.split(',').map(normalize_name).filter(|c| !c.is_empty()) {
            let feature = match choice.parse::<usize>() {
                Ok(position) => features.by_position(position),
                Err(_) => features.get(&choice),
            };
            match feature {
                Some(f) => selected.push(f.name.clone()),
                None => return Err(Rejection::InvalidFeature(choice).into()),
            }
        }

        Ok(selected)
    }

    async fn read_member_count(&mut self) -> Result<i64> {
        let answer = self.prompt("\nEnter number of members: ").await?;
        let trimmed = answer.trim();

        let count: i64 = trimmed
            .parse()
            .map_err(|_| PromptError::UnreadableMemberCount(trimmed.to_string()))?;

        let bounds = &self.calculator.profile().rules.members;
        if !bounds.contains(count) {
            return Err(Rejection::InvalidMemberCount {
                count,
                min: bounds.min,
                max: bounds.max,
            }
            .into());
        }

        Ok(count)
    }

    async fn prompt(&mut self, question: &str) -> Result<String> {
        write!(self.out, "{}", question)?;
        self.out.flush()?;

        match self.lines.next_line().await? {
            Some(line) => Ok(line),
            None => Err(PromptError::InputClosed.into()),
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(normalize_name(answer).as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use gym_pricing::PricingProfile;

    async fn run_session(profile: PricingProfile, input: &str) -> (Result<u64>, String) {
        let calculator = CostCalculator::new(profile);
        let mut out = Vec::new();
        let result = PromptSession::new(&calculator, input.as_bytes(), &mut out)
            .run()
            .await;
        (result, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn test_group_discount_session() {
        let (result, output) = run_session(PricingProfile::standard(), "basic\n\n2\ny\n").await;

        assert_eq!(result.unwrap(), 90);
        assert!(output.contains("1. basic: $50 - Gym floor and lockers"));
        assert!(output.contains("Features: None"));
        assert!(output.contains("Group discount applied: -$10"));
        assert!(output.contains("Total Membership Cost: $90"));
    }

    #[tokio::test]
    async fn test_menu_numbers_and_names() {
        // family + personal_training + specialized_training = 235, * 1.15 = 270.25, - 20
        let (result, output) =
            run_session(PricingProfile::standard(), "3\n1, Specialized_Training\n1\ny\n").await;

        assert_eq!(result.unwrap(), 250);
        assert!(output.contains("specialized_training: $50 (premium)"));
        assert!(output.contains("Features: personal_training, specialized_training"));
    }

    #[tokio::test]
    async fn test_declined_confirmation() {
        let (result, output) = run_session(PricingProfile::standard(), "basic\n\n1\nn\n").await;

        let err = result.unwrap_err();
        assert_eq!(err.downcast_ref::<Rejection>(), Some(&Rejection::NotConfirmed));
        assert!(!output.contains("Total Membership Cost"));
    }

    #[tokio::test]
    async fn test_invalid_plan_stops_early() {
        let (result, output) = run_session(PricingProfile::standard(), "gold\n").await;

        let err = result.unwrap_err();
        assert_eq!(
            err.downcast_ref::<Rejection>(),
            Some(&Rejection::InvalidPlan("gold".into()))
        );
        assert!(!output.contains("Available Features"));
    }

    #[tokio::test]
    async fn test_invalid_feature() {
        let (result, _) = run_session(PricingProfile::standard(), "basic\nsauna\n").await;

        let err = result.unwrap_err();
        assert_eq!(
            err.downcast_ref::<Rejection>(),
            Some(&Rejection::InvalidFeature("sauna".into()))
        );
    }

    #[tokio::test]
    async fn test_unreadable_member_count() {
        let (result, _) = run_session(PricingProfile::standard(), "basic\n\nmany\n").await;

        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PromptError>(),
            Some(PromptError::UnreadableMemberCount(s)) if s == "many"
        ));
    }

    #[tokio::test]
    async fn test_non_positive_member_count() {
        let (result, _) = run_session(PricingProfile::standard(), "basic\n\n0\n").await;

        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Rejection>(),
            Some(Rejection::InvalidMemberCount { count: 0, .. })
        ));
    }

    #[tokio::test]
    async fn test_input_closed() {
        let (result, _) = run_session(PricingProfile::standard(), "basic\n").await;

        let err = result.unwrap_err();
        assert!(matches!(err.downcast_ref::<PromptError>(), Some(PromptError::InputClosed)));
    }

    #[tokio::test]
    async fn test_front_desk_asks_for_group_discount() {
        let (result, output) = run_session(
            PricingProfile::front_desk(),
            "premium\nspecialized_training\n2\ny\ny\n",
        )
        .await;

        assert!(output.contains("Apply group discount? (y/n):"));
        assert!(output.contains("Small group discount applied: -$10"));
        assert_eq!(result.unwrap(), 229);
    }

    #[tokio::test]
    async fn test_confirmation_can_be_skipped() {
        let calculator = CostCalculator::new(PricingProfile::standard());
        let mut out = Vec::new();
        let cost = PromptSession::new(&calculator, "premium\n\n3\n".as_bytes(), &mut out)
            .ask_confirmation(false)
            .run()
            .await
            .unwrap();

        assert_eq!(cost, 250);
        assert!(!String::from_utf8(out).unwrap().contains("Confirm these details"));
    }

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y"));
        assert!(is_yes(" YES "));
        assert!(!is_yes("n"));
        assert!(!is_yes(""));
    }
}
