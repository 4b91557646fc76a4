//! Profiles command - List available pricing profiles.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use gym_pricing::ProfileSet;

#[derive(Args)]
pub struct ProfilesArgs {
    /// Also load profiles from this directory
    #[arg(short, long)]
    dir: Option<PathBuf>,
}

pub async fn execute(args: ProfilesArgs) -> Result<()> {
    let set = collect(&args)?;

    println!("Available pricing profiles:");
    for profile in &set.profiles {
        println!(
            "  {:<16} {} ({} plans, {} features)",
            profile.id,
            profile.name,
            profile.plans.len(),
            profile.features.len()
        );
    }

    Ok(())
}

fn collect(args: &ProfilesArgs) -> Result<ProfileSet> {
    let mut set = ProfileSet::with_builtins();

    if let Some(dir) = &args.dir {
        if !dir.is_dir() {
            anyhow::bail!("Profile directory not found: {}", dir.display());
        }
        let loaded = ProfileSet::from_directory(dir)
            .with_context(|| format!("Failed to read profiles from {}", dir.display()))?;
        info!("Loaded {} profile(s) from {}", loaded.profiles.len(), dir.display());
        set.merge(loaded);
    }

    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gym_pricing::PricingProfile;
    use tempfile::tempdir;

    #[test]
    fn test_builtins_only() {
        let set = collect(&ProfilesArgs { dir: None }).unwrap();
        assert_eq!(set.ids(), vec!["standard", "front-desk"]);
    }

    #[test]
    fn test_directory_profiles_added() {
        let temp = tempdir().unwrap();
        let mut club = PricingProfile::front_desk();
        club.id = "club".to_string();
        std::fs::write(temp.path().join("club.yml"), club.to_yaml().unwrap()).unwrap();

        let set = collect(&ProfilesArgs {
            dir: Some(temp.path().to_path_buf()),
        })
        .unwrap();
        assert_eq!(set.ids(), vec!["standard", "front-desk", "club"]);
    }

    #[test]
    fn test_missing_directory() {
        let temp = tempdir().unwrap();
        let result = collect(&ProfilesArgs {
            dir: Some(temp.path().join("missing")),
        });
        assert!(result.is_err());
    }
}
