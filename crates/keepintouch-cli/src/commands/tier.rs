//! Tier catalog commands for CLI.

use clap::Subcommand;
use keepintouch_core::Tier;

use super::{flush_events, open_roster, print_json, CommandResult};

#[derive(Subcommand)]
pub enum TierAction {
    /// List tiers
    List,
    /// Add a custom tier
    Add {
        /// Tier ID
        id: String,
        /// Display name
        name: String,
        /// Days between expected contacts
        cadence: u32,
        /// Health window in days (defaults to the cadence)
        #[arg(long)]
        health_window: Option<u32>,
    },
    /// Change a tier's cadence. Due dates update on the next interaction or `tier recompute`.
    SetCadence {
        /// Tier ID
        id: String,
        /// Days between expected contacts
        days: u32,
    },
    /// Rename a tier
    Rename {
        /// Tier ID
        id: String,
        /// New display name
        name: String,
    },
    /// Recompute every friend's due date and streak
    Recompute,
}

pub fn run(action: TierAction) -> CommandResult {
    let mut roster = open_roster()?;

    match action {
        TierAction::List => {
            print_json(roster.tiers())?;
        }
        TierAction::Add {
            id,
            name,
            cadence,
            health_window,
        } => {
            let mut tier = Tier::new(id, name, cadence)?;
            if let Some(days) = health_window {
                tier = tier.with_health_window(days);
            }
            let mut catalog = roster.tiers().clone();
            catalog.add(tier)?;
            roster.update_tiers(catalog)?;
            print_json(roster.tiers())?;
        }
        TierAction::SetCadence { id, days } => {
            let mut catalog = roster.tiers().clone();
            catalog.set_cadence(&id, days)?;
            roster.update_tiers(catalog)?;
            print_json(roster.tiers())?;
        }
        TierAction::Rename { id, name } => {
            let mut catalog = roster.tiers().clone();
            catalog.rename(&id, name)?;
            roster.update_tiers(catalog)?;
            print_json(roster.tiers())?;
        }
        TierAction::Recompute => {
            let count = roster.recompute_all();
            println!("Recomputed {count} friends");
        }
    }

    flush_events(&mut roster);
    Ok(())
}
