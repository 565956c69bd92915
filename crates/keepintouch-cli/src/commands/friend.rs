//! Friend management commands for CLI.

use chrono::{Duration, Utc};
use clap::Subcommand;
use keepintouch_core::NewFriend;

use super::{flush_events, open_roster, print_json, CommandResult};

#[derive(Subcommand)]
pub enum FriendAction {
    /// Add a new friend
    Add {
        /// Display name
        name: String,
        /// Tier ID (see `tier list`)
        #[arg(long, default_value = "close_friends")]
        tier: String,
        /// Birthday as MM-DD or YYYY-MM-DD
        #[arg(long)]
        birthday: Option<String>,
        /// Roughly how many days ago you last spoke
        #[arg(long)]
        last_spoken_days_ago: Option<u32>,
        /// Mark as favorite
        #[arg(long)]
        favorite: bool,
    },
    /// List friends
    List {
        /// Filter by tier ID
        #[arg(long)]
        tier: Option<String>,
        /// Only favorites
        #[arg(long)]
        favorites: bool,
    },
    /// Get friend details
    Get {
        /// Friend ID
        id: String,
    },
    /// Move a friend to another tier
    Tier {
        /// Friend ID
        id: String,
        /// New tier ID
        tier: String,
    },
    /// Mark or unmark a favorite
    Favorite {
        /// Friend ID
        id: String,
        /// Remove the favorite flag instead
        #[arg(long)]
        off: bool,
    },
    /// Recompute due date and streak from history
    Recompute {
        /// Friend ID
        id: String,
    },
    /// Delete a friend and their interactions
    Delete {
        /// Friend ID
        id: String,
    },
}

pub fn run(action: FriendAction) -> CommandResult {
    let mut roster = open_roster()?;

    match action {
        FriendAction::Add {
            name,
            tier,
            birthday,
            last_spoken_days_ago,
            favorite,
        } => {
            let last_spoken_at = last_spoken_days_ago
                .map(|days| Utc::now() - Duration::days(i64::from(days)));
            let friend = roster
                .add_friend(NewFriend {
                    name,
                    tier_id: tier,
                    last_spoken_at,
                    birthday,
                    favorite,
                })?
                .clone();
            eprintln!("Friend added: {}", friend.id);
            print_json(&friend)?;
        }
        FriendAction::List { tier, favorites } => {
            let filtered: Vec<_> = roster
                .friends()
                .iter()
                .filter(|f| tier.as_deref().map_or(true, |t| f.tier_id == t))
                .filter(|f| !favorites || f.favorite)
                .collect();
            print_json(&filtered)?;
        }
        FriendAction::Get { id } => match roster.friend(&id) {
            Some(friend) => print_json(friend)?,
            None => return Err(format!("Friend not found: {id}").into()),
        },
        FriendAction::Tier { id, tier } => {
            let friend = roster.change_tier(&id, &tier)?.clone();
            print_json(&friend)?;
        }
        FriendAction::Favorite { id, off } => {
            let friend = roster.set_favorite(&id, !off)?.clone();
            print_json(&friend)?;
        }
        FriendAction::Recompute { id } => {
            let friend = roster.recompute(&id)?.clone();
            print_json(&friend)?;
        }
        FriendAction::Delete { id } => {
            roster.delete_friend(&id)?;
            println!("Friend deleted: {id}");
        }
    }

    flush_events(&mut roster);
    Ok(())
}
