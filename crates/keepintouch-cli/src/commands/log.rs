//! Interaction log commands for CLI.

use chrono::{DateTime, Utc};
use clap::Subcommand;
use keepintouch_core::{Config, InteractionType, NewInteraction};

use super::{flush_events, open_roster, print_json, CommandResult};

#[derive(Subcommand)]
pub enum LogAction {
    /// Log a contact with a friend
    Add {
        /// Friend ID
        friend_id: String,
        /// call, text, video_call, in_person, social_media, email or other
        #[arg(long, default_value = "call")]
        kind: InteractionType,
        /// When it happened (RFC 3339); defaults to now
        #[arg(long)]
        at: Option<DateTime<Utc>>,
        /// Free-text note
        #[arg(long)]
        note: Option<String>,
        /// Duration in minutes
        #[arg(long)]
        duration: Option<u32>,
    },
    /// Show a friend's interaction history, newest first
    List {
        /// Friend ID
        friend_id: String,
    },
    /// Remove a logged interaction
    Remove {
        /// Interaction ID
        id: String,
    },
}

pub fn run(action: LogAction) -> CommandResult {
    let mut roster = open_roster()?;

    match action {
        LogAction::Add {
            friend_id,
            kind,
            at,
            note,
            duration,
        } => {
            let interaction = roster.log_interaction(NewInteraction {
                friend_id,
                kind,
                occurred_at: at,
                note,
                duration_min: duration,
            })?;
            eprintln!("Interaction logged: {}", interaction.id);
            if let Some(friend) = roster.friend(&interaction.friend_id) {
                print_json(friend)?;
            }
        }
        LogAction::List { friend_id } => {
            let config = Config::load()?;
            let history =
                roster.history(&friend_id, config.entitlement(), config.history.free_days)?;
            print_json(&history)?;
        }
        LogAction::Remove { id } => {
            let removed = roster.remove_interaction(&id)?;
            println!("Interaction removed: {}", removed.id);
        }
    }

    flush_events(&mut roster);
    Ok(())
}
