use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::interaction::InteractionType;

/// Every roster mutation produces an Event.
/// The presentation layer drains them after each command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    FriendAdded {
        friend_id: String,
        tier_id: String,
        next_due_at: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    InteractionLogged {
        interaction_id: String,
        friend_id: String,
        kind: InteractionType,
        next_due_at: DateTime<Utc>,
        streak_count: u32,
        at: DateTime<Utc>,
    },
    InteractionRemoved {
        interaction_id: String,
        friend_id: String,
        at: DateTime<Utc>,
    },
    TierChanged {
        friend_id: String,
        from_tier: String,
        to_tier: String,
        next_due_at: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    FavoriteToggled {
        friend_id: String,
        favorite: bool,
        at: DateTime<Utc>,
    },
    FriendDeleted {
        friend_id: String,
        /// Interactions removed along with the friend.
        interactions_removed: usize,
        at: DateTime<Utc>,
    },
    FriendRecomputed {
        friend_id: String,
        next_due_at: DateTime<Utc>,
        streak_count: u32,
        at: DateTime<Utc>,
    },
    TiersUpdated {
        tier_count: usize,
        at: DateTime<Utc>,
    },
    /// A storage write failed; in-memory state was kept.
    PersistenceFailed {
        operation: String,
        message: String,
        at: DateTime<Utc>,
    },
}
