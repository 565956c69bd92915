use std::sync::Mutex;

use crate::error::Result;
use crate::friend::Friend;
use crate::interaction::Interaction;
use crate::tier::Tier;

/// Storage collaborator for the roster.
///
/// Implementations own durability only; the roster owns every derived field
/// and never reads back what it wrote.
pub trait RosterStore {
    fn load_friends(&self) -> Result<Vec<Friend>>;

    fn load_interactions(&self) -> Result<Vec<Interaction>>;

    /// Insert or replace.
    fn save_friend(&self, friend: &Friend) -> Result<()>;

    /// Remove a friend and every interaction that references it.
    fn delete_friend(&self, friend_id: &str) -> Result<()>;

    fn append_interaction(&self, interaction: &Interaction) -> Result<()>;

    fn delete_interaction(&self, interaction_id: &str) -> Result<()>;

    /// Stored catalog. An empty vec means none has been saved yet.
    fn load_tier_catalog(&self) -> Result<Vec<Tier>>;

    fn save_tier_catalog(&self, tiers: &[Tier]) -> Result<()>;
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryState>,
}

#[derive(Debug, Default, Clone)]
struct MemoryState {
    friends: Vec<Friend>,
    interactions: Vec<Interaction>,
    tiers: Vec<Tier>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl RosterStore for MemoryStore {
    fn load_friends(&self) -> Result<Vec<Friend>> {
        Ok(self.state().friends.clone())
    }

    fn load_interactions(&self) -> Result<Vec<Interaction>> {
        Ok(self.state().interactions.clone())
    }

    fn save_friend(&self, friend: &Friend) -> Result<()> {
        let mut state = self.state();
        match state.friends.iter_mut().find(|f| f.id == friend.id) {
            Some(existing) => *existing = friend.clone(),
            None => state.friends.push(friend.clone()),
        }
        Ok(())
    }

    fn delete_friend(&self, friend_id: &str) -> Result<()> {
        let mut state = self.state();
        state.friends.retain(|f| f.id != friend_id);
        state.interactions.retain(|i| i.friend_id != friend_id);
        Ok(())
    }

    fn append_interaction(&self, interaction: &Interaction) -> Result<()> {
        self.state().interactions.push(interaction.clone());
        Ok(())
    }

    fn delete_interaction(&self, interaction_id: &str) -> Result<()> {
        self.state().interactions.retain(|i| i.id != interaction_id);
        Ok(())
    }

    fn load_tier_catalog(&self) -> Result<Vec<Tier>> {
        Ok(self.state().tiers.clone())
    }

    fn save_tier_catalog(&self, tiers: &[Tier]) -> Result<()> {
        self.state().tiers = tiers.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::InteractionType;
    use chrono::Utc;

    #[test]
    fn delete_friend_cascades_to_interactions() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let friend = Friend {
            id: "f1".into(),
            name: "Ada".into(),
            tier_id: "inner_circle".into(),
            last_contact_at: None,
            last_spoken_estimate: None,
            next_due_at: now,
            streak_count: 0,
            birthday: None,
            favorite: false,
            created_at: now,
        };
        store.save_friend(&friend).unwrap();
        store
            .append_interaction(&Interaction {
                id: "i1".into(),
                friend_id: "f1".into(),
                kind: InteractionType::Call,
                occurred_at: now,
                note: None,
                duration_min: None,
            })
            .unwrap();

        store.delete_friend("f1").unwrap();
        assert!(store.load_friends().unwrap().is_empty());
        assert!(store.load_interactions().unwrap().is_empty());
    }
}
