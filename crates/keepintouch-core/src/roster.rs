//! In-memory roster and its event handlers.
//!
//! The roster owns friends, the interaction log and the tier catalog. Each
//! handler mutates memory first, recomputes derived fields from a snapshot
//! that already includes the change, then writes through to the store.
//! Store failures are logged and reported as [`Event::PersistenceFailed`];
//! the in-memory state is kept either way.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::engine::{
    compute_streak, next_due_at, suggest_contact_day, upcoming_birthdays, HealthAggregator,
    HealthStats, Suggestion, UpcomingBirthday,
};
use crate::entitlement::Entitlement;
use crate::error::{Result, ValidationError};
use crate::events::Event;
use crate::friend::{Birthday, Friend, NewFriend};
use crate::interaction::{for_friend, Interaction, NewInteraction};
use crate::persistence::RosterStore;
use crate::tier::TierCatalog;

pub struct Roster<S: RosterStore, C: Clock = SystemClock> {
    store: S,
    clock: C,
    tiers: TierCatalog,
    friends: Vec<Friend>,
    interactions: Vec<Interaction>,
    events: Vec<Event>,
}

impl<S: RosterStore, C: Clock> Roster<S, C> {
    /// Load everything from `store`. An empty stored catalog is seeded with
    /// the default tiers.
    ///
    /// # Errors
    /// Returns an error if any load fails or the stored catalog is invalid.
    pub fn load(store: S, clock: C) -> Result<Self> {
        let stored = store.load_tier_catalog()?;
        let seeded = stored.is_empty();
        let tiers = if seeded {
            TierCatalog::default()
        } else {
            TierCatalog::new(stored)?
        };
        let friends = store.load_friends()?;
        let interactions = store.load_interactions()?;
        debug!(
            friends = friends.len(),
            interactions = interactions.len(),
            tiers = tiers.len(),
            "roster loaded"
        );

        let mut roster = Self {
            store,
            clock,
            tiers,
            friends,
            interactions,
            events: Vec::new(),
        };
        if seeded {
            let result = roster.store.save_tier_catalog(roster.tiers.as_slice());
            roster.persist("save_tier_catalog", result);
        }
        Ok(roster)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn tiers(&self) -> &TierCatalog {
        &self.tiers
    }

    pub fn friends(&self) -> &[Friend] {
        &self.friends
    }

    pub fn friend(&self, friend_id: &str) -> Option<&Friend> {
        self.friends.iter().find(|f| f.id == friend_id)
    }

    pub fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    /// Take every event produced since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    // ── Event handlers ─────────────────────────────────────────────────

    /// Add a friend. The due date runs from the "last spoken" estimate if
    /// given, otherwise from now.
    ///
    /// # Errors
    /// Returns a validation error for an empty name, unknown tier or
    /// malformed birthday.
    pub fn add_friend(&mut self, new: NewFriend) -> Result<&Friend> {
        let name = new.name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "name".into(),
                message: "must not be empty".into(),
            }
            .into());
        }
        let tier = self
            .tiers
            .get(&new.tier_id)
            .ok_or_else(|| ValidationError::UnknownTier(new.tier_id.clone()))?;
        let birthday = match new.birthday.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(raw.parse::<Birthday>()?.to_string()),
            _ => None,
        };

        let now = self.clock.now();
        let friend = Friend {
            id: Uuid::new_v4().to_string(),
            name,
            tier_id: tier.id.clone(),
            last_contact_at: new.last_spoken_at,
            last_spoken_estimate: new.last_spoken_at,
            next_due_at: next_due_at(new.last_spoken_at.unwrap_or(now), tier),
            streak_count: 0,
            birthday,
            favorite: new.favorite,
            created_at: now,
        };
        info!(friend_id = %friend.id, tier = %friend.tier_id, "friend added");

        let result = self.store.save_friend(&friend);
        self.events.push(Event::FriendAdded {
            friend_id: friend.id.clone(),
            tier_id: friend.tier_id.clone(),
            next_due_at: friend.next_due_at,
            at: now,
        });
        self.friends.push(friend);
        self.persist("save_friend", result);

        let idx = self.friends.len() - 1;
        Ok(&self.friends[idx])
    }

    /// Append an interaction and recompute the friend's due date and streak.
    ///
    /// After this call `next_due_at == occurred_at + cadence`, even for a
    /// backdated interaction. `last_contact_at` never moves backwards.
    ///
    /// # Errors
    /// Returns a validation error if the friend or its tier is unknown.
    pub fn log_interaction(&mut self, new: NewInteraction) -> Result<Interaction> {
        let idx = self.index_of(&new.friend_id)?;
        self.require_tier(idx)?;

        let now = self.clock.now();
        let interaction = Interaction {
            id: Uuid::new_v4().to_string(),
            friend_id: new.friend_id,
            kind: new.kind,
            occurred_at: new.occurred_at.unwrap_or(now),
            note: new.note.filter(|n| !n.trim().is_empty()),
            duration_min: new.duration_min,
        };

        self.interactions.push(interaction.clone());
        let appended = self.store.append_interaction(&interaction);
        self.persist("append_interaction", appended);

        let last_contact = self.last_contact(idx);
        self.refresh(idx, last_contact, Some(interaction.occurred_at))?;
        let saved = self.store.save_friend(&self.friends[idx]);
        self.persist("save_friend", saved);

        let friend = &self.friends[idx];
        info!(
            friend_id = %friend.id,
            kind = %interaction.kind,
            streak = friend.streak_count,
            "interaction logged"
        );
        self.events.push(Event::InteractionLogged {
            interaction_id: interaction.id.clone(),
            friend_id: friend.id.clone(),
            kind: interaction.kind,
            next_due_at: friend.next_due_at,
            streak_count: friend.streak_count,
            at: now,
        });
        Ok(interaction)
    }

    /// Delete one interaction and recompute its friend from what remains.
    /// With no interactions left the friend falls back to its "last spoken"
    /// estimate, or to its creation time.
    ///
    /// # Errors
    /// Returns a validation error if the interaction is unknown.
    pub fn remove_interaction(&mut self, interaction_id: &str) -> Result<Interaction> {
        let pos = self
            .interactions
            .iter()
            .position(|i| i.id == interaction_id)
            .ok_or_else(|| ValidationError::UnknownInteraction(interaction_id.to_string()))?;
        let removed = self.interactions.remove(pos);
        let deleted = self.store.delete_interaction(&removed.id);
        self.persist("delete_interaction", deleted);

        if let Ok(idx) = self.index_of(&removed.friend_id) {
            let last_contact = self.last_contact(idx);
            if self.refresh(idx, last_contact, None).is_ok() {
                let saved = self.store.save_friend(&self.friends[idx]);
                self.persist("save_friend", saved);
            }
        }

        self.events.push(Event::InteractionRemoved {
            interaction_id: removed.id.clone(),
            friend_id: removed.friend_id.clone(),
            at: self.clock.now(),
        });
        Ok(removed)
    }

    /// Move a friend to another tier. Reassigning the current tier is a
    /// no-op; otherwise the due date is recomputed from the last contact
    /// (or creation time) with the new cadence.
    ///
    /// # Errors
    /// Returns a validation error if the friend or tier is unknown.
    pub fn change_tier(&mut self, friend_id: &str, tier_id: &str) -> Result<&Friend> {
        let idx = self.index_of(friend_id)?;
        if self.friends[idx].tier_id == tier_id {
            return Ok(&self.friends[idx]);
        }
        let tier = self
            .tiers
            .get(tier_id)
            .ok_or_else(|| ValidationError::UnknownTier(tier_id.to_string()))?;

        let friend = &mut self.friends[idx];
        let from_tier = std::mem::replace(&mut friend.tier_id, tier.id.clone());
        friend.next_due_at = next_due_at(friend.due_reference(), tier);
        info!(friend_id, from = %from_tier, to = tier_id, "tier changed");

        self.events.push(Event::TierChanged {
            friend_id: friend_id.to_string(),
            from_tier,
            to_tier: tier_id.to_string(),
            next_due_at: friend.next_due_at,
            at: self.clock.now(),
        });
        let saved = self.store.save_friend(&self.friends[idx]);
        self.persist("save_friend", saved);
        Ok(&self.friends[idx])
    }

    /// # Errors
    /// Returns a validation error if the friend is unknown.
    pub fn set_favorite(&mut self, friend_id: &str, favorite: bool) -> Result<&Friend> {
        let idx = self.index_of(friend_id)?;
        if self.friends[idx].favorite != favorite {
            self.friends[idx].favorite = favorite;
            self.events.push(Event::FavoriteToggled {
                friend_id: friend_id.to_string(),
                favorite,
                at: self.clock.now(),
            });
            let saved = self.store.save_friend(&self.friends[idx]);
            self.persist("save_friend", saved);
        }
        Ok(&self.friends[idx])
    }

    /// Remove a friend and all of its interactions.
    ///
    /// # Errors
    /// Returns a validation error if the friend is unknown.
    pub fn delete_friend(&mut self, friend_id: &str) -> Result<Friend> {
        let idx = self.index_of(friend_id)?;
        let friend = self.friends.remove(idx);
        let before = self.interactions.len();
        self.interactions.retain(|i| i.friend_id != friend_id);
        let interactions_removed = before - self.interactions.len();
        info!(friend_id, interactions_removed, "friend deleted");

        let deleted = self.store.delete_friend(friend_id);
        self.persist("delete_friend", deleted);
        self.events.push(Event::FriendDeleted {
            friend_id: friend_id.to_string(),
            interactions_removed,
            at: self.clock.now(),
        });
        Ok(friend)
    }

    /// Replace the tier catalog. Existing due dates are left as they are
    /// until the next interaction or an explicit recompute.
    ///
    /// # Errors
    /// Returns a validation error if a tier that still has members would be
    /// dropped.
    pub fn update_tiers(&mut self, catalog: TierCatalog) -> Result<()> {
        if let Some(orphan) = self.friends.iter().find(|f| !catalog.contains(&f.tier_id)) {
            return Err(ValidationError::InvalidValue {
                field: "tiers".into(),
                message: format!("tier '{}' still has friends assigned", orphan.tier_id),
            }
            .into());
        }
        self.tiers = catalog;
        let saved = self.store.save_tier_catalog(self.tiers.as_slice());
        self.persist("save_tier_catalog", saved);
        self.events.push(Event::TiersUpdated {
            tier_count: self.tiers.len(),
            at: self.clock.now(),
        });
        Ok(())
    }

    /// Recompute one friend's due date and streak from its history. The
    /// last contact becomes the newer of the newest interaction and the
    /// initial estimate.
    ///
    /// # Errors
    /// Returns a validation error if the friend or its tier is unknown.
    pub fn recompute(&mut self, friend_id: &str) -> Result<&Friend> {
        let idx = self.index_of(friend_id)?;
        let last_contact = self.last_contact(idx);
        self.refresh(idx, last_contact, None)?;

        let friend = &self.friends[idx];
        self.events.push(Event::FriendRecomputed {
            friend_id: friend.id.clone(),
            next_due_at: friend.next_due_at,
            streak_count: friend.streak_count,
            at: self.clock.now(),
        });
        let saved = self.store.save_friend(&self.friends[idx]);
        self.persist("save_friend", saved);
        Ok(&self.friends[idx])
    }

    /// Recompute every friend. Friends in unknown tiers are skipped.
    /// Returns how many were recomputed.
    pub fn recompute_all(&mut self) -> usize {
        let ids: Vec<String> = self.friends.iter().map(|f| f.id.clone()).collect();
        let mut done = 0;
        for id in ids {
            match self.recompute(&id) {
                Ok(_) => done += 1,
                Err(e) => warn!(friend_id = %id, error = %e, "skipping recompute"),
            }
        }
        done
    }

    // ── Read-side views ────────────────────────────────────────────────

    pub fn health(&self, aggregator: &HealthAggregator) -> HealthStats {
        aggregator.aggregate(&self.friends, &self.tiers, &self.interactions, self.clock.now())
    }

    pub fn upcoming_birthdays(&self, window_days: i64) -> Vec<UpcomingBirthday> {
        upcoming_birthdays(&self.friends, self.clock.now().date_naive(), window_days)
    }

    /// Friends past their due date, most overdue first.
    pub fn overdue(&self) -> Vec<&Friend> {
        let now = self.clock.now();
        let mut overdue: Vec<&Friend> = self.friends.iter().filter(|f| f.is_overdue(now)).collect();
        overdue.sort_by_key(|f| f.next_due_at);
        overdue
    }

    /// # Errors
    /// Returns a validation error if the friend is unknown.
    pub fn suggestion(
        &self,
        friend_id: &str,
        entitlement: Entitlement,
    ) -> Result<Option<Suggestion>> {
        let friend = self
            .friend(friend_id)
            .ok_or_else(|| ValidationError::UnknownFriend(friend_id.to_string()))?;
        Ok(suggest_contact_day(
            &friend.name,
            for_friend(&self.interactions, friend_id),
            entitlement,
        ))
    }

    /// A friend's interactions, newest first. Free users only see the last
    /// `free_days` days.
    ///
    /// # Errors
    /// Returns a validation error if the friend is unknown.
    pub fn history(
        &self,
        friend_id: &str,
        entitlement: Entitlement,
        free_days: u32,
    ) -> Result<Vec<&Interaction>> {
        self.index_of(friend_id)?;
        let cutoff = match entitlement {
            Entitlement::Premium => None,
            Entitlement::Free => Some(self.clock.now() - Duration::days(i64::from(free_days))),
        };
        let mut history: Vec<&Interaction> = for_friend(&self.interactions, friend_id)
            .filter(|i| cutoff.map_or(true, |c| i.occurred_at >= c))
            .collect();
        history.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
        Ok(history)
    }

    // ── Internals ──────────────────────────────────────────────────────

    fn index_of(&self, friend_id: &str) -> Result<usize> {
        self.friends
            .iter()
            .position(|f| f.id == friend_id)
            .ok_or_else(|| ValidationError::UnknownFriend(friend_id.to_string()).into())
    }

    fn require_tier(&self, idx: usize) -> Result<()> {
        let tier_id = &self.friends[idx].tier_id;
        if self.tiers.contains(tier_id) {
            Ok(())
        } else {
            Err(ValidationError::UnknownTier(tier_id.clone()).into())
        }
    }

    /// Newest logged interaction or the "last spoken" estimate, whichever
    /// is later.
    fn last_contact(&self, idx: usize) -> Option<DateTime<Utc>> {
        let friend = &self.friends[idx];
        for_friend(&self.interactions, &friend.id)
            .map(|i| i.occurred_at)
            .max()
            .max(friend.last_spoken_estimate)
    }

    /// Rewrite the derived fields of `friends[idx]`. The interaction log
    /// must already reflect the triggering change. The due date runs from
    /// `due_from` when given, otherwise from the last contact.
    fn refresh(
        &mut self,
        idx: usize,
        last_contact_at: Option<DateTime<Utc>>,
        due_from: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let now = self.clock.now();
        let friend = &mut self.friends[idx];
        let tier = self
            .tiers
            .get(&friend.tier_id)
            .ok_or_else(|| ValidationError::UnknownTier(friend.tier_id.clone()))?;

        friend.last_contact_at = last_contact_at;
        let reference = due_from.unwrap_or_else(|| friend.due_reference());
        friend.next_due_at = next_due_at(reference, tier);
        friend.streak_count =
            compute_streak(for_friend(&self.interactions, &friend.id), tier.cadence_days, now);
        Ok(())
    }

    fn persist(&mut self, operation: &str, result: Result<()>) {
        if let Err(e) = result {
            warn!(operation, error = %e, "store write failed; keeping in-memory state");
            self.events.push(Event::PersistenceFailed {
                operation: operation.to_string(),
                message: e.to_string(),
                at: self.clock.now(),
            });
        }
    }
}
