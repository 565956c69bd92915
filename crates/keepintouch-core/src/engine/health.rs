//! Relationship health aggregation.
//!
//! A friend is healthy when their last contact falls within their tier's
//! health window. Windows are fixed per tier and do not follow cadence edits.
//! Stats are recomputed from scratch on every call; nothing here is cached.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::birthday::{upcoming_birthdays, BIRTHDAY_LOOKAHEAD_DAYS};
use crate::friend::Friend;
use crate::interaction::Interaction;
use crate::tier::{Tier, TierCatalog};

/// Health of one tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierHealth {
    pub tier_id: String,
    pub tier_name: String,
    pub members: usize,
    pub healthy: usize,
    /// 0-100. Empty tiers score 100.
    pub score: u8,
}

/// Aggregate view over the whole roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStats {
    /// Member-weighted average of the tier scores (0-100).
    pub overall_score: u8,
    pub tiers: Vec<TierHealth>,
    pub total_contacts: usize,
    /// Interactions in the trailing 7 days.
    pub weekly_contacts: usize,
    /// Interactions in the trailing 30 days.
    pub monthly_contacts: usize,
    /// Best single-friend streak.
    pub longest_streak: u32,
    /// Sum of every friend's streak.
    pub current_streak: u32,
    pub overdue_count: usize,
    pub upcoming_birthdays: usize,
}

/// Computes [`HealthStats`] from the roster.
#[derive(Debug, Clone)]
pub struct HealthAggregator {
    /// Birthday lookahead window in days
    pub birthday_lookahead_days: i64,
}

impl Default for HealthAggregator {
    fn default() -> Self {
        Self {
            birthday_lookahead_days: BIRTHDAY_LOOKAHEAD_DAYS,
        }
    }
}

impl HealthAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lookahead(birthday_lookahead_days: i64) -> Self {
        Self {
            birthday_lookahead_days,
        }
    }

    /// Whether `friend` was contacted within `tier`'s health window.
    pub fn is_healthy(friend: &Friend, tier: &Tier, now: DateTime<Utc>) -> bool {
        match friend.last_contact_at {
            Some(at) => now - at <= Duration::days(i64::from(tier.health_window_days)),
            None => false,
        }
    }

    pub fn aggregate(
        &self,
        friends: &[Friend],
        catalog: &TierCatalog,
        interactions: &[Interaction],
        now: DateTime<Utc>,
    ) -> HealthStats {
        let tiers: Vec<TierHealth> = catalog
            .iter()
            .map(|tier| {
                let members: Vec<&Friend> =
                    friends.iter().filter(|f| f.tier_id == tier.id).collect();
                let healthy = members
                    .iter()
                    .filter(|f| Self::is_healthy(f, tier, now))
                    .count();
                TierHealth {
                    tier_id: tier.id.clone(),
                    tier_name: tier.name.clone(),
                    members: members.len(),
                    healthy,
                    score: percentage(healthy, members.len()),
                }
            })
            .collect();

        let orphaned = friends.iter().filter(|f| !catalog.contains(&f.tier_id)).count();
        if orphaned > 0 {
            debug!(orphaned, "friends reference tiers missing from the catalog");
        }

        let members: usize = tiers.iter().map(|t| t.members).sum();
        let healthy: usize = tiers.iter().map(|t| t.healthy).sum();

        let week_ago = now - Duration::days(7);
        let month_ago = now - Duration::days(30);

        HealthStats {
            overall_score: percentage(healthy, members),
            tiers,
            total_contacts: interactions.len(),
            weekly_contacts: interactions.iter().filter(|i| i.occurred_at >= week_ago).count(),
            monthly_contacts: interactions.iter().filter(|i| i.occurred_at >= month_ago).count(),
            longest_streak: friends.iter().map(|f| f.streak_count).max().unwrap_or(0),
            current_streak: friends
                .iter()
                .fold(0u32, |total, f| total.saturating_add(f.streak_count)),
            overdue_count: friends.iter().filter(|f| f.is_overdue(now)).count(),
            upcoming_birthdays: self.upcoming_birthday_count(friends, now.date_naive()),
        }
    }

    fn upcoming_birthday_count(&self, friends: &[Friend], today: NaiveDate) -> usize {
        upcoming_birthdays(friends, today, self.birthday_lookahead_days).len()
    }
}

/// Healthy share as a rounded percentage. An empty group is fully healthy.
fn percentage(healthy: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((healthy as f64 / total as f64) * 100.0).round() as u8
}
