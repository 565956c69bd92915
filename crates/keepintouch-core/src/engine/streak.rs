//! Consecutive-contact streak.
//!
//! The walk starts at `now` and steps backwards through the history, newest
//! first. Each interaction within 1.5 cadences of the current anchor extends
//! the streak and becomes the new anchor. The first gap over the threshold
//! ends the walk, so an older unbroken run is never counted.

use chrono::{DateTime, Utc};

use crate::interaction::Interaction;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Streak for one friend's interactions (any order) under `cadence_days`.
pub fn compute_streak<'a, I>(interactions: I, cadence_days: u32, now: DateTime<Utc>) -> u32
where
    I: IntoIterator<Item = &'a Interaction>,
{
    let mut timestamps: Vec<DateTime<Utc>> =
        interactions.into_iter().map(|i| i.occurred_at).collect();
    timestamps.sort_unstable_by(|a, b| b.cmp(a));

    let threshold_days = f64::from(cadence_days) * 1.5;
    let mut anchor = now;
    let mut streak = 0;

    for at in timestamps {
        let gap_days = (anchor - at).num_milliseconds() as f64 / MILLIS_PER_DAY;
        if gap_days > threshold_days {
            break;
        }
        streak += 1;
        anchor = at;
    }
    streak
}
