//! Derived-state computations.
//!
//! Everything here is a pure function of (roster, interactions, tiers, now).
//! The [`Roster`](crate::roster::Roster) calls into these on each event and
//! for read-side views.

mod birthday;
mod due_date;
mod health;
mod streak;
mod suggestion;

pub use birthday::{upcoming_birthdays, UpcomingBirthday, BIRTHDAY_LOOKAHEAD_DAYS};
pub use due_date::next_due_at;
pub use health::{HealthAggregator, HealthStats, TierHealth};
pub use streak::compute_streak;
pub use suggestion::{
    suggest_contact_day, Suggestion, MIN_INTERACTIONS_FOR_SUGGESTION, MIN_WEEKDAY_HITS,
    SUGGESTION_SAMPLE_SIZE,
};
