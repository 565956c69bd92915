//! Weekday-pattern hint.
//!
//! A frequency count over the most recent interactions. If one weekday shows
//! up at least twice, the user gets nudged to reach out on that day.

use chrono::{Datelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::entitlement::Entitlement;
use crate::interaction::Interaction;

pub const MIN_INTERACTIONS_FOR_SUGGESTION: usize = 3;
pub const SUGGESTION_SAMPLE_SIZE: usize = 10;
pub const MIN_WEEKDAY_HITS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub weekday: Weekday,
    /// Hits for `weekday` within the sample.
    pub occurrences: usize,
    pub message: String,
}

/// Suggest a contact day for `friend_name` from their interactions.
///
/// Premium only. Ties go to the weekday seen first in the newest-first
/// sample.
pub fn suggest_contact_day<'a, I>(
    friend_name: &str,
    interactions: I,
    entitlement: Entitlement,
) -> Option<Suggestion>
where
    I: IntoIterator<Item = &'a Interaction>,
{
    if !entitlement.is_premium() {
        return None;
    }

    let mut recent: Vec<&Interaction> = interactions.into_iter().collect();
    if recent.len() < MIN_INTERACTIONS_FOR_SUGGESTION {
        return None;
    }
    recent.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
    recent.truncate(SUGGESTION_SAMPLE_SIZE);

    // Discovery order matters for tie-breaking, so no HashMap here.
    let mut tally: Vec<(Weekday, usize)> = Vec::with_capacity(7);
    for interaction in recent {
        let day = interaction.occurred_at.weekday();
        match tally.iter_mut().find(|(d, _)| *d == day) {
            Some((_, count)) => *count += 1,
            None => tally.push((day, 1)),
        }
    }

    let mut best: Option<(Weekday, usize)> = None;
    for (day, count) in tally {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((day, count));
        }
    }

    let (weekday, occurrences) = best.filter(|(_, count)| *count >= MIN_WEEKDAY_HITS)?;
    let day = weekday_name(weekday);
    Some(Suggestion {
        weekday,
        occurrences,
        message: format!("You often connect with {friend_name} on {day}s. Reach out this {day}?"),
    })
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::InteractionType;
    use chrono::{DateTime, TimeZone, Utc};

    // 2024-06-03 is a Monday.
    fn on(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, 18, 0, 0).unwrap()
    }

    fn log(days: &[u32]) -> Vec<Interaction> {
        days.iter()
            .enumerate()
            .map(|(n, d)| Interaction {
                id: format!("i{n}"),
                friend_id: "f".into(),
                kind: InteractionType::VideoCall,
                occurred_at: on(*d),
                note: None,
                duration_min: None,
            })
            .collect()
    }

    #[test]
    fn two_interactions_are_not_enough() {
        let history = log(&[3, 10]);
        assert!(suggest_contact_day("Sam", &history, Entitlement::Premium).is_none());
    }

    #[test]
    fn repeated_weekday_is_suggested() {
        let history = log(&[3, 5, 10]);
        let hint = suggest_contact_day("Sam", &history, Entitlement::Premium).unwrap();
        assert_eq!(hint.weekday, Weekday::Mon);
        assert_eq!(hint.occurrences, 2);
        assert!(hint.message.contains("Sam"));
        assert!(hint.message.contains("Monday"));
    }

    #[test]
    fn all_distinct_weekdays_yield_nothing() {
        let history = log(&[3, 4, 5, 6]);
        assert!(suggest_contact_day("Sam", &history, Entitlement::Premium).is_none());
    }

    #[test]
    fn free_tier_never_gets_a_hint() {
        let history = log(&[3, 10, 17]);
        assert!(suggest_contact_day("Sam", &history, Entitlement::Free).is_none());
    }

    #[test]
    fn only_ten_most_recent_are_sampled() {
        // Five older Mondays would win if they were sampled.
        let mut history: Vec<Interaction> = [(4, 29), (5, 6), (5, 13), (5, 20), (5, 27)]
            .iter()
            .map(|(m, d)| Utc.with_ymd_and_hms(2024, *m, *d, 9, 0, 0).unwrap())
            .chain([4, 5, 6, 7, 8, 9, 11, 12, 18, 25].into_iter().map(on))
            .enumerate()
            .map(|(n, at)| Interaction {
                id: format!("i{n}"),
                friend_id: "f".into(),
                kind: InteractionType::Call,
                occurred_at: at,
                note: None,
                duration_min: None,
            })
            .collect();
        history.reverse();
        let hint = suggest_contact_day("Sam", &history, Entitlement::Premium).unwrap();
        assert_eq!(hint.weekday, Weekday::Tue);
        assert_eq!(hint.occurrences, 4);
    }

    #[test]
    fn ties_go_to_most_recent_weekday_first_seen() {
        // Tuesday 11th and 4th, Monday 10th and 3rd. Newest first: Tue, Mon, ...
        let history = log(&[3, 4, 10, 11]);
        let hint = suggest_contact_day("Sam", &history, Entitlement::Premium).unwrap();
        assert_eq!(hint.weekday, Weekday::Tue);
    }
}
