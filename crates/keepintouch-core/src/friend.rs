//! Friend records and birthdays.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// A tracked relationship.
///
/// `next_due_at` is written only when the engine recomputes it (friend
/// creation, logged interaction, tier change, explicit recompute). Editing a
/// tier's cadence does not touch it, so it can lag behind the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Friend {
    pub id: String,
    pub name: String,
    pub tier_id: String,
    /// Newest of the logged interactions and `last_spoken_estimate`.
    /// `None` means never contacted.
    pub last_contact_at: Option<DateTime<Utc>>,
    /// "Last spoken" estimate given when the friend was added.
    #[serde(default)]
    pub last_spoken_estimate: Option<DateTime<Utc>>,
    pub next_due_at: DateTime<Utc>,
    pub streak_count: u32,
    /// Raw month/day string as entered ("MM-DD" or "YYYY-MM-DD").
    pub birthday: Option<String>,
    pub favorite: bool,
    pub created_at: DateTime<Utc>,
}

impl Friend {
    /// Instant the due date is measured from.
    pub fn due_reference(&self) -> DateTime<Utc> {
        self.last_contact_at.unwrap_or(self.created_at)
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.next_due_at < now
    }
}

/// Input for adding a friend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewFriend {
    pub name: String,
    pub tier_id: String,
    /// Rough estimate of when the user last spoke to this person.
    pub last_spoken_at: Option<DateTime<Utc>>,
    pub birthday: Option<String>,
    pub favorite: bool,
}

/// Month and day of a birthday. The year is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Birthday {
    month: u32,
    day: u32,
}

impl Birthday {
    pub fn new(month: u32, day: u32) -> Option<Self> {
        // 2000 is a leap year, so Feb 29 is accepted.
        NaiveDate::from_ymd_opt(2000, month, day).map(|_| Self { month, day })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// The date this birthday falls on in `year`. Feb 29 lands on Feb 28
    /// outside leap years.
    pub fn in_year(&self, year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, self.month, self.day)
            .or_else(|| NaiveDate::from_ymd_opt(year, self.month, self.day - 1))
            .unwrap_or(NaiveDate::MIN)
    }

    /// Next occurrence on or after `today`.
    pub fn next_occurrence(&self, today: NaiveDate) -> NaiveDate {
        let this_year = self.in_year(today.year());
        if this_year >= today {
            this_year
        } else {
            self.in_year(today.year() + 1)
        }
    }
}

impl FromStr for Birthday {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidBirthday(s.to_string());
        let parts: Vec<&str> = s.trim().split('-').collect();
        let (month, day) = match parts.as_slice() {
            [m, d] => (*m, *d),
            [y, m, d] if y.len() == 4 && y.chars().all(|c| c.is_ascii_digit()) => (*m, *d),
            _ => return Err(invalid()),
        };
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        let day = day.parse::<u32>().map_err(|_| invalid())?;
        Birthday::new(month, day).ok_or_else(invalid)
    }
}

impl fmt::Display for Birthday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}
