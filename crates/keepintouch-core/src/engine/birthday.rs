//! Upcoming birthdays within a short forward window.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::friend::{Birthday, Friend};

/// Forward horizon for birthday reminders.
pub const BIRTHDAY_LOOKAHEAD_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingBirthday {
    pub friend_id: String,
    pub name: String,
    pub birthday: Birthday,
    pub date: NaiveDate,
    pub days_until: i64,
}

/// Friends whose next birthday is within `window_days` of `today`, soonest
/// first. Friends with no birthday, or an unparseable one, are skipped.
pub fn upcoming_birthdays(
    friends: &[Friend],
    today: NaiveDate,
    window_days: i64,
) -> Vec<UpcomingBirthday> {
    let mut upcoming: Vec<UpcomingBirthday> = friends
        .iter()
        .filter_map(|friend| {
            let raw = friend.birthday.as_deref()?;
            let birthday = match raw.parse::<Birthday>() {
                Ok(b) => b,
                Err(_) => {
                    debug!(friend_id = %friend.id, birthday = raw, "skipping malformed birthday");
                    return None;
                }
            };
            let date = birthday.next_occurrence(today);
            let days_until = (date - today).num_days();
            (days_until <= window_days).then(|| UpcomingBirthday {
                friend_id: friend.id.clone(),
                name: friend.name.clone(),
                birthday,
                date,
                days_until,
            })
        })
        .collect();

    upcoming.sort_by_key(|u| u.days_until);
    upcoming
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn friend(id: &str, birthday: Option<&str>) -> Friend {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Friend {
            id: id.into(),
            name: id.to_uppercase(),
            tier_id: "inner_circle".into(),
            last_contact_at: None,
            last_spoken_estimate: None,
            next_due_at: created,
            streak_count: 0,
            birthday: birthday.map(String::from),
            favorite: false,
            created_at: created,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn sorted_soonest_first_and_window_applied() {
        let friends = vec![
            friend("a", Some("07-20")),
            friend("b", Some("07-02")),
            friend("c", Some("09-01")),
            friend("d", None),
            friend("e", Some("not-a-date")),
            friend("f", Some("07-01")),
        ];
        let got = upcoming_birthdays(&friends, date(2024, 7, 1), BIRTHDAY_LOOKAHEAD_DAYS);
        let ids: Vec<&str> = got.iter().map(|u| u.friend_id.as_str()).collect();
        assert_eq!(ids, vec!["f", "b", "a"]);
        assert_eq!(got[0].days_until, 0);
        assert_eq!(got[1].days_until, 1);
        assert_eq!(got[2].days_until, 19);
    }

    #[test]
    fn passed_birthday_rolls_into_next_year() {
        let friends = vec![friend("a", Some("01-05"))];
        let got = upcoming_birthdays(&friends, date(2024, 12, 20), BIRTHDAY_LOOKAHEAD_DAYS);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].date, date(2025, 1, 5));
        assert_eq!(got[0].days_until, 16);
    }

    #[test]
    fn exactly_thirty_days_is_included() {
        let friends = vec![friend("a", Some("07-31")), friend("b", Some("08-01"))];
        let got = upcoming_birthdays(&friends, date(2024, 7, 1), BIRTHDAY_LOOKAHEAD_DAYS);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].friend_id, "a");
    }

    proptest! {
        #[test]
        fn results_stay_in_window_and_sorted(
            birthdays in proptest::collection::vec((1u32..=12, 1u32..=31), 0..30),
            day_of_year in 0i64..366,
        ) {
            let today = date(2023, 1, 1) + chrono::Duration::days(day_of_year);
            let friends: Vec<Friend> = birthdays
                .iter()
                .enumerate()
                .map(|(n, (m, d))| friend(&format!("f{n}"), Some(&format!("{m:02}-{d:02}"))))
                .collect();
            let got = upcoming_birthdays(&friends, today, BIRTHDAY_LOOKAHEAD_DAYS);
            for u in &got {
                prop_assert!(u.days_until >= 0 && u.days_until <= BIRTHDAY_LOOKAHEAD_DAYS);
            }
            prop_assert!(got.windows(2).all(|w| w[0].days_until <= w[1].days_until));
        }
    }
}
