use chrono::{DateTime, Duration, Utc};

use crate::tier::Tier;

/// `reference + tier.cadence_days`.
///
/// The reference is the friend's creation time (or "last spoken" estimate)
/// until an interaction exists, then the timestamp of the interaction that
/// triggered the recompute.
pub fn next_due_at(reference: DateTime<Utc>, tier: &Tier) -> DateTime<Utc> {
    reference + Duration::days(i64::from(tier.cadence_days))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn adds_cadence_days() {
        let tier = Tier::new("monthly", "Monthly", 30).unwrap();
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap();
        assert_eq!(
            next_due_at(at, &tier),
            Utc.with_ymd_and_hms(2024, 2, 14, 9, 30, 0).unwrap()
        );
    }
}
