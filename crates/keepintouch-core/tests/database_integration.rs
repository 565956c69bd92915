//! Integration tests for the SQLite roster store.
//!
//! Writes through a roster, reopens the database file and checks that the
//! persisted state matches what was computed in memory.

use chrono::{Duration, TimeZone, Utc};
use keepintouch_core::{
    Database, FixedClock, InteractionType, NewFriend, NewInteraction, Roster, RosterStore,
    TierCatalog,
};

#[test]
fn roster_state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keepintouch.db");
    let now = Utc.with_ymd_and_hms(2024, 5, 20, 18, 30, 0).unwrap();

    let (friend_id, expected) = {
        let db = Database::open_at(&path).unwrap();
        let mut roster = Roster::load(db, FixedClock::new(now)).unwrap();
        let id = roster
            .add_friend(NewFriend {
                name: "Ada".into(),
                tier_id: "inner_circle".into(),
                birthday: Some("06-01".into()),
                favorite: true,
                ..Default::default()
            })
            .unwrap()
            .id
            .clone();
        for days_ago in [8, 1] {
            roster
                .log_interaction(
                    NewInteraction::new(&id, InteractionType::Call)
                        .at(now - Duration::days(days_ago))
                        .with_note("catch-up"),
                )
                .unwrap();
        }
        let mut catalog = roster.tiers().clone();
        catalog.set_cadence("close_friends", 21).unwrap();
        roster.update_tiers(catalog).unwrap();
        assert!(roster.drain_events().iter().all(|e| !matches!(
            e,
            keepintouch_core::Event::PersistenceFailed { .. }
        )));
        (id.clone(), roster.friend(&id).unwrap().clone())
    };

    let db = Database::open_at(&path).unwrap();
    assert_eq!(db.load_interactions().unwrap().len(), 2);
    let roster = Roster::load(db, FixedClock::new(now)).unwrap();
    assert_eq!(roster.friend(&friend_id), Some(&expected));
    assert_eq!(expected.streak_count, 2);
    assert_eq!(
        roster.tiers().get("close_friends").unwrap().cadence_days,
        21
    );
    assert_ne!(roster.tiers(), &TierCatalog::default());
}

#[test]
fn deleting_friend_removes_stored_interactions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keepintouch.db");
    let db = Database::open_at(&path).unwrap();
    let mut roster = Roster::load(db, FixedClock::new(Utc::now())).unwrap();
    let id = roster
        .add_friend(NewFriend {
            name: "Bo".into(),
            tier_id: "acquaintances".into(),
            ..Default::default()
        })
        .unwrap()
        .id
        .clone();
    roster
        .log_interaction(NewInteraction::new(&id, InteractionType::SocialMedia))
        .unwrap();
    roster.delete_friend(&id).unwrap();

    let reopened = Database::open_at(&path).unwrap();
    assert!(reopened.load_friends().unwrap().is_empty());
    assert!(reopened.load_interactions().unwrap().is_empty());
}
