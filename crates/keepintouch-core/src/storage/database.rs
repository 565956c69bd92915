//! SQLite-backed roster store.
//!
//! Provides persistent storage for:
//! - The tier catalog (ordered)
//! - Friend records with their derived due date and streak
//! - The interaction log, cascading on friend deletion

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use super::data_dir;
use crate::error::{DatabaseError, Result};
use crate::friend::Friend;
use crate::interaction::{Interaction, InteractionType};
use crate::persistence::RosterStore;
use crate::tier::Tier;

/// Bump when the schema changes.
const SCHEMA_VERSION: i32 = 1;

/// SQLite database holding tiers, friends and interactions.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data dir>/keepintouch.db`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(&data_dir()?.join("keepintouch.db"))
    }

    /// Open (or create) the database file at `path`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        let version: i32 = self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))?;
        if version > SCHEMA_VERSION {
            return Err(DatabaseError::MigrationFailed(format!(
                "database schema v{version} is newer than supported v{SCHEMA_VERSION}"
            ))
            .into());
        }

        self.conn.execute_batch(
            "PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS tiers (
                id                 TEXT PRIMARY KEY,
                name               TEXT NOT NULL,
                cadence_days       INTEGER NOT NULL CHECK (cadence_days > 0),
                health_window_days INTEGER NOT NULL,
                position           INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS friends (
                id              TEXT PRIMARY KEY,
                name            TEXT NOT NULL,
                tier_id         TEXT NOT NULL,
                last_contact_at TEXT,
                next_due_at     TEXT NOT NULL,
                streak_count    INTEGER NOT NULL DEFAULT 0,
                birthday        TEXT,
                favorite        INTEGER NOT NULL DEFAULT 0,
                created_at      TEXT NOT NULL,
                last_spoken_estimate TEXT
            );

            -- Rows are only ever inserted or deleted, never updated.
            CREATE TABLE IF NOT EXISTS interactions (
                id           TEXT PRIMARY KEY,
                friend_id    TEXT NOT NULL REFERENCES friends(id) ON DELETE CASCADE,
                kind         TEXT NOT NULL,
                occurred_at  TEXT NOT NULL,
                note         TEXT,
                duration_min INTEGER
            );

            CREATE INDEX IF NOT EXISTS idx_interactions_friend ON interactions(friend_id);
            CREATE INDEX IF NOT EXISTS idx_interactions_occurred_at ON interactions(occurred_at);
            CREATE INDEX IF NOT EXISTS idx_friends_next_due_at ON friends(next_due_at);

            PRAGMA user_version = 1;",
        )?;
        Ok(())
    }

    /// Look up one friend by id.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn get_friend(&self, id: &str) -> Result<Option<Friend>> {
        let friend = self
            .conn
            .query_row(
                "SELECT id, name, tier_id, last_contact_at, next_due_at, streak_count,
                        birthday, favorite, created_at, last_spoken_estimate
                 FROM friends WHERE id = ?1",
                params![id],
                row_to_friend,
            )
            .optional()?;
        Ok(friend)
    }
}

fn parse_ts(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn row_to_friend(row: &rusqlite::Row) -> rusqlite::Result<Friend> {
    let last_contact_at: Option<String> = row.get(3)?;
    let last_spoken_estimate: Option<String> = row.get(9)?;
    Ok(Friend {
        id: row.get(0)?,
        name: row.get(1)?,
        tier_id: row.get(2)?,
        last_contact_at: last_contact_at.as_deref().map(|s| parse_ts(3, s)).transpose()?,
        last_spoken_estimate: last_spoken_estimate
            .as_deref()
            .map(|s| parse_ts(9, s))
            .transpose()?,
        next_due_at: parse_ts(4, &row.get::<_, String>(4)?)?,
        streak_count: row.get(5)?,
        birthday: row.get(6)?,
        favorite: row.get(7)?,
        created_at: parse_ts(8, &row.get::<_, String>(8)?)?,
    })
}

fn row_to_interaction(row: &rusqlite::Row) -> rusqlite::Result<Interaction> {
    let kind: String = row.get(2)?;
    Ok(Interaction {
        id: row.get(0)?,
        friend_id: row.get(1)?,
        kind: kind
            .parse::<InteractionType>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?,
        occurred_at: parse_ts(3, &row.get::<_, String>(3)?)?,
        note: row.get(4)?,
        duration_min: row.get(5)?,
    })
}

impl RosterStore for Database {
    fn load_friends(&self) -> Result<Vec<Friend>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, tier_id, last_contact_at, next_due_at, streak_count,
                    birthday, favorite, created_at, last_spoken_estimate
             FROM friends ORDER BY created_at, id",
        )?;
        let friends = stmt
            .query_map([], row_to_friend)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(friends)
    }

    fn load_interactions(&self) -> Result<Vec<Interaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, friend_id, kind, occurred_at, note, duration_min
             FROM interactions ORDER BY occurred_at, id",
        )?;
        let interactions = stmt
            .query_map([], row_to_interaction)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(interactions)
    }

    fn save_friend(&self, friend: &Friend) -> Result<()> {
        self.conn.execute(
            "INSERT INTO friends (id, name, tier_id, last_contact_at, next_due_at,
                                  streak_count, birthday, favorite, created_at,
                                  last_spoken_estimate)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                tier_id = excluded.tier_id,
                last_contact_at = excluded.last_contact_at,
                next_due_at = excluded.next_due_at,
                streak_count = excluded.streak_count,
                birthday = excluded.birthday,
                favorite = excluded.favorite,
                last_spoken_estimate = excluded.last_spoken_estimate",
            params![
                friend.id,
                friend.name,
                friend.tier_id,
                friend.last_contact_at.map(|t| t.to_rfc3339()),
                friend.next_due_at.to_rfc3339(),
                friend.streak_count,
                friend.birthday,
                friend.favorite,
                friend.created_at.to_rfc3339(),
                friend.last_spoken_estimate.map(|t| t.to_rfc3339()),
            ],
        )?;
        Ok(())
    }

    fn delete_friend(&self, friend_id: &str) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM interactions WHERE friend_id = ?1", params![friend_id])?;
        tx.execute("DELETE FROM friends WHERE id = ?1", params![friend_id])?;
        tx.commit()?;
        Ok(())
    }

    fn append_interaction(&self, interaction: &Interaction) -> Result<()> {
        self.conn.execute(
            "INSERT INTO interactions (id, friend_id, kind, occurred_at, note, duration_min)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                interaction.id,
                interaction.friend_id,
                interaction.kind.as_str(),
                interaction.occurred_at.to_rfc3339(),
                interaction.note,
                interaction.duration_min,
            ],
        )?;
        Ok(())
    }

    fn delete_interaction(&self, interaction_id: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM interactions WHERE id = ?1", params![interaction_id])?;
        Ok(())
    }

    fn load_tier_catalog(&self) -> Result<Vec<Tier>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, cadence_days, health_window_days
             FROM tiers ORDER BY position",
        )?;
        let tiers = stmt
            .query_map([], |row| {
                Ok(Tier {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    cadence_days: row.get(2)?,
                    health_window_days: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tiers)
    }

    fn save_tier_catalog(&self, tiers: &[Tier]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM tiers", [])?;
        for (position, tier) in tiers.iter().enumerate() {
            tx.execute(
                "INSERT INTO tiers (id, name, cadence_days, health_window_days, position)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    tier.id,
                    tier.name,
                    tier.cadence_days,
                    tier.health_window_days,
                    position as i64,
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tier::TierCatalog;
    use chrono::{Duration, TimeZone};

    fn sample_friend() -> Friend {
        let created = Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap();
        Friend {
            id: "f1".into(),
            name: "Ada".into(),
            tier_id: "inner_circle".into(),
            last_contact_at: None,
            last_spoken_estimate: Some(created - Duration::days(10)),
            next_due_at: created + Duration::days(7),
            streak_count: 0,
            birthday: Some("12-10".into()),
            favorite: true,
            created_at: created,
        }
    }

    #[test]
    fn friend_upsert_and_reload() {
        let db = Database::open_memory().unwrap();
        let mut friend = sample_friend();
        db.save_friend(&friend).unwrap();

        friend.last_contact_at = Some(friend.created_at + Duration::days(1));
        friend.streak_count = 1;
        db.save_friend(&friend).unwrap();

        let loaded = db.load_friends().unwrap();
        assert_eq!(loaded, vec![friend.clone()]);
        assert_eq!(db.get_friend("f1").unwrap(), Some(friend));
        assert!(db.get_friend("missing").unwrap().is_none());
    }

    #[test]
    fn interactions_round_trip_and_cascade() {
        let db = Database::open_memory().unwrap();
        let friend = sample_friend();
        db.save_friend(&friend).unwrap();
        let interaction = Interaction {
            id: "i1".into(),
            friend_id: friend.id.clone(),
            kind: InteractionType::InPerson,
            occurred_at: friend.created_at + Duration::hours(5),
            note: Some("coffee".into()),
            duration_min: Some(45),
        };
        db.append_interaction(&interaction).unwrap();
        assert_eq!(db.load_interactions().unwrap(), vec![interaction]);

        db.delete_friend(&friend.id).unwrap();
        assert!(db.load_friends().unwrap().is_empty());
        assert!(db.load_interactions().unwrap().is_empty());
    }

    #[test]
    fn tier_catalog_keeps_order() {
        let db = Database::open_memory().unwrap();
        assert!(db.load_tier_catalog().unwrap().is_empty());
        let mut tiers = TierCatalog::default().as_slice().to_vec();
        tiers.reverse();
        db.save_tier_catalog(&tiers).unwrap();
        assert_eq!(db.load_tier_catalog().unwrap(), tiers);
    }

    #[test]
    fn migrate_is_idempotent() {
        let db = Database::open_memory().unwrap();
        db.migrate().unwrap();
        let version: i32 = db
            .conn()
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }
}
