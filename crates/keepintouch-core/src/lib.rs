//! # Keep In Touch Core Library
//!
//! This library provides the scheduling and relationship-health engine for
//! Keep In Touch. It follows a CLI-first layout: every operation is available
//! through the standalone CLI binary, which is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Engine**: pure functions for due dates, streaks, health scores,
//!   birthday lookahead and weekday suggestions
//! - **Roster**: owned in-memory state plus event handlers that recompute
//!   derived fields on every mutation
//! - **Storage**: SQLite-based roster persistence and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`Roster`]: friends, interaction log and tier catalog
//! - [`HealthAggregator`]: per-tier and overall health
//! - [`Database`]: SQLite implementation of [`RosterStore`]
//! - [`Config`]: Application configuration management
//! - [`Clock`]: injectable source of "now"

pub mod clock;
pub mod engine;
pub mod entitlement;
pub mod error;
pub mod events;
pub mod friend;
pub mod interaction;
pub mod persistence;
pub mod roster;
pub mod storage;
pub mod tier;

pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::{HealthAggregator, HealthStats, Suggestion, TierHealth, UpcomingBirthday};
pub use entitlement::Entitlement;
pub use error::{ConfigError, CoreError, DatabaseError, Result, ValidationError};
pub use events::Event;
pub use friend::{Birthday, Friend, NewFriend};
pub use interaction::{Interaction, InteractionType, NewInteraction};
pub use persistence::{MemoryStore, RosterStore};
pub use roster::Roster;
pub use storage::{Config, Database};
pub use tier::{Tier, TierCatalog};
