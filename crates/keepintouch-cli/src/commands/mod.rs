pub mod config;
pub mod friend;
pub mod log;
pub mod stats;
pub mod tier;

use keepintouch_core::{Database, Event, Roster, SystemClock};
use tracing::debug;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Open the on-disk roster with the wall clock.
pub fn open_roster() -> Result<Roster<Database, SystemClock>, Box<dyn std::error::Error>> {
    Ok(Roster::load(Database::open()?, SystemClock)?)
}

/// Drain roster events to the log. Store failures were already warned about
/// by the core; everything else is debug detail.
pub fn flush_events(roster: &mut Roster<Database, SystemClock>) {
    for event in roster.drain_events() {
        if !matches!(event, Event::PersistenceFailed { .. }) {
            debug!(?event, "roster event");
        }
    }
}

pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> CommandResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
