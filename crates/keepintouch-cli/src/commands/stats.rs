//! Read-side views: health, overdue, birthdays, suggestions.

use keepintouch_core::{Config, HealthAggregator};

use super::{open_roster, print_json, CommandResult};

pub fn health() -> CommandResult {
    let config = Config::load()?;
    let roster = open_roster()?;
    let aggregator = HealthAggregator::with_lookahead(config.reminders.birthday_lookahead_days);
    print_json(&roster.health(&aggregator))
}

pub fn overdue() -> CommandResult {
    let roster = open_roster()?;
    print_json(&roster.overdue())
}

pub fn birthdays(days: Option<i64>) -> CommandResult {
    let config = Config::load()?;
    let roster = open_roster()?;
    let window = days.unwrap_or(config.reminders.birthday_lookahead_days);
    print_json(&roster.upcoming_birthdays(window))
}

pub fn suggest(friend_id: &str) -> CommandResult {
    let config = Config::load()?;
    let roster = open_roster()?;
    match roster.suggestion(friend_id, config.entitlement())? {
        Some(suggestion) => print_json(&suggestion),
        None => {
            if !config.entitlement().is_premium() {
                eprintln!("Suggestions require a premium account (account.premium = true)");
            }
            print_json(&serde_json::Value::Null)
        }
    }
}
