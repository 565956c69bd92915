//! Interaction log entries.
//!
//! Interactions are append-only. The roster removes them only through the
//! explicit delete flow, which triggers recomputation of the friend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Kind of contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionType {
    Call,
    Text,
    VideoCall,
    InPerson,
    SocialMedia,
    Email,
    Other,
}

impl InteractionType {
    pub const ALL: [InteractionType; 7] = [
        InteractionType::Call,
        InteractionType::Text,
        InteractionType::VideoCall,
        InteractionType::InPerson,
        InteractionType::SocialMedia,
        InteractionType::Email,
        InteractionType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionType::Call => "call",
            InteractionType::Text => "text",
            InteractionType::VideoCall => "video_call",
            InteractionType::InPerson => "in_person",
            InteractionType::SocialMedia => "social_media",
            InteractionType::Email => "email",
            InteractionType::Other => "other",
        }
    }
}

impl fmt::Display for InteractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InteractionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InteractionType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "interaction_type".into(),
                message: format!("unknown interaction type '{s}'"),
            })
    }
}

/// A logged contact with a friend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: String,
    pub friend_id: String,
    pub kind: InteractionType,
    pub occurred_at: DateTime<Utc>,
    pub note: Option<String>,
    pub duration_min: Option<u32>,
}

/// Input for logging an interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInteraction {
    pub friend_id: String,
    pub kind: InteractionType,
    /// Defaults to the clock's current instant.
    pub occurred_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
    pub duration_min: Option<u32>,
}

impl NewInteraction {
    pub fn new(friend_id: impl Into<String>, kind: InteractionType) -> Self {
        Self {
            friend_id: friend_id.into(),
            kind,
            occurred_at: None,
            note: None,
            duration_min: None,
        }
    }

    pub fn at(mut self, occurred_at: DateTime<Utc>) -> Self {
        self.occurred_at = Some(occurred_at);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Interactions belonging to `friend_id`, in log order.
pub fn for_friend<'a, 'b>(
    log: &'a [Interaction],
    friend_id: &'b str,
) -> impl Iterator<Item = &'a Interaction> + 'b
where
    'a: 'b,
{
    log.iter().filter(move |i| i.friend_id == friend_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interaction_type_string_forms_agree_with_serde() {
        for kind in InteractionType::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            assert_eq!(kind.as_str().parse::<InteractionType>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_type_is_a_validation_error() {
        assert!("carrier_pigeon".parse::<InteractionType>().is_err());
    }

    #[test]
    fn for_friend_results_outlive_the_id() {
        use chrono::TimeZone;

        let at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let log: Vec<Interaction> = ["ada", "bo", "ada"]
            .iter()
            .enumerate()
            .map(|(n, friend)| Interaction {
                id: format!("i{n}"),
                friend_id: (*friend).to_string(),
                kind: InteractionType::Call,
                occurred_at: at,
                note: None,
                duration_min: None,
            })
            .collect();

        let found: Vec<&Interaction> = {
            let id = String::from("ada");
            for_friend(&log, &id).collect()
        };
        let ids: Vec<&str> = found.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["i0", "i2"]);
    }
}
