//! Contact tiers and their cadence.
//!
//! A tier is a named bucket ("Inner Circle", "Close Friends", ...) with a
//! cadence: the number of days expected between contacts. Each tier also
//! carries a fixed health window used by the health aggregator. The window
//! is set when the tier is created and is not touched by cadence edits.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A single catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    pub id: String,
    pub name: String,
    /// Expected days between contacts. Always >= 1.
    pub cadence_days: u32,
    /// Days since last contact within which a friend counts as healthy.
    pub health_window_days: u32,
}

impl Tier {
    /// Create a tier whose health window matches its cadence.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        cadence_days: u32,
    ) -> Result<Self, ValidationError> {
        let id = id.into();
        if cadence_days == 0 {
            return Err(ValidationError::NonPositiveCadence { tier_id: id });
        }
        Ok(Self {
            id,
            name: name.into(),
            cadence_days,
            health_window_days: cadence_days,
        })
    }

    pub fn with_health_window(mut self, days: u32) -> Self {
        self.health_window_days = days.max(1);
        self
    }
}

/// Ordered set of tiers, keyed by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCatalog {
    tiers: Vec<Tier>,
}

impl Default for TierCatalog {
    fn default() -> Self {
        Self {
            tiers: vec![
                Tier {
                    id: "inner_circle".into(),
                    name: "Inner Circle".into(),
                    cadence_days: 7,
                    health_window_days: 7,
                },
                Tier {
                    id: "close_friends".into(),
                    name: "Close Friends".into(),
                    cadence_days: 30,
                    health_window_days: 30,
                },
                Tier {
                    id: "acquaintances".into(),
                    name: "Acquaintances".into(),
                    cadence_days: 90,
                    health_window_days: 90,
                },
            ],
        }
    }
}

impl TierCatalog {
    /// Build a catalog, rejecting zero cadences and duplicate ids.
    pub fn new(tiers: Vec<Tier>) -> Result<Self, ValidationError> {
        let mut catalog = Self { tiers: Vec::with_capacity(tiers.len()) };
        for tier in tiers {
            catalog.add(tier)?;
        }
        Ok(catalog)
    }

    pub fn get(&self, id: &str) -> Option<&Tier> {
        self.tiers.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tier> {
        self.tiers.iter()
    }

    pub fn as_slice(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn add(&mut self, tier: Tier) -> Result<(), ValidationError> {
        if tier.cadence_days == 0 {
            return Err(ValidationError::NonPositiveCadence { tier_id: tier.id });
        }
        if self.contains(&tier.id) {
            return Err(ValidationError::DuplicateTier(tier.id));
        }
        self.tiers.push(tier);
        Ok(())
    }

    /// Change a tier's cadence. The health window stays as it was.
    pub fn set_cadence(&mut self, id: &str, cadence_days: u32) -> Result<(), ValidationError> {
        if cadence_days == 0 {
            return Err(ValidationError::NonPositiveCadence { tier_id: id.to_string() });
        }
        let tier = self.get_mut(id)?;
        tier.cadence_days = cadence_days;
        Ok(())
    }

    pub fn rename(&mut self, id: &str, name: impl Into<String>) -> Result<(), ValidationError> {
        self.get_mut(id)?.name = name.into();
        Ok(())
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Tier, ValidationError> {
        self.tiers
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| ValidationError::UnknownTier(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_ships_fixed_health_windows() {
        let catalog = TierCatalog::default();
        let windows: Vec<u32> = catalog.iter().map(|t| t.health_window_days).collect();
        assert_eq!(windows, vec![7, 30, 90]);
    }

    #[test]
    fn zero_cadence_is_rejected() {
        assert_eq!(
            Tier::new("x", "X", 0),
            Err(ValidationError::NonPositiveCadence { tier_id: "x".into() })
        );
        let mut catalog = TierCatalog::default();
        assert!(catalog.set_cadence("inner_circle", 0).is_err());
    }

    #[test]
    fn set_cadence_keeps_health_window() {
        let mut catalog = TierCatalog::default();
        catalog.set_cadence("inner_circle", 14).unwrap();
        let tier = catalog.get("inner_circle").unwrap();
        assert_eq!(tier.cadence_days, 14);
        assert_eq!(tier.health_window_days, 7);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut catalog = TierCatalog::default();
        let dup = Tier::new("inner_circle", "Again", 3).unwrap();
        assert_eq!(
            catalog.add(dup),
            Err(ValidationError::DuplicateTier("inner_circle".into()))
        );
    }

    #[test]
    fn unknown_tier_rename_fails() {
        let mut catalog = TierCatalog::default();
        assert_eq!(
            catalog.rename("nope", "Nope"),
            Err(ValidationError::UnknownTier("nope".into()))
        );
    }
}
