use serde::{Deserialize, Serialize};

/// Whether premium-only views (suggestions, full history) are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entitlement {
    #[default]
    Free,
    Premium,
}

impl Entitlement {
    pub fn from_premium(premium: bool) -> Self {
        if premium {
            Entitlement::Premium
        } else {
            Entitlement::Free
        }
    }

    pub fn is_premium(&self) -> bool {
        matches!(self, Entitlement::Premium)
    }
}
