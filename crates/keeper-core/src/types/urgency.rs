//! Urgency tiers attached to expiring warranties.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How urgent an expiration is.
///
/// Variants are ordered from most to least urgent, so sorting ascending puts
/// expired warranties first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyTier {
    /// The warranty has already expired.
    Expired,
    /// Expires today or within a week.
    Critical,
    /// Expires within a month.
    Warning,
    /// Further out, but inside the user's lookahead.
    Normal,
}

impl UrgencyTier {
    /// Return the tier as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expired => "expired",
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Normal => "normal",
        }
    }
}

impl fmt::Display for UrgencyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_most_urgent_first() {
        let mut tiers = vec![
            UrgencyTier::Normal,
            UrgencyTier::Critical,
            UrgencyTier::Expired,
            UrgencyTier::Warning,
        ];
        tiers.sort();
        assert_eq!(
            tiers,
            vec![
                UrgencyTier::Expired,
                UrgencyTier::Critical,
                UrgencyTier::Warning,
                UrgencyTier::Normal,
            ]
        );
    }
}
