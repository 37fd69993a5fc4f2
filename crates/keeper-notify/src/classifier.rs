//! Urgency classification.

use keeper_core::types::urgency::UrgencyTier;

/// Highest day count (inclusive) that is still critical.
pub const CRITICAL_MAX_DAYS: i64 = 7;

/// Highest day count (inclusive) that is still a warning.
pub const WARNING_MAX_DAYS: i64 = 30;

/// Classify a warranty by the number of days left before it expires.
///
/// A warranty expiring today (`0`) is critical, not expired.
pub fn classify(days_left: i64) -> UrgencyTier {
    match days_left {
        d if d < 0 => UrgencyTier::Expired,
        d if d <= CRITICAL_MAX_DAYS => UrgencyTier::Critical,
        d if d <= WARNING_MAX_DAYS => UrgencyTier::Warning,
        _ => UrgencyTier::Normal,
    }
}
