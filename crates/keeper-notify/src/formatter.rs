//! Notification text for expiring warranties.

use serde::{Deserialize, Serialize};

use keeper_core::types::id::RecordId;
use keeper_core::types::urgency::UrgencyTier;
use keeper_core::types::warranty::ExpiringWarranty;

/// A rendered notification, shared by every channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    /// Record the message is about.
    pub record_id: RecordId,
    /// Urgency the wording was chosen for.
    pub tier: UrgencyTier,
    /// Subject line (email subject; ignored by SMS).
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

/// Builds notification text from scan candidates.
pub struct MessageFormatter;

impl MessageFormatter {
    /// Render the message for one expiring warranty.
    pub fn format(candidate: &ExpiringWarranty) -> NotificationMessage {
        let record = &candidate.record;
        let product = record.product_name.trim();
        let days = candidate.days_left;

        let (subject, status) = match candidate.tier {
            UrgencyTier::Expired => (
                format!("Warranty expired: {product}"),
                format!("expired {} ago", plural_days(days.unsigned_abs())),
            ),
            UrgencyTier::Critical if days == 0 => (
                format!("Warranty expires today: {product}"),
                "expires today".to_string(),
            ),
            UrgencyTier::Critical => (
                format!("Warranty expires in {}: {product}", plural_days(days.unsigned_abs())),
                format!("expires in {}", plural_days(days.unsigned_abs())),
            ),
            UrgencyTier::Warning | UrgencyTier::Normal => (
                format!("Warranty reminder: {product}"),
                format!("expires in {}", plural_days(days.unsigned_abs())),
            ),
        };

        let mut body = format!("Your warranty for {product} {status}.\n\n");
        if let Some(merchant) = record.merchant.as_deref().filter(|m| !m.trim().is_empty()) {
            body.push_str(&format!("Merchant: {}\n", merchant.trim()));
        }
        body.push_str(&format!("Purchased: {}\n", record.purchase_date.format("%Y-%m-%d")));
        if let Some(expires) = record.expiration_date {
            body.push_str(&format!("Warranty ends: {}\n", expires.format("%Y-%m-%d")));
        }

        NotificationMessage {
            record_id: record.id,
            tier: candidate.tier,
            subject,
            body,
        }
    }
}

fn plural_days(n: u64) -> String {
    if n == 1 {
        "1 day".to_string()
    } else {
        format!("{n} days")
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use keeper_core::types::id::UserId;
    use keeper_core::types::preference::NotificationPreference;
    use keeper_core::types::warranty::WarrantyRecord;

    use super::*;
    use crate::classifier::classify;

    fn candidate(days_left: i64, merchant: Option<&str>) -> ExpiringWarranty {
        let record = WarrantyRecord::new(
            RecordId::new(),
            UserId::new(),
            "Air Fryer",
            merchant.map(str::to_string),
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            Some(12),
        );
        ExpiringWarranty {
            preference: NotificationPreference::default_for_user(record.user_id),
            record,
            days_left,
            tier: classify(days_left),
        }
    }

    #[test]
    fn test_expired_wording() {
        let msg = MessageFormatter::format(&candidate(-3, None));
        assert_eq!(msg.subject, "Warranty expired: Air Fryer");
        assert!(msg.body.contains("expired 3 days ago"));
    }

    #[test]
    fn test_expires_today_wording() {
        let msg = MessageFormatter::format(&candidate(0, None));
        assert_eq!(msg.subject, "Warranty expires today: Air Fryer");
        assert!(msg.body.contains("expires today"));
    }

    #[test]
    fn test_critical_singular_day() {
        let msg = MessageFormatter::format(&candidate(1, None));
        assert_eq!(msg.subject, "Warranty expires in 1 day: Air Fryer");
    }

    #[test]
    fn test_reminder_includes_details() {
        let msg = MessageFormatter::format(&candidate(20, Some("Kitchen World")));
        assert_eq!(msg.tier, UrgencyTier::Warning);
        assert_eq!(msg.subject, "Warranty reminder: Air Fryer");
        assert!(msg.body.contains("expires in 20 days"));
        assert!(msg.body.contains("Merchant: Kitchen World"));
        assert!(msg.body.contains("Purchased: 2025-02-01"));
        assert!(msg.body.contains("Warranty ends: 2026-02-01"));
    }

    #[test]
    fn test_blank_merchant_omitted() {
        let msg = MessageFormatter::format(&candidate(45, Some("  ")));
        assert!(!msg.body.contains("Merchant"));
    }
}
