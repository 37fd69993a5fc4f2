//! Contact details read from the identity store.

use serde::{Deserialize, Serialize};

/// Where a user can be reached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContact {
    /// Email address, if the user has one.
    pub email: Option<String>,
    /// Phone number in E.164 form, if the user has one.
    pub phone: Option<String>,
    /// Whether the phone number has been verified.
    pub phone_verified: bool,
}

impl UserContact {
    /// Email address with blank values treated as absent.
    pub fn email_address(&self) -> Option<&str> {
        self.email.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Phone number usable for SMS: present, non-blank and verified.
    pub fn sms_number(&self) -> Option<&str> {
        if !self.phone_verified {
            return None;
        }
        self.phone.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_email_is_absent() {
        let contact = UserContact {
            email: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(contact.email_address(), None);
    }

    #[test]
    fn test_unverified_phone_not_usable() {
        let contact = UserContact {
            phone: Some("+15550100".into()),
            phone_verified: false,
            ..Default::default()
        };
        assert_eq!(contact.sms_number(), None);

        let verified = UserContact {
            phone_verified: true,
            ..contact
        };
        assert_eq!(verified.sms_number(), Some("+15550100"));
    }
}
