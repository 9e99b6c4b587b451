//! The logged-in user as stored in the session.

use serde::{Deserialize, Serialize};

use wheels_core::{CustomerId, Role};

/// Session record for an authenticated user.
///
/// Carries the role for route gating and the linked remote customer ID for
/// rental/payment flows. The password hash never leaves the roster store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub username: String,
    pub role: Role,
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
}

impl CurrentUser {
    /// Whether this user may access the admin console.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_session_serde_roundtrip() {
        let user = CurrentUser {
            username: "maria".to_string(),
            role: Role::User,
            customer_id: Some(CustomerId::new(3)),
        };
        let json = serde_json::to_string(&user).unwrap();
        let back: CurrentUser = serde_json::from_str(&json).unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn test_missing_customer_id_tolerated() {
        let json = r#"{"username":"admin","role":"admin"}"#;
        let user: CurrentUser = serde_json::from_str(json).unwrap();
        assert!(user.is_admin());
        assert_eq!(user.customer_id, None);
    }
}
