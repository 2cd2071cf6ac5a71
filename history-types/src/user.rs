use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub const GUEST_PROFILE_NAME: &str = "访客用户";
pub const FALLBACK_PROFILE_NAME: &str = "用户";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub display_name: String,
}

/// Who is looking at the history screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Principal {
    User(User),
    Guest,
}

impl Principal {
    /// Name shown in the profile bar: first name, then email, then a generic label
    pub fn profile_name(&self) -> String {
        match self {
            Principal::Guest => GUEST_PROFILE_NAME.to_string(),
            Principal::User(user) => user
                .first_name
                .clone()
                .filter(|name| !name.is_empty())
                .or_else(|| user.email.clone().filter(|email| !email.is_empty()))
                .unwrap_or_else(|| FALLBACK_PROFILE_NAME.to_string()),
        }
    }

    pub fn is_guest(&self) -> bool {
        matches!(self, Principal::Guest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first_name: Option<&str>, email: Option<&str>) -> Principal {
        Principal::User(User {
            id: "user_1".to_string(),
            email: email.map(str::to_string),
            first_name: first_name.map(str::to_string),
            display_name: "Mike".to_string(),
        })
    }

    #[test]
    fn test_profile_name_precedence() {
        assert_eq!(user(Some("Mike"), Some("mike@example.com")).profile_name(), "Mike");
        assert_eq!(user(None, Some("mike@example.com")).profile_name(), "mike@example.com");
        assert_eq!(user(Some(""), None).profile_name(), FALLBACK_PROFILE_NAME);
        assert_eq!(Principal::Guest.profile_name(), GUEST_PROFILE_NAME);
    }
}
