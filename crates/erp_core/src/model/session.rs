//! Session model for the locally held demo user.
//!
//! # Invariants
//! - A session always carries a non-empty `id` and `company_id`.
//! - `is_employee` is `true` for sessions opened through the employee portal.

use serde::{Deserialize, Serialize};

/// Access role of a demo user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Manager,
    Employee,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Employee => "employee",
        }
    }
}

/// The currently "logged in" user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub company_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_employee: Option<bool>,
}

impl Session {
    /// Whether this session was opened through the employee portal.
    pub fn is_employee(&self) -> bool {
        self.is_employee.unwrap_or(false)
    }
}

/// Input for creating a new account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupProfile {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub company_name: Option<String>,
}

impl SignupProfile {
    /// Returns `true` when every required field carries non-blank text.
    pub fn has_required_fields(&self) -> bool {
        [&self.name, &self.email, &self.password]
            .iter()
            .all(|value| !value.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::{Role, Session, SignupProfile};

    #[test]
    fn session_serializes_with_camel_case_and_omits_absent_employee_flag() {
        let session = Session {
            id: "1".to_string(),
            email: "admin@demo.com".to_string(),
            name: "Admin User".to_string(),
            role: Role::Admin,
            company_id: "company-1".to_string(),
            is_employee: None,
        };
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["companyId"], "company-1");
        assert_eq!(json["role"], "admin");
        assert!(json.get("isEmployee").is_none());
        assert!(!session.is_employee());
    }

    #[test]
    fn signup_profile_requires_name_email_and_password() {
        let mut profile = SignupProfile {
            name: "Jo".to_string(),
            email: "jo@acme.test".to_string(),
            password: "secret".to_string(),
            company_name: None,
        };
        assert!(profile.has_required_fields());

        profile.password = "   ".to_string();
        assert!(!profile.has_required_fields());
    }
}
