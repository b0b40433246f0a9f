// Console users and the role that decides which views they get.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A user's role. Anything other than `lead` gets the technician views.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum UserRole {
    Lead,
    #[default]
    Technician,
    Other(String),
}

impl UserRole {
    pub fn is_lead(&self) -> bool {
        matches!(self, UserRole::Lead)
    }

    pub fn as_str(&self) -> &str {
        match self {
            UserRole::Lead => "lead",
            UserRole::Technician => "technician",
            UserRole::Other(s) => s,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            UserRole::Lead => "Lead",
            UserRole::Technician => "Technician",
            UserRole::Other(s) => s,
        }
    }
}

impl From<Option<String>> for UserRole {
    fn from(value: Option<String>) -> Self {
        match value.as_deref().map(str::trim) {
            Some("lead") => UserRole::Lead,
            None | Some("") | Some("technician") => UserRole::Technician,
            Some(other) => UserRole::Other(other.to_string()),
        }
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub name: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
}

impl User {
    pub fn device_label(&self) -> &str {
        match self.device_type.as_deref() {
            Some("mobile") => "Mobile",
            Some("desktop") => "Desktop",
            Some(other) if !other.is_empty() => other,
            _ => "--",
        }
    }
}

/// Query filters for the user listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub role: Option<String>,
    pub device_type: Option<String>,
}

impl UserFilter {
    /// Non-empty filters as query pairs, in a stable order.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::new();
        if let Some(role) = self.role.as_deref().filter(|r| !r.is_empty()) {
            pairs.push(("role", role));
        }
        if let Some(device) = self.device_type.as_deref().filter(|d| !d.is_empty()) {
            pairs.push(("device_type", device));
        }
        pairs
    }
}
