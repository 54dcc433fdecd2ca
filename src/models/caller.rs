// src/models/caller.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The authenticated user a request acts for.
///
/// Resolved by the auth middleware from the bearer token; handlers never read
/// an identity from the request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: i64,
    pub name: String,
    pub email: String,
}

/// Display identity shown on the results view and in exports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DisplayIdentity {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl DisplayIdentity {
    /// "Name • email", falling back to "User" for a missing name and "—" when
    /// nothing is known.
    pub fn summary(&self) -> String {
        let name = self.name.trim();
        let email = self.email.trim();
        if name.is_empty() && email.is_empty() {
            return "—".to_string();
        }
        let name = if name.is_empty() { "User" } else { name };
        if email.is_empty() {
            name.to_string()
        } else {
            format!("{} • {}", name, email)
        }
    }
}

impl From<&Caller> for DisplayIdentity {
    fn from(caller: &Caller) -> Self {
        DisplayIdentity {
            id: caller.user_id,
            name: caller.name.clone(),
            email: caller.email.clone(),
        }
    }
}
