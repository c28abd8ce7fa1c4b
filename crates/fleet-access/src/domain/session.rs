//! Signed-in session entities

use fleet_shared::Role;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// User object persisted on login and read back on start-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SessionUser {
    /// Backends hand out numeric or string ids; both are kept as text.
    #[serde(deserialize_with = "id_from_number_or_string")]
    #[validate(length(min = 1, message = "User id is required"))]
    pub id: String,

    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,

    pub role: Role,

    #[validate(email)]
    pub email: String,

    #[serde(default)]
    pub authenticated: bool,
}

impl SessionUser {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        role: Role,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into().trim().to_string(),
            role,
            email: email.into().trim().to_lowercase(),
            authenticated: true,
        }
    }
}

/// User plus the bearer token replayed on every API call.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: SessionUser,
    pub token: String,
}

fn id_from_number_or_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}
