//! User profile rows.

use serde::Serialize;
use serde_json::Value;

use super::record::{MappingError, RawRecord};

const ENTITY: &str = "user";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub role: String,
    pub objective: Option<String>,
    pub extra_data_complete: bool,
    pub locale: String,
}

impl UserRow {
    /// Map a `users` row (snake_case columns).
    pub fn from_record(value: &Value) -> Result<Self, MappingError> {
        let record = RawRecord::new(ENTITY, value)?;
        Ok(Self {
            id: record.require_id("id")?,
            email: record.require_string("email")?.to_string(),
            display_name: record
                .string("display_name")?
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string),
            role: record.string("role")?.unwrap_or("user").to_string(),
            objective: record
                .string("objective")?
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            extra_data_complete: record.bool("extra_data_complete")?.unwrap_or(false),
            locale: record.string("locale")?.unwrap_or("en").to_string(),
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }

    /// Display name, or the placeholder used for profiles without one.
    pub fn title(&self) -> &str {
        self.display_name.as_deref().unwrap_or("Anonymous User")
    }

    /// Objective with the first underscore spaced out, e.g. `lose weight`.
    pub fn goal(&self) -> String {
        match &self.objective {
            Some(objective) => objective.replacen('_', " ", 1),
            None => "No goal".to_string(),
        }
    }

    pub fn status(&self) -> &'static str {
        if self.extra_data_complete {
            "Full Profile"
        } else {
            "Pending Bio"
        }
    }
}
