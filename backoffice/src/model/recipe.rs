//! Recipe rows (stored as `meals`).

use serde::Serialize;
use serde_json::Value;

use super::localized::LocalizedText;
use super::record::{MappingError, RawRecord};

const ENTITY: &str = "recipe";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRow {
    pub id: String,
    pub name: LocalizedText,
    pub meal_types: Vec<String>,
    /// Minutes.
    pub cook_time: i64,
    pub satiety: i64,
    pub restrictions: Vec<String>,
    pub publish_on: Option<String>,
}

impl RecipeRow {
    pub fn from_record(value: &Value) -> Result<Self, MappingError> {
        let record = RawRecord::new(ENTITY, value)?;
        Ok(Self {
            id: record.require_id("id")?,
            name: record.require_localized("name")?,
            meal_types: record.strings("meal_types")?,
            cook_time: record.integer("cook_time")?.unwrap_or(0),
            satiety: record.integer("satiety")?.unwrap_or(0),
            restrictions: record.strings("restrictions")?,
            publish_on: record.string("publish_on")?.map(str::to_string),
        })
    }
}
