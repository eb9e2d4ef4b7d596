use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::honeypot_filled;
use crate::errors::RelayError;

/// Header of the responses sheet. Rows are read positionally downstream, so
/// `VisionIntake::to_row` must keep exactly this order.
pub const VISION_COLUMNS: [&str; 9] = [
    "Submitted At",
    "Name",
    "Contact",
    "City",
    "Kitchen Vibe",
    "Finishes",
    "Wardrobe",
    "Shutters",
    "Partitions",
];

/// Any JSON object is accepted: `null` or missing fields become empty cells
/// and scalars of the wrong type are written as their JSON text.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct VisionIntake {
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(deserialize_with = "lenient_text")]
    pub contact: String,
    #[serde(deserialize_with = "lenient_text")]
    pub city: String,
    #[serde(deserialize_with = "lenient_text")]
    pub kitchen_vibe: String,
    #[serde(deserialize_with = "lenient_list")]
    pub finishes: Vec<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub wardrobe: String,
    #[serde(deserialize_with = "lenient_text")]
    pub shutters: String,
    #[serde(deserialize_with = "lenient_text")]
    pub partitions: String,
    #[serde(deserialize_with = "lenient_honeypot")]
    pub website: Option<String>,
}

fn cell_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(cell_text)
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().map(cell_text).collect(),
        Value::Null => vec![],
        single => vec![cell_text(single)],
    })
}

fn lenient_honeypot<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null | Value::Bool(false) => None,
        other => Some(cell_text(other)),
    })
}

impl VisionIntake {
    /// Fails only for bodies that are not JSON or not an object-like value.
    pub fn from_slice(body: &[u8]) -> Result<Self, RelayError> {
        serde_json::from_slice(body).map_err(|e| {
            log::warn!("Rejected unreadable vision intake: {}", e);
            RelayError::UnreadableIntake(e.to_string())
        })
    }

    pub fn is_spam(&self) -> bool {
        honeypot_filled(self.website.as_deref())
    }

    pub fn to_row(&self, submitted_at: DateTime<Utc>) -> Vec<String> {
        vec![
            submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.name.clone(),
            self.contact.clone(),
            self.city.clone(),
            self.kitchen_vibe.clone(),
            self.finishes.join(", "),
            self.wardrobe.clone(),
            self.shutters.clone(),
            self.partitions.clone(),
        ]
    }
}
