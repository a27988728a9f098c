use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::de;
use crate::config::CANDIDATE_IMAGE_FIELDS;

// ---------------------------------------------------------------------------
// Card: catalog entry with a normalized image reference
// ---------------------------------------------------------------------------

/// A catalog card.
///
/// The backend does not agree on one name for the image field, so the
/// reference is resolved once while decoding (see [`resolve_image`]) and
/// exposed as the single `image` field afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub rarity: Option<String>,
    pub set_id: Option<String>,
}

#[derive(Deserialize)]
struct RawCard {
    #[serde(deserialize_with = "de::string_or_number")]
    id: String,
    name: String,
    #[serde(default)]
    rarity: Option<String>,
    #[serde(default, alias = "setId", deserialize_with = "de::opt_string_or_number")]
    set_id: Option<String>,
}

impl Card {
    /// Decode a card from a raw JSON object.
    pub fn from_value(value: &Value) -> serde_json::Result<Self> {
        let raw = RawCard::deserialize(value)?;
        Ok(Card {
            id: raw.id,
            name: raw.name,
            image: resolve_image(value),
            rarity: raw.rarity,
            set_id: raw.set_id,
        })
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Card::from_value(&value).map_err(serde::de::Error::custom)
    }
}

/// Probe the candidate image fields in order and return the first non-empty
/// string.
pub fn resolve_image(value: &Value) -> Option<String> {
    CANDIDATE_IMAGE_FIELDS
        .iter()
        .filter_map(|field| value.get(*field).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// SetCard: a card tagged with the set it was listed under
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetCard {
    pub card: Card,
    pub set_id: String,
    pub set_name: String,
}
