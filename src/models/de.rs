//! Lenient field decoders for backend payloads.
//!
//! The backend is not strict about scalar types: identifiers arrive as
//! strings or integers and ownership counts as integers or numeric strings.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    fn into_id(self) -> String {
        match self {
            Scalar::Int(n) => n.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Str(s) => s,
        }
    }
}

pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Scalar::deserialize(deserializer)?.into_id())
}

pub(crate) fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(Scalar::into_id))
}

/// Decode an ownership count, clamping negatives to zero. `null` and `""`
/// count as zero.
pub(crate) fn opt_quantity<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Option::<Scalar>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(raw) => raw,
    };
    let n = match raw {
        Scalar::Int(n) => n,
        Scalar::Float(f) => f.trunc() as i64,
        Scalar::Str(s) => {
            let s = s.trim();
            if s.is_empty() {
                0
            } else {
                s.parse::<i64>()
                    .map_err(|_| D::Error::custom(format!("invalid quantity: {s:?}")))?
            }
        }
    };
    Ok(Some(clamp_quantity(n)))
}

pub(crate) fn clamp_quantity(n: i64) -> u32 {
    n.clamp(0, u32::MAX as i64) as u32
}
