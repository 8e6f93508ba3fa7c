//! Serialization of `f64` values that keeps NaN and infinities.
//!
//! Finite values are written as JSON numbers, non-finite ones as the strings
//! `"NaN"`, `"inf"` and `"-inf"`. Use with `#[serde(with = "...")]`.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A float that serializes non-finite values as strings.
#[derive(Debug, Clone, Copy)]
struct Float(f64);

#[derive(Deserialize)]
#[serde(untagged)]
enum FloatRepr {
    Number(f64),
    Text(String),
}

impl Serialize for Float {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let v = self.0;
        if v.is_nan() {
            serializer.serialize_str("NaN")
        } else if v == f64::INFINITY {
            serializer.serialize_str("inf")
        } else if v == f64::NEG_INFINITY {
            serializer.serialize_str("-inf")
        } else {
            serializer.serialize_f64(v)
        }
    }
}

impl<'de> Deserialize<'de> for Float {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match FloatRepr::deserialize(deserializer)? {
            FloatRepr::Number(v) => Ok(Float(v)),
            FloatRepr::Text(s) => match s.as_str() {
                "NaN" => Ok(Float(f64::NAN)),
                "inf" => Ok(Float(f64::INFINITY)),
                "-inf" => Ok(Float(f64::NEG_INFINITY)),
                _ => Err(D::Error::custom(format!("invalid float '{s}'"))),
            },
        }
    }
}

pub(crate) fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    Float(*value).serialize(serializer)
}

pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Float::deserialize(deserializer).map(|f| f.0)
}

/// The same representation for every entry of a `Vec<f64>`.
pub(crate) mod vec {
    use super::Float;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) fn serialize<S>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(values.iter().map(|v| Float(*v)))
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let values = Vec::<Float>::deserialize(deserializer)?;
        Ok(values.into_iter().map(|f| f.0).collect())
    }
}
