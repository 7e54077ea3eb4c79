//! Serde helpers that render raw byte fields as hex strings.

use serde::de::Error;
use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: AsRef<[u8]>,
    S: Serializer,
{
    serializer.serialize_str(&hex::encode(value))
}

pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: TryFrom<Vec<u8>>,
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    let raw = hex::decode(s).map_err(D::Error::custom)?;
    let len = raw.len();
    T::try_from(raw).map_err(|_| D::Error::custom(format!("unexpected field length {}", len)))
}
