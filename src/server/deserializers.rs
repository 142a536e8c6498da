use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer};

// forms send an empty string for a radio group with nothing selected
pub fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => FromStr::from_str(value).map(Some).map_err(de::Error::custom),
    }
}
