//! Pexels search response payloads.
//!
//! Every field is optional and a value of the wrong type reads as absent, so
//! one malformed record never fails the whole page.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

#[derive(Debug, Deserialize)]
pub struct PexelsSearchResponse {
    #[serde(default, deserialize_with = "lenient_records")]
    pub photos: Option<Vec<PexelsPhoto>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PexelsPhoto {
    #[serde(default, deserialize_with = "lenient")]
    pub src: Option<PexelsSrc>,
    #[serde(default, deserialize_with = "lenient")]
    pub photographer: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub photographer_url: Option<String>,
    /// Photo page on pexels.com.
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
}

/// Size-keyed image URLs.
#[derive(Debug, Default, Deserialize)]
pub struct PexelsSrc {
    #[serde(default, deserialize_with = "lenient")]
    pub original: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub large: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub medium: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub small: Option<String>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Keeps the records that are objects; anything else in the array is skipped.
fn lenient_records<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let serde_json::Value::Array(items) = value else {
        return Ok(None);
    };

    Ok(Some(
        items
            .into_iter()
            .filter(serde_json::Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
    ))
}
