//! Outscraper Maps search response types.
//!
//! The upstream place object is loosely typed: almost every field is
//! optional and some change type between records (`type` is a string or an
//! array, `verified` a bool or a number). [`RawPlace`] is the single schema
//! for that object. Every field is deserialized leniently: a value of the
//! wrong JSON type is treated as absent instead of failing the record.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Top-level body of a `200` search response:
/// `{"id": "...", "status": "Success", "data": [[{...}]]}`.
///
/// `data` stays a raw [`Value`] because its shape (flat vs nested array, or
/// something else entirely) is decided by the normalizer, not by serde.
#[derive(Debug, Default, Deserialize)]
pub struct SearchEnvelope {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub status: Option<String>,
    /// `None` when the key is absent or `null`.
    #[serde(default)]
    pub data: Option<Value>,
}

impl SearchEnvelope {
    /// `true` when the body's own status reports success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("success"))
    }
}

/// Body of a `202 Accepted` response for a request queued upstream.
#[derive(Debug, Default, Deserialize)]
pub struct PendingEnvelope {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub results_location: Option<String>,
}

/// Error body returned with 4xx statuses, when the upstream sends one.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default, deserialize_with = "lenient::string", alias = "error")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient::string", rename = "errorMessage")]
    pub error_message: Option<String>,
}

impl ErrorEnvelope {
    #[must_use]
    pub fn into_message(self) -> Option<String> {
        self.error_message.or(self.message)
    }
}

/// A place as the upstream API describes it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPlace {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub full_address: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub site: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub menu_link: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub booking_appointment_link: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub about: Option<Map<String, Value>>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub details: Option<Map<String, Value>>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub reviews_tags: Vec<String>,
    /// `type` is usually a single category string but some records carry a
    /// list of categories.
    #[serde(default, rename = "type", deserialize_with = "lenient::one_or_many")]
    pub place_type: Option<OneOrMany>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub business_status: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub price_level: Option<f64>,
    /// Upstream `range` field: the price level as a `$` string, when it is
    /// sent that way instead of as `price_level`.
    #[serde(default, rename = "range", deserialize_with = "lenient::string")]
    pub price_range: Option<String>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub working_hours: Option<Map<String, Value>>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub popular_times: Vec<PopularDay>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub reviews_data: Vec<RawReview>,
    /// Either a review count or an inline list of reviews depending on the
    /// requested fields; only the list form is used.
    #[serde(default, deserialize_with = "lenient::list")]
    pub reviews: Vec<RawReview>,
    /// Image candidates are kept as raw values; non-strings are dropped
    /// during normalization.
    #[serde(default)]
    pub logo: Value,
    #[serde(default)]
    pub photo: Value,
    #[serde(default)]
    pub street_view: Value,
    #[serde(default, deserialize_with = "lenient::values")]
    pub photos: Vec<Value>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub owner_title: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub owner_link: Option<String>,
    #[serde(default, deserialize_with = "lenient::truthy")]
    pub verified: bool,
}

/// A string-or-list field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// One day of the `popular_times` table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PopularDay {
    #[serde(default, deserialize_with = "lenient::string")]
    pub day_text: Option<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub popular_times: Vec<PopularBucket>,
}

/// One hourly bucket of a [`PopularDay`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PopularBucket {
    #[serde(default, deserialize_with = "lenient::number")]
    pub percentage: Option<f64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub time: Option<String>,
}

/// A review attached to a place.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReview {
    #[serde(
        default,
        alias = "review_rating",
        deserialize_with = "lenient::number"
    )]
    pub rating: Option<f64>,
    #[serde(default, alias = "review_text", deserialize_with = "lenient::string")]
    pub text: Option<String>,
}

/// Deserializers that never fail: anything that is not the expected JSON
/// type becomes the field's empty value.
pub(crate) mod lenient {
    use super::{Deserialize, Deserializer, Map, OneOrMany, Value};

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => Some(s),
            _ => None,
        })
    }

    pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        })
    }

    pub fn truthy<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Bool(b) => b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
            Value::Null => false,
        })
    }

    pub fn object<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<Map<String, Value>>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Object(map) => Some(map),
            _ => None,
        })
    }

    pub fn values<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Value>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items,
            _ => Vec::new(),
        })
    }

    pub fn string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        Ok(values(d)?
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect())
    }

    /// Parses each array element as `T`, skipping elements that do not fit.
    pub fn list<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: serde::de::DeserializeOwned,
    {
        Ok(values(d)?
            .into_iter()
            .filter_map(|v| serde_json::from_value::<T>(v).ok())
            .collect())
    }

    pub fn one_or_many<'de, D: Deserializer<'de>>(d: D) -> Result<Option<OneOrMany>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => Some(OneOrMany::One(s)),
            Value::Array(items) => Some(OneOrMany::Many(
                items
                    .into_iter()
                    .filter_map(|v| match v {
                        Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            )),
            _ => None,
        })
    }
}
