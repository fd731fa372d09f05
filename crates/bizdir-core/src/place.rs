//! Normalized place records handed to every consumer.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Placeholder used for any text field the upstream record did not supply.
pub const NOT_AVAILABLE: &str = "N/A";

/// Day-of-week to opening-range mapping, e.g. `"Monday" => "7AM-8PM"`.
///
/// Keeps the upstream day order rather than sorting, and serializes as a
/// plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hours(Vec<(String, String)>);

impl Hours {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the range for `day`, replacing an earlier entry for the same day
    /// in place.
    pub fn insert(&mut self, day: impl Into<String>, range: impl Into<String>) {
        let day = day.into();
        let range = range.into();
        if let Some(slot) = self.0.iter_mut().find(|(d, _)| *d == day) {
            slot.1 = range;
        } else {
            self.0.push((day, range));
        }
    }

    #[must_use]
    pub fn get(&self, day: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(d, _)| d == day)
            .map(|(_, range)| range.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(d, r)| (d.as_str(), r.as_str()))
    }

    /// Renders each entry as `"Day: range"`, in order.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.iter().map(|(d, r)| format!("{d}: {r}")).collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Hours {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut hours = Self::new();
        for (day, range) in iter {
            hours.insert(day, range);
        }
        hours
    }
}

impl Serialize for Hours {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (day, range) in &self.0 {
            map.serialize_entry(day, range)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Hours {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct HoursVisitor;

        impl<'de> Visitor<'de> for HoursVisitor {
            type Value = Hours;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of day names to opening ranges")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Hours, A::Error> {
                let mut hours = Hours::new();
                while let Some((day, range)) = access.next_entry::<String, String>()? {
                    hours.insert(day, range);
                }
                Ok(hours)
            }
        }

        deserializer.deserialize_map(HoursVisitor)
    }
}

/// A business listing in the stable shape every consumer renders.
///
/// Every field is always populated: text fields fall back to
/// [`NOT_AVAILABLE`], coordinates to `0.0`, collections to empty. The JSON
/// keys are the display labels the front end binds to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPlace {
    #[serde(rename = "Business Name")]
    pub business_name: String,
    #[serde(rename = "Business Address")]
    pub business_address: String,
    #[serde(rename = "Business Phone")]
    pub business_phone: String,
    #[serde(rename = "Business Email")]
    pub business_email: String,
    #[serde(rename = "Business Description")]
    pub business_description: String,
    #[serde(rename = "Website URL")]
    pub website_url: String,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
    /// Never empty: `["N/A"]` when no image was usable, so element 0 is
    /// always the primary image or the placeholder.
    #[serde(rename = "Brand Images")]
    pub brand_images: Vec<String>,
    #[serde(rename = "Hours")]
    pub hours: Hours,
    /// Same mapping as `hours`; both keys are part of the record contract.
    #[serde(rename = "Operating Hours")]
    pub operating_hours: Hours,
    #[serde(rename = "Open State")]
    pub open_state: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Tagline")]
    pub tagline: String,
    #[serde(rename = "Owner Name")]
    pub owner_name: String,
    #[serde(rename = "Products/Services")]
    pub products_services: Vec<String>,
    #[serde(rename = "Social Media Links")]
    pub social_media_links: Vec<String>,
    #[serde(rename = "Verified")]
    pub verified: bool,
    #[serde(rename = "Owner Link")]
    pub owner_link: String,
}

impl NormalizedPlace {
    /// First brand image, or `None` when only the placeholder is present.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.brand_images
            .first()
            .map(String::as_str)
            .filter(|img| *img != NOT_AVAILABLE)
    }

    /// Website URL, or `None` for the placeholder.
    #[must_use]
    pub fn website(&self) -> Option<&str> {
        Some(self.website_url.as_str()).filter(|url| *url != NOT_AVAILABLE)
    }
}

/// The outcome of one search call. Replaced wholesale on every search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResultSet {
    pub results: Vec<NormalizedPlace>,
}

impl SearchResultSet {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Extra detail shown when a result is expanded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceDetails {
    pub business_status: Option<String>,
    /// Price level rendered as repeated `$`, e.g. `"$$"`.
    pub price_level: Option<String>,
    /// `"Day: range"` lines in upstream order.
    pub working_hours: Vec<String>,
    /// At most three reviews.
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub rating: f64,
    pub text: String,
}
