//! Normalization of upstream place records into [`NormalizedPlace`].
//!
//! This is the only mapper from the upstream shape; the CLI, the HTTP
//! backend and the chat tool all go through [`normalize_response`]. Every
//! function here is pure: the same input always yields the same output.

use bizdir_core::{NormalizedPlace, SearchResultSet, NOT_AVAILABLE};
use serde_json::Value;

use crate::hours::resolve_hours;
use crate::types::{OneOrMany, RawPlace};

const ABOUT_FROM_BUSINESS: &str = "From the business";
const DETAILS_EMAIL: &str = "Business Email";

/// Normalizes the `data` payload of a successful search response.
///
/// A payload that is not an array degrades to an empty result set instead of
/// failing. A flat array is treated as the results of a single query; an
/// array of arrays as one batch per query, flattened in order.
#[must_use]
pub fn normalize_response(data: &Value) -> SearchResultSet {
    let results = extract_raw_places(data)
        .iter()
        .map(normalize_place)
        .collect::<Vec<_>>();
    tracing::debug!(count = results.len(), "normalized places response");
    SearchResultSet { results }
}

/// Splits the payload into raw places, in upstream order.
///
/// Entries that are not JSON objects are skipped with a warning.
#[must_use]
pub fn extract_raw_places(data: &Value) -> Vec<RawPlace> {
    let Some(items) = data.as_array() else {
        tracing::warn!("places payload is not an array; treating as no results");
        return Vec::new();
    };

    let batches: Vec<&Value> = if items.first().is_some_and(Value::is_array) {
        items.iter().collect()
    } else {
        vec![data]
    };

    batches
        .into_iter()
        .enumerate()
        .flat_map(|(batch_idx, batch)| {
            let entries: &[Value] = match batch.as_array() {
                Some(entries) => entries,
                None => {
                    tracing::warn!(batch_idx, "skipping non-array batch in places payload");
                    &[]
                }
            };
            entries.iter().enumerate().filter_map(move |(idx, entry)| {
                if !entry.is_object() {
                    tracing::warn!(batch_idx, idx, "skipping non-object place entry");
                    return None;
                }
                serde_json::from_value::<RawPlace>(entry.clone())
                    .map_err(|e| {
                        tracing::warn!(batch_idx, idx, error = %e, "skipping malformed place entry");
                    })
                    .ok()
            })
        })
        .collect()
}

/// Maps one raw place into the stable record.
#[must_use]
pub fn normalize_place(place: &RawPlace) -> NormalizedPlace {
    let hours = resolve_hours(place.working_hours.as_ref(), &place.popular_times);
    let description = description(place);
    let category = category(place);
    let tagline = tagline(place, &category);

    NormalizedPlace {
        business_name: text_or_na(place.name.as_deref()),
        business_address: text_or_na(place.full_address.as_deref()),
        business_phone: text_or_na(place.phone.as_deref()),
        business_email: business_email(place),
        business_description: description,
        website_url: first_text(&[
            place.site.as_deref(),
            place.menu_link.as_deref(),
            place.booking_appointment_link.as_deref(),
        ])
        .unwrap_or_else(na),
        latitude: place.latitude.filter(|v| v.is_finite()).unwrap_or(0.0),
        longitude: place.longitude.filter(|v| v.is_finite()).unwrap_or(0.0),
        brand_images: brand_images(place),
        operating_hours: hours.clone(),
        hours,
        open_state: text_or_na(place.business_status.as_deref()),
        category,
        tagline,
        owner_name: text_or_na(place.owner_title.as_deref()),
        products_services: products_services(place),
        social_media_links: social_media_links(place),
        verified: place.verified,
        owner_link: text_or_na(place.owner_link.as_deref()),
    }
}

fn na() -> String {
    NOT_AVAILABLE.to_string()
}

/// `Some(s)` when `s` has visible content.
fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

fn text_or_na(s: Option<&str>) -> String {
    non_empty(s).map_or_else(na, str::to_string)
}

fn first_text(candidates: &[Option<&str>]) -> Option<String> {
    candidates
        .iter()
        .find_map(|c| non_empty(*c))
        .map(str::to_string)
}

/// Looks up `map[key].description` style nested strings.
fn nested_str<'a>(value: Option<&'a Value>, key: &str) -> Option<&'a str> {
    value.and_then(|v| v.get(key)).and_then(Value::as_str)
}

fn description(place: &RawPlace) -> String {
    let about = place.about.as_ref();
    let about_description = about
        .and_then(|m| m.get("description"))
        .and_then(Value::as_str);
    let from_business = nested_str(
        about.and_then(|m| m.get(ABOUT_FROM_BUSINESS)),
        "description",
    );

    if let Some(found) = first_text(&[
        place.description.as_deref(),
        about_description,
        from_business,
    ]) {
        return found;
    }

    let tags: Vec<&str> = place
        .reviews_tags
        .iter()
        .map(String::as_str)
        .filter(|t| !t.trim().is_empty())
        .collect();
    if tags.is_empty() {
        na()
    } else {
        tags.join(", ")
    }
}

fn category(place: &RawPlace) -> String {
    let from_type = match &place.place_type {
        Some(OneOrMany::One(s)) => non_empty(Some(s.as_str())).map(str::to_string),
        Some(OneOrMany::Many(items)) => {
            let joined = items
                .iter()
                .map(String::as_str)
                .filter(|s| !s.trim().is_empty())
                .collect::<Vec<_>>()
                .join(", ");
            Some(joined).filter(|s| !s.is_empty())
        }
        None => None,
    };
    from_type
        .or_else(|| non_empty(place.category.as_deref()).map(str::to_string))
        .unwrap_or_else(na)
}

/// Text before the first period of the direct description; the category
/// when there is no direct description or it starts with a period.
fn tagline(place: &RawPlace, category: &str) -> String {
    non_empty(place.description.as_deref())
        .and_then(|d| d.split('.').next())
        .filter(|t| !t.trim().is_empty())
        .map_or_else(|| category.to_string(), str::to_string)
}

fn business_email(place: &RawPlace) -> String {
    let from_details = place
        .details
        .as_ref()
        .and_then(|d| d.get(DETAILS_EMAIL))
        .and_then(Value::as_str);
    first_text(&[place.email.as_deref(), from_details]).unwrap_or_else(na)
}

/// Logo, photo, street view, then extra photos; empty strings, `"N/A"` and
/// non-strings dropped. Falls back to `["N/A"]`.
fn brand_images(place: &RawPlace) -> Vec<String> {
    let images: Vec<String> = [&place.logo, &place.photo, &place.street_view]
        .into_iter()
        .chain(place.photos.iter())
        .filter_map(Value::as_str)
        .filter(|img| !img.trim().is_empty() && *img != NOT_AVAILABLE)
        .map(str::to_string)
        .collect();

    if images.is_empty() {
        vec![na()]
    } else {
        images
    }
}

fn products_services(place: &RawPlace) -> Vec<String> {
    match &place.place_type {
        Some(OneOrMany::Many(items)) => items.clone(),
        Some(OneOrMany::One(s)) => vec![text_or_na(Some(s.as_str()))],
        None => vec![na()],
    }
}

fn social_media_links(place: &RawPlace) -> Vec<String> {
    [place.site.as_deref(), place.owner_link.as_deref()]
        .into_iter()
        .filter_map(non_empty)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
