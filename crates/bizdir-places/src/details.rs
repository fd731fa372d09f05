//! Mapping of a detail-fetch result into [`PlaceDetails`].

use bizdir_core::{PlaceDetails, Review};

use crate::hours::resolve_hours;
use crate::types::{RawPlace, RawReview};

/// How many reviews are kept for display.
pub const MAX_REVIEWS: usize = 3;

/// Upper bound on the `$` price scale.
const MAX_PRICE_LEVEL: u8 = 4;

/// Builds the detail view of the first place, or empty details if there is
/// none.
#[must_use]
pub fn details_from_places(places: &[RawPlace]) -> PlaceDetails {
    places.first().map(place_details).unwrap_or_default()
}

#[must_use]
pub fn place_details(place: &RawPlace) -> PlaceDetails {
    PlaceDetails {
        business_status: place
            .business_status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        price_level: price_level(place),
        working_hours: resolve_hours(place.working_hours.as_ref(), &place.popular_times).lines(),
        reviews: top_reviews(place),
    }
}

/// `price_level` as repeated `$`, or the upstream `range` string when only
/// that is present. A zero or negative level means no price information.
fn price_level(place: &RawPlace) -> Option<String> {
    if let Some(level) = place.price_level.filter(|l| l.is_finite() && *l >= 1.0) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let count = level.round().min(f64::from(MAX_PRICE_LEVEL)) as usize;
        return Some("$".repeat(count));
    }
    place
        .price_range
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
}

/// First [`MAX_REVIEWS`] reviews with any text, from the inline `reviews`
/// list or else `reviews_data`.
fn top_reviews(place: &RawPlace) -> Vec<Review> {
    let source: &[RawReview] = if place.reviews.is_empty() {
        &place.reviews_data
    } else {
        &place.reviews
    };
    source
        .iter()
        .filter_map(|r| {
            let text = r.text.as_deref().map(str::trim).filter(|t| !t.is_empty())?;
            Some(Review {
                rating: r.rating.filter(|v| v.is_finite()).unwrap_or(0.0),
                text: text.to_string(),
            })
        })
        .take(MAX_REVIEWS)
        .collect()
}
