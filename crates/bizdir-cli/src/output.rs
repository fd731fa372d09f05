//! Plain-text rendering of places and details for the terminal.

use bizdir_core::{NormalizedPlace, PlaceDetails, NOT_AVAILABLE};

/// Renders one result card.
pub(crate) fn format_place(position: usize, place: &NormalizedPlace) -> String {
    let mut title = format!("{position}. {}", place.business_name);
    if place.verified {
        title.push_str(" [verified]");
    }
    let mut lines = vec![title, format!("   {}", place.business_address)];
    if place.category != NOT_AVAILABLE {
        lines.push(format!("   {}", place.category));
    }
    if place.business_phone != NOT_AVAILABLE {
        lines.push(format!("   Phone: {}", place.business_phone));
    }
    if let Some(site) = place.website() {
        lines.push(format!("   Web: {site}"));
    }
    if place.open_state != NOT_AVAILABLE {
        lines.push(format!("   Status: {}", place.open_state));
    }
    if let Some(image) = place.primary_image() {
        lines.push(format!("   Image: {image}"));
    }
    lines.join("\n")
}

/// Renders the expanded view of one place.
pub(crate) fn format_details(name: &str, details: &PlaceDetails) -> String {
    let mut lines = vec![format!("== {name} ==")];
    if let Some(status) = &details.business_status {
        lines.push(format!("Status: {status}"));
    }
    if let Some(price) = &details.price_level {
        lines.push(format!("Price Level: {price}"));
    }
    if !details.working_hours.is_empty() {
        lines.push("Hours:".to_string());
        lines.extend(details.working_hours.iter().map(|line| format!("  {line}")));
    }
    if !details.reviews.is_empty() {
        lines.push("Recent Reviews:".to_string());
        lines.extend(
            details
                .reviews
                .iter()
                .map(|review| format!("  {:.1}/5  {}", review.rating, review.text)),
        );
    }
    if details == &PlaceDetails::default() {
        lines.push("No further details available.".to_string());
    }
    lines.join("\n")
}
