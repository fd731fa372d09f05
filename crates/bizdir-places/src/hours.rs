//! Opening-hours extraction.
//!
//! Upstream records either carry a direct `working_hours` mapping or only a
//! `popular_times` traffic table. The table is turned into a per-day range
//! spanning the first and last hourly bucket with any traffic.

use bizdir_core::Hours;
use serde_json::{Map, Value};

use crate::types::PopularDay;

pub const CLOSED: &str = "Closed";
const UNKNOWN_DAY: &str = "Unknown";

/// Derives `day -> "first-last"` ranges from a `popular_times` table.
///
/// A bucket counts as open when its `percentage` is above zero. Open buckets
/// without a `time` label are ignored. Days with no labelled open buckets, or
/// no buckets at all, map to `"Closed"`. An empty table
/// yields an empty mapping.
#[must_use]
pub fn hours_from_popular_times(days: &[PopularDay]) -> Hours {
    let mut hours = Hours::new();
    for day in days {
        let label = day
            .day_text
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(UNKNOWN_DAY);

        let mut open = day
            .popular_times
            .iter()
            .filter(|b| b.percentage.is_some_and(|p| p > 0.0))
            .filter_map(|b| b.time.as_deref());

        let range = match open.next() {
            Some(first) => {
                let last = open.last().unwrap_or(first);
                format!("{first}-{last}")
            }
            None => CLOSED.to_string(),
        };
        hours.insert(label, range);
    }
    hours
}

/// Reads a direct `working_hours` mapping.
///
/// Values may be strings or lists of strings (split shifts); lists are
/// joined with `", "`. Entries of any other type are skipped.
#[must_use]
pub fn hours_from_working_hours(map: &Map<String, Value>) -> Hours {
    map.iter()
        .filter_map(|(day, value)| {
            let range = match value {
                Value::String(s) => s.clone(),
                Value::Array(items) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
                _ => return None,
            };
            Some((day.clone(), range))
        })
        .collect()
}

/// Picks the hours for a place: a non-empty direct mapping wins over the
/// derived one; with neither source the mapping is empty.
#[must_use]
pub fn resolve_hours(working_hours: Option<&Map<String, Value>>, popular: &[PopularDay]) -> Hours {
    if let Some(direct) = working_hours.map(hours_from_working_hours) {
        if !direct.is_empty() {
            return direct;
        }
    }
    hours_from_popular_times(popular)
}
