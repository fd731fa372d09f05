//! HTTP status dispatch for search responses.
//!
//! Every response from the search endpoint goes through [`dispatch`] before
//! any normalization happens. The mapping is total: each status code lands
//! in exactly one outcome or error.

use bizdir_core::SearchResultSet;
use serde::Serialize;
use serde_json::Value;

use crate::error::PlacesError;
use crate::normalize::normalize_response;
use crate::types::{ErrorEnvelope, PendingEnvelope, SearchEnvelope};

/// A response that was not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatched {
    /// `200` with a successful body; carries the raw `data` payload.
    Success(Value),
    /// `202`: the request was queued upstream.
    Pending {
        job_id: Option<String>,
        results_location: Option<String>,
    },
    /// `204`: nothing matched.
    NoResults,
}

/// How a search finished, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchOutcome {
    Success,
    Pending {
        job_id: Option<String>,
        results_location: Option<String>,
    },
    NoResults,
}

impl SearchOutcome {
    /// A short notice for non-success outcomes.
    #[must_use]
    pub fn notice(&self) -> Option<String> {
        match self {
            Self::Success => None,
            Self::Pending { job_id, .. } => Some(match job_id {
                Some(id) => format!("Request queued upstream (job {id}); results are not ready yet."),
                None => "Request queued upstream; results are not ready yet.".to_string(),
            }),
            Self::NoResults => Some("No places matched this search.".to_string()),
        }
    }
}

/// Outcome plus normalized results of one search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    pub results: SearchResultSet,
}

impl From<Dispatched> for SearchReport {
    fn from(dispatched: Dispatched) -> Self {
        match dispatched {
            Dispatched::Success(data) => Self {
                outcome: SearchOutcome::Success,
                results: normalize_response(&data),
            },
            Dispatched::Pending {
                job_id,
                results_location,
            } => Self {
                outcome: SearchOutcome::Pending {
                    job_id,
                    results_location,
                },
                results: SearchResultSet::empty(),
            },
            Dispatched::NoResults => Self {
                outcome: SearchOutcome::NoResults,
                results: SearchResultSet::empty(),
            },
        }
    }
}

/// Maps an HTTP status and body to an outcome or a typed error.
///
/// # Errors
///
/// - [`PlacesError::Unauthorized`], [`PlacesError::PaymentRequired`] and
///   [`PlacesError::InvalidParams`] for 401, 402 and 422.
/// - [`PlacesError::Deserialize`] when a `200` body is not JSON.
/// - [`PlacesError::MalformedSuccess`] when a `200` body does not report
///   success or carries no `data`.
/// - [`PlacesError::UnexpectedStatus`] for every other status.
pub fn dispatch(status: u16, body: &str) -> Result<Dispatched, PlacesError> {
    match status {
        200 => {
            let envelope: SearchEnvelope =
                serde_json::from_str(body).map_err(|e| PlacesError::Deserialize {
                    context: "places search response".to_string(),
                    source: e,
                })?;
            if !envelope.is_success() {
                return Err(PlacesError::MalformedSuccess {
                    reason: format!(
                        "status is {}",
                        envelope.status.as_deref().unwrap_or("missing")
                    ),
                });
            }
            let data = envelope.data.ok_or_else(|| PlacesError::MalformedSuccess {
                reason: "missing data".to_string(),
            })?;
            Ok(Dispatched::Success(data))
        }
        202 => {
            let pending: PendingEnvelope = serde_json::from_str(body).unwrap_or_default();
            tracing::info!(
                job_id = pending.id.as_deref().unwrap_or("-"),
                "places request queued upstream"
            );
            Ok(Dispatched::Pending {
                job_id: pending.id,
                results_location: pending.results_location,
            })
        }
        204 => Ok(Dispatched::NoResults),
        401 => Err(PlacesError::Unauthorized),
        402 => Err(PlacesError::PaymentRequired),
        422 => {
            let message = serde_json::from_str::<ErrorEnvelope>(body)
                .ok()
                .and_then(ErrorEnvelope::into_message)
                .unwrap_or_else(|| "no details given".to_string());
            Err(PlacesError::InvalidParams { message })
        }
        other => Err(PlacesError::UnexpectedStatus { status: other }),
    }
}
