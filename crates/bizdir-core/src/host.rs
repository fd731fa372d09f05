//! Messages forwarded to an embedding host.
//!
//! When bizdir runs inside another page or process, a selected result and
//! modal state changes are posted to the host as small JSON envelopes. The
//! target origin defaults to the wildcard `"*"`; deployments that know their
//! host set a concrete origin through `BIZDIR_HOST_TARGET_ORIGIN`.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::place::NormalizedPlace;

pub const WILDCARD_ORIGIN: &str = "*";

/// A message for the embedding host, serialized as
/// `{"type": "PLACE_SELECTED", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HostMessage {
    PlaceSelected(Box<NormalizedPlace>),
    ModalOpen(Box<NormalizedPlace>),
    ModalClose,
}

impl HostMessage {
    #[must_use]
    pub fn place_selected(place: NormalizedPlace) -> Self {
        Self::PlaceSelected(Box::new(place))
    }

    #[must_use]
    pub fn modal_open(place: NormalizedPlace) -> Self {
        Self::ModalOpen(Box::new(place))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a> {
    target_origin: &'a str,
    message: &'a HostMessage,
}

/// Posts [`HostMessage`]s as JSON lines to a sink, tagged with the
/// configured target origin.
pub struct HostBridge<W: Write> {
    target_origin: String,
    sink: W,
}

impl<W: Write> HostBridge<W> {
    pub fn new(target_origin: impl Into<String>, sink: W) -> Self {
        let target_origin = target_origin.into();
        let target_origin = if target_origin.trim().is_empty() {
            WILDCARD_ORIGIN.to_owned()
        } else {
            target_origin
        };
        Self {
            target_origin,
            sink,
        }
    }

    #[must_use]
    pub fn target_origin(&self) -> &str {
        &self.target_origin
    }

    /// Writes one message as a single JSON line.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if serialization or the write to the sink fails.
    pub fn post(&mut self, message: &HostMessage) -> std::io::Result<()> {
        let envelope = Envelope {
            target_origin: &self.target_origin,
            message,
        };
        serde_json::to_writer(&mut self.sink, &envelope)?;
        self.sink.write_all(b"\n")?;
        self.sink.flush()?;
        tracing::debug!(target_origin = %self.target_origin, "posted host message");
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}
