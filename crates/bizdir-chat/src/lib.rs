//! Chat completions with a place-lookup tool.

pub mod client;
pub mod error;
pub mod tool;
pub mod types;

pub use client::{ChatClient, ChatTurn, DEFAULT_MODEL};
pub use error::ChatError;
pub use tool::{place_details_tool, PlaceLookup, PLACE_DETAILS_TOOL};
pub use types::{Message, Role, Usage};
