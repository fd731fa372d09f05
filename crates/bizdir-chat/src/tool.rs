//! The `get_place_details` tool offered to the model.

use async_trait::async_trait;
use bizdir_core::SearchResultSet;
use bizdir_places::{PlacesClient, PlacesError, SearchQuery, SINGLE_RESULT_LIMIT};
use serde_json::json;

use crate::types::{FunctionDefinition, ToolDefinition};

pub const PLACE_DETAILS_TOOL: &str = "get_place_details";

/// Looks up places for a tool call.
#[async_trait]
pub trait PlaceLookup: Send + Sync {
    async fn lookup(&self, query: &str, location: &str) -> Result<SearchResultSet, PlacesError>;
}

#[async_trait]
impl PlaceLookup for PlacesClient {
    async fn lookup(&self, query: &str, location: &str) -> Result<SearchResultSet, PlacesError> {
        let query = SearchQuery::new(query, location).with_limit(SINGLE_RESULT_LIMIT);
        Ok(self.search(&query).await?.results)
    }
}

#[must_use]
pub fn place_details_tool() -> ToolDefinition {
    ToolDefinition {
        kind: "function",
        function: FunctionDefinition {
            name: PLACE_DETAILS_TOOL,
            description: "Fetch details about a place from the Places API",
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "Search query for the place" },
                    "location": { "type": "string", "description": "Location for the search" }
                }
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_definition_matches_wire_shape() {
        let value = serde_json::to_value(place_details_tool()).unwrap();
        assert_eq!(value["type"], "function");
        assert_eq!(value["function"]["name"], PLACE_DETAILS_TOOL);
        assert_eq!(
            value["function"]["parameters"]["properties"]["location"]["type"],
            "string"
        );
    }
}
