//! HTTP client for the Together chat-completions API.
//!
//! One [`ChatClient::send`] call is one user turn: a single completion
//! request, an optional `get_place_details` tool call served through a
//! [`PlaceLookup`], then the assistant's reply appended to the history.

use std::sync::Arc;
use std::time::Duration;

use bizdir_core::AppConfig;
use reqwest::{Client, Url};
use serde::Serialize;

use crate::error::ChatError;
use crate::tool::{place_details_tool, PlaceLookup, PLACE_DETAILS_TOOL};
use crate::types::{ChatRequest, ChatResponse, Message, PlaceToolArgs, ToolCall, ToolDefinition, Usage};

const DEFAULT_BASE_URL: &str = "https://api.together.xyz/";
const COMPLETIONS_PATH: &str = "v1/chat/completions";
pub const DEFAULT_MODEL: &str = "mistralai/Mixtral-8x7B-Instruct-v0.1";

/// Result of one user turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatTurn {
    /// Full history: the prior messages, the user message, an optional tool
    /// result, then the assistant reply.
    pub messages: Vec<Message>,
    pub usage: Option<Usage>,
}

#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    api_key: String,
    base_url: Url,
    model: String,
    tools: Vec<ToolDefinition>,
    lookup: Arc<dyn PlaceLookup>,
}

impl std::fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClient")
            .field("api_key", &"[redacted]")
            .field("base_url", &self.base_url.as_str())
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl ChatClient {
    /// Creates a client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        api_key: &str,
        timeout_secs: u64,
        lookup: Arc<dyn PlaceLookup>,
    ) -> Result<Self, ChatError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL, lookup)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`ChatError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
        lookup: Arc<dyn PlaceLookup>,
    ) -> Result<Self, ChatError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("bizdir/0.1 (chat)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| ChatError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url: parsed,
            model: DEFAULT_MODEL.to_string(),
            tools: vec![place_details_tool()],
            lookup,
        })
    }

    /// Builds a client from the loaded application config.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Config`] when no chat API key is configured,
    /// plus anything [`ChatClient::with_base_url`] returns.
    pub fn from_config(
        config: &AppConfig,
        lookup: Arc<dyn PlaceLookup>,
    ) -> Result<Self, ChatError> {
        let api_key = config.require_chat_api_key()?;
        Ok(Self::with_base_url(
            api_key,
            config.request_timeout_secs,
            &config.chat_base_url,
            lookup,
        )?
        .with_model(config.chat_model.clone()))
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends one user message and returns the updated history.
    ///
    /// # Errors
    ///
    /// - [`ChatError::EmptyInput`] before any request if `user_text` is blank.
    /// - [`ChatError::Status`] on a non-2xx response.
    /// - [`ChatError::ToolArguments`] if the model's tool arguments are not
    ///   valid JSON.
    /// - [`ChatError::Lookup`] if the place search behind the tool fails.
    /// - [`ChatError::Http`] / [`ChatError::Deserialize`] on transport or
    ///   parse failure.
    pub async fn send(&self, history: &[Message], user_text: &str) -> Result<ChatTurn, ChatError> {
        let user_text = user_text.trim();
        if user_text.is_empty() {
            return Err(ChatError::EmptyInput);
        }

        let mut messages = history.to_vec();
        messages.push(Message::user(user_text));

        let response = self.complete(&messages).await?;
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or(ChatError::EmptyResponse)?;

        if let Some(call) = choice.message.tool_calls.as_deref().and_then(<[ToolCall]>::first) {
            if let Some(tool_message) = self.run_tool(call).await? {
                messages.push(tool_message);
            }
        }

        messages.push(Message::assistant(choice.message.content.unwrap_or_default()));

        if let Some(usage) = response.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "chat completion usage"
            );
        }

        Ok(ChatTurn {
            messages,
            usage: response.usage,
        })
    }

    async fn complete(&self, messages: &[Message]) -> Result<ChatResponse, ChatError> {
        let url = self.completions_url();
        let body = ChatRequest {
            model: &self.model,
            messages,
            tools: &self.tools,
            tool_choice: "auto",
        };

        let response = self
            .client
            .post(url.clone())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "chat API returned an error status");
            return Err(ChatError::Status {
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ChatError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }

    /// Runs a tool call. Returns the message to append, or `None` for tools
    /// this client does not offer.
    async fn run_tool(&self, call: &ToolCall) -> Result<Option<Message>, ChatError> {
        if call.function.name != PLACE_DETAILS_TOOL {
            tracing::warn!(tool = %call.function.name, "ignoring call to unknown tool");
            return Ok(None);
        }

        let args: PlaceToolArgs =
            serde_json::from_str(&call.function.arguments).map_err(|e| ChatError::ToolArguments {
                name: call.function.name.clone(),
                source: e,
            })?;
        tracing::info!(query = %args.query, location = %args.location, "running place lookup tool");

        let results = self.lookup.lookup(&args.query, &args.location).await?;
        let content = serde_json::to_string_pretty(&results.results).map_err(|e| {
            ChatError::Deserialize {
                context: "place lookup results".to_string(),
                source: e,
            }
        })?;
        Ok(Some(Message::assistant(content)))
    }

    fn completions_url(&self) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(&format!("{}{COMPLETIONS_PATH}", self.base_url.path()));
        url
    }
}
