//! `bizdir chat`: line-oriented chat over stdin.

use std::sync::Arc;

use bizdir_chat::{ChatClient, Message, PlaceLookup, Usage};
use bizdir_core::AppConfig;
use bizdir_places::PlacesClient;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Reads messages from stdin until EOF, printing each reply.
///
/// A failed turn is reported on stderr and leaves the history unchanged;
/// the session continues with the next line.
///
/// # Errors
///
/// Returns an error if either client cannot be configured or stdin cannot
/// be read.
pub(crate) async fn run_chat(config: &AppConfig) -> anyhow::Result<()> {
    let lookup: Arc<dyn PlaceLookup> = Arc::new(PlacesClient::from_config(config)?);
    let client = ChatClient::from_config(config, lookup)?;
    tracing::info!(model = client.model(), "chat session started");

    let mut history: Vec<Message> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match client.send(&history, &line).await {
            Ok(turn) => {
                // Skip the user's own line; print the tool result and reply.
                for message in turn.messages.iter().skip(history.len() + 1) {
                    println!("{}", message.content);
                }
                if let Some(usage) = turn.usage {
                    eprintln!("{}", format_usage(&usage));
                }
                history = turn.messages;
            }
            Err(e) => eprintln!("error: {e}"),
        }
    }
    Ok(())
}

fn format_usage(usage: &Usage) -> String {
    format!(
        "[tokens: prompt {} / completion {} / total {}]",
        usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
    )
}
