//! `bizdir search`: run a search, optionally load more, expand and select.

use std::future::Future;
use std::io::Write;

use bizdir_core::{AppConfig, HostBridge, HostMessage, NormalizedPlace, PlaceDetails};
use bizdir_places::{
    PlacesClient, PlacesError, SearchQuery, SearchReport, SearchSession, DEFAULT_SEARCH_LIMIT,
};
use clap::Args;

use crate::output;

#[derive(Debug, Args)]
pub(crate) struct SearchArgs {
    /// What to search for (e.g. "coffee")
    #[arg(long)]
    pub query: String,
    /// Where to search (e.g. "Sydney NSW")
    #[arg(long)]
    pub location: String,
    /// Number of results to request
    #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
    pub limit: u32,
    /// Offset into the results; floored to a multiple of 20
    #[arg(long, default_value_t = 0)]
    pub skip: u32,
    /// Load more results this many times after the first search
    #[arg(long, default_value_t = 0)]
    pub more: u32,
    /// Fetch details for the results (only the selected one with --select)
    #[arg(long)]
    pub expand: bool,
    /// Post the Nth result (1-based) to the host as PLACE_SELECTED
    #[arg(long)]
    pub select: Option<usize>,
    /// Print results as JSON instead of a listing
    #[arg(long)]
    pub json: bool,
}

/// Runs a search and prints the outcome.
///
/// # Errors
///
/// Returns an error if the client cannot be configured, any search fails,
/// `--select` is out of range, or writing to stdout fails.
pub(crate) async fn run_search(config: &AppConfig, args: &SearchArgs) -> anyhow::Result<()> {
    let client = PlacesClient::from_config(config)?;
    let session = SearchSession::new(client.clone());

    let query = SearchQuery::new(args.query.as_str(), args.location.as_str())
        .with_limit(args.limit)
        .with_skip(args.skip);
    let mut report = session.search(query).await?;
    for _ in 0..args.more {
        report = session.load_more().await?;
    }

    print_report(&report, args.json)?;

    let selected = match args.select {
        Some(n) => Some(select_result(&report, n)?),
        None => None,
    };

    if let Some(place) = selected {
        let mut bridge = HostBridge::new(config.host_target_origin.clone(), std::io::stdout());
        bridge.post(&HostMessage::place_selected(place.clone()))?;
        if args.expand {
            let fetch = client.fetch_details(&place.business_name, &place.business_address);
            show_in_modal(&mut bridge, &place, fetch).await?;
        }
    } else if args.expand {
        expand_all(&client, &report).await;
    }

    Ok(())
}

fn print_report(report: &SearchReport, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }
    if let Some(notice) = report.outcome.notice() {
        eprintln!("{notice}");
    }
    for (idx, place) in report.results.results.iter().enumerate() {
        println!("{}", output::format_place(idx + 1, place));
    }
    Ok(())
}

/// Prints a place's details between `MODAL_OPEN` and `MODAL_CLOSE`. The
/// close message is posted even when the fetch fails.
async fn show_in_modal<W, F>(
    bridge: &mut HostBridge<W>,
    place: &NormalizedPlace,
    fetch: F,
) -> anyhow::Result<()>
where
    W: Write,
    F: Future<Output = Result<PlaceDetails, PlacesError>>,
{
    bridge.post(&HostMessage::modal_open(place.clone()))?;
    match fetch.await {
        Ok(details) => {
            println!("{}", output::format_details(&place.business_name, &details));
            bridge.post(&HostMessage::ModalClose)?;
            Ok(())
        }
        Err(e) => {
            bridge.post(&HostMessage::ModalClose)?;
            Err(e.into())
        }
    }
}

/// Picks the `n`th result, 1-based.
fn select_result(report: &SearchReport, n: usize) -> anyhow::Result<NormalizedPlace> {
    n.checked_sub(1)
        .and_then(|idx| report.results.results.get(idx))
        .cloned()
        .ok_or_else(|| {
            anyhow::anyhow!(
                "--select {n} is out of range; the search returned {} result(s)",
                report.results.len()
            )
        })
}

/// Fetches details for every result concurrently. A failed fetch is printed
/// as a notice and does not affect the others.
async fn expand_all(client: &PlacesClient, report: &SearchReport) {
    let fetches = report.results.results.iter().map(|place| async move {
        let details = client
            .fetch_details(&place.business_name, &place.business_address)
            .await;
        (place, details)
    });

    for (place, details) in futures::future::join_all(fetches).await {
        match details {
            Ok(details) => println!("{}", output::format_details(&place.business_name, &details)),
            Err(e) => {
                tracing::warn!(place = %place.business_name, error = %e, "detail fetch failed");
                eprintln!("{}: could not load details: {e}", place.business_name);
            }
        }
    }
}
