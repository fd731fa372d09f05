use bizdir_core::AppConfig;
use bizdir_places::PlacesClient;

use crate::output;

/// Fetches and prints the detail view for one place.
///
/// # Errors
///
/// Returns an error if the client cannot be configured or the fetch fails
/// after its retry.
pub(crate) async fn run_details(
    config: &AppConfig,
    name: &str,
    address: &str,
    json: bool,
) -> anyhow::Result<()> {
    let client = PlacesClient::from_config(config)?;
    let details = client.fetch_details(name, address).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&details)?);
    } else {
        println!("{}", output::format_details(name, &details));
    }
    Ok(())
}
