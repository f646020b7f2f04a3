//! One-shot retrieval of the source JSON document.
//!
//! No retry: a failed fetch ends the run and the caller reports it.

use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};

/// Monthly global land-surface temperature, 1753 onwards.
pub const DATASET_URL: &str =
    "https://raw.githubusercontent.com/freeCodeCamp/ProjectReferenceData/master/global-temperature.json";

/// GET `url` and parse the body as JSON.
///
/// # Errors
///
/// [`Error::Network`] on transport failure, a non-2xx status or an unreadable
/// body; [`Error::Parse`] if the body is not JSON.
pub async fn fetch_json(client: &reqwest::Client, url: &str) -> Result<Value> {
    debug!(url, "fetching dataset");

    let response = client
        .get(url)
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::Network(format!("{url} returned {status}")));
    }

    let body = response.text().await?;
    debug!(bytes = body.len(), "dataset downloaded");

    serde_json::from_str(&body).map_err(Error::Parse)
}
